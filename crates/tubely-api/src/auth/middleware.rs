use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::auth::jwt::bearer_token;
use crate::auth::models::AuthUser;
use crate::error::HttpAppError;
use crate::state::AppState;

/// Reject requests without a valid bearer token; otherwise attach [`AuthUser`].
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let user_id = match bearer_token(request.headers()).and_then(|t| state.auth.validate(t)) {
        Ok(user_id) => user_id,
        Err(e) => return HttpAppError(e).into_response(),
    };

    request.extensions_mut().insert(AuthUser { user_id });
    next.run(request).await
}
