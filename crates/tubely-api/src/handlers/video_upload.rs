use crate::auth::AuthUser;
use crate::constants::VIDEO_FORM_FIELD;
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::upload::UploadRequest;
use crate::state::AppState;
use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use futures::TryStreamExt;
use std::sync::Arc;
use tokio_util::io::StreamReader;
use tubely_core::{AppError, VideoResponse};
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/videos/{video_id}/upload",
    tag = "videos",
    params(
        ("video_id" = Uuid, Path, description = "Video ID")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data",
        description = "Form with a single `video` file part of type video/mp4"),
    responses(
        (status = 200, description = "Video uploaded and record updated", body = VideoResponse),
        (status = 400, description = "Invalid input or unreadable media", body = ErrorResponse),
        (status = 401, description = "Missing token or not the owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(video_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<VideoResponse>, HttpAppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        if field.name() != Some(VIDEO_FORM_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        // The field borrows `multipart`, so the whole upload runs inside the loop.
        let body = StreamReader::new(field.map_err(body_read_error));

        let video = state
            .uploads
            .upload(UploadRequest {
                video_id,
                requester: user.user_id,
                content_type,
                body: Box::pin(body),
                declared_len: None,
            })
            .await
            .map_err(AppError::from)?;

        return Ok(Json(VideoResponse::from(video)));
    }

    Err(AppError::InvalidInput(format!("Missing form file field '{}'", VIDEO_FORM_FIELD)).into())
}

/// Hitting the request body limit means the upload is too large, not malformed.
fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("Request body too large: {}", err))
    } else {
        AppError::BadRequest(format!("Couldn't parse multipart form: {}", err))
    }
}

/// Staging reports `FileTooLarge` reads as a capacity failure.
fn body_read_error(err: MultipartError) -> std::io::Error {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        std::io::Error::new(std::io::ErrorKind::FileTooLarge, err)
    } else {
        std::io::Error::other(err)
    }
}
