//! Application state shared by every handler.

use sqlx::PgPool;
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::VideoStore;

use crate::auth::JwtAuthenticator;
use crate::services::upload::VideoUploadService;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Connection pool, for health checks. `None` when the record store is not Postgres-backed.
    pub pool: Option<PgPool>,
    pub videos: Arc<dyn VideoStore>,
    pub uploads: VideoUploadService,
    pub auth: JwtAuthenticator,
}
