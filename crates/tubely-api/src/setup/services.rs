//! Wiring of the upload service and application state.

use crate::auth::JwtAuthenticator;
use crate::services::upload::{UploadLimits, VideoUploadService};
use crate::state::AppState;
use sqlx::PgPool;
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::VideoStore;
use tubely_processing::AspectClassifier;
use tubely_storage::Storage;

/// Assemble [`AppState`] from already-constructed collaborators.
pub fn build_state(
    config: Config,
    pool: Option<PgPool>,
    videos: Arc<dyn VideoStore>,
    storage: Arc<dyn Storage>,
    classifier: Arc<dyn AspectClassifier>,
) -> Arc<AppState> {
    let limits = UploadLimits {
        max_bytes: config.max_video_size_bytes(),
        scratch_dir: config.upload_scratch_dir().map(|p| p.to_path_buf()),
    };
    let uploads = VideoUploadService::new(videos.clone(), storage, classifier, limits);
    let auth = JwtAuthenticator::new(config.jwt_secret(), config.jwt_issuer());

    Arc::new(AppState {
        config,
        pool,
        videos,
        uploads,
        auth,
    })
}
