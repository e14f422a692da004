//! Video upload service
//!
//! Runs one upload through the full pipeline. Steps are strictly sequential; the
//! staged scratch file lives until the end of [`VideoUploadService::upload`] and
//! is removed on every exit path when it goes out of scope.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tubely_core::constants::VIDEO_CONTENT_TYPE;
use tubely_core::Video;
use tubely_db::VideoStore;
use tubely_processing::{stage_stream, AspectClassifier, StagingError};
use tubely_storage::{plan_object_key, Storage, StorageBackend};

use crate::utils::upload::{extension_for_media_type, parse_media_type};

use super::record::persist_uploaded_object;
use super::types::{UploadError, UploadRequest};

/// Per-upload resource limits.
#[derive(Debug, Clone)]
pub struct UploadLimits {
    /// Hard ceiling on staged bytes.
    pub max_bytes: u64,
    /// Where scratch files go; `None` uses the OS temp directory.
    pub scratch_dir: Option<PathBuf>,
}

#[derive(Clone)]
pub struct VideoUploadService {
    videos: Arc<dyn VideoStore>,
    storage: Arc<dyn Storage>,
    classifier: Arc<dyn AspectClassifier>,
    limits: UploadLimits,
}

impl VideoUploadService {
    pub fn new(
        videos: Arc<dyn VideoStore>,
        storage: Arc<dyn Storage>,
        classifier: Arc<dyn AspectClassifier>,
        limits: UploadLimits,
    ) -> Self {
        Self {
            videos,
            storage,
            classifier,
            limits,
        }
    }

    pub fn limits(&self) -> &UploadLimits {
        &self.limits
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.storage.backend_type()
    }

    /// validate → authorize → stage → classify → plan key → store → record
    ///
    /// The record is written only after the object store acknowledged the
    /// upload. Nothing is retried.
    #[tracing::instrument(
        skip(self, request),
        fields(video_id = %request.video_id, user_id = %request.requester)
    )]
    pub async fn upload(&self, request: UploadRequest<'_>) -> Result<Video, UploadError> {
        let start = Instant::now();
        let UploadRequest {
            video_id,
            requester,
            content_type,
            mut body,
            declared_len,
        } = request;

        // 1. Validate the declared content type before touching anything else
        let media_type = parse_media_type(&content_type)
            .ok_or_else(|| UploadError::Validation("Invalid Content-Type for video".to_string()))?;
        if media_type != VIDEO_CONTENT_TYPE {
            return Err(UploadError::Validation(
                "Video file format is not .mp4".to_string(),
            ));
        }
        let extension = extension_for_media_type(&media_type).ok_or_else(|| {
            UploadError::Validation(format!("No file extension known for {}", media_type))
        })?;

        // 2. Load the record and check ownership
        let video = self
            .videos
            .get_video(video_id)
            .await
            .map_err(UploadError::Lookup)?
            .ok_or(UploadError::NotFound(video_id))?;
        if !video.is_owned_by(requester) {
            tracing::warn!(owner_id = %video.user_id, "Upload rejected: requester does not own video");
            return Err(UploadError::Auth("Unauthorized".to_string()));
        }

        // 3. Stage to a size-capped scratch file
        let mut staged = stage_stream(
            &mut body,
            self.limits.max_bytes,
            declared_len,
            self.limits.scratch_dir.as_deref(),
        )
        .await?;
        drop(body);

        // 4. Classify aspect ratio
        let aspect = self.classifier.classify(staged.path()).await?;

        // 5. Plan the object key
        // ThreadRng is !Send; keep it out of scope at every await point.
        let key = {
            let mut rng = rand::rng();
            plan_object_key(&mut rng, aspect, extension)
        };

        tracing::debug!(
            size_bytes = staged.size(),
            aspect = %aspect,
            key = %key,
            backend = %self.storage.backend_type(),
            "Video staged and classified"
        );

        // 6. Stream the staged file to the object store
        let reader = staged
            .reader()
            .await
            .map_err(|e| UploadError::Staging(StagingError::Io(e)))?;
        let uploaded = self
            .storage
            .upload_stream(&key, &media_type, Some(staged.size()), Box::pin(reader))
            .await?;

        // 7. Point the record at the stored object
        let updated = persist_uploaded_object(self.videos.as_ref(), video, &uploaded).await?;

        tracing::info!(
            key = %uploaded.key(),
            size_bytes = uploaded.size_bytes(),
            content_type = %uploaded.content_type(),
            aspect = %aspect,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Video upload completed"
        );

        Ok(updated)
    }
}
