//! Types used by the video upload service

use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;
use tubely_core::AppError;
use tubely_processing::{ProbeError, StagingError};
use tubely_storage::StorageError;
use uuid::Uuid;

/// One inbound upload, as handed over by the transport layer.
pub struct UploadRequest<'a> {
    pub video_id: Uuid,
    /// Authenticated uploader.
    pub requester: Uuid,
    /// Content type declared for the file part.
    pub content_type: String,
    pub body: Pin<Box<dyn AsyncRead + Send + 'a>>,
    /// Byte length announced by the client, when known.
    pub declared_len: Option<u64>,
}

/// Failure of an upload, by the stage that rejected it.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Auth(String),

    #[error("video {0} not found")]
    NotFound(Uuid),

    #[error("upload exceeds the {limit} byte limit")]
    Capacity { limit: u64 },

    #[error("staging failed: {0}")]
    Staging(#[source] StagingError),

    #[error("probe failed: {0}")]
    Probe(#[from] ProbeError),

    #[error("object store upload failed: {0}")]
    Upload(#[from] StorageError),

    #[error("failed to load video record: {0}")]
    Lookup(#[source] AppError),

    #[error("failed to persist video record: {0}")]
    Persistence(#[source] AppError),
}

impl From<StagingError> for UploadError {
    fn from(err: StagingError) -> Self {
        match err {
            StagingError::TooLarge { limit } => UploadError::Capacity { limit },
            other => UploadError::Staging(other),
        }
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Validation(msg) => AppError::InvalidInput(msg),
            UploadError::Auth(msg) => AppError::Unauthorized(msg),
            UploadError::NotFound(_) => AppError::NotFound("Video not found".to_string()),
            UploadError::Capacity { limit } => AppError::PayloadTooLarge(format!(
                "Video exceeds the maximum size of {} MB",
                limit / 1024 / 1024
            )),
            UploadError::Probe(e @ (ProbeError::Decode(_) | ProbeError::NoStreams)) => {
                AppError::InvalidMedia(format!("Couldn't read video streams: {}", e))
            }
            UploadError::Probe(e) => AppError::Internal(e.to_string()),
            UploadError::Staging(e) => AppError::Internal(e.to_string()),
            UploadError::Upload(e) => AppError::Storage(e.to_string()),
            UploadError::Lookup(e) => e,
            UploadError::Persistence(e) => AppError::InternalWithSource {
                message: "Failed to update video record".to_string(),
                source: anyhow::Error::new(e),
            },
        }
    }
}
