//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::keys::ObjectKey;
use crate::StorageBackend;
use async_trait::async_trait;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Receipt for an object that was fully written to a backend.
///
/// Only a completed `upload_stream` yields one of these, and the record updater
/// accepts nothing else, so a record can never point at an object that was not
/// stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedObject {
    key: ObjectKey,
    url: String,
    content_type: String,
    size_bytes: u64,
}

impl UploadedObject {
    /// For use by `Storage` implementations once the backend has acknowledged the write.
    pub(crate) fn new(key: ObjectKey, url: String, content_type: &str, size_bytes: u64) -> Self {
        Self {
            key,
            url,
            content_type: content_type.to_string(),
            size_bytes,
        }
    }

    pub fn key(&self) -> &ObjectKey {
        &self.key
    }

    /// Publicly resolvable locator for the object.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }
}

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) implement this trait so the upload
/// pipeline never couples to a specific backend.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload from a reader under `key` without buffering the whole body in memory.
    ///
    /// The reader is consumed until EOF. Either the object becomes visible in full
    /// under `key`, or the call fails and nothing is visible. No retries are made.
    ///
    /// # Arguments
    /// * `key` - Planned object key
    /// * `content_type` - MIME type stored with the object
    /// * `content_length` - Expected size of the content, if known (used for logging)
    /// * `reader` - Async reader that provides the file content
    async fn upload_stream(
        &self,
        key: &ObjectKey,
        content_type: &str,
        content_length: Option<u64>,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<UploadedObject>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
