use crate::keys::ObjectKey;
use crate::traits::{Storage, StorageError, StorageResult, UploadedObject};
use crate::StorageBackend;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncWriteExt};

/// Local filesystem storage implementation
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/tubely/assets")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:8091/assets")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Keys are validated on construction; this only re-checks that the joined
    /// path stays under the base directory.
    fn key_to_path(&self, key: &ObjectKey) -> StorageResult<PathBuf> {
        let path = self.base_path.join(key.as_str());
        if !path.starts_with(&self.base_path) {
            return Err(StorageError::InvalidKey(
                "Storage key resolves outside storage directory".to_string(),
            ));
        }
        Ok(path)
    }

    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn write_partial(
        partial: &Path,
        reader: &mut Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> std::io::Result<u64> {
        let mut file = fs::File::create(partial).await?;
        let copied = tokio::io::copy(reader, &mut file).await?;
        file.flush().await?;
        file.sync_all().await?;
        Ok(copied)
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(OsString::from(".partial"));
    PathBuf::from(name)
}

#[async_trait]
impl Storage for LocalStorage {
    async fn upload_stream(
        &self,
        key: &ObjectKey,
        content_type: &str,
        content_length: Option<u64>,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<UploadedObject> {
        let path = self.key_to_path(key)?;
        let partial = partial_path(&path);
        let start = std::time::Instant::now();

        self.ensure_parent_dir(&path).await?;

        // Readers only ever see the final name once the data is synced.
        let bytes_copied = match Self::write_partial(&partial, &mut reader).await {
            Ok(n) => n,
            Err(e) => {
                let _ = fs::remove_file(&partial).await;
                tracing::error!(
                    error = %e,
                    path = %path.display(),
                    key = %key,
                    expected_bytes = content_length,
                    "Local storage stream upload failed"
                );
                return Err(StorageError::UploadFailed(format!(
                    "Failed to write stream to file {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        fs::rename(&partial, &path).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to move {} into place: {}",
                path.display(),
                e
            ))
        })?;

        let url = self.generate_url(key.as_str());

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = bytes_copied,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage stream upload successful"
        );

        Ok(UploadedObject::new(key.clone(), url, content_type, bytes_copied))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
