use async_trait::async_trait;
use std::path::Path;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::io::{AsyncRead, AsyncReadExt};
use tubely_core::AspectBucket;
use tubely_processing::{AspectClassifier, ProbeError};
use tubely_storage::{ObjectKey, Storage, StorageBackend, StorageError, StorageResult, UploadedObject};

/// Classifier stand-in that records what it was shown.
pub struct StubClassifier {
    aspect: Option<AspectBucket>,
    calls: AtomicUsize,
    staged_sizes: Mutex<Vec<u64>>,
}

impl StubClassifier {
    pub fn new(aspect: Option<AspectBucket>) -> Self {
        Self {
            aspect,
            calls: AtomicUsize::new(0),
            staged_sizes: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Size of the scratch file at the time each classification ran.
    pub fn staged_sizes(&self) -> Vec<u64> {
        self.staged_sizes.lock().unwrap().clone()
    }
}

#[async_trait]
impl AspectClassifier for StubClassifier {
    async fn classify(&self, path: &Path) -> Result<AspectBucket, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let size = tokio::fs::metadata(path).await.map_err(ProbeError::Spawn)?.len();
        self.staged_sizes.lock().unwrap().push(size);
        self.aspect.ok_or(ProbeError::NoStreams)
    }
}

/// Storage that consumes the body and then refuses it.
pub struct FailingStorage;

#[async_trait]
impl Storage for FailingStorage {
    async fn upload_stream(
        &self,
        _key: &ObjectKey,
        _content_type: &str,
        _content_length: Option<u64>,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<UploadedObject> {
        let mut sink = Vec::new();
        reader.read_to_end(&mut sink).await?;
        Err(StorageError::UploadFailed("bucket unavailable".to_string()))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
