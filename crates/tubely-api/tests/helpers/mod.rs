//! Test helpers: build AppState and router for integration tests.
//!
//! Everything runs in-process: the record store is a map, the object store is
//! `object_store::memory::InMemory` behind the real S3 backend, and the classifier is a
//! stub, so no database, ffprobe binary or network is needed.

#![allow(dead_code)]

pub mod auth;
pub mod fixtures;
pub mod storage;

use axum_test::TestServer;
use object_store::memory::InMemory;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tubely_api::constants;
use tubely_api::setup::{routes, services};
use tubely_core::{AspectBucket, BaseConfig, Config, IngestConfig, StorageBackend};
use tubely_storage::{S3Storage, Storage};

use auth::TEST_JWT_SECRET;
use fixtures::MemoryVideoStore;
use storage::{FailingStorage, StubClassifier};

pub const TEST_BUCKET: &str = "tubely-test";
pub const TEST_REGION: &str = "us-east-2";

/// API path prefix for tests.
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

pub fn test_config(max_video_size_bytes: u64, scratch_dir: PathBuf) -> Config {
    Config(Box::new(IngestConfig {
        base: BaseConfig {
            server_port: 0,
            cors_origins: vec!["*".to_string()],
            db_max_connections: 1,
            db_timeout_seconds: 1,
            jwt_secret: TEST_JWT_SECRET.to_string(),
            jwt_issuer: "tubely-access".to_string(),
            environment: "test".to_string(),
        },
        database_url: String::new(),
        storage_backend: Some(StorageBackend::S3),
        s3_bucket: Some(TEST_BUCKET.to_string()),
        s3_region: Some(TEST_REGION.to_string()),
        s3_endpoint: None,
        aws_region: None,
        local_storage_path: None,
        local_storage_base_url: None,
        max_video_size_bytes,
        upload_scratch_dir: Some(scratch_dir),
        ffprobe_path: "ffprobe".to_string(),
        probe_timeout_secs: 5,
    }))
}

pub struct TestOptions {
    pub max_video_size_bytes: u64,
    /// Bucket the stub classifier reports; `None` makes it fail with "no streams".
    pub aspect: Option<AspectBucket>,
    pub failing_storage: bool,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            max_video_size_bytes: 1024 * 1024,
            aspect: Some(AspectBucket::Landscape),
            failing_storage: false,
        }
    }
}

/// Test application: server plus handles on every fake it was built with.
pub struct TestApp {
    pub server: TestServer,
    pub videos: Arc<MemoryVideoStore>,
    pub objects: Arc<InMemory>,
    pub classifier: Arc<StubClassifier>,
    pub scratch: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn scratch_dir(&self) -> &Path {
        self.scratch.path()
    }

    /// Files left behind in the upload scratch directory.
    pub fn scratch_entries(&self) -> Vec<PathBuf> {
        std::fs::read_dir(self.scratch.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect()
    }
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with(TestOptions::default())
}

pub fn setup_test_app_with(options: TestOptions) -> TestApp {
    let scratch = tempfile::tempdir().unwrap();
    let config = test_config(options.max_video_size_bytes, scratch.path().to_path_buf());

    let videos = Arc::new(MemoryVideoStore::default());
    let objects = Arc::new(InMemory::new());
    let classifier = Arc::new(StubClassifier::new(options.aspect));

    let storage: Arc<dyn Storage> = if options.failing_storage {
        Arc::new(FailingStorage)
    } else {
        Arc::new(S3Storage::with_store(
            objects.clone(),
            TEST_BUCKET.to_string(),
            TEST_REGION.to_string(),
            None,
        ))
    };

    let state = services::build_state(config, None, videos.clone(), storage, classifier.clone());
    let server = TestServer::new(routes::build_router(state)).unwrap();

    TestApp {
        server,
        videos,
        objects,
        classifier,
        scratch,
    }
}
