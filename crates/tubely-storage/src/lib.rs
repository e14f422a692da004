//! Tubely Storage Library
//!
//! Storage abstraction and implementations for uploaded videos: an S3 backend
//! built on `object_store` and a local filesystem backend.
//!
//! # Object key format
//!
//! Keys are partitioned by aspect bucket: `{landscape|portrait|other}/{token}.{ext}`,
//! where `token` is 32 random bytes encoded as URL-safe base64 without padding.
//! Keys must not contain `..` or a leading `/`. Key planning lives in the `keys`
//! module so every backend sees the same layout.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{plan_object_key, ObjectKey};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::{s3_object_url, S3Storage};
pub use traits::{Storage, StorageError, StorageResult, UploadedObject};
pub use tubely_core::StorageBackend;
