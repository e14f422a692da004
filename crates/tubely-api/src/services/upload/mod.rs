//! Video upload pipeline: validate → authorize → stage → classify → plan key → store → record.

mod record;
mod service;
mod types;

pub use service::{UploadLimits, VideoUploadService};
pub use types::{UploadError, UploadRequest};
