//! Tubely API Library
//!
//! HTTP surface of the video ingestion service: authentication, the upload
//! pipeline, handlers and application setup.

mod api_doc;
pub mod constants;
mod handlers;
mod telemetry;
mod utils;

pub mod auth;
pub mod error;
pub mod services;
pub mod setup;
pub mod state;

pub use error::ErrorResponse;
pub use services::upload::{UploadError, UploadLimits, UploadRequest, VideoUploadService};
pub use state::AppState;
