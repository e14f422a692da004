//! Tubely Media Processing Library
//!
//! Local processing steps of the upload pipeline: staging an inbound stream to a
//! size-capped scratch file, and probing the staged file for its aspect bucket.

pub mod staging;

#[cfg(feature = "video")]
pub mod video;

// Re-export commonly used types
pub use staging::{stage_stream, StagedFile, StagingError};

#[cfg(feature = "video")]
pub use video::{
    classify_dimensions, parse_probe_output, AspectClassifier, FfprobeClassifier, ProbeError,
};
