//! Database repositories for the data access layer.

pub mod video;

pub use video::{VideoRepository, VideoStore};
