//! Tubely database layer
//!
//! Record store abstraction for videos and its PostgreSQL implementation.

pub mod db;

pub use db::{VideoRepository, VideoStore};
