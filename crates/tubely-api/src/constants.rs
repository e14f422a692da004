//! API-wide constants.

/// Versioned prefix for all resource routes.
pub const API_PREFIX: &str = "/api";

/// Multipart form field carrying the video bytes.
pub const VIDEO_FORM_FIELD: &str = "video";

/// Extra bytes allowed on top of the video ceiling for multipart framing
/// (boundaries, part headers).
pub const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;
