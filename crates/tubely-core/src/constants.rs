//! Application-wide constants.

/// The only container type accepted for video uploads.
pub const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// File extension used in object keys for [`VIDEO_CONTENT_TYPE`].
pub const VIDEO_FILE_EXTENSION: &str = "mp4";

/// Default ceiling for a single video upload (1 GiB).
pub const DEFAULT_MAX_VIDEO_SIZE_MB: u64 = 1024;

/// Default issuer expected in access tokens.
pub const DEFAULT_JWT_ISSUER: &str = "tubely-access";
