//! Content type helpers for uploads.

/// Lower-cased `type/subtype` of a Content-Type value, ignoring parameters
/// such as `; codecs=...`. `None` if the value is not a media type.
pub fn parse_media_type(content_type: &str) -> Option<String> {
    content_type
        .trim()
        .parse::<mime::Mime>()
        .ok()
        .map(|m| m.essence_str().to_ascii_lowercase())
}

/// File extension used in object keys for an accepted media type.
pub fn extension_for_media_type(media_type: &str) -> Option<&'static str> {
    match media_type {
        tubely_core::constants::VIDEO_CONTENT_TYPE => {
            Some(tubely_core::constants::VIDEO_FILE_EXTENSION)
        }
        _ => None,
    }
}
