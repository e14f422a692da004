//! Record updater: points a video record at its freshly stored object.

use tubely_core::Video;
use tubely_db::VideoStore;
use tubely_storage::UploadedObject;

use super::types::UploadError;

/// Set the record's locator from a completed upload and bump `updated_at`.
///
/// Takes an [`UploadedObject`] rather than a URL so the record can only be
/// pointed at an object the store has acknowledged.
fn apply_uploaded_object(video: &mut Video, uploaded: &UploadedObject) {
    video.video_url = Some(uploaded.url().to_string());
    video.touch();
}

/// Apply and persist. On failure the stored object is left in place.
pub(super) async fn persist_uploaded_object(
    videos: &dyn VideoStore,
    mut video: Video,
    uploaded: &UploadedObject,
) -> Result<Video, UploadError> {
    apply_uploaded_object(&mut video, uploaded);

    videos.update_video(&video).await.map_err(|e| {
        tracing::error!(
            error = %e,
            video_id = %video.id,
            key = %uploaded.key(),
            url = %uploaded.url(),
            "Failed to persist video URL; uploaded object is orphaned"
        );
        UploadError::Persistence(e)
    })
}
