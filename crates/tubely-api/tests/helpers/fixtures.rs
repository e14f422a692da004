use async_trait::async_trait;
use axum_test::multipart::{MultipartForm, Part};
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tubely_core::{AppError, Video};
use tubely_db::VideoStore;
use uuid::Uuid;

/// Map-backed record store with switchable update failures.
#[derive(Default)]
pub struct MemoryVideoStore {
    videos: Mutex<HashMap<Uuid, Video>>,
    fail_updates: AtomicBool,
}

impl MemoryVideoStore {
    /// Insert a draft record (no video URL) owned by `user_id`.
    pub fn insert_draft(&self, user_id: Uuid) -> Video {
        let created = Utc::now() - Duration::minutes(5);
        let video = Video {
            id: Uuid::new_v4(),
            user_id,
            title: "Boot demo".to_string(),
            description: "Unboxing a pair of boots".to_string(),
            thumbnail_url: None,
            video_url: None,
            created_at: created,
            updated_at: created,
        };
        self.videos.lock().unwrap().insert(video.id, video.clone());
        video
    }

    pub fn get(&self, id: Uuid) -> Option<Video> {
        self.videos.lock().unwrap().get(&id).cloned()
    }

    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl VideoStore for MemoryVideoStore {
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        Ok(self.get(id))
    }

    async fn update_video(&self, video: &Video) -> Result<Video, AppError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        let mut videos = self.videos.lock().unwrap();
        match videos.get_mut(&video.id) {
            Some(stored) if stored.user_id == video.user_id => {
                stored.video_url = video.video_url.clone();
                stored.updated_at = video.updated_at;
                Ok(stored.clone())
            }
            _ => Err(AppError::NotFound(format!("Video {} not found", video.id))),
        }
    }
}

/// Multipart form with a single file part.
pub fn video_form(field: &str, mime: &str, bytes: Vec<u8>) -> MultipartForm {
    MultipartForm::new().add_part(
        field.to_string(),
        Part::bytes(bytes).file_name("clip.mp4").mime_type(mime.to_string()),
    )
}

pub fn mp4_form(bytes: Vec<u8>) -> MultipartForm {
    video_form("video", "video/mp4", bytes)
}

/// Bytes that look enough like a video for the stub classifier.
pub fn sample_video_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}
