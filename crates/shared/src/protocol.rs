use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{UserId, VideoId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user_id: UserId,
}

/// Query of `POST /storage/{bucket}/files`; the raw file bytes travel as the body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileUploadQuery {
    pub file_id: Uuid,
    pub filename: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    pub file_id: Uuid,
    pub url: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVideoRequest {
    pub title: String,
    pub prompt: String,
    pub thumbnail_url: String,
    pub video_url: String,
    pub creator: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoDocument {
    pub video_id: VideoId,
    pub title: String,
    pub prompt: String,
    pub thumbnail_url: String,
    pub video_url: String,
    pub creator: UserId,
    pub created_at: DateTime<Utc>,
}
