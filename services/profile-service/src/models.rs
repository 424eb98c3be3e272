use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitles: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoplay: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub display_name: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub preferences: Json<Preferences>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub display_name: Option<String>,
    #[validate(url)]
    pub avatar: Option<String>,
    #[validate(length(max = 1000))]
    pub bio: Option<String>,
    pub preferences: Option<Preferences>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct WatchlistEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub video_id: Uuid,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub video_id: Uuid,
    pub watched_at: DateTime<Utc>,
    pub duration: i32,
    pub progress: i32,
}

#[derive(Debug, Deserialize)]
pub struct RecordWatchRequest {
    #[serde(default)]
    pub duration: i32,
    #[serde(default)]
    pub progress: i32,
}
