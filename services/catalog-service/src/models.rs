use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Video {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub video_url: String,
    pub duration: i32,
    pub release_year: i32,
    pub rating: f64,
    pub genres: Vec<String>,
    #[serde(rename = "cast")]
    pub cast_members: Vec<String>,
    pub director: Option<String>,
    pub language: String,
    pub subtitles: Vec<String>,
    pub quality: Vec<String>,
    pub views: i64,
    pub likes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateVideoRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(url)]
    pub thumbnail: String,
    #[validate(url)]
    pub video_url: String,
    #[validate(range(min = 1))]
    pub duration: i32,
    #[validate(range(min = 1880, max = 2100))]
    pub release_year: i32,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default, rename = "cast")]
    pub cast_members: Vec<String>,
    pub director: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub subtitles: Vec<String>,
    #[serde(default)]
    pub quality: Vec<String>,
}

fn default_language() -> String {
    "en".to_string()
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVideoRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    #[validate(url)]
    pub thumbnail: Option<String>,
    pub genres: Option<Vec<String>>,
    #[serde(rename = "cast")]
    pub cast_members: Option<Vec<String>>,
    pub director: Option<String>,
    pub rating: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    pub limit: Option<u32>,
}
