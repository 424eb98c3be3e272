//! Postgres access for profiles, watchlist, and watch history.

use api_core::Result;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{HistoryEntry, Preferences, Profile, UpdateProfileRequest, WatchlistEntry};

/// Bounded history reads: most recent N entries.
const HISTORY_READ_LIMIT: i64 = 50;

pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<Profile>> {
    let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(profile)
}

/// First read auto-creates a default profile for the subject.
pub async fn create_default_profile(pool: &PgPool, user_id: Uuid) -> Result<Profile> {
    let profile = sqlx::query_as::<_, Profile>(
        "INSERT INTO profiles (user_id, display_name, preferences)
         VALUES ($1, $2, $3)
         ON CONFLICT (user_id) DO UPDATE SET updated_at = profiles.updated_at
         RETURNING *",
    )
    .bind(user_id)
    .bind("User")
    .bind(Json(Preferences::default()))
    .fetch_one(pool)
    .await?;
    Ok(profile)
}

pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    req: &UpdateProfileRequest,
) -> Result<Option<Profile>> {
    let preferences = req.preferences.clone().map(Json);
    let profile = sqlx::query_as::<_, Profile>(
        "UPDATE profiles SET
            display_name = COALESCE($2, display_name),
            avatar = COALESCE($3, avatar),
            bio = COALESCE($4, bio),
            preferences = COALESCE($5, preferences),
            updated_at = NOW()
         WHERE user_id = $1
         RETURNING *",
    )
    .bind(user_id)
    .bind(&req.display_name)
    .bind(&req.avatar)
    .bind(&req.bio)
    .bind(preferences)
    .fetch_optional(pool)
    .await?;
    Ok(profile)
}

pub async fn list_watchlist(pool: &PgPool, user_id: Uuid) -> Result<Vec<WatchlistEntry>> {
    let entries = sqlx::query_as::<_, WatchlistEntry>(
        "SELECT * FROM watchlist WHERE user_id = $1 ORDER BY added_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(entries)
}

/// Adding an existing (user, video) pair is a no-op, not an error.
pub async fn add_to_watchlist(
    pool: &PgPool,
    user_id: Uuid,
    video_id: Uuid,
) -> Result<Option<WatchlistEntry>> {
    let entry = sqlx::query_as::<_, WatchlistEntry>(
        "INSERT INTO watchlist (user_id, video_id) VALUES ($1, $2)
         ON CONFLICT (user_id, video_id) DO NOTHING
         RETURNING *",
    )
    .bind(user_id)
    .bind(video_id)
    .fetch_optional(pool)
    .await?;
    Ok(entry)
}

pub async fn remove_from_watchlist(pool: &PgPool, user_id: Uuid, video_id: Uuid) -> Result<()> {
    sqlx::query("DELETE FROM watchlist WHERE user_id = $1 AND video_id = $2")
        .bind(user_id)
        .bind(video_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn list_history(pool: &PgPool, user_id: Uuid) -> Result<Vec<HistoryEntry>> {
    let entries = sqlx::query_as::<_, HistoryEntry>(
        "SELECT * FROM watch_history WHERE user_id = $1
         ORDER BY watched_at DESC LIMIT $2",
    )
    .bind(user_id)
    .bind(HISTORY_READ_LIMIT)
    .fetch_all(pool)
    .await?;
    Ok(entries)
}

/// History is append-only; every watch produces a new entry.
pub async fn record_watch(
    pool: &PgPool,
    user_id: Uuid,
    video_id: Uuid,
    duration: i32,
    progress: i32,
) -> Result<HistoryEntry> {
    let entry = sqlx::query_as::<_, HistoryEntry>(
        "INSERT INTO watch_history (user_id, video_id, duration, progress)
         VALUES ($1, $2, $3, $4)
         RETURNING *",
    )
    .bind(user_id)
    .bind(video_id)
    .bind(duration)
    .bind(progress)
    .fetch_one(pool)
    .await?;
    Ok(entry)
}
