//! Postgres access for catalog items.
//!
//! Counter increments are single UPDATE statements so concurrent callers
//! never lose updates.

use api_core::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{CreateVideoRequest, UpdateVideoRequest, Video};

pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<(Vec<Video>, i64)> {
    let videos = sqlx::query_as::<_, Video>(
        "SELECT * FROM videos ORDER BY created_at DESC LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM videos")
        .fetch_one(pool)
        .await?;
    Ok((videos, total))
}

pub async fn search(
    pool: &PgPool,
    query: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<Video>> {
    let videos = sqlx::query_as::<_, Video>(
        "SELECT * FROM videos
         WHERE to_tsvector('english', title || ' ' || description)
               @@ websearch_to_tsquery('english', $1)
         ORDER BY ts_rank(to_tsvector('english', title || ' ' || description),
                          websearch_to_tsquery('english', $1)) DESC
         LIMIT $2 OFFSET $3",
    )
    .bind(query)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(videos)
}

pub async fn by_genre(
    pool: &PgPool,
    genre: &str,
    limit: i64,
    offset: i64,
) -> Result<(Vec<Video>, i64)> {
    let videos = sqlx::query_as::<_, Video>(
        "SELECT * FROM videos WHERE $1 = ANY(genres)
         ORDER BY views DESC LIMIT $2 OFFSET $3",
    )
    .bind(genre)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM videos WHERE $1 = ANY(genres)")
        .bind(genre)
        .fetch_one(pool)
        .await?;
    Ok((videos, total))
}

pub async fn trending(pool: &PgPool, limit: i64) -> Result<Vec<Video>> {
    let videos = sqlx::query_as::<_, Video>(
        "SELECT * FROM videos ORDER BY views DESC, likes DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(videos)
}

pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Video>> {
    let video = sqlx::query_as::<_, Video>("SELECT * FROM videos WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(video)
}

pub async fn create(pool: &PgPool, req: &CreateVideoRequest) -> Result<Video> {
    let video = sqlx::query_as::<_, Video>(
        "INSERT INTO videos
            (title, description, thumbnail, video_url, duration, release_year,
             genres, cast_members, director, language, subtitles, quality)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
         RETURNING *",
    )
    .bind(&req.title)
    .bind(&req.description)
    .bind(&req.thumbnail)
    .bind(&req.video_url)
    .bind(req.duration)
    .bind(req.release_year)
    .bind(&req.genres)
    .bind(&req.cast_members)
    .bind(&req.director)
    .bind(&req.language)
    .bind(&req.subtitles)
    .bind(&req.quality)
    .fetch_one(pool)
    .await?;
    Ok(video)
}

pub async fn update(pool: &PgPool, id: Uuid, req: &UpdateVideoRequest) -> Result<Option<Video>> {
    let video = sqlx::query_as::<_, Video>(
        "UPDATE videos SET
            title = COALESCE($2, title),
            description = COALESCE($3, description),
            thumbnail = COALESCE($4, thumbnail),
            genres = COALESCE($5, genres),
            cast_members = COALESCE($6, cast_members),
            director = COALESCE($7, director),
            rating = COALESCE($8, rating),
            updated_at = NOW()
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(&req.title)
    .bind(&req.description)
    .bind(&req.thumbnail)
    .bind(&req.genres)
    .bind(&req.cast_members)
    .bind(&req.director)
    .bind(req.rating)
    .fetch_optional(pool)
    .await?;
    Ok(video)
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM videos WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Atomic view increment; returns the new count, `None` when the id is
/// unknown.
pub async fn increment_views(pool: &PgPool, id: Uuid) -> Result<Option<i64>> {
    let views = sqlx::query_scalar(
        "UPDATE videos SET views = views + 1 WHERE id = $1 RETURNING views",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(views)
}

/// Atomic like increment; returns the new count, `None` when the id is
/// unknown.
pub async fn increment_likes(pool: &PgPool, id: Uuid) -> Result<Option<i64>> {
    let likes = sqlx::query_scalar(
        "UPDATE videos SET likes = likes + 1 WHERE id = $1 RETURNING likes",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(likes)
}
