//! Catalog endpoints.
//!
//! Reads are cache-aside with per-endpoint TTLs; search is never cached
//! (unbounded query space). Writes require a bearer credential and delete
//! the item's point cache entry before acknowledging; aggregate caches
//! (trending, genre pages, list pages) are left to heal on TTL expiry.

use actix_web::{web, HttpResponse};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use api_core::{health_response, AppError, PageQuery, Paginated, Result};
use auth_core::AuthenticatedUser;
use redis_store::keys::CatalogCacheKey;
use redis_store::{ttl, SharedConnectionManager};

use crate::models::{CreateVideoRequest, SearchQuery, TrendingQuery, UpdateVideoRequest, Video};
use crate::{cache, repo};

/// GET /
pub async fn list_videos(
    pool: web::Data<sqlx::PgPool>,
    redis: web::Data<SharedConnectionManager>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let key = CatalogCacheKey::page(query.page(), query.limit());
    if let Some(cached) = cache::lookup::<Paginated<Video>>(&redis, &key).await {
        return Ok(HttpResponse::Ok().json(cached));
    }

    let (videos, total) = repo::list(&pool, query.limit().into(), query.offset()).await?;
    let payload = Paginated::new(videos, &query, total);
    cache::store(&redis, &key, &payload, ttl::CATALOG_SECONDS).await;

    Ok(HttpResponse::Ok().json(payload))
}

/// GET /search?q=
pub async fn search_videos(
    pool: web::Data<sqlx::PgPool>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse> {
    let q = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::Validation("Search query is required".to_string()))?;

    let page = PageQuery {
        page: query.page,
        limit: query.limit,
    };
    let videos = repo::search(&pool, q, page.limit().into(), page.offset()).await?;

    Ok(HttpResponse::Ok().json(json!({ "items": videos, "query": q })))
}

/// GET /genre/{genre}
pub async fn videos_by_genre(
    pool: web::Data<sqlx::PgPool>,
    redis: web::Data<SharedConnectionManager>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let genre = path.into_inner();
    let key = CatalogCacheKey::genre(&genre, query.page(), query.limit());
    if let Some(cached) = cache::lookup::<Paginated<Video>>(&redis, &key).await {
        return Ok(HttpResponse::Ok().json(cached));
    }

    let (videos, total) = repo::by_genre(&pool, &genre, query.limit().into(), query.offset()).await?;
    let payload = Paginated::new(videos, &query, total);
    cache::store(&redis, &key, &payload, ttl::CATALOG_SECONDS).await;

    Ok(HttpResponse::Ok().json(payload))
}

/// GET /trending
pub async fn trending_videos(
    pool: web::Data<sqlx::PgPool>,
    redis: web::Data<SharedConnectionManager>,
    query: web::Query<TrendingQuery>,
) -> Result<HttpResponse> {
    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    let key = CatalogCacheKey::trending(limit);
    if let Some(cached) = cache::lookup::<Vec<Video>>(&redis, &key).await {
        return Ok(HttpResponse::Ok().json(json!({ "items": cached })));
    }

    let videos = repo::trending(&pool, limit.into()).await?;
    cache::store(&redis, &key, &videos, ttl::TRENDING_SECONDS).await;

    Ok(HttpResponse::Ok().json(json!({ "items": videos })))
}

/// GET /{id}
pub async fn get_video(
    pool: web::Data<sqlx::PgPool>,
    redis: web::Data<SharedConnectionManager>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let key = CatalogCacheKey::video(id);
    if let Some(cached) = cache::lookup::<Video>(&redis, &key).await {
        return Ok(HttpResponse::Ok().json(cached));
    }

    let video = repo::get(&pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video".to_string()))?;
    cache::store(&redis, &key, &video, ttl::CATALOG_SECONDS).await;

    Ok(HttpResponse::Ok().json(video))
}

/// POST /
pub async fn create_video(
    _user: AuthenticatedUser,
    pool: web::Data<sqlx::PgPool>,
    body: web::Json<CreateVideoRequest>,
) -> Result<HttpResponse> {
    body.validate()?;
    let video = repo::create(&pool, &body).await?;
    tracing::info!(video_id = %video.id, title = %video.title, "video created");
    Ok(HttpResponse::Created().json(video))
}

/// PUT /{id}
pub async fn update_video(
    _user: AuthenticatedUser,
    pool: web::Data<sqlx::PgPool>,
    redis: web::Data<SharedConnectionManager>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateVideoRequest>,
) -> Result<HttpResponse> {
    body.validate()?;
    let id = path.into_inner();
    let video = repo::update(&pool, id, &body)
        .await?
        .ok_or_else(|| AppError::NotFound("Video".to_string()))?;

    cache::invalidate(&redis, &CatalogCacheKey::video(id)).await?;

    Ok(HttpResponse::Ok().json(video))
}

/// DELETE /{id}
pub async fn delete_video(
    _user: AuthenticatedUser,
    pool: web::Data<sqlx::PgPool>,
    redis: web::Data<SharedConnectionManager>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    if !repo::delete(&pool, id).await? {
        return Err(AppError::NotFound("Video".to_string()));
    }

    cache::invalidate(&redis, &CatalogCacheKey::video(id)).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Video deleted successfully" })))
}

/// POST /{id}/view
pub async fn increment_views(
    _user: AuthenticatedUser,
    pool: web::Data<sqlx::PgPool>,
    redis: web::Data<SharedConnectionManager>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let views = repo::increment_views(&pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video".to_string()))?;

    cache::invalidate(&redis, &CatalogCacheKey::video(id)).await?;

    Ok(HttpResponse::Ok().json(json!({ "views": views })))
}

/// POST /{id}/like
pub async fn increment_likes(
    _user: AuthenticatedUser,
    pool: web::Data<sqlx::PgPool>,
    redis: web::Data<SharedConnectionManager>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let likes = repo::increment_likes(&pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video".to_string()))?;

    cache::invalidate(&redis, &CatalogCacheKey::video(id)).await?;

    Ok(HttpResponse::Ok().json(json!({ "likes": likes })))
}

/// GET /health
pub async fn health() -> HttpResponse {
    health_response("catalog-service")
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/search", web::get().to(search_videos))
        .route("/trending", web::get().to(trending_videos))
        .route("/genre/{genre}", web::get().to(videos_by_genre))
        .service(
            web::resource("/")
                .route(web::get().to(list_videos))
                .route(web::post().to(create_video)),
        )
        .route("/{id}/view", web::post().to(increment_views))
        .route("/{id}/like", web::post().to(increment_likes))
        .service(
            web::resource("/{id}")
                .route(web::get().to(get_video))
                .route(web::put().to(update_video))
                .route(web::delete().to(delete_video)),
        );
}
