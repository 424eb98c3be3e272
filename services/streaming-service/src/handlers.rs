//! Streaming endpoints: manifest derivation behind a string cache, placeholder
//! segment and thumbnail bytes, and a stored playback quality preference.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use api_core::{health_response, AppError, Result};
use auth_core::AuthenticatedUser;
use redis_store::keys::StreamCacheKey;
use redis_store::{ops, ttl, SharedConnectionManager};

use crate::manifest::{self, QualitySelector};

const MANIFEST_CONTENT_TYPE: &str = "application/vnd.apple.mpegurl";

#[derive(Debug, Deserialize)]
pub struct ManifestQuery {
    quality: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ThumbnailQuery {
    time: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SetQualityRequest {
    quality: String,
}

/// GET /{video_id}/manifest?quality=
///
/// Manifests are pure functions of (video, quality); the cache only saves the
/// rendering, so lookup and store failures degrade to re-rendering.
pub async fn get_manifest(
    redis: web::Data<SharedConnectionManager>,
    path: web::Path<Uuid>,
    query: web::Query<ManifestQuery>,
) -> Result<HttpResponse> {
    let video_id = path.into_inner();
    let selector: QualitySelector = query
        .quality
        .as_deref()
        .unwrap_or("auto")
        .parse()
        .map_err(|err: manifest::UnknownQuality| AppError::Validation(err.to_string()))?;

    let key = StreamCacheKey::manifest(video_id, &selector.cache_label());
    match ops::get_string(&redis, &key).await {
        Ok(Some(cached)) => {
            return Ok(HttpResponse::Ok()
                .content_type(MANIFEST_CONTENT_TYPE)
                .body(cached));
        }
        Ok(None) => {}
        Err(err) => tracing::warn!(key, error = %err, "manifest cache lookup failed"),
    }

    let rendered = manifest::render(video_id, selector);
    if let Err(err) = ops::set_string_ex(&redis, &key, &rendered, ttl::CATALOG_SECONDS).await {
        tracing::warn!(key, error = %err, "manifest cache store failed");
    }

    Ok(HttpResponse::Ok()
        .content_type(MANIFEST_CONTENT_TYPE)
        .body(rendered))
}

/// GET /{video_id}/segment/{segment_id}
pub async fn get_segment(path: web::Path<(Uuid, String)>) -> HttpResponse {
    let (video_id, segment_id) = path.into_inner();
    tracing::info!(%video_id, segment_id, "serving segment");

    // Placeholder bytes; real segment storage sits behind this route.
    HttpResponse::Ok()
        .content_type("video/mp2t")
        .body("Video segment data placeholder")
}

/// GET /{video_id}/thumbnail?time=
pub async fn get_thumbnail(
    path: web::Path<Uuid>,
    query: web::Query<ThumbnailQuery>,
) -> HttpResponse {
    let video_id = path.into_inner();
    let time = query.time.unwrap_or(0);

    HttpResponse::Ok().json(json!({
        "thumbnailUrl": format!("/storage/thumbnails/{}/{}.jpg", video_id, time)
    }))
}

/// POST /{video_id}/quality
///
/// The stored preference is the source of truth for the player, so a store
/// failure surfaces instead of falling through.
pub async fn set_quality(
    _user: AuthenticatedUser,
    redis: web::Data<SharedConnectionManager>,
    path: web::Path<Uuid>,
    body: web::Json<SetQualityRequest>,
) -> Result<HttpResponse> {
    let video_id = path.into_inner();
    let selector: QualitySelector = body
        .quality
        .parse()
        .map_err(|err: manifest::UnknownQuality| AppError::Validation(err.to_string()))?;

    let key = StreamCacheKey::quality_preference(video_id);
    ops::set_string_ex(
        &redis,
        &key,
        &selector.cache_label(),
        ttl::QUALITY_PREFERENCE_SECONDS,
    )
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "videoId": video_id,
        "quality": selector.cache_label(),
    })))
}

/// GET /health
pub async fn health() -> HttpResponse {
    health_response("streaming-service")
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/{video_id}/manifest", web::get().to(get_manifest))
        .route(
            "/{video_id}/segment/{segment_id}",
            web::get().to(get_segment),
        )
        .route("/{video_id}/thumbnail", web::get().to(get_thumbnail))
        .route("/{video_id}/quality", web::post().to(set_quality));
}
