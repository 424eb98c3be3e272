//! Profile endpoints. The whole scope is wrapped in `RequireAuth`; handlers
//! read the verified subject from the `AuthenticatedUser` extractor.

use actix_web::{web, HttpResponse};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use api_core::{health_response, AppError, Result};
use auth_core::{AuthenticatedUser, RequireAuth, TokenKeys};

use crate::models::{RecordWatchRequest, UpdateProfileRequest};
use crate::notifications::NotificationStore;
use crate::repo;

/// GET /profile
pub async fn get_profile(
    user: AuthenticatedUser,
    pool: web::Data<sqlx::PgPool>,
) -> Result<HttpResponse> {
    let profile = match repo::get_profile(&pool, user.id).await? {
        Some(profile) => profile,
        None => repo::create_default_profile(&pool, user.id).await?,
    };
    Ok(HttpResponse::Ok().json(profile))
}

/// PUT /profile
pub async fn update_profile(
    user: AuthenticatedUser,
    pool: web::Data<sqlx::PgPool>,
    body: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse> {
    body.validate()?;

    // An update before any read still needs a row to update.
    if repo::get_profile(&pool, user.id).await?.is_none() {
        repo::create_default_profile(&pool, user.id).await?;
    }

    let profile = repo::update_profile(&pool, user.id, &body)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile".to_string()))?;
    Ok(HttpResponse::Ok().json(profile))
}

/// GET /watchlist
pub async fn get_watchlist(
    user: AuthenticatedUser,
    pool: web::Data<sqlx::PgPool>,
) -> Result<HttpResponse> {
    let entries = repo::list_watchlist(&pool, user.id).await?;
    Ok(HttpResponse::Ok().json(entries))
}

/// POST /watchlist/{video_id}
///
/// Duplicate adds are success-no-op, not a conflict.
pub async fn add_to_watchlist(
    user: AuthenticatedUser,
    pool: web::Data<sqlx::PgPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let video_id = path.into_inner();
    match repo::add_to_watchlist(&pool, user.id, video_id).await? {
        Some(entry) => Ok(HttpResponse::Created().json(entry)),
        None => Ok(HttpResponse::Ok().json(json!({ "message": "Already in watchlist" }))),
    }
}

/// DELETE /watchlist/{video_id}
pub async fn remove_from_watchlist(
    user: AuthenticatedUser,
    pool: web::Data<sqlx::PgPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    repo::remove_from_watchlist(&pool, user.id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Removed from watchlist" })))
}

/// GET /history
pub async fn get_history(
    user: AuthenticatedUser,
    pool: web::Data<sqlx::PgPool>,
) -> Result<HttpResponse> {
    let entries = repo::list_history(&pool, user.id).await?;
    Ok(HttpResponse::Ok().json(entries))
}

/// POST /history/{video_id}
pub async fn record_watch(
    user: AuthenticatedUser,
    pool: web::Data<sqlx::PgPool>,
    path: web::Path<Uuid>,
    body: web::Json<RecordWatchRequest>,
) -> Result<HttpResponse> {
    let entry =
        repo::record_watch(&pool, user.id, path.into_inner(), body.duration, body.progress)
            .await?;
    Ok(HttpResponse::Created().json(entry))
}

/// GET /notifications
pub async fn get_notifications(
    user: AuthenticatedUser,
    store: web::Data<NotificationStore>,
) -> Result<HttpResponse> {
    let notifications = store.list(user.id).await?;
    Ok(HttpResponse::Ok().json(notifications))
}

/// PUT /notifications/{id}/read
pub async fn mark_notification_read(
    user: AuthenticatedUser,
    store: web::Data<NotificationStore>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    store.mark_read(user.id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

/// GET /health
pub async fn health() -> HttpResponse {
    health_response("profile-service")
}

pub fn configure_routes(cfg: &mut web::ServiceConfig, keys: TokenKeys) {
    cfg.route("/health", web::get().to(health)).service(
        web::scope("")
            .wrap(RequireAuth::new(keys))
            .route("/profile", web::get().to(get_profile))
            .route("/profile", web::put().to(update_profile))
            .route("/watchlist", web::get().to(get_watchlist))
            .route("/watchlist/{video_id}", web::post().to(add_to_watchlist))
            .route(
                "/watchlist/{video_id}",
                web::delete().to(remove_from_watchlist),
            )
            .route("/history", web::get().to(get_history))
            .route("/history/{video_id}", web::post().to(record_watch))
            .route("/notifications", web::get().to(get_notifications))
            .route(
                "/notifications/{id}/read",
                web::put().to(mark_notification_read),
            ),
    );
}
