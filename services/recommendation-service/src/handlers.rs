//! Recommendation endpoints: cache-aside around whatever strategy is mounted.
//!
//! Cache failures on either side degrade to direct generation; a response is
//! never blocked on the cache.

use actix_web::{web, HttpResponse};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use api_core::{health_response, Result};
use redis_store::keys::RecommendationCacheKey;
use redis_store::{ops, ttl, SharedConnectionManager};

use crate::strategy::RecommendationStrategy;

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    limit: Option<u32>,
}

impl LimitQuery {
    fn limit(&self, default: u32) -> u32 {
        self.limit.unwrap_or(default).clamp(1, 100)
    }
}

async fn cached_or_generate<T, F>(
    redis: &SharedConnectionManager,
    key: &str,
    ttl_seconds: u64,
    generate: F,
) -> T
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> T,
{
    match ops::get_json::<T>(redis, key).await {
        Ok(Some(cached)) => return cached,
        Ok(None) => {}
        Err(err) => tracing::warn!(key, error = %err, "recommendation cache lookup failed"),
    }

    let fresh = generate();
    if let Err(err) = ops::set_json_ex(redis, key, &fresh, ttl_seconds).await {
        tracing::warn!(key, error = %err, "recommendation cache store failed");
    }
    fresh
}

/// GET /personalized/{user_id}?limit=
pub async fn personalized(
    redis: web::Data<SharedConnectionManager>,
    strategy: web::Data<dyn RecommendationStrategy>,
    path: web::Path<Uuid>,
    query: web::Query<LimitQuery>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();
    let limit = query.limit(20);
    let key = RecommendationCacheKey::personalized(user_id, limit);

    let body = cached_or_generate(&redis, &key, ttl::RECOMMENDATION_SECONDS, || {
        strategy.personalized(user_id, limit)
    })
    .await;
    Ok(HttpResponse::Ok().json(body))
}

/// GET /similar/{video_id}?limit=
pub async fn similar(
    redis: web::Data<SharedConnectionManager>,
    strategy: web::Data<dyn RecommendationStrategy>,
    path: web::Path<Uuid>,
    query: web::Query<LimitQuery>,
) -> Result<HttpResponse> {
    let video_id = path.into_inner();
    let limit = query.limit(10);
    let key = RecommendationCacheKey::similar(video_id, limit);

    let body = cached_or_generate(&redis, &key, ttl::SIMILAR_SECONDS, || {
        strategy.similar(video_id, limit)
    })
    .await;
    Ok(HttpResponse::Ok().json(body))
}

/// GET /trending?limit=
pub async fn trending(
    redis: web::Data<SharedConnectionManager>,
    strategy: web::Data<dyn RecommendationStrategy>,
    query: web::Query<LimitQuery>,
) -> Result<HttpResponse> {
    let limit = query.limit(20);
    let key = RecommendationCacheKey::trending(limit);

    let body = cached_or_generate(&redis, &key, ttl::TRENDING_SECONDS, || {
        strategy.trending(limit)
    })
    .await;
    Ok(HttpResponse::Ok().json(body))
}

/// GET /genre/{genre}?limit=
pub async fn genre(
    redis: web::Data<SharedConnectionManager>,
    strategy: web::Data<dyn RecommendationStrategy>,
    path: web::Path<String>,
    query: web::Query<LimitQuery>,
) -> Result<HttpResponse> {
    let genre = path.into_inner();
    let limit = query.limit(20);
    let key = RecommendationCacheKey::genre(&genre, limit);

    let body = cached_or_generate(&redis, &key, ttl::RECOMMENDATION_SECONDS, || {
        strategy.genre(&genre, limit)
    })
    .await;
    Ok(HttpResponse::Ok().json(body))
}

/// GET /health
pub async fn health() -> HttpResponse {
    health_response("recommendation-service")
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/personalized/{user_id}", web::get().to(personalized))
        .route("/similar/{video_id}", web::get().to(similar))
        .route("/trending", web::get().to(trending))
        .route("/genre/{genre}", web::get().to(genre));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(LimitQuery { limit: None }.limit(20), 20);
        assert_eq!(LimitQuery { limit: Some(0) }.limit(20), 1);
        assert_eq!(LimitQuery { limit: Some(50) }.limit(20), 50);
        assert_eq!(LimitQuery { limit: Some(5000) }.limit(20), 100);
    }
}
