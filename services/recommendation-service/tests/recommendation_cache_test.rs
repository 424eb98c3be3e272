//! Recommendation cache integration tests.
//!
//! Require live Redis (REDIS_URL), so they are ignored by default. Run with:
//!
//!   cargo test -p recommendation-service -- --ignored

use std::sync::Arc;

use actix_web::{test, web, App};
use recommendation_service::handlers;
use recommendation_service::strategy::{RandomStrategy, RecommendationStrategy};
use redis_store::RedisPool;
use serde_json::Value;
use uuid::Uuid;

async fn spawn_app() -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = actix_web::dev::ServiceResponse,
    Error = actix_web::Error,
> {
    let redis_url = std::env::var("REDIS_URL").expect("REDIS_URL must be set");
    let redis = RedisPool::connect(&redis_url).await.expect("redis connection");
    let strategy: Arc<dyn RecommendationStrategy> = Arc::new(RandomStrategy);

    test::init_service(
        App::new()
            .app_data(web::Data::new(redis.manager()))
            .app_data(web::Data::from(strategy))
            .configure(handlers::configure_routes),
    )
    .await
}

#[actix_web::test]
#[ignore]
async fn repeated_personalized_requests_hit_the_cache() {
    let app = spawn_app().await;
    let uri = format!("/personalized/{}?limit=15", Uuid::new_v4());

    // The stub strategy is randomized, so byte-equal repeats prove a cache hit.
    let req = test::TestRequest::get().uri(&uri).to_request();
    let first = test::call_and_read_body(&app, req).await;

    let req = test::TestRequest::get().uri(&uri).to_request();
    let second = test::call_and_read_body(&app, req).await;

    assert_eq!(first, second);
}

#[actix_web::test]
#[ignore]
async fn different_limits_are_distinct_cache_entries() {
    let app = spawn_app().await;
    let user_id = Uuid::new_v4();

    let req = test::TestRequest::get()
        .uri(&format!("/personalized/{user_id}?limit=5"))
        .to_request();
    let five: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::get()
        .uri(&format!("/personalized/{user_id}?limit=7"))
        .to_request();
    let seven: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(five["recommendations"].as_array().unwrap().len(), 5);
    assert_eq!(seven["recommendations"].as_array().unwrap().len(), 7);
}

#[actix_web::test]
#[ignore]
async fn trending_and_similar_respond_with_ranked_lists() {
    let app = spawn_app().await;

    let req = test::TestRequest::get().uri("/trending?limit=8").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let trending = body["trending"].as_array().unwrap();
    assert_eq!(trending.len(), 8);

    let req = test::TestRequest::get()
        .uri(&format!("/similar/{}?limit=4", Uuid::new_v4()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["similar"].as_array().unwrap().len(), 4);
}
