//! Manifest cache integration tests.
//!
//! Require live Redis (REDIS_URL), so they are ignored by default. Run with:
//!
//!   cargo test -p streaming-service -- --ignored

use actix_web::{test, web, App};
use auth_core::TokenKeys;
use redis_store::RedisPool;
use serde_json::json;
use streaming_service::handlers;
use uuid::Uuid;

const TEST_SECRET: &str = "integration-test-secret";

async fn spawn_app() -> (
    impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    TokenKeys,
) {
    let redis_url = std::env::var("REDIS_URL").expect("REDIS_URL must be set");
    let redis = RedisPool::connect(&redis_url).await.expect("redis connection");
    let keys = TokenKeys::from_secret(TEST_SECRET);

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(redis.manager()))
            .app_data(web::Data::new(keys.clone()))
            .configure(handlers::configure_routes),
    )
    .await;

    (app, keys)
}

#[actix_web::test]
#[ignore]
async fn repeated_manifest_requests_are_byte_identical() {
    let (app, _) = spawn_app().await;
    let uri = format!("/{}/manifest?quality=720p", Uuid::new_v4());

    let req = test::TestRequest::get().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/vnd.apple.mpegurl"
    );
    let first = test::read_body(resp).await;

    let req = test::TestRequest::get().uri(&uri).to_request();
    let second = test::call_and_read_body(&app, req).await;

    assert_eq!(first, second);
}

#[actix_web::test]
#[ignore]
async fn unknown_quality_is_a_validation_failure() {
    let (app, _) = spawn_app().await;

    let req = test::TestRequest::get()
        .uri(&format!("/{}/manifest?quality=4k", Uuid::new_v4()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);
}

#[actix_web::test]
#[ignore]
async fn quality_preference_requires_a_bearer() {
    let (app, keys) = spawn_app().await;
    let uri = format!("/{}/quality", Uuid::new_v4());

    let req = test::TestRequest::post()
        .uri(&uri)
        .set_json(json!({ "quality": "1080p" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 401);

    let token = keys.mint(Uuid::new_v4()).unwrap();
    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({ "quality": "1080p" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);
}
