//! Credential lifecycle integration tests.
//!
//! Require live Postgres and Redis (DATABASE_URL / REDIS_URL), so they are
//! ignored by default. Run with:
//!
//!   cargo test -p identity-service -- --ignored

use actix_web::{test, web, App};
use auth_core::TokenKeys;
use identity_service::handlers;
use identity_service::session::SessionStore;
use redis_store::RedisPool;
use serde_json::{json, Value};
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
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let redis_url = std::env::var("REDIS_URL").expect("REDIS_URL must be set");

    let pool = api_core::db::connect_pool(&database_url, 2)
        .await
        .expect("postgres connection");
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();

    let redis = RedisPool::connect(&redis_url).await.expect("redis connection");
    let sessions = SessionStore::new(redis.manager());
    let keys = TokenKeys::from_secret(TEST_SECRET);

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool))
            .app_data(web::Data::new(sessions))
            .app_data(web::Data::new(keys.clone()))
            .configure(handlers::configure_routes),
    )
    .await;

    (app, keys)
}

fn unique_email() -> String {
    format!("user-{}@example.com", Uuid::new_v4())
}

#[actix_web::test]
#[ignore]
async fn register_then_login_returns_verifiable_credential() {
    let (app, keys) = spawn_app().await;
    let email = unique_email();

    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(json!({ "email": email, "password": "a-long-password" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "email": email, "password": "a-long-password" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let token = body["token"].as_str().expect("token in login response");
    assert!(keys.verify(token).is_ok());
}

#[actix_web::test]
#[ignore]
async fn concurrent_duplicate_registers_yield_one_account_and_a_conflict() {
    let (app, _) = spawn_app().await;
    let email = unique_email();

    // Both requests race past the duplicate pre-check; the loser must come
    // back as 409, not a dependency failure.
    let calls = (0..2).map(|_| {
        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(json!({ "email": email, "password": "a-long-password" }))
            .to_request();
        test::call_service(&app, req)
    });
    let mut statuses: Vec<u16> = futures::future::join_all(calls)
        .await
        .into_iter()
        .map(|resp| resp.status().as_u16())
        .collect();
    statuses.sort_unstable();

    assert_eq!(statuses, vec![201, 409]);
}

#[actix_web::test]
#[ignore]
async fn login_failure_is_generic_for_unknown_and_wrong_password() {
    let (app, _) = spawn_app().await;
    let email = unique_email();

    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(json!({ "email": email, "password": "a-long-password" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 201);

    // Wrong password for a real account.
    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "email": email, "password": "wrong-password" }))
        .to_request();
    let wrong_pw: Value = test::call_and_read_body_json(&app, req).await;

    // Unknown account entirely.
    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "email": unique_email(), "password": "a-long-password" }))
        .to_request();
    let unknown: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(wrong_pw["message"], unknown["message"]);
}

#[actix_web::test]
#[ignore]
async fn logout_blocks_refresh_but_not_stateless_verify() {
    let (app, keys) = spawn_app().await;
    let email = unique_email();

    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(json!({ "email": email, "password": "a-long-password" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let token = body["token"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/logout")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    // Revocation-sensitive path rejects the orphaned token.
    let req = test::TestRequest::post()
        .uri("/refresh")
        .set_json(json!({ "token": token }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 401);

    // Stateless verification still accepts it until embedded expiry.
    assert!(keys.verify(&token).is_ok());
}

#[actix_web::test]
#[ignore]
async fn refresh_rotates_the_session_record() {
    let (app, _) = spawn_app().await;
    let email = unique_email();

    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(json!({ "email": email, "password": "a-long-password" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let first = body["token"].as_str().unwrap().to_string();

    // iat has second granularity; wait so the rotated token differs.
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

    let req = test::TestRequest::post()
        .uri("/refresh")
        .set_json(json!({ "token": first }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let second = body["token"].as_str().unwrap().to_string();

    // The superseded token no longer matches the session record.
    let req = test::TestRequest::post()
        .uri("/refresh")
        .set_json(json!({ "token": first }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 401);

    // The current one refreshes fine.
    let req = test::TestRequest::post()
        .uri("/refresh")
        .set_json(json!({ "token": second }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);
}
