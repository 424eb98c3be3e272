//! Gateway routing tests. These spin up the proxy handler with a route table
//! pointing at closed ports, so they need no running downstream.

use std::time::Duration;

use actix_web::{test, web, App};
use gateway::config::Config;
use gateway::proxy;
use gateway::routes::RouteTable;
use serde_json::Value;

fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        redis_url: "redis://127.0.0.1:6379".to_string(),
        // Closed port: every forwarded call fails to connect.
        auth_service_url: "http://127.0.0.1:59999".to_string(),
        user_service_url: "http://127.0.0.1:59999".to_string(),
        video_service_url: "http://127.0.0.1:59999".to_string(),
        streaming_service_url: "http://127.0.0.1:59999".to_string(),
        recommendation_service_url: "http://127.0.0.1:59999".to_string(),
        rate_limit_max_requests: 100,
        rate_limit_window_seconds: 900,
        proxy_timeout_seconds: 2,
    }
}

async fn spawn_app() -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = actix_web::dev::ServiceResponse,
    Error = actix_web::Error,
> {
    let table = RouteTable::from_config(&test_config());
    let client = reqwest::Client::builder()
        .connect_timeout(Duration::from_millis(500))
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap();

    test::init_service(
        App::new()
            .app_data(web::Data::new(table))
            .app_data(web::Data::new(client))
            .default_service(web::route().to(proxy::forward)),
    )
    .await
}

#[actix_web::test]
async fn unmatched_paths_get_a_json_404() {
    let app = spawn_app().await;

    let req = test::TestRequest::get().uri("/api/nope/anything").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Route not found");
}

#[actix_web::test]
async fn unreachable_downstream_is_a_named_503() {
    let app = spawn_app().await;

    let req = test::TestRequest::get().uri("/api/videos/trending").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 503);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Video service unavailable");
}

#[actix_web::test]
async fn each_route_fails_independently_with_its_own_name() {
    let app = spawn_app().await;

    for (path, name) in [
        ("/api/auth/login", "Auth"),
        ("/api/users/profile", "User"),
        ("/api/streaming/x/manifest", "Streaming"),
        ("/api/recommendations/trending", "Recommendation"),
    ] {
        let req = test::TestRequest::get().uri(path).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 503, "{path}");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], format!("{name} service unavailable"));
    }
}
