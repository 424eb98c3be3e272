use std::time::Duration;

use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_core::health_response;
use gateway::config::Config;
use gateway::proxy;
use gateway::rate_limit::{RateLimit, RateLimitPolicy};
use gateway::routes::RouteTable;
use redis_store::RedisPool;

async fn health() -> HttpResponse {
    health_response("gateway")
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    if cfg!(debug_assertions) {
        dotenvy::dotenv().ok();
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("starting gateway v{}", env!("CARGO_PKG_VERSION"));

    let redis = RedisPool::connect(&config.redis_url).await?;
    let redis_manager = redis.manager();
    let table = RouteTable::from_config(&config);
    let policy = RateLimitPolicy {
        max_requests: config.rate_limit_max_requests,
        window_seconds: config.rate_limit_window_seconds,
    };

    let client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(2))
        .timeout(Duration::from_secs(config.proxy_timeout_seconds))
        .build()?;

    let bind_addr = (config.host.clone(), config.port);
    tracing::info!("gateway listening on {}:{}", bind_addr.0, bind_addr.1);

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .wrap(RateLimit::new(policy.clone(), redis_manager.clone()))
            .app_data(web::Data::new(table.clone()))
            .app_data(web::Data::new(client.clone()))
            .route("/health", web::get().to(health))
            .default_service(web::route().to(proxy::forward))
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
