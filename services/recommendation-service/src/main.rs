use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recommendation_service::config::Config;
use recommendation_service::handlers;
use recommendation_service::strategy::{RandomStrategy, RecommendationStrategy};
use redis_store::RedisPool;

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
    tracing::info!(
        "starting recommendation-service v{}",
        env!("CARGO_PKG_VERSION")
    );

    let redis = RedisPool::connect(&config.redis_url).await?;
    let redis_manager = redis.manager();
    let strategy: Arc<dyn RecommendationStrategy> = Arc::new(RandomStrategy);

    let bind_addr = (config.host.clone(), config.port);
    tracing::info!(
        "recommendation-service listening on {}:{}",
        bind_addr.0,
        bind_addr.1
    );

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .app_data(web::Data::new(redis_manager.clone()))
            .app_data(web::Data::from(strategy.clone()))
            .configure(handlers::configure_routes)
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
