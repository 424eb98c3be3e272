use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use auth_core::TokenKeys;
use redis_store::RedisPool;
use streaming_service::config::Config;
use streaming_service::handlers;

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
    tracing::info!("starting streaming-service v{}", env!("CARGO_PKG_VERSION"));

    let redis = RedisPool::connect(&config.redis_url).await?;
    let redis_manager = redis.manager();
    let keys = TokenKeys::from_secret(&config.jwt_secret);

    let bind_addr = (config.host.clone(), config.port);
    tracing::info!(
        "streaming-service listening on {}:{}",
        bind_addr.0,
        bind_addr.1
    );

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .app_data(web::Data::new(redis_manager.clone()))
            .app_data(web::Data::new(keys.clone()))
            .configure(handlers::configure_routes)
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
