use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use auth_core::TokenKeys;
use profile_service::config::Config;
use profile_service::handlers;
use profile_service::notifications::NotificationStore;
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
    tracing::info!("starting profile-service v{}", env!("CARGO_PKG_VERSION"));

    let pool =
        api_core::db::connect_pool(&config.database_url, config.database_max_connections).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let redis = RedisPool::connect(&config.redis_url).await?;
    let notifications = NotificationStore::new(redis.manager());
    let keys = TokenKeys::from_secret(&config.jwt_secret);

    let bind_addr = (config.host.clone(), config.port);
    tracing::info!("profile-service listening on {}:{}", bind_addr.0, bind_addr.1);

    HttpServer::new(move || {
        let keys = keys.clone();
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(notifications.clone()))
            .app_data(web::Data::new(keys.clone()))
            .configure(move |cfg| handlers::configure_routes(cfg, keys.clone()))
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
