use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub redis_url: String,
    pub auth_service_url: String,
    pub user_service_url: String,
    pub video_service_url: String,
    pub streaming_service_url: String,
    pub recommendation_service_url: String,
    pub rate_limit_max_requests: u64,
    pub rate_limit_window_seconds: u64,
    pub proxy_timeout_seconds: u64,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: env_or("SERVER_HOST", "0.0.0.0"),
            port: env_or("SERVER_PORT", "8080")
                .parse()
                .context("Invalid SERVER_PORT")?,
            redis_url: env::var("REDIS_URL").context("REDIS_URL must be set")?,
            auth_service_url: env_or("AUTH_SERVICE_URL", "http://identity-service:8081"),
            user_service_url: env_or("USER_SERVICE_URL", "http://profile-service:8082"),
            video_service_url: env_or("VIDEO_SERVICE_URL", "http://catalog-service:8083"),
            streaming_service_url: env_or(
                "STREAMING_SERVICE_URL",
                "http://streaming-service:8084",
            ),
            recommendation_service_url: env_or(
                "RECOMMENDATION_SERVICE_URL",
                "http://recommendation-service:8085",
            ),
            rate_limit_max_requests: env_or("RATE_LIMIT_MAX_REQUESTS", "100")
                .parse()
                .context("Invalid RATE_LIMIT_MAX_REQUESTS")?,
            rate_limit_window_seconds: env_or("RATE_LIMIT_WINDOW_SECONDS", "900")
                .parse()
                .context("Invalid RATE_LIMIT_WINDOW_SECONDS")?,
            proxy_timeout_seconds: env_or("PROXY_TIMEOUT_SECONDS", "10")
                .parse()
                .context("Invalid PROXY_TIMEOUT_SECONDS")?,
        })
    }
}
