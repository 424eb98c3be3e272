//! Shared Redis plumbing for every service.
//!
//! One connection manager per process, handed around as
//! [`SharedConnectionManager`]. All commands go through [`with_timeout`] so a
//! slow or dead Redis can never wedge a request handler; callers decide
//! whether a failure is fatal (session store writes) or advisory (response
//! caches, which fall through to the source of truth).

use anyhow::{Context, Result};
use redis::aio::ConnectionManager;
use redis::Client;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{timeout, Duration};

pub mod keys;
pub mod ops;
pub mod ttl;

/// Shared Redis connection manager guarded by a Tokio mutex.
pub type SharedConnectionManager = Arc<Mutex<ConnectionManager>>;

/// Deadline applied to every Redis command.
pub const COMMAND_TIMEOUT: Duration = Duration::from_millis(500);

/// Redis connection pool wrapper.
pub struct RedisPool {
    manager: SharedConnectionManager,
}

impl RedisPool {
    /// Connect to a single Redis endpoint and build the shared manager.
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = Client::open(redis_url).context("failed to construct Redis client")?;
        let manager = ConnectionManager::new(client)
            .await
            .context("failed to initialize Redis connection manager")?;
        Ok(Self {
            manager: Arc::new(Mutex::new(manager)),
        })
    }

    pub fn manager(&self) -> SharedConnectionManager {
        self.manager.clone()
    }
}

/// Run a Redis future under the command deadline.
///
/// A timeout surfaces as an IO-kind [`redis::RedisError`] so callers handle
/// slow and unreachable stores through the same error path.
pub async fn with_timeout<T>(
    fut: impl Future<Output = Result<T, redis::RedisError>>,
) -> Result<T, redis::RedisError> {
    match timeout(COMMAND_TIMEOUT, fut).await {
        Ok(result) => result,
        Err(_) => Err(redis::RedisError::from((
            redis::ErrorKind::IoError,
            "redis command timed out",
        ))),
    }
}
