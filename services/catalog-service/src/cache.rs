//! Cache-aside helpers for read paths, plus the synchronous invalidation
//! used by write paths.
//!
//! Reads treat the cache as advisory: any store error is logged and the
//! request falls through to Postgres. Invalidation is different — a write
//! must delete the point entry before it can acknowledge, so those errors
//! propagate.

use api_core::Result;
use redis_store::{ops, SharedConnectionManager};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Advisory lookup: a cache failure reads as a miss.
pub async fn lookup<T: DeserializeOwned>(redis: &SharedConnectionManager, key: &str) -> Option<T> {
    match ops::get_json(redis, key).await {
        Ok(hit) => hit,
        Err(err) => {
            tracing::warn!(key, error = %err, "cache lookup failed, falling through");
            None
        }
    }
}

/// Advisory store: a cache failure skips the store step.
pub async fn store<T: Serialize>(
    redis: &SharedConnectionManager,
    key: &str,
    value: &T,
    ttl_seconds: u64,
) {
    if let Err(err) = ops::set_json_ex(redis, key, value, ttl_seconds).await {
        tracing::warn!(key, error = %err, "cache store failed, skipping");
    }
}

/// Mandatory invalidation: the point entry must be gone before a mutation
/// reports success.
pub async fn invalidate(redis: &SharedConnectionManager, key: &str) -> Result<()> {
    ops::delete(redis, key).await?;
    Ok(())
}
