//! Unified Redis operations.
//!
//! Collapses the GET / SET-EX / DEL patterns every service repeats into one
//! place. JSON variants serialize through serde; a payload that fails to
//! decode is treated as a miss so a stale or foreign value can never poison a
//! read path.

use crate::{with_timeout, SharedConnectionManager};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Get a raw string value. `Ok(None)` when the key does not exist.
pub async fn get_string(
    redis: &SharedConnectionManager,
    key: &str,
) -> Result<Option<String>, redis::RedisError> {
    let mut conn = redis.lock().await;
    with_timeout(
        redis::cmd("GET")
            .arg(key)
            .query_async::<_, Option<String>>(&mut *conn),
    )
    .await
}

/// Set a raw string value with a TTL in seconds.
pub async fn set_string_ex(
    redis: &SharedConnectionManager,
    key: &str,
    value: &str,
    ttl_seconds: u64,
) -> Result<(), redis::RedisError> {
    let mut conn = redis.lock().await;
    with_timeout(
        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl_seconds)
            .query_async::<_, ()>(&mut *conn),
    )
    .await
}

/// Get and deserialize a cached JSON value.
pub async fn get_json<T: DeserializeOwned>(
    redis: &SharedConnectionManager,
    key: &str,
) -> Result<Option<T>, redis::RedisError> {
    let raw = get_string(redis, key).await?;
    match raw {
        Some(json) => match serde_json::from_str::<T>(&json) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                tracing::warn!(key, error = %err, "discarding undecodable cache entry");
                Ok(None)
            }
        },
        None => Ok(None),
    }
}

/// Serialize and store a JSON value with a TTL in seconds.
pub async fn set_json_ex<T: Serialize>(
    redis: &SharedConnectionManager,
    key: &str,
    value: &T,
    ttl_seconds: u64,
) -> Result<(), redis::RedisError> {
    let json = serde_json::to_string(value).map_err(|err| {
        tracing::error!(key, error = %err, "failed to serialize value for cache");
        redis::RedisError::from((redis::ErrorKind::TypeError, "cache serialization failed"))
    })?;
    set_string_ex(redis, key, &json, ttl_seconds).await
}

/// Serialize and store a JSON value with a TTL, only if the key is absent.
/// Returns whether this call won the write; concurrent initializers converge
/// on a single stored value.
pub async fn set_json_nx_ex<T: Serialize>(
    redis: &SharedConnectionManager,
    key: &str,
    value: &T,
    ttl_seconds: u64,
) -> Result<bool, redis::RedisError> {
    let json = serde_json::to_string(value).map_err(|err| {
        tracing::error!(key, error = %err, "failed to serialize value for cache");
        redis::RedisError::from((redis::ErrorKind::TypeError, "cache serialization failed"))
    })?;
    let mut conn = redis.lock().await;
    let written: Option<String> = with_timeout(
        redis::cmd("SET")
            .arg(key)
            .arg(json)
            .arg("EX")
            .arg(ttl_seconds)
            .arg("NX")
            .query_async(&mut *conn),
    )
    .await?;
    Ok(written.is_some())
}

/// Delete a key. Deleting a missing key is not an error.
pub async fn delete(
    redis: &SharedConnectionManager,
    key: &str,
) -> Result<(), redis::RedisError> {
    let mut conn = redis.lock().await;
    with_timeout(redis::cmd("DEL").arg(key).query_async::<_, ()>(&mut *conn)).await
}

/// Fixed-window counter: INCR the key and, on the first hit of the window,
/// attach the expiry. Returns the post-increment count.
pub async fn incr_fixed_window(
    redis: &SharedConnectionManager,
    key: &str,
    window_seconds: u64,
) -> Result<u64, redis::RedisError> {
    let mut conn = redis.lock().await;
    let count: u64 =
        with_timeout(redis::cmd("INCR").arg(key).query_async(&mut *conn)).await?;
    if count == 1 {
        with_timeout(
            redis::cmd("EXPIRE")
                .arg(key)
                .arg(window_seconds)
                .query_async::<_, ()>(&mut *conn),
        )
        .await?;
    }
    Ok(count)
}
