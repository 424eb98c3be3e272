//! Session records: durable mapping of subjects to their current token.
//!
//! One record per subject (single active session): a login or refresh
//! overwrites the record, a logout deletes it. Existence of the record is
//! what makes a token revocable; stateless verification elsewhere never
//! reads it.

use redis_store::keys::SessionKey;
use redis_store::{ops, ttl, SharedConnectionManager};
use uuid::Uuid;

#[derive(Clone)]
pub struct SessionStore {
    redis: SharedConnectionManager,
}

impl SessionStore {
    pub fn new(redis: SharedConnectionManager) -> Self {
        Self { redis }
    }

    /// Create or overwrite the subject's record with a fresh TTL.
    pub async fn put(&self, subject: Uuid, token: &str) -> Result<(), redis::RedisError> {
        ops::set_string_ex(
            &self.redis,
            &SessionKey::subject(subject),
            token,
            ttl::SESSION_SECONDS,
        )
        .await
    }

    /// The subject's current token, if a session exists.
    pub async fn current(&self, subject: Uuid) -> Result<Option<String>, redis::RedisError> {
        ops::get_string(&self.redis, &SessionKey::subject(subject)).await
    }

    /// Delete the record unconditionally. Orphaned tokens remain
    /// stateless-valid until their embedded expiry lapses.
    pub async fn revoke(&self, subject: Uuid) -> Result<(), redis::RedisError> {
        ops::delete(&self.redis, &SessionKey::subject(subject)).await
    }

    /// Revocation-sensitive check: the presented token must still be the
    /// subject's current record.
    pub async fn is_current(
        &self,
        subject: Uuid,
        token: &str,
    ) -> Result<bool, redis::RedisError> {
        Ok(self.current(subject).await?.as_deref() == Some(token))
    }
}
