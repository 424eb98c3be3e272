//! Per-subject notifications, backed by the shared key-value store so they
//! survive process restarts and are visible to every replica.
//!
//! The record is an arena keyed by subject id holding the serialized list.
//! Unlike response caches these records are the source of truth, so store
//! failures surface instead of falling through.

use chrono::{DateTime, Duration, Utc};
use redis::Script;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use api_core::{AppError, Result};
use redis_store::keys::NotificationKey;
use redis_store::{ops, ttl, with_timeout, SharedConnectionManager};

/// Flip one entry's `read` flag inside the stored list in a single Redis
/// round trip, so concurrent marks cannot overwrite each other. Returns 1
/// when the id was found, 0 otherwise.
const MARK_READ_SCRIPT: &str = r#"
local raw = redis.call('GET', KEYS[1])
if not raw then
  return 0
end
local list = cjson.decode(raw)
local found = 0
for _, entry in ipairs(list) do
  if entry.id == ARGV[1] then
    entry.read = true
    found = 1
  end
end
if found == 1 then
  redis.call('SET', KEYS[1], cjson.encode(list), 'EX', ARGV[2])
end
return found
"#;

/// Closed set of notification kinds; each carries its own payload shape in
/// `message`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    NewVideo,
    Recommendation,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Welcome set seeded on a subject's first access.
pub fn seed_notifications(now: DateTime<Utc>) -> Vec<Notification> {
    vec![
        Notification {
            id: Uuid::new_v4(),
            title: "New Video Added".to_string(),
            message: "Check out the latest additions to the catalog".to_string(),
            kind: NotificationKind::NewVideo,
            read: false,
            created_at: now,
        },
        Notification {
            id: Uuid::new_v4(),
            title: "Recommended for You".to_string(),
            message: "Based on your watch history, you might enjoy these".to_string(),
            kind: NotificationKind::Recommendation,
            read: false,
            created_at: now - Duration::hours(1),
        },
        Notification {
            id: Uuid::new_v4(),
            title: "System Update".to_string(),
            message: "Your preferences were synced successfully".to_string(),
            kind: NotificationKind::System,
            read: true,
            created_at: now - Duration::hours(2),
        },
    ]
}

#[derive(Clone)]
pub struct NotificationStore {
    redis: SharedConnectionManager,
}

impl NotificationStore {
    pub fn new(redis: SharedConnectionManager) -> Self {
        Self { redis }
    }

    /// The subject's notifications, seeding the default set on first access.
    ///
    /// The seed is written with NX, so concurrent first reads converge on
    /// one stored set and every caller sees the same ids.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        let key = NotificationKey::subject(user_id);
        if let Some(existing) = ops::get_json::<Vec<Notification>>(&self.redis, &key).await? {
            return Ok(existing);
        }

        let seeded = seed_notifications(Utc::now());
        if ops::set_json_nx_ex(&self.redis, &key, &seeded, ttl::NOTIFICATION_SECONDS).await? {
            return Ok(seeded);
        }

        // Lost the seed race; serve whatever won.
        Ok(ops::get_json::<Vec<Notification>>(&self.redis, &key)
            .await?
            .unwrap_or(seeded))
    }

    /// Mark one notification read. Unknown ids are NotFound.
    ///
    /// The update runs as a single server-side script, so two concurrent
    /// marks on different entries both survive.
    pub async fn mark_read(&self, user_id: Uuid, notification_id: Uuid) -> Result<()> {
        // Seed on first access so marking right after a fresh login works.
        self.list(user_id).await?;

        let key = NotificationKey::subject(user_id);
        let script = Script::new(MARK_READ_SCRIPT);
        let mut conn = self.redis.lock().await;
        let found: i64 = with_timeout(
            script
                .key(&key)
                .arg(notification_id.to_string())
                .arg(ttl::NOTIFICATION_SECONDS)
                .invoke_async(&mut *conn),
        )
        .await?;

        if found == 0 {
            return Err(AppError::NotFound("Notification".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tag_serializes_snake_case() {
        let json = serde_json::to_string(&NotificationKind::NewVideo).unwrap();
        assert_eq!(json, "\"new_video\"");
        let back: NotificationKind = serde_json::from_str("\"recommendation\"").unwrap();
        assert_eq!(back, NotificationKind::Recommendation);
    }

    #[test]
    fn unknown_kind_tag_is_rejected() {
        assert!(serde_json::from_str::<NotificationKind>("\"whatever\"").is_err());
    }

    #[test]
    fn seed_set_is_newest_first_and_mostly_unread() {
        let now = Utc::now();
        let seeded = seed_notifications(now);
        assert_eq!(seeded.len(), 3);
        assert!(seeded.windows(2).all(|w| w[0].created_at >= w[1].created_at));
        assert_eq!(seeded.iter().filter(|n| !n.read).count(), 2);
    }
}
