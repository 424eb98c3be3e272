//! Redis key naming conventions.
//!
//! Every key in the platform is derived here so the full set of inputs that
//! affect a cached payload (resource id, pagination, filters, quality) is
//! visible in one place and two services can never disagree on a name.

use uuid::Uuid;

/// Base namespace for all platform keys.
const NAMESPACE: &str = "vstream";

/// Session records owned by the identity service.
///
/// One record per subject: a new login or refresh overwrites the previous
/// token, a logout deletes the record.
pub struct SessionKey;

impl SessionKey {
    pub fn subject(user_id: Uuid) -> String {
        format!("{}:session:{}", NAMESPACE, user_id)
    }
}

/// Catalog response caches.
pub struct CatalogCacheKey;

impl CatalogCacheKey {
    /// Point lookup for a single video.
    pub fn video(video_id: Uuid) -> String {
        format!("{}:cache:video:{}", NAMESPACE, video_id)
    }

    /// One page of the global listing.
    pub fn page(page: u32, limit: u32) -> String {
        format!("{}:cache:videos:page:{}:limit:{}", NAMESPACE, page, limit)
    }

    /// One page of a genre listing.
    pub fn genre(genre: &str, page: u32, limit: u32) -> String {
        format!(
            "{}:cache:videos:genre:{}:page:{}:limit:{}",
            NAMESPACE, genre, page, limit
        )
    }

    /// Trending list for a given size.
    pub fn trending(limit: u32) -> String {
        format!("{}:cache:videos:trending:{}", NAMESPACE, limit)
    }
}

/// Streaming service caches.
pub struct StreamCacheKey;

impl StreamCacheKey {
    /// Derived manifest per (video, quality).
    pub fn manifest(video_id: Uuid, quality: &str) -> String {
        format!("{}:cache:manifest:{}:{}", NAMESPACE, video_id, quality)
    }

    /// Stored playback quality preference.
    pub fn quality_preference(video_id: Uuid) -> String {
        format!("{}:quality:{}", NAMESPACE, video_id)
    }
}

/// Recommendation response caches.
pub struct RecommendationCacheKey;

impl RecommendationCacheKey {
    pub fn personalized(user_id: Uuid, limit: u32) -> String {
        format!("{}:cache:recs:user:{}:{}", NAMESPACE, user_id, limit)
    }

    pub fn similar(video_id: Uuid, limit: u32) -> String {
        format!("{}:cache:recs:similar:{}:{}", NAMESPACE, video_id, limit)
    }

    pub fn trending(limit: u32) -> String {
        format!("{}:cache:recs:trending:{}", NAMESPACE, limit)
    }

    pub fn genre(genre: &str, limit: u32) -> String {
        format!("{}:cache:recs:genre:{}:{}", NAMESPACE, genre, limit)
    }
}

/// Per-subject notification records owned by the profile service.
pub struct NotificationKey;

impl NotificationKey {
    pub fn subject(user_id: Uuid) -> String {
        format!("{}:notifications:{}", NAMESPACE, user_id)
    }
}

/// Gateway rate-limit windows.
pub struct RateLimitKey;

impl RateLimitKey {
    pub fn client(addr: &str) -> String {
        format!("{}:rate_limit:ip:{}", NAMESPACE, addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_key_is_keyed_by_subject() {
        let id = Uuid::nil();
        let key = SessionKey::subject(id);
        assert_eq!(key, format!("vstream:session:{}", id));
    }

    #[test]
    fn catalog_keys_encode_every_query_input() {
        let id = Uuid::nil();
        assert!(CatalogCacheKey::video(id).contains(&id.to_string()));

        let page_key = CatalogCacheKey::page(3, 20);
        assert!(page_key.contains(":page:3:"));
        assert!(page_key.ends_with(":limit:20"));

        let genre_key = CatalogCacheKey::genre("drama", 1, 10);
        assert!(genre_key.contains(":genre:drama:"));
        assert!(genre_key.ends_with(":page:1:limit:10"));

        assert_ne!(CatalogCacheKey::trending(10), CatalogCacheKey::trending(20));
    }

    #[test]
    fn manifest_keys_differ_per_quality() {
        let id = Uuid::nil();
        assert_ne!(
            StreamCacheKey::manifest(id, "auto"),
            StreamCacheKey::manifest(id, "720p")
        );
    }

    #[test]
    fn keys_share_the_platform_namespace() {
        let id = Uuid::nil();
        let keys = vec![
            SessionKey::subject(id),
            CatalogCacheKey::video(id),
            StreamCacheKey::manifest(id, "auto"),
            RecommendationCacheKey::trending(20),
            NotificationKey::subject(id),
            RateLimitKey::client("10.0.0.1"),
        ];
        for key in keys {
            assert!(key.starts_with("vstream:"));
        }
    }
}
