//! TTL policy per resource volatility.
//!
//! Point lookups and manifests change rarely and get the longest window;
//! trending reflects near-real-time activity and gets the shortest. Search
//! results are never cached (unbounded query space).

/// Point lookups, list pages, genre pages, manifests.
pub const CATALOG_SECONDS: u64 = 3600;

/// Trending lists (catalog and recommendations).
pub const TRENDING_SECONDS: u64 = 600;

/// Personalized and genre recommendations.
pub const RECOMMENDATION_SECONDS: u64 = 1800;

/// Similar-video recommendations.
pub const SIMILAR_SECONDS: u64 = 3600;

/// Session records: 7 days, refreshed on renewal.
pub const SESSION_SECONDS: u64 = 7 * 24 * 60 * 60;

/// Playback quality preference.
pub const QUALITY_PREFERENCE_SECONDS: u64 = 3600;

/// Per-subject notification records.
pub const NOTIFICATION_SECONDS: u64 = 7 * 24 * 60 * 60;
