//! Static route table: `/api/<segment>/...` prefixes mapped to downstream
//! base URLs. Resolution is pure string work so it can be tested without a
//! server.

use crate::config::Config;

#[derive(Debug, Clone)]
struct Route {
    /// Path prefix under `/api`, e.g. `videos`.
    segment: &'static str,
    /// Human name used in outage responses, e.g. `Video`.
    display_name: &'static str,
    base_url: String,
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

/// A matched route: where to send the request and what remains of the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub display_name: &'static str,
    pub target_url: String,
}

impl RouteTable {
    pub fn from_config(config: &Config) -> Self {
        let trim = |url: &str| url.trim_end_matches('/').to_string();
        Self {
            routes: vec![
                Route {
                    segment: "auth",
                    display_name: "Auth",
                    base_url: trim(&config.auth_service_url),
                },
                Route {
                    segment: "users",
                    display_name: "User",
                    base_url: trim(&config.user_service_url),
                },
                Route {
                    segment: "videos",
                    display_name: "Video",
                    base_url: trim(&config.video_service_url),
                },
                Route {
                    segment: "streaming",
                    display_name: "Streaming",
                    base_url: trim(&config.streaming_service_url),
                },
                Route {
                    segment: "recommendations",
                    display_name: "Recommendation",
                    base_url: trim(&config.recommendation_service_url),
                },
            ],
        }
    }

    /// Match a request path (no query string) against the table. The matched
    /// `/api/<segment>` prefix is stripped; the rest of the path is appended
    /// to the downstream base URL.
    pub fn resolve(&self, path: &str) -> Option<ResolvedRoute> {
        let under_api = path.strip_prefix("/api/")?;
        for route in &self.routes {
            let rest = match under_api.strip_prefix(route.segment) {
                Some("") => "",
                Some(rest) if rest.starts_with('/') => rest,
                _ => continue,
            };
            return Some(ResolvedRoute {
                display_name: route.display_name,
                target_url: format!("{}{}", route.base_url, rest),
            });
        }
        None
    }
}
