//! Recommendation generation.
//!
//! Generation sits behind a trait so the caching layer in the handlers stays
//! independent of how candidates are produced. The shipped strategy is a
//! randomized stub; a model-backed strategy slots in behind the same trait.

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const PLACEHOLDER_THUMBNAIL: &str = "/placeholder-thumbnail.jpg";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedVideo {
    pub video_id: String,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub title: String,
    pub thumbnail: String,
    pub duration: u32,
    pub rating: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizedRecommendations {
    pub user_id: Uuid,
    pub recommendations: Vec<RankedVideo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarVideos {
    pub video_id: Uuid,
    pub similar: Vec<RankedVideo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingRecommendations {
    pub trending: Vec<RankedVideo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenreRecommendations {
    pub genre: String,
    pub recommendations: Vec<RankedVideo>,
}

/// Candidate generation. Every method returns its list ranked by descending
/// score.
pub trait RecommendationStrategy: Send + Sync {
    fn personalized(&self, user_id: Uuid, limit: u32) -> PersonalizedRecommendations;
    fn similar(&self, video_id: Uuid, limit: u32) -> SimilarVideos;
    fn trending(&self, limit: u32) -> TrendingRecommendations;
    fn genre(&self, genre: &str, limit: u32) -> GenreRecommendations;
}

/// Stand-in strategy producing plausible random candidates.
pub struct RandomStrategy;

impl RandomStrategy {
    fn candidates(
        &self,
        limit: u32,
        prefix: &str,
        score_ceiling: f64,
        reason: Option<&str>,
        title: impl Fn(usize) -> String,
    ) -> Vec<RankedVideo> {
        let mut rng = rand::thread_rng();
        let mut videos: Vec<RankedVideo> = (0..limit as usize)
            .map(|i| RankedVideo {
                video_id: format!("{}-{}", prefix, Uuid::new_v4().simple()),
                score: rng.gen::<f64>() * score_ceiling,
                reason: reason.map(str::to_string),
                title: title(i),
                thumbnail: PLACEHOLDER_THUMBNAIL.to_string(),
                duration: rng.gen_range(30..150),
                rating: format!("{:.1}", rng.gen::<f64>() * 5.0),
            })
            .collect();
        videos.sort_by(|a, b| b.score.total_cmp(&a.score));
        videos
    }
}

impl RecommendationStrategy for RandomStrategy {
    fn personalized(&self, user_id: Uuid, limit: u32) -> PersonalizedRecommendations {
        PersonalizedRecommendations {
            user_id,
            recommendations: self.candidates(
                limit,
                "video",
                1.0,
                Some("Based on your watch history"),
                |i| format!("Recommended Video {}", i + 1),
            ),
        }
    }

    fn similar(&self, video_id: Uuid, limit: u32) -> SimilarVideos {
        SimilarVideos {
            video_id,
            similar: self.candidates(limit, "similar", 1.0, None, |i| {
                format!("Similar Video {}", i + 1)
            }),
        }
    }

    fn trending(&self, limit: u32) -> TrendingRecommendations {
        TrendingRecommendations {
            trending: self.candidates(limit, "trending", 100.0, None, |i| {
                format!("Trending Video {}", i + 1)
            }),
        }
    }

    fn genre(&self, genre: &str, limit: u32) -> GenreRecommendations {
        GenreRecommendations {
            genre: genre.to_string(),
            recommendations: self.candidates(limit, "genre", 1.0, None, |i| {
                format!("{} Video {}", genre, i + 1)
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn personalized_output_is_ranked_and_sized() {
        let out = RandomStrategy.personalized(Uuid::new_v4(), 20);
        assert_eq!(out.recommendations.len(), 20);
        assert!(out
            .recommendations
            .windows(2)
            .all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn similar_output_carries_the_seed_video() {
        let seed = Uuid::new_v4();
        let out = RandomStrategy.similar(seed, 10);
        assert_eq!(out.video_id, seed);
        assert_eq!(out.similar.len(), 10);
        assert!(out.similar.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn trending_scores_use_the_wider_scale() {
        let out = RandomStrategy.trending(50);
        assert!(out.trending.iter().all(|v| (0.0..=100.0).contains(&v.score)));
    }

    #[test]
    fn genre_output_names_the_genre_in_titles() {
        let out = RandomStrategy.genre("drama", 5);
        assert_eq!(out.genre, "drama");
        assert!(out.recommendations.iter().all(|v| v.title.starts_with("drama ")));
    }

    #[test]
    fn ranked_video_serializes_camel_case() {
        let out = RandomStrategy.personalized(Uuid::new_v4(), 1);
        let json = serde_json::to_value(&out).unwrap();
        assert!(json["userId"].is_string());
        assert!(json["recommendations"][0]["videoId"].is_string());
        assert!(json["recommendations"][0].get("video_id").is_none());
    }
}
