//! HLS playlist derivation.
//!
//! Manifests are derived, never stored: the same inputs always produce the
//! same text, so they can be cached and rebuilt freely. Bandwidth and
//! resolution come from a fixed ladder rather than probing the media.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

/// Supported playback qualities, lowest to highest.
pub const QUALITY_LADDER: [Quality; 4] =
    [Quality::Q360p, Quality::Q480p, Quality::Q720p, Quality::Q1080p];

const SEGMENT_COUNT: u32 = 10;
const SEGMENT_SECONDS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    Q360p,
    Q480p,
    Q720p,
    Q1080p,
}

impl Quality {
    pub fn bandwidth(self) -> u32 {
        match self {
            Quality::Q360p => 800_000,
            Quality::Q480p => 1_400_000,
            Quality::Q720p => 2_800_000,
            Quality::Q1080p => 5_000_000,
        }
    }

    pub fn resolution(self) -> &'static str {
        match self {
            Quality::Q360p => "640x360",
            Quality::Q480p => "854x480",
            Quality::Q720p => "1280x720",
            Quality::Q1080p => "1920x1080",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Quality::Q360p => "360p",
            Quality::Q480p => "480p",
            Quality::Q720p => "720p",
            Quality::Q1080p => "1080p",
        };
        f.write_str(label)
    }
}

/// Requested quality: `auto` selects the variant playlist, a specific rung
/// selects its media playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualitySelector {
    Auto,
    Fixed(Quality),
}

impl QualitySelector {
    /// Key fragment used for per-(video, quality) cache entries.
    pub fn cache_label(self) -> String {
        match self {
            QualitySelector::Auto => "auto".to_string(),
            QualitySelector::Fixed(q) => q.to_string(),
        }
    }
}

impl FromStr for QualitySelector {
    type Err = UnknownQuality;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(QualitySelector::Auto),
            "360p" => Ok(QualitySelector::Fixed(Quality::Q360p)),
            "480p" => Ok(QualitySelector::Fixed(Quality::Q480p)),
            "720p" => Ok(QualitySelector::Fixed(Quality::Q720p)),
            "1080p" => Ok(QualitySelector::Fixed(Quality::Q1080p)),
            other => Err(UnknownQuality(other.to_string())),
        }
    }
}

#[derive(Debug)]
pub struct UnknownQuality(pub String);

impl fmt::Display for UnknownQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown quality '{}'", self.0)
    }
}

impl std::error::Error for UnknownQuality {}

fn header() -> String {
    format!(
        "#EXTM3U\n#EXT-X-VERSION:3\n#EXT-X-TARGETDURATION:{}\n#EXT-X-MEDIA-SEQUENCE:0\n",
        SEGMENT_SECONDS
    )
}

/// Variant playlist: one `#EXT-X-STREAM-INF` per ladder rung, pointing at the
/// rung's own playlist.
pub fn variant_playlist(video_id: Uuid) -> String {
    let mut out = header();
    for quality in QUALITY_LADDER {
        out.push_str(&format!(
            "#EXT-X-STREAM-INF:BANDWIDTH={},RESOLUTION={}\n",
            quality.bandwidth(),
            quality.resolution()
        ));
        out.push_str(&format!("{}/{}/playlist.m3u8\n", video_id, quality));
    }
    out
}

/// Media playlist for one rung: fixed-duration placeholder segments, closed
/// with `#EXT-X-ENDLIST` since the content is not live.
pub fn media_playlist() -> String {
    let mut out = header();
    for segment in 0..SEGMENT_COUNT {
        out.push_str(&format!("#EXTINF:{}.0,\n", SEGMENT_SECONDS));
        out.push_str(&format!("segment{}.ts\n", segment));
    }
    out.push_str("#EXT-X-ENDLIST\n");
    out
}

pub fn render(video_id: Uuid, selector: QualitySelector) -> String {
    match selector {
        QualitySelector::Auto => variant_playlist(video_id),
        QualitySelector::Fixed(_) => media_playlist(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_parses_every_ladder_rung_and_auto() {
        assert_eq!("auto".parse::<QualitySelector>().unwrap(), QualitySelector::Auto);
        for quality in QUALITY_LADDER {
            let parsed = quality.to_string().parse::<QualitySelector>().unwrap();
            assert_eq!(parsed, QualitySelector::Fixed(quality));
        }
    }

    #[test]
    fn unknown_quality_is_rejected() {
        assert!("4k".parse::<QualitySelector>().is_err());
        assert!("720".parse::<QualitySelector>().is_err());
        assert!("".parse::<QualitySelector>().is_err());
    }

    #[test]
    fn variant_playlist_lists_the_fixed_ladder() {
        let id = Uuid::nil();
        let playlist = variant_playlist(id);

        assert!(playlist.starts_with("#EXTM3U\n"));
        assert!(playlist.contains("BANDWIDTH=800000,RESOLUTION=640x360"));
        assert!(playlist.contains("BANDWIDTH=1400000,RESOLUTION=854x480"));
        assert!(playlist.contains("BANDWIDTH=2800000,RESOLUTION=1280x720"));
        assert!(playlist.contains("BANDWIDTH=5000000,RESOLUTION=1920x1080"));
        assert!(playlist.contains(&format!("{}/720p/playlist.m3u8", id)));
        assert!(!playlist.contains("#EXT-X-ENDLIST"));
    }

    #[test]
    fn media_playlist_has_ten_closed_segments() {
        let playlist = media_playlist();

        assert_eq!(playlist.matches("#EXTINF:10.0,").count(), 10);
        assert!(playlist.contains("segment0.ts"));
        assert!(playlist.contains("segment9.ts"));
        assert!(playlist.trim_end().ends_with("#EXT-X-ENDLIST"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let id = Uuid::new_v4();
        assert_eq!(
            render(id, QualitySelector::Auto),
            render(id, QualitySelector::Auto)
        );
        assert_eq!(
            render(id, QualitySelector::Fixed(Quality::Q480p)),
            render(id, QualitySelector::Fixed(Quality::Q480p))
        );
    }
}
