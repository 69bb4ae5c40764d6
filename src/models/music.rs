use serde::{Deserialize, Serialize};

use super::{AgeGroup, Language, Mood};

// ============================================================================
// YouTube Data API Types
// ============================================================================

/// Raw response from GET /search
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YouTubeSearchResponse {
    #[serde(default)]
    pub items: Vec<YouTubeSearchItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YouTubeSearchItem {
    pub id: YouTubeItemId,
    #[serde(default)]
    pub snippet: Option<YouTubeSnippet>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YouTubeItemId {
    #[serde(default)]
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YouTubeSnippet {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub channel_title: Option<String>,
}

/// A playable search hit
#[derive(Debug, Clone, PartialEq)]
pub struct VideoHit {
    pub video_id: String,
    pub title: Option<String>,
    pub channel: Option<String>,
}

impl YouTubeSearchResponse {
    /// Hits in ranking order; items without a video id (channels, playlists) are skipped
    pub fn into_hits(self) -> Vec<VideoHit> {
        self.items
            .into_iter()
            .filter_map(|item| {
                let video_id = item.id.video_id?;
                let snippet = item.snippet;
                Some(VideoHit {
                    video_id,
                    title: snippet.as_ref().and_then(|s| s.title.clone()),
                    channel: snippet.and_then(|s| s.channel_title),
                })
            })
            .collect()
    }
}

// ============================================================================
// Music recommendation
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum VideoSource {
    Search,
    Fallback,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MusicRecommendation {
    pub video_id: String,
    pub watch_url: String,
    pub title: Option<String>,
    pub channel: Option<String>,
    pub mood: Mood,
    pub age_group: AgeGroup,
    pub language: Language,
    /// Topic query the video was found with; absent for fallback videos
    pub query: Option<String>,
    pub source: VideoSource,
    pub warning: Option<String>,
}

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_into_hits_skips_non_videos() {
        let json = r#"{
            "kind": "youtube#searchListResponse",
            "items": [
                {"id": {"kind": "youtube#video", "videoId": "ZbZSe6N_BXs"},
                 "snippet": {"title": "Happy", "channelTitle": "Pharrell Williams"}},
                {"id": {"kind": "youtube#channel", "channelId": "UC123"}},
                {"id": {"kind": "youtube#video", "videoId": "y6Sxv-sUYtM"}}
            ]
        }"#;

        let response: YouTubeSearchResponse = serde_json::from_str(json).unwrap();
        let hits = response.into_hits();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].video_id, "ZbZSe6N_BXs");
        assert_eq!(hits[0].channel.as_deref(), Some("Pharrell Williams"));
        assert_eq!(hits[1].title, None);
    }

    #[test]
    fn test_empty_search_response() {
        let response: YouTubeSearchResponse = serde_json::from_str("{}").unwrap();
        assert!(response.into_hits().is_empty());
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(
            watch_url("ZbZSe6N_BXs"),
            "https://www.youtube.com/watch?v=ZbZSe6N_BXs"
        );
    }
}
