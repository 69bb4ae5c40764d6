//! YouTube Data API provider
//!
//! Only the search endpoint is used. Results are not cached: the quota cost
//! is per request either way and the rotation walks through each result list.

use crate::{
    error::{AppError, AppResult},
    models::{VideoHit, YouTubeSearchResponse},
    services::{
        providers::{ensure_success, VideoSearch},
        query_builder::MusicSearchQuery,
    },
};
use reqwest::Client as HttpClient;

#[derive(Clone)]
pub struct YouTubeProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
}

impl YouTubeProvider {
    pub fn new(http_client: HttpClient, api_key: Option<String>, api_url: String) -> Self {
        Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait::async_trait]
impl VideoSearch for YouTubeProvider {
    async fn search_music(&self, query: &MusicSearchQuery) -> AppResult<Vec<VideoHit>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::ExternalApi("YouTube API key not configured".to_string()))?;

        let response = self
            .http_client
            .get(format!("{}/search", self.api_url))
            .query(&query.to_params())
            .query(&[("key", api_key)])
            .send()
            .await?;
        let response = ensure_success(response, self.name()).await?;
        let body: YouTubeSearchResponse = response.json().await?;
        let hits = body.into_hits();

        tracing::info!(
            query = %query.query,
            relevance_language = ?query.relevance_language,
            hits = hits.len(),
            provider = "youtube",
            "Music search completed"
        );

        Ok(hits)
    }

    fn name(&self) -> &'static str {
        "youtube"
    }
}
