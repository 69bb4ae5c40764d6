//! Jikan (unofficial MyAnimeList) provider
//!
//! Jikan allows roughly three requests per second, so every call waits until
//! at least [`MIN_REQUEST_INTERVAL`] has passed since the previous one.
//! Seasonal and top listings are cached; searches are paged per session and
//! go straight to the API.

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::AppResult,
    models::{AnimePage, JikanListResponse, Season},
    services::{
        providers::{ensure_success, AnimeCatalog},
        query_builder::{AnimeSearchQuery, ANIME_PAGE_SIZE},
    },
};
use reqwest::Client as HttpClient;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

pub const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(350);
const LISTING_CACHE_TTL: u64 = 21600; // 6 hours

#[derive(Clone)]
pub struct JikanProvider {
    http_client: HttpClient,
    api_url: String,
    cache: Cache,
    last_request: Arc<Mutex<Option<Instant>>>,
}

impl JikanProvider {
    pub fn new(http_client: HttpClient, cache: Cache, api_url: String) -> Self {
        Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    async fn rate_limit(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < MIN_REQUEST_INTERVAL {
                let wait = MIN_REQUEST_INTERVAL - elapsed;
                tracing::debug!(wait_ms = wait.as_millis() as u64, "Jikan rate limit: waiting");
                tokio::time::sleep(wait).await;
            }
        }

        *last = Some(Instant::now());
    }

    async fn get_page(&self, path: &str, params: &[(&str, String)]) -> AppResult<AnimePage> {
        self.rate_limit().await;

        let response = self
            .http_client
            .get(format!("{}{}", self.api_url, path))
            .query(params)
            .send()
            .await?;
        let response = ensure_success(response, self.name()).await?;
        let body: JikanListResponse = response.json().await?;

        Ok(AnimePage::from(body))
    }
}

#[async_trait::async_trait]
impl AnimeCatalog for JikanProvider {
    async fn search(&self, query: &AnimeSearchQuery) -> AppResult<AnimePage> {
        let page = self.get_page("/anime", &query.to_params()).await?;

        tracing::info!(
            cursor = %query.cursor_key(),
            page = query.page,
            results = page.anime.len(),
            has_next_page = page.has_next_page,
            provider = "jikan",
            "Anime search completed"
        );

        Ok(page)
    }

    async fn seasonal(&self, year: i32, season: Season) -> AppResult<AnimePage> {
        cached!(
            self.cache,
            CacheKey::SeasonalAnime(year, season.as_str().to_string()),
            LISTING_CACHE_TTL,
            self.get_page(
                &format!("/seasons/{}/{}", year, season.as_str()),
                &[
                    ("sfw", "true".to_string()),
                    ("limit", ANIME_PAGE_SIZE.to_string()),
                ],
            )
        )
    }

    async fn top(&self, page: u32) -> AppResult<AnimePage> {
        cached!(
            self.cache,
            CacheKey::TopAnime(page),
            LISTING_CACHE_TTL,
            self.get_page(
                "/top/anime",
                &[
                    ("page", page.to_string()),
                    ("limit", ANIME_PAGE_SIZE.to_string()),
                    ("sfw", "true".to_string()),
                ],
            )
        )
    }

    fn name(&self) -> &'static str {
        "jikan"
    }
}
