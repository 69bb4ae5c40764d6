//! TMDB provider
//!
//! Discovery runs against /discover/movie with the preference filters built
//! in `query_builder`; per-movie lookups (details, alternative titles, watch
//! providers, release certifications) are cached since they rarely change.

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::AppResult,
    models::{
        AlternativeTitle, TmdbAlternativeTitles, TmdbDiscoverPage, TmdbMovieDetails,
        TmdbReleaseDates, TmdbWatchProviders, WatchProvider,
    },
    services::{
        providers::{ensure_success, MovieCatalog},
        query_builder::DiscoverQuery,
    },
};
use reqwest::{Client as HttpClient, RequestBuilder};
use std::time::Duration;

const DETAILS_CACHE_TTL: u64 = 86400; // 1 day
const ALT_TITLES_CACHE_TTL: u64 = 604800; // 1 week
const PROVIDERS_CACHE_TTL: u64 = 86400; // 1 day
const CERT_CACHE_TTL: u64 = 604800; // 1 week
const AVAILABILITY_TIMEOUT: Duration = Duration::from_secs(5);
const PROVIDER_COUNTRY: &str = "US";

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    access_token: Option<String>,
    api_url: String,
    cache: Cache,
}

impl TmdbProvider {
    pub fn new(
        http_client: HttpClient,
        cache: Cache,
        api_key: Option<String>,
        access_token: Option<String>,
        api_url: String,
    ) -> Self {
        Self {
            http_client,
            api_key,
            access_token,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
        }
    }

    /// GET request with whichever credentials are configured
    fn get(&self, path: &str) -> RequestBuilder {
        let mut request = self
            .http_client
            .get(format!("{}{}", self.api_url, path))
            .header("accept", "application/json");

        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }
        if let Some(key) = &self.api_key {
            request = request.query(&[("api_key", key.as_str())]);
        }

        request
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let response = self.get(path).send().await?;
        let response = ensure_success(response, self.name()).await?;
        Ok(response.json().await?)
    }

    fn has_credentials(&self) -> bool {
        self.api_key.is_some() || self.access_token.is_some()
    }
}

#[async_trait::async_trait]
impl MovieCatalog for TmdbProvider {
    async fn check_availability(&self) -> bool {
        if !self.has_credentials() {
            tracing::warn!(provider = "tmdb", "No TMDB credentials configured");
            return false;
        }

        match self
            .get("/configuration")
            .timeout(AVAILABILITY_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response.status() == reqwest::StatusCode::OK,
            Err(e) => {
                tracing::warn!(error = %e, provider = "tmdb", "Availability check failed");
                false
            }
        }
    }

    async fn discover(&self, query: &DiscoverQuery) -> AppResult<TmdbDiscoverPage> {
        let response = self
            .get("/discover/movie")
            .query(&query.to_params())
            .send()
            .await?;
        let response = ensure_success(response, self.name()).await?;
        let page: TmdbDiscoverPage = response.json().await?;

        tracing::info!(
            page = page.page,
            total_pages = page.total_pages,
            results = page.results.len(),
            genre_id = query.genre_id,
            language = %query.language,
            provider = "tmdb",
            "Discover completed"
        );

        Ok(page)
    }

    async fn movie_details(&self, tmdb_id: u64) -> AppResult<TmdbMovieDetails> {
        cached!(
            self.cache,
            CacheKey::MovieDetails(tmdb_id),
            DETAILS_CACHE_TTL,
            async move {
                self.get_json::<TmdbMovieDetails>(&format!("/movie/{}", tmdb_id))
                    .await
            }
        )
    }

    async fn alternative_titles(&self, tmdb_id: u64) -> AppResult<Vec<AlternativeTitle>> {
        cached!(
            self.cache,
            CacheKey::AlternativeTitles(tmdb_id),
            ALT_TITLES_CACHE_TTL,
            async move {
                self.get_json::<TmdbAlternativeTitles>(&format!(
                    "/movie/{}/alternative_titles",
                    tmdb_id
                ))
                .await
                .map(|titles| titles.titles)
            }
        )
    }

    async fn watch_providers(&self, tmdb_id: u64) -> AppResult<Vec<WatchProvider>> {
        cached!(
            self.cache,
            CacheKey::WatchProviders(tmdb_id),
            PROVIDERS_CACHE_TTL,
            async move {
                let providers: TmdbWatchProviders = self
                    .get_json(&format!("/movie/{}/watch/providers", tmdb_id))
                    .await?;

                let country = providers
                    .results
                    .get(PROVIDER_COUNTRY)
                    .cloned()
                    .unwrap_or_default();

                Ok::<_, crate::error::AppError>(
                    country.flatrate.into_iter().chain(country.free).collect::<Vec<_>>(),
                )
            }
        )
    }

    async fn certification(&self, tmdb_id: u64) -> AppResult<Option<String>> {
        cached!(
            self.cache,
            CacheKey::Certification(tmdb_id),
            CERT_CACHE_TTL,
            async move {
                self.get_json::<TmdbReleaseDates>(&format!("/movie/{}/release_dates", tmdb_id))
                    .await
                    .map(|dates| dates.us_certification())
            }
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(api_key: Option<&str>, access_token: Option<&str>) -> TmdbProvider {
        TmdbProvider::new(
            HttpClient::new(),
            Cache::disabled(),
            api_key.map(String::from),
            access_token.map(String::from),
            "http://tmdb.test/3/".to_string(),
        )
    }

    #[test]
    fn test_request_carries_api_key_and_bearer_token() {
        let request = provider(Some("key123"), Some("token456"))
            .get("/movie/550")
            .build()
            .unwrap();

        assert_eq!(
            request.url().as_str(),
            "http://tmdb.test/3/movie/550?api_key=key123"
        );
        assert_eq!(
            request.headers().get("authorization").unwrap(),
            "Bearer token456"
        );
        assert_eq!(request.headers().get("accept").unwrap(), "application/json");
    }

    #[test]
    fn test_request_without_credentials() {
        let provider = provider(None, None);
        let request = provider.get("/configuration").build().unwrap();

        assert_eq!(request.url().as_str(), "http://tmdb.test/3/configuration");
        assert!(request.headers().get("authorization").is_none());
        assert!(!provider.has_credentials());
    }

    #[tokio::test]
    async fn test_availability_false_without_credentials() {
        assert!(!provider(None, None).check_availability().await);
    }

    #[test]
    fn test_discover_request_params() {
        let provider = provider(Some("k"), None);
        let query = DiscoverQuery::for_preferences(
            crate::models::MovieGenre::Romance,
            25,
            crate::models::Language::Hindi,
            2,
        );

        let request = provider
            .get("/discover/movie")
            .query(&query.to_params())
            .build()
            .unwrap();
        let url = request.url().as_str();

        assert!(url.starts_with("http://tmdb.test/3/discover/movie?api_key=k&"));
        assert!(url.contains("with_genres=10749"));
        assert!(url.contains("with_original_language=hi"));
        assert!(url.contains("language=hi-HI"));
        assert!(url.contains("page=2"));
    }
}
