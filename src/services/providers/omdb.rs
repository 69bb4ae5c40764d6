use crate::{
    cached_some,
    db::{Cache, CacheKey},
    error::AppResult,
    models::{OmdbDetails, OmdbResponse},
    services::providers::{ensure_success, MovieRatings},
};
use reqwest::Client as HttpClient;

const OMDB_CACHE_TTL: u64 = 604800; // 1 week

/// OMDB lookups by IMDB id
#[derive(Clone)]
pub struct OmdbProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
    cache: Cache,
}

impl OmdbProvider {
    pub fn new(
        http_client: HttpClient,
        cache: Cache,
        api_key: Option<String>,
        api_url: String,
    ) -> Self {
        Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
        }
    }

    async fn fetch(&self, api_key: &str, imdb_id: &str) -> AppResult<Option<OmdbDetails>> {
        let response = self
            .http_client
            .get(format!("{}/", self.api_url))
            .query(&[("i", imdb_id), ("apikey", api_key), ("plot", "full")])
            .send()
            .await?;
        let response = ensure_success(response, self.name()).await?;
        let body: OmdbResponse = response.json().await?;

        let details = body.into_details();
        if details.is_none() {
            tracing::debug!(imdb_id = %imdb_id, provider = "omdb", "No OMDB entry");
        }

        Ok(details)
    }
}

#[async_trait::async_trait]
impl MovieRatings for OmdbProvider {
    async fn lookup(&self, imdb_id: &str) -> AppResult<Option<OmdbDetails>> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(None);
        };

        // Unknown ids are not cached and get looked up again next time
        cached_some!(
            self.cache,
            CacheKey::OmdbDetails(imdb_id.to_string()),
            OMDB_CACHE_TTL,
            self.fetch(api_key, imdb_id)
        )
    }

    fn name(&self) -> &'static str {
        "omdb"
    }
}
