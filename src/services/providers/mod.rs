/// External content catalog abstraction
///
/// Each catalog the recommenders talk to sits behind a trait so the
/// recommendation logic can be exercised without network access. Production
/// implementations live in the submodules (TMDB, OMDB, YouTube, Jikan).
use crate::{
    error::{AppError, AppResult},
    models::{
        AlternativeTitle, AnimePage, OmdbDetails, Season, TmdbDiscoverPage, TmdbMovieDetails,
        VideoHit, WatchProvider,
    },
    services::query_builder::{AnimeSearchQuery, DiscoverQuery, MusicSearchQuery},
};

pub mod jikan;
pub mod omdb;
pub mod tmdb;
pub mod youtube;

pub use jikan::JikanProvider;
pub use omdb::OmdbProvider;
pub use tmdb::TmdbProvider;
pub use youtube::YouTubeProvider;

/// Movie discovery and metadata (TMDB)
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Cheap liveness probe; `false` means the catalog should not be queried
    async fn check_availability(&self) -> bool;

    async fn discover(&self, query: &DiscoverQuery) -> AppResult<TmdbDiscoverPage>;

    async fn movie_details(&self, tmdb_id: u64) -> AppResult<TmdbMovieDetails>;

    async fn alternative_titles(&self, tmdb_id: u64) -> AppResult<Vec<AlternativeTitle>>;

    /// US subscription and free streaming offers
    async fn watch_providers(&self, tmdb_id: u64) -> AppResult<Vec<WatchProvider>>;

    /// Certification of the first US release
    async fn certification(&self, tmdb_id: u64) -> AppResult<Option<String>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Ratings and credits keyed by IMDB id (OMDB)
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieRatings: Send + Sync {
    /// `Ok(None)` when the id is unknown or no key is configured
    async fn lookup(&self, imdb_id: &str) -> AppResult<Option<OmdbDetails>>;

    fn name(&self) -> &'static str;
}

/// Music video search (YouTube)
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait VideoSearch: Send + Sync {
    /// Hits in ranking order, possibly empty
    async fn search_music(&self, query: &MusicSearchQuery) -> AppResult<Vec<VideoHit>>;

    fn name(&self) -> &'static str;
}

/// Anime listings (Jikan / MyAnimeList)
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait AnimeCatalog: Send + Sync {
    async fn search(&self, query: &AnimeSearchQuery) -> AppResult<AnimePage>;

    async fn seasonal(&self, year: i32, season: Season) -> AppResult<AnimePage>;

    async fn top(&self, page: u32) -> AppResult<AnimePage>;

    fn name(&self) -> &'static str;
}

/// Turns a non-2xx response into an `ExternalApi` error carrying status and body
pub(crate) async fn ensure_success(
    response: reqwest::Response,
    provider: &str,
) -> AppResult<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(provider = %provider, status = %status, "Catalog request failed");

    Err(AppError::ExternalApi(format!(
        "{} API returned status {}: {}",
        provider, status, body
    )))
}
