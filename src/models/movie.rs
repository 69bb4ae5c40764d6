use serde::{Deserialize, Serialize};

pub const TMDB_POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
pub const TMDB_LOGO_BASE_URL: &str = "https://image.tmdb.org/t/p/original";

// ============================================================================
// TMDB API Types
// ============================================================================

/// Raw page from GET /discover/movie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbDiscoverPage {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "first_page")]
    pub total_pages: u32,
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
}

fn first_page() -> u32 {
    1
}

/// Movie entry in a discover page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbMovie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbGenre {
    pub id: u32,
    pub name: String,
}

/// Response from GET /movie/{id}
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbMovieDetails {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u64>,
}

/// Response from GET /movie/{id}/alternative_titles
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbAlternativeTitles {
    #[serde(default)]
    pub titles: Vec<AlternativeTitle>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlternativeTitle {
    pub iso_3166_1: String,
    pub title: String,
    #[serde(default, rename = "type")]
    pub title_type: Option<String>,
}

/// Response from GET /movie/{id}/watch/providers, keyed by country code
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbWatchProviders {
    #[serde(default)]
    pub results: std::collections::HashMap<String, TmdbCountryProviders>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbCountryProviders {
    #[serde(default)]
    pub flatrate: Vec<WatchProvider>,
    #[serde(default)]
    pub free: Vec<WatchProvider>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchProvider {
    pub provider_id: u64,
    pub provider_name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
}

impl WatchProvider {
    pub fn logo_url(&self) -> Option<String> {
        self.logo_path
            .as_ref()
            .map(|path| format!("{}{}", TMDB_LOGO_BASE_URL, path))
    }
}

/// Response from GET /movie/{id}/release_dates
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbReleaseDates {
    #[serde(default)]
    pub results: Vec<TmdbCountryReleases>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCountryReleases {
    pub iso_3166_1: String,
    #[serde(default)]
    pub release_dates: Vec<TmdbReleaseDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbReleaseDate {
    #[serde(default)]
    pub certification: String,
}

impl TmdbReleaseDates {
    /// Certification of the first US release, if TMDB lists one
    pub fn us_certification(&self) -> Option<String> {
        self.results
            .iter()
            .find(|r| r.iso_3166_1 == "US")
            .and_then(|us| us.release_dates.first())
            .map(|release| release.certification.clone())
            .filter(|cert| !cert.is_empty())
    }
}

// ============================================================================
// OMDB API Types
// ============================================================================

/// Raw response from GET /?i={imdb_id}
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbResponse {
    pub response: String,
    #[serde(default, rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    #[serde(default, rename = "imdbVotes")]
    pub imdb_votes: Option<String>,
    #[serde(default)]
    pub metascore: Option<String>,
    #[serde(default)]
    pub runtime: Option<String>,
    #[serde(default)]
    pub rated: Option<String>,
    #[serde(default)]
    pub awards: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub actors: Option<String>,
    #[serde(default)]
    pub plot: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub box_office: Option<String>,
}

/// OMDB details with "N/A" placeholders removed
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OmdbDetails {
    pub imdb_rating: Option<String>,
    pub imdb_votes: Option<String>,
    pub metascore: Option<String>,
    pub runtime: Option<String>,
    pub rated: Option<String>,
    pub awards: Option<String>,
    pub director: Option<String>,
    pub actors: Option<String>,
    pub plot: Option<String>,
    pub genre: Option<String>,
    pub year: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub box_office: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| {
        let v = v.trim();
        !v.is_empty() && v != "N/A"
    })
}

impl OmdbResponse {
    /// OMDB answers 200 with `"Response": "False"` for unknown ids
    pub fn into_details(self) -> Option<OmdbDetails> {
        if self.response != "True" {
            return None;
        }

        Some(OmdbDetails {
            imdb_rating: present(self.imdb_rating),
            imdb_votes: present(self.imdb_votes),
            metascore: present(self.metascore),
            runtime: present(self.runtime),
            rated: present(self.rated),
            awards: present(self.awards),
            director: present(self.director),
            actors: present(self.actors),
            plot: present(self.plot),
            genre: present(self.genre),
            year: present(self.year),
            country: present(self.country),
            language: present(self.language),
            box_office: present(self.box_office),
        })
    }
}

// ============================================================================
// Merged records returned to the client
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum RatingSource {
    Imdb,
    Tmdb,
}

/// The rating to show first: IMDb when OMDB has one, TMDB otherwise
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeadlineRating {
    pub source: RatingSource,
    pub score: Option<f64>,
    pub votes: Option<String>,
}

impl HeadlineRating {
    pub fn pick(
        omdb: Option<&OmdbDetails>,
        tmdb_average: Option<f64>,
        tmdb_votes: Option<u64>,
    ) -> Self {
        let imdb_score = omdb
            .and_then(|d| d.imdb_rating.as_deref())
            .and_then(|r| r.parse::<f64>().ok());

        match imdb_score {
            Some(score) => HeadlineRating {
                source: RatingSource::Imdb,
                score: Some(score),
                votes: omdb.and_then(|d| d.imdb_votes.clone()),
            },
            None => HeadlineRating {
                source: RatingSource::Tmdb,
                score: tmdb_average,
                votes: tmdb_votes.map(|v| v.to_string()),
            },
        }
    }
}

/// A discovered movie enriched with TMDB details and OMDB ratings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieRecommendation {
    pub tmdb_id: u64,
    pub imdb_id: Option<String>,
    pub title: String,
    /// Present only when it differs from `title`
    pub original_title: Option<String>,
    pub original_language: Option<String>,
    pub overview: Option<String>,
    /// OMDB full plot when available, TMDB overview otherwise
    pub plot: Option<String>,
    pub poster_url: Option<String>,
    pub release_date: Option<String>,
    pub genre_names: Vec<String>,
    pub tmdb_vote_average: Option<f64>,
    pub tmdb_vote_count: Option<u64>,
    pub rating: HeadlineRating,
    pub alternative_titles: Vec<AlternativeTitle>,
    pub omdb: Option<OmdbDetails>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamingOption {
    pub provider_id: u64,
    pub provider_name: String,
    pub logo_url: Option<String>,
}

impl From<WatchProvider> for StreamingOption {
    fn from(provider: WatchProvider) -> Self {
        let logo_url = provider.logo_url();
        StreamingOption {
            provider_id: provider.provider_id,
            provider_name: provider.provider_name,
            logo_url,
        }
    }
}

/// Full detail card for one movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    pub tmdb_id: u64,
    pub imdb_id: Option<String>,
    pub title: String,
    pub overview: Option<String>,
    pub poster_url: Option<String>,
    pub genre_names: Vec<String>,
    pub rating: HeadlineRating,
    pub year: Option<String>,
    pub runtime: Option<String>,
    /// US certification, "N/A" when TMDB has none
    pub certification: String,
    pub streaming_providers: Vec<StreamingOption>,
    pub omdb: Option<OmdbDetails>,
}

/// Answer to a movie recommendation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieRecommendations {
    pub page: u32,
    pub movies: Vec<MovieRecommendation>,
    pub notices: Vec<String>,
}

pub fn poster_url(poster_path: Option<&str>) -> Option<String> {
    poster_path.map(|path| format!("{}{}", TMDB_POSTER_BASE_URL, path))
}
