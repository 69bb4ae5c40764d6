//! Translation of user preferences into catalog query parameters.

use crate::models::{AnimeGenre, AnimeRating, Language, MovieGenre};

/// Age at or below which only animated, G-rated movies are recommended
pub const KIDS_MOVIE_MAX_AGE: u8 = 10;
pub const ANIMATION_GENRE_ID: u32 = 16;
pub const KIDS_NOTICE: &str = "Showing animated movies suitable for kids!";

pub const MUSIC_CATEGORY_ID: &str = "10";
pub const MUSIC_MAX_RESULTS: u32 = 5;
pub const ANIME_PAGE_SIZE: u32 = 20;

/// US certification ceiling for an age
#[derive(Debug, Clone, PartialEq)]
pub struct CertificationParams {
    pub certification_country: &'static str,
    pub certification_lte: &'static str,
    pub include_adult: bool,
}

impl CertificationParams {
    pub fn for_age(age: u8) -> Self {
        let (certification_lte, include_adult) = match age {
            0..=10 => ("G", false),
            11..=13 => ("PG", false),
            14..=16 => ("PG-13", false),
            _ => ("R", true),
        };

        Self {
            certification_country: "US",
            certification_lte,
            include_adult,
        }
    }
}

/// Parameters for TMDB GET /discover/movie
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverQuery {
    pub genre_id: u32,
    pub language: Language,
    pub page: u32,
    pub sort_by: &'static str,
    pub vote_count_gte: u32,
    pub vote_average_gte: f32,
    pub certification_country: &'static str,
    /// Only sent for certification-rated markets (English, Hindi)
    pub certification_lte: Option<&'static str>,
    pub animation_only: bool,
}

impl DiscoverQuery {
    pub fn for_preferences(genre: MovieGenre, age: u8, language: Language, page: u32) -> Self {
        let animation_only = age <= KIDS_MOVIE_MAX_AGE;
        let genre_id = if animation_only {
            ANIMATION_GENRE_ID
        } else {
            genre.tmdb_id()
        };

        match language {
            Language::English | Language::Hindi => Self {
                genre_id,
                language,
                page,
                sort_by: "popularity.desc",
                vote_count_gte: 100,
                vote_average_gte: 5.0,
                certification_country: "US",
                certification_lte: Some(CertificationParams::for_age(age).certification_lte),
                animation_only,
            },
            _ => Self {
                genre_id,
                language,
                page,
                sort_by: "release_date.desc",
                vote_count_gte: 20,
                vote_average_gte: 3.0,
                certification_country: "IN",
                certification_lte: None,
                animation_only,
            },
        }
    }

    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    pub fn notice(&self) -> Option<&'static str> {
        self.animation_only.then_some(KIDS_NOTICE)
    }

    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let code = self.language.code();
        let mut params = vec![
            ("with_genres", self.genre_id.to_string()),
            ("with_original_language", code.to_string()),
            ("language", format!("{}-{}", code, code.to_uppercase())),
            ("sort_by", self.sort_by.to_string()),
            ("page", self.page.to_string()),
            ("include_adult", "false".to_string()),
            ("include_video", "false".to_string()),
            ("vote_count.gte", self.vote_count_gte.to_string()),
            ("vote_average.gte", format!("{:.1}", self.vote_average_gte)),
            ("certification_country", self.certification_country.to_string()),
        ];

        if let Some(cert) = self.certification_lte {
            params.push(("certification.lte", cert.to_string()));
        }

        params
    }
}

/// Parameters for YouTube GET /search restricted to embeddable music videos
#[derive(Debug, Clone, PartialEq)]
pub struct MusicSearchQuery {
    pub query: String,
    /// Omitted for English and for the unfiltered retry
    pub relevance_language: Option<&'static str>,
}

impl MusicSearchQuery {
    pub fn new(query: impl Into<String>, language: Language) -> Self {
        let relevance_language = match language {
            Language::English => None,
            other => Some(other.code()),
        };

        Self {
            query: query.into(),
            relevance_language,
        }
    }

    pub fn without_language(&self) -> Self {
        Self {
            query: self.query.clone(),
            relevance_language: None,
        }
    }

    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("part", "snippet".to_string()),
            ("q", self.query.clone()),
            ("maxResults", MUSIC_MAX_RESULTS.to_string()),
            ("type", "video".to_string()),
            ("videoCategoryId", MUSIC_CATEGORY_ID.to_string()),
            ("videoDuration", "medium".to_string()),
            ("videoEmbeddable", "true".to_string()),
            ("videoSyndicated", "true".to_string()),
        ];

        if let Some(code) = self.relevance_language {
            params.push(("relevanceLanguage", code.to_string()));
        }

        params
    }
}

/// Parameters for Jikan GET /anime
#[derive(Debug, Clone, PartialEq)]
pub struct AnimeSearchQuery {
    pub genres: Vec<AnimeGenre>,
    pub rating: AnimeRating,
    pub page: u32,
}

impl AnimeSearchQuery {
    pub fn new(genres: Vec<AnimeGenre>, rating: AnimeRating, page: u32) -> Self {
        Self {
            genres,
            rating,
            page,
        }
    }

    /// Stable key identifying the query regardless of page, e.g. `1,24|pg13`
    pub fn cursor_key(&self) -> String {
        format!("{}|{}", self.genre_ids(), self.rating.as_str())
    }

    fn genre_ids(&self) -> String {
        self.genres
            .iter()
            .map(|g| g.jikan_id().to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if !self.genres.is_empty() {
            params.push(("genres", self.genre_ids()));
        }

        params.extend([
            ("rating", self.rating.as_str().to_string()),
            ("page", self.page.to_string()),
            ("limit", ANIME_PAGE_SIZE.to_string()),
            ("sfw", "true".to_string()),
        ]);

        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param<'a>(params: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_certification_by_age() {
        assert_eq!(CertificationParams::for_age(5).certification_lte, "G");
        assert_eq!(CertificationParams::for_age(10).certification_lte, "G");
        assert_eq!(CertificationParams::for_age(11).certification_lte, "PG");
        assert_eq!(CertificationParams::for_age(13).certification_lte, "PG");
        assert_eq!(CertificationParams::for_age(16).certification_lte, "PG-13");
        assert_eq!(CertificationParams::for_age(17).certification_lte, "R");
        assert!(!CertificationParams::for_age(16).include_adult);
        assert!(CertificationParams::for_age(17).include_adult);
    }

    #[test]
    fn test_discover_english_adult() {
        let query = DiscoverQuery::for_preferences(MovieGenre::Action, 30, Language::English, 3);
        let params = query.to_params();

        assert_eq!(param(&params, "with_genres"), Some("28"));
        assert_eq!(param(&params, "with_original_language"), Some("en"));
        assert_eq!(param(&params, "language"), Some("en-EN"));
        assert_eq!(param(&params, "sort_by"), Some("popularity.desc"));
        assert_eq!(param(&params, "page"), Some("3"));
        assert_eq!(param(&params, "include_adult"), Some("false"));
        assert_eq!(param(&params, "vote_count.gte"), Some("100"));
        assert_eq!(param(&params, "vote_average.gte"), Some("5.0"));
        assert_eq!(param(&params, "certification_country"), Some("US"));
        assert_eq!(param(&params, "certification.lte"), Some("R"));
        assert_eq!(query.notice(), None);
    }

    #[test]
    fn test_discover_regional_language() {
        let query = DiscoverQuery::for_preferences(MovieGenre::Drama, 15, Language::Tamil, 1);
        let params = query.to_params();

        assert_eq!(param(&params, "with_genres"), Some("18"));
        assert_eq!(param(&params, "language"), Some("ta-TA"));
        assert_eq!(param(&params, "sort_by"), Some("release_date.desc"));
        assert_eq!(param(&params, "vote_count.gte"), Some("20"));
        assert_eq!(param(&params, "vote_average.gte"), Some("3.0"));
        assert_eq!(param(&params, "certification_country"), Some("IN"));
        assert_eq!(param(&params, "certification.lte"), None);
    }

    #[test]
    fn test_discover_kids_forces_animation() {
        let query = DiscoverQuery::for_preferences(MovieGenre::Horror, 8, Language::Hindi, 1);
        let params = query.to_params();

        assert_eq!(param(&params, "with_genres"), Some("16"));
        assert_eq!(param(&params, "certification.lte"), Some("G"));
        assert_eq!(query.notice(), Some(KIDS_NOTICE));
    }

    #[test]
    fn test_discover_with_page_keeps_filters() {
        let query = DiscoverQuery::for_preferences(MovieGenre::Comedy, 20, Language::English, 9);
        let first = query.with_page(1);
        assert_eq!(first.page, 1);
        assert_eq!(first.genre_id, query.genre_id);
        assert_eq!(first.certification_lte, query.certification_lte);
    }

    #[test]
    fn test_music_query_english_has_no_language_filter() {
        let params = MusicSearchQuery::new("feel good pop hits", Language::English).to_params();

        assert_eq!(param(&params, "q"), Some("feel good pop hits"));
        assert_eq!(param(&params, "maxResults"), Some("5"));
        assert_eq!(param(&params, "videoCategoryId"), Some("10"));
        assert_eq!(param(&params, "videoEmbeddable"), Some("true"));
        assert_eq!(param(&params, "relevanceLanguage"), None);
    }

    #[test]
    fn test_music_query_regional_language() {
        let query = MusicSearchQuery::new("telugu melody songs", Language::Telugu);
        assert_eq!(
            param(&query.to_params(), "relevanceLanguage"),
            Some("te")
        );
        assert_eq!(
            param(&query.without_language().to_params(), "relevanceLanguage"),
            None
        );
    }

    #[test]
    fn test_anime_query_params() {
        let query = AnimeSearchQuery::new(
            vec![AnimeGenre::Action, AnimeGenre::SciFi],
            AnimeRating::Pg13,
            2,
        );
        let params = query.to_params();

        assert_eq!(param(&params, "genres"), Some("1,24"));
        assert_eq!(param(&params, "rating"), Some("pg13"));
        assert_eq!(param(&params, "page"), Some("2"));
        assert_eq!(param(&params, "limit"), Some("20"));
        assert_eq!(param(&params, "sfw"), Some("true"));
        assert_eq!(query.cursor_key(), "1,24|pg13");
    }

    #[test]
    fn test_anime_query_without_genres() {
        let params = AnimeSearchQuery::new(vec![], AnimeRating::G, 1).to_params();
        assert_eq!(param(&params, "genres"), None);
        assert_eq!(param(&params, "rating"), Some("g"));
    }
}
