use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::error::{AppError, AppResult};

pub const MIN_AGE: u8 = 1;
pub const MAX_AGE: u8 = 100;

/// Rejects ages outside the range a user can pick
pub fn validate_age(age: u32) -> AppResult<u8> {
    u8::try_from(age)
        .ok()
        .filter(|age| (MIN_AGE..=MAX_AGE).contains(age))
        .ok_or_else(|| {
            AppError::InvalidInput(format!(
                "Age must be between {} and {}, got {}",
                MIN_AGE, MAX_AGE, age
            ))
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    Happy,
    Sad,
    Energetic,
    Relaxed,
    Stressed,
    Bored,
    Adventurous,
}

impl Mood {
    pub const ALL: [Mood; 7] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Energetic,
        Mood::Relaxed,
        Mood::Stressed,
        Mood::Bored,
        Mood::Adventurous,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Sad => "Sad",
            Mood::Energetic => "Energetic",
            Mood::Relaxed => "Relaxed",
            Mood::Stressed => "Stressed",
            Mood::Bored => "Bored",
            Mood::Adventurous => "Adventurous",
        }
    }
}

impl Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeGroup {
    Kids,
    Teens,
    Adults,
}

impl AgeGroup {
    pub fn from_age(age: u8) -> Self {
        match age {
            0..=12 => AgeGroup::Kids,
            13..=19 => AgeGroup::Teens,
            _ => AgeGroup::Adults,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::Kids => "kids",
            AgeGroup::Teens => "teens",
            AgeGroup::Adults => "adults",
        }
    }
}

impl Display for AgeGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    English,
    Hindi,
    Tamil,
    Telugu,
    Kannada,
    Malayalam,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::English,
        Language::Hindi,
        Language::Tamil,
        Language::Telugu,
        Language::Kannada,
        Language::Malayalam,
    ];

    /// ISO-639-1 code used by TMDB and YouTube
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Tamil => "ta",
            Language::Telugu => "te",
            Language::Kannada => "kn",
            Language::Malayalam => "ml",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Tamil => "Tamil",
            Language::Telugu => "Telugu",
            Language::Kannada => "Kannada",
            Language::Malayalam => "Malayalam",
        }
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovieGenre {
    Action,
    Comedy,
    Drama,
    Family,
    Horror,
    Romance,
    #[serde(rename = "Science Fiction")]
    ScienceFiction,
    Animation,
}

impl MovieGenre {
    pub const ALL: [MovieGenre; 8] = [
        MovieGenre::Action,
        MovieGenre::Comedy,
        MovieGenre::Drama,
        MovieGenre::Family,
        MovieGenre::Horror,
        MovieGenre::Romance,
        MovieGenre::ScienceFiction,
        MovieGenre::Animation,
    ];

    pub fn tmdb_id(&self) -> u32 {
        match self {
            MovieGenre::Action => 28,
            MovieGenre::Comedy => 35,
            MovieGenre::Drama => 18,
            MovieGenre::Family => 10751,
            MovieGenre::Horror => 27,
            MovieGenre::Romance => 10749,
            MovieGenre::ScienceFiction => 878,
            MovieGenre::Animation => 16,
        }
    }

    pub fn from_tmdb_id(id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|genre| genre.tmdb_id() == id)
    }

    pub fn label(&self) -> &'static str {
        match self {
            MovieGenre::Action => "Action",
            MovieGenre::Comedy => "Comedy",
            MovieGenre::Drama => "Drama",
            MovieGenre::Family => "Family",
            MovieGenre::Horror => "Horror",
            MovieGenre::Romance => "Romance",
            MovieGenre::ScienceFiction => "Science Fiction",
            MovieGenre::Animation => "Animation",
        }
    }
}

impl Display for MovieGenre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimeGenre {
    Action,
    Adventure,
    Comedy,
    Drama,
    Fantasy,
    Romance,
    #[serde(rename = "Slice of Life")]
    SliceOfLife,
    Sports,
    Mystery,
    #[serde(rename = "Sci-Fi")]
    SciFi,
}

impl AnimeGenre {
    pub const ALL: [AnimeGenre; 10] = [
        AnimeGenre::Action,
        AnimeGenre::Adventure,
        AnimeGenre::Comedy,
        AnimeGenre::Drama,
        AnimeGenre::Fantasy,
        AnimeGenre::Romance,
        AnimeGenre::SliceOfLife,
        AnimeGenre::Sports,
        AnimeGenre::Mystery,
        AnimeGenre::SciFi,
    ];

    /// MyAnimeList genre id as used by Jikan
    pub fn jikan_id(&self) -> u32 {
        match self {
            AnimeGenre::Action => 1,
            AnimeGenre::Adventure => 2,
            AnimeGenre::Comedy => 4,
            AnimeGenre::Drama => 8,
            AnimeGenre::Fantasy => 10,
            AnimeGenre::Romance => 22,
            AnimeGenre::SliceOfLife => 36,
            AnimeGenre::Sports => 30,
            AnimeGenre::Mystery => 7,
            AnimeGenre::SciFi => 24,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnimeGenre::Action => "Action",
            AnimeGenre::Adventure => "Adventure",
            AnimeGenre::Comedy => "Comedy",
            AnimeGenre::Drama => "Drama",
            AnimeGenre::Fantasy => "Fantasy",
            AnimeGenre::Romance => "Romance",
            AnimeGenre::SliceOfLife => "Slice of Life",
            AnimeGenre::Sports => "Sports",
            AnimeGenre::Mystery => "Mystery",
            AnimeGenre::SciFi => "Sci-Fi",
        }
    }

    /// Parses a comma-separated list of genre labels (case-insensitive)
    pub fn parse_list(input: &str) -> AppResult<Vec<AnimeGenre>> {
        let mut genres = Vec::new();

        for raw in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let genre = Self::ALL
                .into_iter()
                .find(|g| g.label().eq_ignore_ascii_case(raw))
                .ok_or_else(|| AppError::InvalidInput(format!("Unknown anime genre: {}", raw)))?;

            if !genres.contains(&genre) {
                genres.push(genre);
            }
        }

        Ok(genres)
    }
}

/// MyAnimeList content rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimeRating {
    G,
    Pg,
    Pg13,
    R17,
    R,
}

impl AnimeRating {
    pub const ALL: [AnimeRating; 5] = [
        AnimeRating::G,
        AnimeRating::Pg,
        AnimeRating::Pg13,
        AnimeRating::R17,
        AnimeRating::R,
    ];

    pub fn for_age(age: u8) -> Self {
        match age {
            0..=6 => AnimeRating::G,
            7..=12 => AnimeRating::Pg,
            13..=16 => AnimeRating::Pg13,
            17 => AnimeRating::R17,
            _ => AnimeRating::R,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnimeRating::G => "g",
            AnimeRating::Pg => "pg",
            AnimeRating::Pg13 => "pg13",
            AnimeRating::R17 => "r17",
            AnimeRating::R => "r",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnimeRating::G => "G - All Ages",
            AnimeRating::Pg => "PG - Children",
            AnimeRating::Pg13 => "PG-13 - Teens 13 or older",
            AnimeRating::R17 => "R - 17+ (violence & profanity)",
            AnimeRating::R => "R+ - Mild Nudity",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RatingOption {
    pub value: AnimeRating,
    pub label: &'static str,
}

/// Every choice a front-end can offer, in display order
#[derive(Debug, Clone, Serialize)]
pub struct PreferenceOptions {
    pub moods: Vec<Mood>,
    pub languages: Vec<Language>,
    pub movie_genres: Vec<MovieGenre>,
    pub anime_genres: Vec<AnimeGenre>,
    pub anime_ratings: Vec<RatingOption>,
    pub seasons: Vec<Season>,
    pub min_age: u8,
    pub max_age: u8,
}

pub fn preference_options() -> PreferenceOptions {
    PreferenceOptions {
        moods: Mood::ALL.to_vec(),
        languages: Language::ALL.to_vec(),
        movie_genres: MovieGenre::ALL.to_vec(),
        anime_genres: AnimeGenre::ALL.to_vec(),
        anime_ratings: AnimeRating::ALL
            .into_iter()
            .map(|value| RatingOption {
                value,
                label: value.label(),
            })
            .collect(),
        seasons: vec![Season::Winter, Season::Spring, Season::Summer, Season::Fall],
        min_age: MIN_AGE,
        max_age: MAX_AGE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_group_boundaries() {
        assert_eq!(AgeGroup::from_age(1), AgeGroup::Kids);
        assert_eq!(AgeGroup::from_age(12), AgeGroup::Kids);
        assert_eq!(AgeGroup::from_age(13), AgeGroup::Teens);
        assert_eq!(AgeGroup::from_age(19), AgeGroup::Teens);
        assert_eq!(AgeGroup::from_age(20), AgeGroup::Adults);
        assert_eq!(AgeGroup::from_age(100), AgeGroup::Adults);
    }

    #[test]
    fn test_validate_age() {
        assert!(validate_age(0).is_err());
        assert_eq!(validate_age(1).unwrap(), 1);
        assert_eq!(validate_age(100).unwrap(), 100);
        assert!(validate_age(101).is_err());
        assert!(validate_age(300).is_err());
    }

    #[test]
    fn test_language_codes() {
        let codes: Vec<&str> = Language::ALL.iter().map(|l| l.code()).collect();
        assert_eq!(codes, vec!["en", "hi", "ta", "te", "kn", "ml"]);
    }

    #[test]
    fn test_movie_genre_ids_round_trip_through_lookup() {
        assert_eq!(MovieGenre::ScienceFiction.tmdb_id(), 878);
        assert_eq!(MovieGenre::from_tmdb_id(10751), Some(MovieGenre::Family));
        assert_eq!(MovieGenre::from_tmdb_id(99), None);
    }

    #[test]
    fn test_movie_genre_serde_name() {
        let genre: MovieGenre = serde_json::from_str(r#""Science Fiction""#).unwrap();
        assert_eq!(genre, MovieGenre::ScienceFiction);
    }

    #[test]
    fn test_anime_genre_parse_list() {
        let genres = AnimeGenre::parse_list("Action, sci-fi,,Slice of Life,Action").unwrap();
        assert_eq!(
            genres,
            vec![AnimeGenre::Action, AnimeGenre::SciFi, AnimeGenre::SliceOfLife]
        );
        assert_eq!(AnimeGenre::parse_list("").unwrap(), vec![]);
    }

    #[test]
    fn test_anime_genre_parse_list_unknown() {
        let result = AnimeGenre::parse_list("Action,Mecha");
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_anime_rating_for_age() {
        assert_eq!(AnimeRating::for_age(5), AnimeRating::G);
        assert_eq!(AnimeRating::for_age(10), AnimeRating::Pg);
        assert_eq!(AnimeRating::for_age(15), AnimeRating::Pg13);
        assert_eq!(AnimeRating::for_age(17), AnimeRating::R17);
        assert_eq!(AnimeRating::for_age(30), AnimeRating::R);
    }

    #[test]
    fn test_preference_options_lists_everything() {
        let options = preference_options();
        assert_eq!(options.moods.len(), 7);
        assert_eq!(options.languages.len(), 6);
        assert_eq!(options.movie_genres.len(), 8);
        assert_eq!(options.anime_genres.len(), 10);
        assert_eq!(options.anime_ratings[2].label, "PG-13 - Teens 13 or older");
    }
}
