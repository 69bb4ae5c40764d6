use serde::{Deserialize, Serialize};

use super::AnimeRating;

// ============================================================================
// Jikan API Types
// ============================================================================

/// Paged list response (search, seasons, top)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanListResponse {
    #[serde(default)]
    pub data: Vec<JikanAnime>,
    #[serde(default)]
    pub pagination: Option<JikanPagination>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanPagination {
    #[serde(default)]
    pub last_visible_page: u32,
    #[serde(default)]
    pub has_next_page: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanAnime {
    pub mal_id: i64,
    pub title: String,
    #[serde(default)]
    pub images: Option<JikanImages>,
    #[serde(default, rename = "type")]
    pub anime_type: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub episodes: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub aired: Option<JikanAired>,
    #[serde(default)]
    pub duration: Option<String>,
    /// Full rating text, e.g. "PG-13 - Teens 13 or older"
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(default)]
    pub popularity: Option<u32>,
    #[serde(default)]
    pub members: Option<u64>,
    #[serde(default)]
    pub favorites: Option<u64>,
    #[serde(default)]
    pub synopsis: Option<String>,
    #[serde(default)]
    pub studios: Vec<JikanNamed>,
    #[serde(default)]
    pub genres: Vec<JikanNamed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanImages {
    #[serde(default)]
    pub jpg: Option<JikanImageSet>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanImageSet {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub large_image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanAired {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanNamed {
    pub mal_id: i64,
    pub name: String,
}

/// One page of anime from any Jikan listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimePage {
    pub anime: Vec<JikanAnime>,
    pub has_next_page: bool,
}

impl From<JikanListResponse> for AnimePage {
    fn from(response: JikanListResponse) -> Self {
        AnimePage {
            has_next_page: response
                .pagination
                .map(|p| p.has_next_page)
                .unwrap_or(false),
            anime: response.data,
        }
    }
}

// ============================================================================
// Anime card returned to the client
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnimeCard {
    pub mal_id: i64,
    pub title: String,
    pub image_url: Option<String>,
    pub score: Option<f64>,
    pub rating: Option<String>,
    pub rank: Option<u32>,
    pub genres: Vec<String>,
    pub status: Option<String>,
    pub media_type: Option<String>,
    pub studios: Vec<String>,
    pub aired_from: Option<String>,
    pub aired_to: Option<String>,
    pub episodes: Option<u32>,
    pub duration: Option<String>,
    pub source: Option<String>,
    pub popularity: Option<u32>,
    pub members: Option<u64>,
    pub favorites: Option<u64>,
    pub synopsis: Option<String>,
}

fn media_type_label(raw: &str) -> String {
    match raw {
        "TV" => "TV Series".to_string(),
        other => other.to_string(),
    }
}

fn status_label(raw: &str) -> String {
    match raw {
        "Not yet aired" => "Not Yet Aired".to_string(),
        other => other.to_string(),
    }
}

fn source_label(raw: &str) -> String {
    match raw {
        "Light novel" => "Light Novel".to_string(),
        "Visual novel" => "Visual Novel".to_string(),
        "Card game" => "Card Game".to_string(),
        "Picture book" => "Picture Book".to_string(),
        other => other.to_string(),
    }
}

impl From<JikanAnime> for AnimeCard {
    fn from(anime: JikanAnime) -> Self {
        let image_url = anime
            .images
            .and_then(|images| images.jpg)
            .and_then(|jpg| jpg.large_image_url.or(jpg.image_url));
        let (aired_from, aired_to) = anime
            .aired
            .map(|aired| (aired.from, aired.to))
            .unwrap_or((None, None));

        AnimeCard {
            mal_id: anime.mal_id,
            title: anime.title,
            image_url,
            score: anime.score,
            rating: anime.rating,
            rank: anime.rank,
            genres: anime.genres.into_iter().map(|g| g.name).collect(),
            status: anime.status.as_deref().map(status_label),
            media_type: anime.anime_type.as_deref().map(media_type_label),
            studios: anime.studios.into_iter().map(|s| s.name).collect(),
            aired_from,
            aired_to,
            episodes: anime.episodes,
            duration: anime.duration,
            source: anime.source.as_deref().map(source_label),
            popularity: anime.popularity,
            members: anime.members,
            favorites: anime.favorites,
            synopsis: anime.synopsis,
        }
    }
}

/// Answer to an anime request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimeRecommendations {
    pub page: u32,
    pub rating: Option<AnimeRating>,
    pub anime: Vec<AnimeCard>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "pagination": {"last_visible_page": 40, "has_next_page": true},
        "data": [{
            "mal_id": 5114,
            "title": "Fullmetal Alchemist: Brotherhood",
            "images": {"jpg": {
                "image_url": "https://cdn.myanimelist.net/images/anime/1208/94745.jpg",
                "large_image_url": "https://cdn.myanimelist.net/images/anime/1208/94745l.jpg"
            }},
            "type": "TV",
            "source": "Manga",
            "episodes": 64,
            "status": "Finished Airing",
            "aired": {"from": "2009-04-05T00:00:00+00:00", "to": "2010-07-04T00:00:00+00:00"},
            "duration": "24 min per ep",
            "rating": "R - 17+ (violence & profanity)",
            "score": 9.1,
            "rank": 1,
            "popularity": 3,
            "members": 3400000,
            "favorites": 230000,
            "synopsis": "Two brothers search for the Philosopher's Stone.",
            "studios": [{"mal_id": 4, "name": "Bones"}],
            "genres": [{"mal_id": 1, "name": "Action"}, {"mal_id": 10, "name": "Fantasy"}]
        }]
    }"#;

    #[test]
    fn test_list_response_into_page() {
        let response: JikanListResponse = serde_json::from_str(SAMPLE).unwrap();
        let page = AnimePage::from(response);

        assert!(page.has_next_page);
        assert_eq!(page.anime.len(), 1);
        assert_eq!(page.anime[0].mal_id, 5114);
    }

    #[test]
    fn test_anime_card_labels() {
        let response: JikanListResponse = serde_json::from_str(SAMPLE).unwrap();
        let card = AnimeCard::from(response.data.into_iter().next().unwrap());

        assert_eq!(card.media_type.as_deref(), Some("TV Series"));
        assert_eq!(card.status.as_deref(), Some("Finished Airing"));
        assert_eq!(card.studios, vec!["Bones".to_string()]);
        assert_eq!(card.genres, vec!["Action".to_string(), "Fantasy".to_string()]);
        assert_eq!(
            card.image_url.as_deref(),
            Some("https://cdn.myanimelist.net/images/anime/1208/94745l.jpg")
        );
        assert_eq!(card.aired_from.as_deref(), Some("2009-04-05T00:00:00+00:00"));
    }

    #[test]
    fn test_source_label() {
        assert_eq!(source_label("Light novel"), "Light Novel");
        assert_eq!(source_label("Original"), "Original");
    }

    #[test]
    fn test_minimal_anime_without_pagination() {
        let json = r#"{"data": [{"mal_id": 1, "title": "Cowboy Bebop"}]}"#;
        let page = AnimePage::from(serde_json::from_str::<JikanListResponse>(json).unwrap());
        assert!(!page.has_next_page);

        let card = AnimeCard::from(page.anime[0].clone());
        assert_eq!(card.image_url, None);
        assert!(card.genres.is_empty());
    }
}
