use std::sync::Arc;

use chrono::{Datelike, Utc};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        validate_age, AnimeCard, AnimeGenre, AnimePage, AnimeRating, AnimeRecommendations, Season,
    },
    services::{providers::AnimeCatalog, query_builder::AnimeSearchQuery, sessions::SessionStore},
};

pub const NO_RECOMMENDATIONS: &str = "No recommendations found. Try selecting different genres.";
pub const NO_SEASONAL_ANIME: &str = "No seasonal anime found for the selected season and year.";
pub const NO_TOP_ANIME: &str = "No popular anime found.";
pub const FIRST_SEASON_YEAR: i32 = 2000;

/// Anime by genre and rating, plus seasonal and top listings
#[derive(Clone)]
pub struct AnimeRecommender {
    catalog: Arc<dyn AnimeCatalog>,
}

impl AnimeRecommender {
    pub fn new(catalog: Arc<dyn AnimeCatalog>) -> Self {
        Self { catalog }
    }

    /// Next unseen anime for the genres and rating
    ///
    /// An explicit `rating` wins; otherwise it is derived from `age`.
    pub async fn recommend(
        &self,
        sessions: &SessionStore,
        session_id: Uuid,
        genres: Vec<AnimeGenre>,
        rating: Option<AnimeRating>,
        age: Option<u32>,
    ) -> AppResult<AnimeRecommendations> {
        let rating = match (rating, age) {
            (Some(rating), _) => rating,
            (None, Some(age)) => AnimeRating::for_age(validate_age(age)?),
            (None, None) => {
                return Err(AppError::InvalidInput(
                    "Either rating or age is required".to_string(),
                ))
            }
        };

        let mut query = AnimeSearchQuery::new(genres, rating, 1);
        let cursor_key = query.cursor_key();

        let (page, mut seen) = sessions
            .with_session(session_id, |session| {
                let page = session.anime.page_for(&cursor_key);
                session.anime.pages.insert(cursor_key.clone(), page + 1);
                (page, session.anime.shown.snapshot())
            })
            .await?;
        query.page = page;

        let result = self.catalog.search(&query).await?;

        if !result.has_next_page {
            // Wrap around so the next request starts from the first page again
            sessions
                .with_session(session_id, |session| {
                    session.anime.pages.insert(cursor_key.clone(), 1);
                })
                .await?;
        }

        let anime: Vec<AnimeCard> = result
            .anime
            .into_iter()
            .filter(|entry| seen.insert(entry.mal_id))
            .map(AnimeCard::from)
            .collect();

        sessions
            .with_session(session_id, |session| {
                session.anime.shown.extend(anime.iter().map(|card| card.mal_id))
            })
            .await?;

        if anime.is_empty() {
            return Err(AppError::NotFound(NO_RECOMMENDATIONS.to_string()));
        }

        tracing::info!(
            session_id = %session_id,
            cursor = %cursor_key,
            page,
            returned = anime.len(),
            "Anime recommended"
        );

        Ok(AnimeRecommendations {
            page,
            rating: Some(rating),
            anime,
        })
    }

    pub async fn seasonal(&self, season: Season, year: i32) -> AppResult<AnimeRecommendations> {
        let current_year = Utc::now().year();
        if !(FIRST_SEASON_YEAR..=current_year).contains(&year) {
            return Err(AppError::InvalidInput(format!(
                "Year must be between {} and {}",
                FIRST_SEASON_YEAR, current_year
            )));
        }

        let page = self.catalog.seasonal(year, season).await?;
        listing(page, 1, NO_SEASONAL_ANIME)
    }

    pub async fn top(&self, page: u32) -> AppResult<AnimeRecommendations> {
        if page == 0 {
            return Err(AppError::InvalidInput("Page must be at least 1".to_string()));
        }

        let result = self.catalog.top(page).await?;
        listing(result, page, NO_TOP_ANIME)
    }
}

fn listing(page: AnimePage, number: u32, empty_message: &str) -> AppResult<AnimeRecommendations> {
    if page.anime.is_empty() {
        return Err(AppError::NotFound(empty_message.to_string()));
    }

    Ok(AnimeRecommendations {
        page: number,
        rating: None,
        anime: page.anime.into_iter().map(AnimeCard::from).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JikanAnime;
    use crate::services::providers::MockAnimeCatalog;
    use mockall::predicate::{eq, function};

    fn jikan(mal_id: i64) -> JikanAnime {
        serde_json::from_value(serde_json::json!({
            "mal_id": mal_id,
            "title": format!("Anime {}", mal_id),
            "type": "TV",
            "status": "Finished Airing",
            "score": 8.1
        }))
        .unwrap()
    }

    fn anime_page(ids: &[i64], has_next_page: bool) -> AnimePage {
        AnimePage {
            anime: ids.iter().copied().map(jikan).collect(),
            has_next_page,
        }
    }

    async fn session() -> (SessionStore, Uuid) {
        let store = SessionStore::new();
        let id = store.create().await;
        (store, id)
    }

    #[tokio::test]
    async fn test_recommend_pages_and_skips_shown() {
        let mut catalog = MockAnimeCatalog::new();
        catalog
            .expect_search()
            .with(function(|q: &AnimeSearchQuery| q.page == 1))
            .times(1)
            .returning(|_| Ok(anime_page(&[1, 2, 2], true)));
        catalog
            .expect_search()
            .with(function(|q: &AnimeSearchQuery| q.page == 2))
            .times(1)
            .returning(|_| Ok(anime_page(&[2, 3], true)));

        let recommender = AnimeRecommender::new(Arc::new(catalog));
        let (store, id) = session().await;

        let first = recommender
            .recommend(&store, id, vec![AnimeGenre::Action], Some(AnimeRating::Pg13), None)
            .await
            .unwrap();
        let ids: Vec<i64> = first.anime.iter().map(|a| a.mal_id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(first.page, 1);
        assert_eq!(first.anime[0].media_type.as_deref(), Some("TV Series"));

        let second = recommender
            .recommend(&store, id, vec![AnimeGenre::Action], Some(AnimeRating::Pg13), None)
            .await
            .unwrap();
        let ids: Vec<i64> = second.anime.iter().map(|a| a.mal_id).collect();
        assert_eq!(ids, vec![3]);
        assert_eq!(second.page, 2);
    }

    #[tokio::test]
    async fn test_rating_derived_from_age() {
        let mut catalog = MockAnimeCatalog::new();
        catalog
            .expect_search()
            .with(function(|q: &AnimeSearchQuery| q.rating == AnimeRating::Pg))
            .returning(|_| Ok(anime_page(&[10], false)));

        let recommender = AnimeRecommender::new(Arc::new(catalog));
        let (store, id) = session().await;

        let result = recommender
            .recommend(&store, id, vec![AnimeGenre::Comedy], None, Some(9))
            .await
            .unwrap();
        assert_eq!(result.rating, Some(AnimeRating::Pg));

        // Last page reached, so the cursor wraps back to the first page
        let page = store
            .with_session(id, |s| s.anime.page_for("4|pg"))
            .await
            .unwrap();
        assert_eq!(page, 1);
    }

    #[tokio::test]
    async fn test_missing_rating_and_age_is_invalid() {
        let recommender = AnimeRecommender::new(Arc::new(MockAnimeCatalog::new()));
        let (store, id) = session().await;

        let result = recommender
            .recommend(&store, id, vec![AnimeGenre::Drama], None, None)
            .await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_everything_shown_is_not_found() {
        let mut catalog = MockAnimeCatalog::new();
        catalog
            .expect_search()
            .returning(|_| Ok(anime_page(&[5114], true)));

        let recommender = AnimeRecommender::new(Arc::new(catalog));
        let (store, id) = session().await;
        store
            .with_session(id, |s| {
                s.anime.shown.record(5114);
            })
            .await
            .unwrap();

        let result = recommender
            .recommend(&store, id, vec![], Some(AnimeRating::R), None)
            .await;

        match result {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, NO_RECOMMENDATIONS),
            other => panic!("expected not found, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_seasonal_year_bounds() {
        let mut catalog = MockAnimeCatalog::new();
        catalog
            .expect_seasonal()
            .with(eq(2023), eq(Season::Fall))
            .returning(|_, _| Ok(anime_page(&[1, 2], false)));

        let recommender = AnimeRecommender::new(Arc::new(catalog));

        let result = recommender.seasonal(Season::Fall, 2023).await.unwrap();
        assert_eq!(result.anime.len(), 2);
        assert_eq!(result.rating, None);

        let too_early = recommender.seasonal(Season::Fall, 1999).await;
        assert!(matches!(too_early, Err(AppError::InvalidInput(_))));

        let future = recommender
            .seasonal(Season::Winter, Utc::now().year() + 1)
            .await;
        assert!(matches!(future, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_empty_seasonal_is_not_found() {
        let mut catalog = MockAnimeCatalog::new();
        catalog
            .expect_seasonal()
            .returning(|_, _| Ok(anime_page(&[], false)));

        let recommender = AnimeRecommender::new(Arc::new(catalog));
        let result = recommender.seasonal(Season::Spring, 2005).await;

        match result {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, NO_SEASONAL_ANIME),
            other => panic!("expected not found, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_top_anime() {
        let mut catalog = MockAnimeCatalog::new();
        catalog
            .expect_top()
            .with(eq(2))
            .returning(|_| Ok(anime_page(&[5114, 9253], true)));

        let recommender = AnimeRecommender::new(Arc::new(catalog));

        let result = recommender.top(2).await.unwrap();
        assert_eq!(result.page, 2);
        assert_eq!(result.anime[0].mal_id, 5114);

        assert!(matches!(
            recommender.top(0).await,
            Err(AppError::InvalidInput(_))
        ));
    }
}
