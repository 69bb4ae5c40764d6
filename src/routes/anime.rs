use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{AnimeGenre, AnimeRating, AnimeRecommendations, Season},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct AnimeParams {
    /// Comma-separated genre labels, e.g. `Action,Sci-Fi`
    #[serde(default)]
    genres: String,
    rating: Option<AnimeRating>,
    age: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SeasonalParams {
    season: Season,
    year: i32,
}

#[derive(Debug, Deserialize)]
pub struct TopParams {
    #[serde(default = "first_page")]
    page: u32,
}

fn first_page() -> u32 {
    1
}

pub async fn recommend(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<AnimeParams>,
) -> AppResult<Json<AnimeRecommendations>> {
    let genres = AnimeGenre::parse_list(&params.genres)?;
    let recommendations = state
        .anime
        .recommend(&state.sessions, id, genres, params.rating, params.age)
        .await?;
    Ok(Json(recommendations))
}

pub async fn seasonal(
    State(state): State<AppState>,
    Query(params): Query<SeasonalParams>,
) -> AppResult<Json<AnimeRecommendations>> {
    let listing = state.anime.seasonal(params.season, params.year).await?;
    Ok(Json(listing))
}

pub async fn top(
    State(state): State<AppState>,
    Query(params): Query<TopParams>,
) -> AppResult<Json<AnimeRecommendations>> {
    let listing = state.anime.top(params.page).await?;
    Ok(Json(listing))
}
