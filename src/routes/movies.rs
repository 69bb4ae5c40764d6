use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Language, MovieDetails, MovieGenre, MovieRecommendations},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct MovieParams {
    genre: MovieGenre,
    age: u32,
    language: Language,
}

pub async fn recommend(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<MovieParams>,
) -> AppResult<Json<MovieRecommendations>> {
    let recommendations = state
        .movies
        .recommend(&state.sessions, id, params.genre, params.age, params.language)
        .await?;
    Ok(Json(recommendations))
}

pub async fn details(
    State(state): State<AppState>,
    Path((id, tmdb_id)): Path<(Uuid, u64)>,
) -> AppResult<Json<MovieDetails>> {
    let details = state.movies.details(&state.sessions, id, tmdb_id).await?;
    Ok(Json(details))
}
