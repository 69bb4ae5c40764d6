use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Language, Mood, MusicRecommendation},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct MusicParams {
    mood: Mood,
    age: u32,
    #[serde(default = "default_language")]
    language: Language,
}

fn default_language() -> Language {
    Language::English
}

/// Handler for the next music video of a session
pub async fn recommend(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<MusicParams>,
) -> AppResult<Json<MusicRecommendation>> {
    let recommendation = state
        .music
        .recommend(&state.sessions, id, params.mood, params.age, params.language)
        .await?;
    Ok(Json(recommendation))
}
