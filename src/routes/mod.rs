use axum::{
    http::StatusCode,
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::{make_span_with_request_id, request_id_middleware},
    models::{preference_options, PreferenceOptions},
    services::{AnimeRecommender, MovieRecommender, MusicRecommender, SessionStore},
};

pub mod anime;
pub mod movies;
pub mod music;
pub mod sessions;

/// Shared handler state; every field is cheap to clone
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub music: MusicRecommender,
    pub movies: MovieRecommender,
    pub anime: AnimeRecommender,
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/options", get(options))
        .route("/sessions", post(sessions::create))
        .route("/sessions/:id", delete(sessions::remove))
        .route("/sessions/:id/reset", post(sessions::reset))
        .route("/sessions/:id/music", get(music::recommend))
        .route("/sessions/:id/movies", get(movies::recommend))
        .route("/sessions/:id/movies/:tmdb_id", get(movies::details))
        .route("/sessions/:id/anime", get(anime::recommend))
        .route("/anime/seasonal", get(anime::seasonal))
        .route("/anime/top", get(anime::top))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Every selectable preference value
async fn options() -> Json<PreferenceOptions> {
    Json(preference_options())
}
