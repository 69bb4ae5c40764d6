use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{error::AppResult, routes::AppState};

#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
}

pub async fn create(State(state): State<AppState>) -> (StatusCode, Json<SessionCreated>) {
    let session_id = state.sessions.create().await;
    (StatusCode::CREATED, Json(SessionCreated { session_id }))
}

/// Clears every rotation, shown set and page cursor of the session
pub async fn reset(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    state.sessions.reset(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    state.sessions.remove(id).await?;
    tracing::info!(session_id = %id, "Session removed");
    Ok(StatusCode::NO_CONTENT)
}
