//! Logger (source) configuration endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use logbook_core::{Level, Source};

use crate::error::ApiError;
use crate::state::AppState;

fn task_failed(err: tokio::task::JoinError) -> ApiError {
    ApiError::Internal(anyhow::anyhow!("store task failed: {}", err))
}

/// Body for `PUT /config`. A logger can be addressed by id or by name.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggerUpdateRequest {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub level: Level,
}

/// Body for `POST /config`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggerCreateRequest {
    pub name: String,
}

/// `GET /config`
///
/// All known loggers with their minimum severity, in creation order.
pub async fn list_loggers(
    State(state): State<AppState>,
) -> Result<Json<Vec<Source>>, ApiError> {
    let store = state.store.clone();
    let sources = tokio::task::spawn_blocking(move || store.list_sources())
        .await
        .map_err(task_failed)??;
    Ok(Json(sources))
}

/// `PUT /config`
///
/// Update a logger's minimum severity. Returns the updated logger.
pub async fn update_logger(
    State(state): State<AppState>,
    Json(payload): Json<LoggerUpdateRequest>,
) -> Result<Json<Source>, ApiError> {
    let store = state.store.clone();
    let updated = tokio::task::spawn_blocking(move || match (payload.id, payload.name) {
        (Some(id), _) => store.set_source_level(id, payload.level),
        (None, Some(name)) => store.set_source_level_by_name(&name, payload.level),
        (None, None) => Err(logbook_core::Error::InvalidSourceName(
            "either id or name must be given".to_string(),
        )
        .into()),
    })
    .await
    .map_err(task_failed)??;
    Ok(Json(updated))
}

/// `POST /config`
///
/// Create a logger by name, or return the existing one. New loggers start
/// at level `info`.
pub async fn create_logger(
    State(state): State<AppState>,
    Json(payload): Json<LoggerCreateRequest>,
) -> Result<(StatusCode, Json<Source>), ApiError> {
    let store = state.store.clone();
    let source = tokio::task::spawn_blocking(move || store.get_or_create_source(&payload.name))
        .await
        .map_err(task_failed)??;
    Ok((StatusCode::CREATED, Json(source)))
}
