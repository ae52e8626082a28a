//! Record ingestion and query endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::Query;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use logbook_core::{IngestOutcome, IngestRequest, LogFilter, LogRecord};

use crate::error::ApiError;
use crate::state::AppState;

/// Helper for failed blocking tasks (panicked or cancelled store call).
fn task_failed(err: tokio::task::JoinError) -> ApiError {
    ApiError::Internal(anyhow::anyhow!("store task failed: {}", err))
}

/// Query parameters for the record list.
///
/// `includeLoggers`/`excludeLoggers` are repeatable and match by source
/// name. Timestamps are RFC 3339.
#[derive(Debug, Clone, Deserialize)]
pub struct LogListQuery {
    /// Minimum timestamp, inclusive.
    pub mintime: Option<DateTime<Utc>>,
    /// Maximum timestamp, inclusive.
    pub maxtime: Option<DateTime<Utc>>,
    /// Substring to match against the message.
    pub search: Option<String>,
    /// Row offset; requires `limit`.
    pub offset: Option<u64>,
    /// Maximum number of rows.
    pub limit: Option<u64>,
    /// Only these sources match, when present.
    #[serde(default, rename = "includeLoggers")]
    pub include_loggers: Vec<String>,
    /// These sources never match.
    #[serde(default, rename = "excludeLoggers")]
    pub exclude_loggers: Vec<String>,
}

impl From<LogListQuery> for LogFilter {
    fn from(query: LogListQuery) -> Self {
        LogFilter {
            min_time: query.mintime,
            max_time: query.maxtime,
            include_sources: query.include_loggers,
            exclude_sources: query.exclude_loggers,
            search: query.search,
            offset: query.offset,
            limit: query.limit,
        }
    }
}

/// `POST /logs`
///
/// Ingest a record. Admitted records come back as `201` with the persisted
/// record; below-threshold records come back as `200` with a plain-text
/// notice — threshold filtering is advisory feedback, not an error.
pub async fn create_log(
    State(state): State<AppState>,
    Json(payload): Json<IngestRequest>,
) -> Result<Response, ApiError> {
    let store = state.store.clone();
    let outcome = tokio::task::spawn_blocking(move || store.ingest(payload))
        .await
        .map_err(task_failed)??;

    match outcome {
        IngestOutcome::Admitted(record) => {
            Ok((StatusCode::CREATED, Json(record)).into_response())
        }
        outcome @ IngestOutcome::BelowThreshold { .. } => {
            let notice = outcome.explanation().unwrap_or_default();
            Ok((StatusCode::OK, notice).into_response())
        }
    }
}

/// `GET /logs`
///
/// Filtered, paginated record list, newest first.
pub async fn list_logs(
    State(state): State<AppState>,
    Query(params): Query<LogListQuery>,
) -> Result<Json<Vec<LogRecord>>, ApiError> {
    let filter = LogFilter::from(params);
    let store = state.store.clone();
    let records = tokio::task::spawn_blocking(move || store.query(&filter))
        .await
        .map_err(task_failed)??;
    Ok(Json(records))
}

/// `GET /logs/{id}`
///
/// Single record with its metadata attached when present.
pub async fn get_log(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<LogRecord>, ApiError> {
    let store = state.store.clone();
    let record = tokio::task::spawn_blocking(move || store.get_by_id(id))
        .await
        .map_err(task_failed)??;
    Ok(Json(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_query_to_filter() {
        let query = LogListQuery {
            mintime: Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()),
            maxtime: None,
            search: Some("timeout".to_string()),
            offset: Some(10),
            limit: Some(50),
            include_loggers: vec!["api".to_string()],
            exclude_loggers: vec!["cron".to_string()],
        };

        let filter = LogFilter::from(query);
        assert!(filter.min_time.is_some());
        assert!(filter.max_time.is_none());
        assert_eq!(filter.include_sources, vec!["api"]);
        assert_eq!(filter.exclude_sources, vec!["cron"]);
        assert_eq!(filter.search.as_deref(), Some("timeout"));
        assert_eq!(filter.offset, Some(10));
        assert_eq!(filter.limit, Some(50));
    }

    #[test]
    fn test_logger_sets_default_to_empty() {
        let query: LogListQuery = serde_json::from_str(r#"{"limit": 5}"#).unwrap();
        assert!(query.include_loggers.is_empty());
        assert!(query.exclude_loggers.is_empty());
        assert_eq!(query.limit, Some(5));
    }
}
