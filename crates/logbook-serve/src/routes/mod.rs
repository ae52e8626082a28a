//! API route definitions.

mod health;
mod loggers;
mod logs;

use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;

use crate::state::AppState;

/// Build the complete router.
///
/// # Route Structure
///
/// - `GET /health` - Health check
/// - `POST /logs` - Ingest a record
/// - `GET /logs` - Filtered, paginated record list
/// - `GET /logs/{id}` - Single record with metadata
/// - `GET /config` - List loggers and their levels
/// - `PUT /config` - Update a logger's minimum severity
/// - `POST /config` - Create (or fetch) a logger by name
///
/// When a webapp directory is configured, unmatched paths fall back to
/// static file serving from it.
pub fn router(state: AppState) -> Router {
    let webapp_dir = state.config.webapp_dir.clone();

    let mut app = Router::new()
        .route("/health", get(health::health_check))
        .route("/logs", get(logs::list_logs).post(logs::create_log))
        .route("/logs/{id}", get(logs::get_log))
        .route(
            "/config",
            get(loggers::list_loggers)
                .put(loggers::update_logger)
                .post(loggers::create_logger),
        )
        .with_state(state);

    if let Some(dir) = webapp_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}
