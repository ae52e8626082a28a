//! HTTP API for the logbook ingestion and query service.
//!
//! This crate provides the REST boundary over the storage engine:
//!
//! - `POST /logs` ingests a record (below-threshold rejections come back
//!   as a `200` with a plain-text notice, not an error)
//! - `GET /logs` serves filtered, paginated queries
//! - `GET /logs/{id}` serves a single record with its metadata
//! - `/config` manages per-source minimum severity ("loggers")
//! - An optional static webapp directory is served at the root
//!
//! # Architecture
//!
//! - **AppState**: Shared application state (store handle, configuration)
//! - **ApiError**: Error-to-response mapping
//! - **Routes**: Endpoint handlers grouped by domain

mod error;
mod routes;
mod state;

pub use self::error::ApiError;
pub use self::routes::router;
pub use self::state::{AppState, Config};
