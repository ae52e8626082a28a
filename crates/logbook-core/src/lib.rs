//! Core types shared across the logbook service.
//!
//! This crate provides:
//! - The [`Level`] severity enum and its total ordering
//! - Record, source, and ingestion request/outcome types
//! - The [`LogFilter`] used to parameterize list queries
//! - Shared error types

mod error;
mod filter;
mod level;
mod record;

pub use error::{Error, Result};
pub use filter::LogFilter;
pub use level::Level;
pub use record::{IngestOutcome, IngestRequest, LogRecord, Source};
