//! The store handle and its constructors.

use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use rusqlite::Connection;

use crate::error::Result;
use crate::retention::RetentionPolicy;
use crate::schema;

/// Configuration for the log store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the SQLite database file.
    pub db_path: PathBuf,
    /// Size-bounded retention settings.
    pub retention: RetentionPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./data/logbook.db"),
            retention: RetentionPolicy::default(),
        }
    }
}

/// Durable store for sources, records, and metadata.
///
/// All coordination happens through the connection mutex; the store holds
/// no other long-lived state. Operations are synchronous and blocking from
/// the caller's perspective.
pub struct LogStore {
    config: StoreConfig,
    /// SQLite connection (protected by mutex for thread safety).
    pub(crate) conn: Mutex<Connection>,
}

impl LogStore {
    /// Open or create a store with the given configuration.
    pub fn open(config: StoreConfig) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = config.db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&config.db_path)?;

        // WAL for concurrent readers; foreign keys so metadata rows follow
        // their record on delete
        conn.execute_batch(
            "PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL; PRAGMA foreign_keys=ON;",
        )?;

        schema::init_schema(&conn)?;

        Ok(Self {
            config,
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self> {
        Self::open_in_memory_with(StoreConfig::default())
    }

    /// Open an in-memory store with custom configuration (for testing).
    pub fn open_in_memory_with(config: StoreConfig) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;

        schema::init_schema(&conn)?;

        Ok(Self {
            config,
            conn: Mutex::new(conn),
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}

/// Convert stored Unix milliseconds back to a UTC timestamp.
///
/// Returns `None` for values outside chrono's representable range, which
/// callers treat as an undecodable row.
pub(crate) fn datetime_from_millis(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}
