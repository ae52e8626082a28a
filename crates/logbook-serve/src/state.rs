//! Application state and configuration.

use std::path::PathBuf;
use std::sync::Arc;

use logbook_store::{LogStore, RetentionPolicy, StoreConfig};

/// Application configuration loaded from environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8080").
    pub bind_addr: String,

    /// Path to the SQLite database file.
    pub db_path: PathBuf,

    /// Directory with the built webapp to serve at the root (optional).
    pub webapp_dir: Option<PathBuf>,

    /// Retention settings passed through to the store.
    pub retention: RetentionPolicy,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `LOGBOOK_BIND_ADDR`: Server bind address (default: "0.0.0.0:8080")
    /// - `LOGBOOK_DB_PATH`: SQLite file path (default: "./data/logbook.db")
    /// - `LOGBOOK_WEBAPP_DIR`: Static webapp directory, served when it exists
    /// - `LOGBOOK_RETENTION_MAX_BYTES`: Size bound before trimming
    /// - `LOGBOOK_RETENTION_BATCH`: Records removed per trimming pass
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr =
            std::env::var("LOGBOOK_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let db_path = std::env::var("LOGBOOK_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data/logbook.db"));

        let webapp_dir = std::env::var("LOGBOOK_WEBAPP_DIR")
            .ok()
            .map(PathBuf::from)
            .filter(|p| p.is_dir());

        let mut retention = RetentionPolicy::default();
        if let Ok(value) = std::env::var("LOGBOOK_RETENTION_MAX_BYTES") {
            retention.max_db_bytes = value
                .parse()
                .map_err(|_| anyhow::anyhow!("LOGBOOK_RETENTION_MAX_BYTES must be a byte count"))?;
        }
        if let Ok(value) = std::env::var("LOGBOOK_RETENTION_BATCH") {
            retention.batch_size = value
                .parse()
                .map_err(|_| anyhow::anyhow!("LOGBOOK_RETENTION_BATCH must be a record count"))?;
        }

        tracing::info!(
            bind_addr = %bind_addr,
            db_path = %db_path.display(),
            webapp_dir = ?webapp_dir,
            max_db_bytes = retention.max_db_bytes,
            "configuration loaded"
        );

        Ok(Self {
            bind_addr,
            db_path,
            webapp_dir,
            retention,
        })
    }
}

/// Shared application state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Storage engine handle.
    pub store: Arc<LogStore>,

    /// Application configuration.
    pub config: Arc<Config>,
}

impl AppState {
    /// Open the store and build the application state.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let store = LogStore::open(StoreConfig {
            db_path: config.db_path.clone(),
            retention: config.retention.clone(),
        })?;

        Ok(Self {
            store: Arc::new(store),
            config: Arc::new(config),
        })
    }
}
