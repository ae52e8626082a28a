//! Size-bounded retention: oldest-first trimming.

use rusqlite::{params, Connection};

use crate::error::Result;
use crate::store::LogStore;

/// Settings for size-bounded retention.
#[derive(Debug, Clone)]
pub struct RetentionPolicy {
    /// Database size above which trimming kicks in.
    pub max_db_bytes: u64,
    /// How many of the oldest records one enforcement pass removes.
    pub batch_size: u32,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            max_db_bytes: 100 * 1024 * 1024, // 100 MiB
            batch_size: 100,
        }
    }
}

impl LogStore {
    /// Delete the oldest batch of records if the store has outgrown its
    /// size bound. Returns the number of records removed.
    ///
    /// A single invocation removes at most one batch; sustained ingest can
    /// keep the store oscillating above the threshold, which is the
    /// accepted price for bounded per-write latency. Metadata rows follow
    /// their records via cascade.
    pub fn enforce_retention(&self) -> Result<u64> {
        let policy = &self.config().retention;
        let conn = self.conn.lock();

        let size = db_size_bytes(&conn)?;
        if size <= policy.max_db_bytes {
            return Ok(0);
        }

        let deleted = conn.execute(
            "DELETE FROM records WHERE id IN (
                SELECT id FROM records ORDER BY timestamp ASC, id ASC LIMIT ?1
            )",
            params![policy.batch_size],
        )?;

        tracing::info!(deleted, size_bytes = size, "trimmed oldest records");
        Ok(deleted as u64)
    }
}

/// Current database size in bytes, from the page pragmas.
///
/// Works for file-backed and in-memory databases alike, unlike a file
/// metadata lookup.
fn db_size_bytes(conn: &Connection) -> rusqlite::Result<u64> {
    let page_count: u64 = conn.pragma_query_value(None, "page_count", |row| row.get(0))?;
    let page_size: u64 = conn.pragma_query_value(None, "page_size", |row| row.get(0))?;
    Ok(page_count * page_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreConfig;
    use chrono::{TimeZone, Utc};
    use logbook_core::{IngestRequest, Level, LogFilter};
    use serde_json::json;

    /// Store whose retention triggers on every enforcement pass.
    fn tiny_store(batch_size: u32) -> LogStore {
        LogStore::open_in_memory_with(StoreConfig {
            retention: RetentionPolicy {
                max_db_bytes: 0,
                batch_size,
            },
            ..Default::default()
        })
        .unwrap()
    }

    /// Insert a backlog directly, bypassing ingest's own retention pass.
    fn seed_backlog(store: &LogStore, minutes: u32) {
        let source_id = store.get_or_create_source("api").unwrap().id;
        let conn = store.conn.lock();
        for minute in 0..minutes {
            conn.execute(
                "INSERT INTO records (timestamp, source_id, level, message)
                 VALUES (?1, ?2, 'info', ?3)",
                params![i64::from(minute) * 60_000, source_id, format!("minute {}", minute)],
            )
            .unwrap();
        }
    }

    #[test]
    fn test_under_threshold_removes_nothing() {
        let store = LogStore::open_in_memory().unwrap();
        store
            .ingest(IngestRequest {
                logger: "api".to_string(),
                level: Level::Info,
                message: "kept".to_string(),
                timestamp: None,
                meta: None,
            })
            .unwrap();

        assert_eq!(store.enforce_retention().unwrap(), 0);
        assert_eq!(store.count(&LogFilter::default()).unwrap(), 1);
    }

    #[test]
    fn test_removes_exactly_one_oldest_batch() {
        let store = tiny_store(3);
        seed_backlog(&store, 8);

        assert_eq!(store.enforce_retention().unwrap(), 3);

        // The three oldest are gone, the five newest survive
        let remaining = store.query(&LogFilter::default()).unwrap();
        assert_eq!(remaining.len(), 5);
        let messages: Vec<_> = remaining.iter().map(|r| r.message.as_str()).collect();
        assert!(!messages.contains(&"minute 0"));
        assert!(!messages.contains(&"minute 2"));
        assert!(messages.contains(&"minute 3"));
        assert!(messages.contains(&"minute 7"));
    }

    #[test]
    fn test_removes_all_when_fewer_than_batch() {
        let store = tiny_store(100);
        seed_backlog(&store, 5);

        assert_eq!(store.enforce_retention().unwrap(), 5);
        assert_eq!(store.count(&LogFilter::default()).unwrap(), 0);
    }

    #[test]
    fn test_cascade_removes_metadata() {
        let store = tiny_store(100);
        store
            .ingest(IngestRequest {
                logger: "api".to_string(),
                level: Level::Info,
                message: "with payload".to_string(),
                timestamp: Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()),
                meta: Some(json!({"k": "v"})),
            })
            .unwrap();

        // Ingest's own tail-end pass plus this one leave nothing behind
        store.enforce_retention().unwrap();

        let metadata_rows: i64 = store
            .conn
            .lock()
            .query_row("SELECT COUNT(*) FROM metadata", [], |row| row.get(0))
            .unwrap();
        assert_eq!(metadata_rows, 0);
    }

    #[test]
    fn test_enforce_is_idempotent_when_empty() {
        let store = tiny_store(100);
        store.enforce_retention().unwrap();
        assert_eq!(store.enforce_retention().unwrap(), 0);
    }
}
