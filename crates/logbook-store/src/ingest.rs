//! Severity-gated ingestion of log records.

use chrono::{SubsecRound, Utc};
use logbook_core::{IngestOutcome, IngestRequest, LogRecord};
use rusqlite::params;

use crate::error::Result;
use crate::sources;
use crate::store::LogStore;

impl LogStore {
    /// Admit and persist a log record.
    ///
    /// The source is resolved (created if unseen), the record's severity is
    /// compared against the source's minimum, and on admission the record
    /// and its optional metadata are written in a single transaction.
    /// Below-threshold records are dropped without error; the outcome
    /// carries the explanation.
    ///
    /// Retention enforcement runs at the tail of every admitted write; its
    /// failures are logged and never fail the ingest call.
    pub fn ingest(&self, request: IngestRequest) -> Result<IngestOutcome> {
        let IngestRequest {
            logger,
            level,
            message,
            timestamp,
            meta,
        } = request;

        let source = {
            let conn = self.conn.lock();
            sources::get_or_create(&conn, &logger)?
        };

        // Admission: below-threshold is advisory feedback, not an error
        if level.rank() < source.level.rank() {
            tracing::debug!(logger = %source.name, %level, threshold = %source.level, "record below threshold");
            return Ok(IngestOutcome::BelowThreshold {
                logger: source.name,
                level,
                threshold: source.level,
            });
        }

        // Server time when the caller supplied none; truncated to the
        // store's millisecond resolution either way
        let timestamp = timestamp.unwrap_or_else(Utc::now).trunc_subsecs(3);

        // Serialize before the transaction opens so a bad payload never
        // leaves a half-written record behind
        let meta_text = meta.as_ref().map(serde_json::to_string).transpose()?;

        let id = {
            let mut conn = self.conn.lock();
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO records (timestamp, source_id, level, message)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    timestamp.timestamp_millis(),
                    source.id,
                    level.as_str(),
                    message
                ],
            )?;
            let id = tx.last_insert_rowid();
            if let Some(text) = &meta_text {
                tx.execute(
                    "INSERT INTO metadata (record_id, data) VALUES (?1, ?2)",
                    params![id, text],
                )?;
            }
            tx.commit()?;
            id
        };

        // Best-effort housekeeping, never part of the write's contract
        if let Err(err) = self.enforce_retention() {
            tracing::warn!(error = %err, "retention enforcement failed");
        }

        Ok(IngestOutcome::Admitted(LogRecord {
            id,
            timestamp,
            logger: source.name,
            logger_id: source.id,
            level,
            message,
            meta,
        }))
    }
}
