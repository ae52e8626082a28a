//! Source, record, and ingestion request/outcome types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::level::Level;

/// A named emitter of log records ("logger" at the HTTP boundary).
///
/// Sources are created implicitly on first write from an unseen name,
/// with [`Level::Info`] as the default minimum severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub id: i64,
    pub name: String,
    pub level: Level,
}

/// A persisted log record, enriched with its source's display name.
///
/// `meta` is populated only by single-record lookup; list queries leave
/// it empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub logger: String,
    pub logger_id: i64,
    pub level: Level,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

/// An incoming write request, before admission.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestRequest {
    /// Source name; the source is created with level `info` if unseen.
    pub logger: String,
    pub level: Level,
    pub message: String,
    /// Server time is assigned when absent.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Optional free-form attachment, persisted as canonical JSON text.
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
}

/// Result of an ingestion call.
///
/// A below-threshold record is *rejected but the call succeeds*: nothing
/// is persisted and the caller gets advisory feedback, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// The record was admitted and persisted.
    Admitted(LogRecord),
    /// The record's severity rank was below the source's minimum.
    BelowThreshold {
        logger: String,
        level: Level,
        threshold: Level,
    },
}

impl IngestOutcome {
    /// Human-readable explanation for a below-threshold rejection.
    pub fn explanation(&self) -> Option<String> {
        match self {
            IngestOutcome::Admitted(_) => None,
            IngestOutcome::BelowThreshold {
                logger,
                level,
                threshold,
            } => Some(format!(
                "log level for {} too low: {} < {}",
                logger, level, threshold
            )),
        }
    }

    /// The persisted record, if the call admitted one.
    pub fn record(&self) -> Option<&LogRecord> {
        match self {
            IngestOutcome::Admitted(record) => Some(record),
            IngestOutcome::BelowThreshold { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_threshold_explanation() {
        let outcome = IngestOutcome::BelowThreshold {
            logger: "api-gateway".to_string(),
            level: Level::Debug,
            threshold: Level::Warn,
        };
        let msg = outcome.explanation().unwrap();
        assert!(msg.contains("api-gateway"));
        assert!(msg.contains("debug < warn"));
        assert!(outcome.record().is_none());
    }

    #[test]
    fn test_record_meta_omitted_when_absent() {
        let record = LogRecord {
            id: 7,
            timestamp: Utc::now(),
            logger: "worker".to_string(),
            logger_id: 1,
            level: Level::Info,
            message: "job done".to_string(),
            meta: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("meta").is_none());
        assert_eq!(json["logger"], "worker");
    }

    #[test]
    fn test_ingest_request_optional_fields() {
        let req: IngestRequest = serde_json::from_str(
            r#"{"logger": "api", "level": "warn", "message": "slow response"}"#,
        )
        .unwrap();
        assert_eq!(req.level, Level::Warn);
        assert!(req.timestamp.is_none());
        assert!(req.meta.is_none());
    }
}
