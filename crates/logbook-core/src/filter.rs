//! Query filter for list reads.

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};

/// Parameters for a filtered, paginated list query.
///
/// All fields are optional and combine conjunctively. Results are always
/// ordered newest-first; pagination correctness depends on that ordering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogFilter {
    /// Minimum timestamp, inclusive.
    pub min_time: Option<DateTime<Utc>>,
    /// Maximum timestamp, inclusive.
    pub max_time: Option<DateTime<Utc>>,
    /// If non-empty, only records from these source names match.
    pub include_sources: Vec<String>,
    /// Records from these source names never match.
    pub exclude_sources: Vec<String>,
    /// Substring match against the message text.
    pub search: Option<String>,
    /// Row offset; only valid together with `limit`.
    pub offset: Option<u64>,
    /// Maximum number of rows; absent means all matches.
    pub limit: Option<u64>,
}

impl LogFilter {
    /// Check the filter for combinations that cannot be executed.
    ///
    /// An offset without a limit is rejected: unbounded offsets make
    /// pagination ambiguous and SQLite has no OFFSET-without-LIMIT form.
    pub fn validate(&self) -> Result<()> {
        if self.offset.is_some() && self.limit.is_none() {
            return Err(Error::InvalidFilter(
                "offset requires a limit to be set".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_is_valid() {
        assert!(LogFilter::default().validate().is_ok());
    }

    #[test]
    fn test_offset_without_limit_rejected() {
        let filter = LogFilter {
            offset: Some(10),
            ..Default::default()
        };
        assert!(matches!(
            filter.validate().unwrap_err(),
            Error::InvalidFilter(_)
        ));
    }

    #[test]
    fn test_offset_with_limit_valid() {
        let filter = LogFilter {
            offset: Some(10),
            limit: Some(50),
            ..Default::default()
        };
        assert!(filter.validate().is_ok());
    }
}
