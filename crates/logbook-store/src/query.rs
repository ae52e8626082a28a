//! Filtered, paginated reads over persisted records.
//!
//! Queries are composed from a fixed set of predicate clauses with a
//! strictly ordered parameter list; user input is always bound, never
//! interpolated into the SQL text.

use logbook_core::{Level, LogFilter, LogRecord};
use rusqlite::{OptionalExtension, ToSql};

use crate::error::{Error, Result};
use crate::store::{datetime_from_millis, LogStore};

const SELECT_RECORDS: &str = "SELECT r.id, r.timestamp, r.source_id, s.name, r.level, r.message
     FROM records r
     JOIN sources s ON r.source_id = s.id";

impl LogStore {
    /// Execute a filtered list query, ordered newest-first.
    ///
    /// The descending timestamp order is a contract: pagination correctness
    /// depends on it. Rows that fail to decode are skipped with a warning
    /// rather than aborting the whole query.
    pub fn query(&self, filter: &LogFilter) -> Result<Vec<LogRecord>> {
        filter.validate()?;

        let (clauses, mut params) = build_predicates(filter);
        let mut sql = String::from(SELECT_RECORDS);
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY r.timestamp DESC, r.id DESC");

        if let Some(limit) = filter.limit {
            sql.push_str(" LIMIT ?");
            params.push(Box::new(clamp_i64(limit)));
        }
        if let Some(offset) = filter.offset {
            sql.push_str(" OFFSET ?");
            params.push(Box::new(clamp_i64(offset)));
        }

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&sql)?;
        let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let mut rows = stmt.query(param_refs.as_slice())?;

        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            match decode_record(row) {
                Ok(record) => records.push(record),
                Err(err) => {
                    tracing::warn!(error = %err, "skipping undecodable record row");
                }
            }
        }
        Ok(records)
    }

    /// Count the records matching a filter, ignoring pagination.
    pub fn count(&self, filter: &LogFilter) -> Result<u64> {
        let (clauses, params) = build_predicates(filter);
        let mut sql = String::from(
            "SELECT COUNT(*) FROM records r JOIN sources s ON r.source_id = s.id",
        );
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }

        let conn = self.conn.lock();
        let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let count: i64 = conn.query_row(&sql, param_refs.as_slice(), |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Fetch a single record by identifier, with its metadata attached when
    /// a metadata row exists.
    pub fn get_by_id(&self, id: i64) -> Result<LogRecord> {
        let conn = self.conn.lock();
        let sql = format!("{} WHERE r.id = ?1", SELECT_RECORDS);
        let mut record = conn
            .query_row(&sql, [id], decode_record)
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("record {}", id)))?;

        let data: Option<String> = conn
            .query_row(
                "SELECT data FROM metadata WHERE record_id = ?1",
                [id],
                |row| row.get(0),
            )
            .optional()?;
        if let Some(text) = data {
            match serde_json::from_str(&text) {
                Ok(value) => record.meta = Some(value),
                Err(err) => {
                    // Partial result over total failure, as with list rows
                    tracing::warn!(record_id = id, error = %err, "skipping undecodable metadata");
                }
            }
        }
        Ok(record)
    }
}

/// Assemble the WHERE clauses and their bound values for a filter.
///
/// Clause text is fixed; only the parameter list varies with input.
fn build_predicates(filter: &LogFilter) -> (Vec<String>, Vec<Box<dyn ToSql>>) {
    let mut clauses: Vec<String> = Vec::new();
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(min_time) = filter.min_time {
        clauses.push("r.timestamp >= ?".to_string());
        params.push(Box::new(min_time.timestamp_millis()));
    }
    if let Some(max_time) = filter.max_time {
        clauses.push("r.timestamp <= ?".to_string());
        params.push(Box::new(max_time.timestamp_millis()));
    }
    if !filter.include_sources.is_empty() {
        clauses.push(format!(
            "s.name IN ({})",
            placeholders(filter.include_sources.len())
        ));
        for name in &filter.include_sources {
            params.push(Box::new(name.clone()));
        }
    }
    if !filter.exclude_sources.is_empty() {
        clauses.push(format!(
            "s.name NOT IN ({})",
            placeholders(filter.exclude_sources.len())
        ));
        for name in &filter.exclude_sources {
            params.push(Box::new(name.clone()));
        }
    }
    if let Some(search) = &filter.search {
        clauses.push("r.message LIKE ? ESCAPE '\\'".to_string());
        params.push(Box::new(like_pattern(search)));
    }

    (clauses, params)
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// Substring match pattern with LIKE wildcards escaped, so a search for
/// "100%" matches the literal text.
fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn clamp_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn decode_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<LogRecord> {
    let ms: i64 = row.get(1)?;
    let timestamp = datetime_from_millis(ms).ok_or_else(|| {
        rusqlite::Error::IntegralValueOutOfRange(1, ms)
    })?;
    let level_text: String = row.get(4)?;
    let level = level_text.parse::<Level>().map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(err))
    })?;
    Ok(LogRecord {
        id: row.get(0)?,
        timestamp,
        logger: row.get(3)?,
        logger_id: row.get(2)?,
        level,
        message: row.get(5)?,
        meta: None,
    })
}
