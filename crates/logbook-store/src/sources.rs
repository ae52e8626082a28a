//! Source registry: get-or-create and level updates for named sources.

use logbook_core::{Level, Source};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Error, Result};
use crate::store::LogStore;

impl LogStore {
    /// Look up a source by name, creating it with level `info` if absent.
    ///
    /// Repeated calls with the same name return the same identifier and do
    /// not change the stored level.
    pub fn get_or_create_source(&self, name: &str) -> Result<Source> {
        validate_name(name)?;
        let conn = self.conn.lock();
        get_or_create(&conn, name)
    }

    /// Update a source's minimum severity, addressed by identifier.
    ///
    /// Returns the updated source, or `NotFound` if no source has that id.
    pub fn set_source_level(&self, id: i64, level: Level) -> Result<Source> {
        let conn = self.conn.lock();
        let changed = conn.execute(
            "UPDATE sources SET level = ?1 WHERE id = ?2",
            params![level.as_str(), id],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("source {}", id)));
        }
        lookup_by_id(&conn, id)?.ok_or_else(|| Error::NotFound(format!("source {}", id)))
    }

    /// Update a source's minimum severity, addressed by name.
    pub fn set_source_level_by_name(&self, name: &str, level: Level) -> Result<Source> {
        let conn = self.conn.lock();
        let changed = conn.execute(
            "UPDATE sources SET level = ?1 WHERE name = ?2",
            params![level.as_str(), name],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("source '{}'", name)));
        }
        lookup(&conn, name)?.ok_or_else(|| Error::NotFound(format!("source '{}'", name)))
    }

    /// List all sources, ordered by creation (ascending id).
    pub fn list_sources(&self) -> Result<Vec<Source>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT id, name, level FROM sources ORDER BY id")?;
        let sources = stmt
            .query_map([], decode_source)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(sources)
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(logbook_core::Error::InvalidSourceName("must not be empty".to_string()).into());
    }
    Ok(())
}

/// Get-or-create against an already locked connection.
///
/// Two concurrent callers (from separate processes sharing the file) may
/// both attempt the insert; the UNIQUE constraint rejects the loser, which
/// re-reads instead of propagating the violation.
pub(crate) fn get_or_create(conn: &Connection, name: &str) -> Result<Source> {
    if let Some(source) = lookup(conn, name)? {
        return Ok(source);
    }

    let default_level = Level::Info;
    match conn.execute(
        "INSERT INTO sources (name, level) VALUES (?1, ?2)",
        params![name, default_level.as_str()],
    ) {
        Ok(_) => {
            tracing::info!(name, "source created");
            Ok(Source {
                id: conn.last_insert_rowid(),
                name: name.to_string(),
                level: default_level,
            })
        }
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            // A concurrent writer won the insert race; its row is the source
            lookup(conn, name)?.ok_or_else(|| Error::NotFound(format!("source '{}'", name)))
        }
        Err(err) => Err(err.into()),
    }
}

fn lookup(conn: &Connection, name: &str) -> Result<Option<Source>> {
    let source = conn
        .query_row(
            "SELECT id, name, level FROM sources WHERE name = ?1",
            [name],
            decode_source,
        )
        .optional()?;
    Ok(source)
}

fn lookup_by_id(conn: &Connection, id: i64) -> Result<Option<Source>> {
    let source = conn
        .query_row(
            "SELECT id, name, level FROM sources WHERE id = ?1",
            [id],
            decode_source,
        )
        .optional()?;
    Ok(source)
}

fn decode_source(row: &rusqlite::Row<'_>) -> rusqlite::Result<Source> {
    let level_text: String = row.get(2)?;
    let level = level_text.parse::<Level>().map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(err))
    })?;
    Ok(Source {
        id: row.get(0)?,
        name: row.get(1)?,
        level,
    })
}
