#![forbid(unsafe_code)]

mod sql;

use super::super::StoreError;
use rusqlite::{Connection, OptionalExtension, params};

pub(in crate::store) const SCHEMA_VERSION: &str = "1";

pub(in crate::store) fn migrate_sqlite_schema(conn: &Connection) -> Result<(), StoreError> {
    preflight_gate(conn)?;
    conn.execute_batch(&sql::full_schema_sql())?;
    conn.execute(
        "INSERT OR IGNORE INTO meta(key, value) VALUES (?1, ?2)",
        params!["schema_version", SCHEMA_VERSION],
    )?;
    Ok(())
}

fn preflight_gate(conn: &Connection) -> Result<(), StoreError> {
    let has_meta = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='meta'",
            [],
            |row| row.get::<_, i64>(0),
        )
        .optional()?
        .is_some();
    if !has_meta {
        return Ok(());
    }

    let stored = conn
        .query_row(
            "SELECT value FROM meta WHERE key='schema_version'",
            [],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    match stored.as_deref() {
        None => Ok(()),
        Some(SCHEMA_VERSION) => Ok(()),
        Some(other) => {
            tracing::error!(stored = other, expected = SCHEMA_VERSION, "schema version mismatch");
            Err(StoreError::InvalidInput("unsupported schema version"))
        }
    }
}
