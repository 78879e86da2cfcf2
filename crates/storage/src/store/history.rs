#![forbid(unsafe_code)]

use super::support::{LOG_COLUMNS, log_entry_from_row};
use super::{HistoryRequest, SqliteStore, StoreError, to_sqlite_i64};
use da_core::{EntityType, LogEntry, LogId};
use rusqlite::{OptionalExtension, params};

impl SqliteStore {
    /// Log entries targeting one entity, newest first. Each call runs a fresh
    /// query; no cursor state is kept.
    pub fn log_list(&self, request: HistoryRequest) -> Result<Vec<LogEntry>, StoreError> {
        let limit = match request.limit {
            Some(limit) => to_sqlite_i64(limit)?,
            None => -1,
        };
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {LOG_COLUMNS}
            FROM log_entries
            WHERE entity_type=?1 AND entity_id=?2
            ORDER BY ts_ms DESC, id DESC
            LIMIT ?3
            "#
        ))?;
        let rows = stmt.query_map(
            params![request.entity_type.as_str(), request.entity_id, limit],
            log_entry_from_row,
        )?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Looks a log entry up by id, but only if it targets the given entity.
    pub fn log_get_for(
        &self,
        id: LogId,
        entity_type: EntityType,
        entity_id: i64,
    ) -> Result<Option<LogEntry>, StoreError> {
        Ok(self
            .conn
            .query_row(
                &format!(
                    "SELECT {LOG_COLUMNS} FROM log_entries \
                     WHERE id=?1 AND entity_type=?2 AND entity_id=?3"
                ),
                params![id.get(), entity_type.as_str(), entity_id],
                log_entry_from_row,
            )
            .optional()?)
    }

    pub fn log_get(&self, id: LogId) -> Result<Option<LogEntry>, StoreError> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {LOG_COLUMNS} FROM log_entries WHERE id=?1"),
                params![id.get()],
                log_entry_from_row,
            )
            .optional()?)
    }
}
