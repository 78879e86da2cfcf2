#![forbid(unsafe_code)]

use super::super::StoreError;
use da_core::{Actor, Changes, EntityType, LogAction, LogEntry, LogId};
use rusqlite::{Transaction, params};

/// Appends one change-log entry inside the caller's transaction, so the entry
/// commits or rolls back together with the mutation it describes.
pub(in crate::store) fn insert_log_entry_tx(
    tx: &Transaction<'_>,
    actor: Actor,
    action: LogAction,
    changes: Changes,
    entity_type: EntityType,
    entity_id: i64,
    ts_ms: i64,
) -> Result<LogEntry, StoreError> {
    let changes_json = changes.to_column();
    tx.execute(
        r#"
        INSERT INTO log_entries(actor_id, action, changes_json, entity_type, entity_id, ts_ms)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
        params![
            actor.user().get(),
            action.as_str(),
            changes_json,
            entity_type.as_str(),
            entity_id,
            ts_ms
        ],
    )?;
    let id = tx.last_insert_rowid();
    tracing::debug!(
        log_id = id,
        actor = actor.user().get(),
        action = action.as_str(),
        entity_type = entity_type.as_str(),
        entity_id,
        "change log entry appended"
    );
    Ok(LogEntry {
        id: LogId::new(id),
        actor: Some(actor.user()),
        action,
        changes,
        entity_type,
        entity_id,
        ts_ms,
    })
}
