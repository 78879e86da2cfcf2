#![forbid(unsafe_code)]

use super::super::StoreError;
use da_core::{
    AccessType, Changes, Document, DocumentAccess, DocumentId, EntityType, GrantId, LogAction,
    LogEntry, LogId, User, UserId,
};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};

pub(in crate::store) const USER_COLUMNS: &str = "id, username, email";
pub(in crate::store) const DOCUMENT_COLUMNS: &str =
    "id, title, content, owner_id, created_at_ms, updated_at_ms";
pub(in crate::store) const ACCESS_COLUMNS: &str = "id, document_id, user_id, access_type";
pub(in crate::store) const LOG_COLUMNS: &str =
    "id, actor_id, action, changes_json, entity_type, entity_id, ts_ms";

pub(in crate::store) fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: UserId::new(row.get(0)?),
        username: row.get(1)?,
        email: row.get(2)?,
    })
}

pub(in crate::store) fn document_from_row(row: &Row<'_>) -> rusqlite::Result<Document> {
    Ok(Document {
        id: DocumentId::new(row.get(0)?),
        title: row.get(1)?,
        content: row.get(2)?,
        owner: UserId::new(row.get(3)?),
        created_at_ms: row.get(4)?,
        updated_at_ms: row.get(5)?,
    })
}

pub(in crate::store) fn access_from_row(row: &Row<'_>) -> rusqlite::Result<DocumentAccess> {
    let raw: String = row.get(3)?;
    let access_type = AccessType::parse(&raw).ok_or_else(|| {
        rusqlite::Error::InvalidColumnType(3, "access_type".to_string(), Type::Text)
    })?;
    Ok(DocumentAccess {
        id: GrantId::new(row.get(0)?),
        document: DocumentId::new(row.get(1)?),
        user: UserId::new(row.get(2)?),
        access_type,
    })
}

pub(in crate::store) fn log_entry_from_row(row: &Row<'_>) -> rusqlite::Result<LogEntry> {
    let action: String = row.get(2)?;
    let action = LogAction::parse(&action)
        .ok_or_else(|| rusqlite::Error::InvalidColumnType(2, "action".to_string(), Type::Text))?;
    let entity_type: String = row.get(4)?;
    let entity_type = EntityType::parse(&entity_type).ok_or_else(|| {
        rusqlite::Error::InvalidColumnType(4, "entity_type".to_string(), Type::Text)
    })?;
    let changes_json: Option<String> = row.get(3)?;
    Ok(LogEntry {
        id: LogId::new(row.get(0)?),
        actor: row.get::<_, Option<i64>>(1)?.map(UserId::new),
        action,
        changes: Changes::from_column(changes_json.as_deref()),
        entity_type,
        entity_id: row.get(5)?,
        ts_ms: row.get(6)?,
    })
}

pub(in crate::store) fn select_user(
    conn: &Connection,
    id: UserId,
) -> Result<Option<User>, StoreError> {
    Ok(conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id=?1"),
            params![id.get()],
            user_from_row,
        )
        .optional()?)
}

pub(in crate::store) fn select_document(
    conn: &Connection,
    id: DocumentId,
) -> Result<Option<Document>, StoreError> {
    Ok(conn
        .query_row(
            &format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id=?1"),
            params![id.get()],
            document_from_row,
        )
        .optional()?)
}

pub(in crate::store) fn select_grant(
    conn: &Connection,
    id: GrantId,
) -> Result<Option<DocumentAccess>, StoreError> {
    Ok(conn
        .query_row(
            &format!("SELECT {ACCESS_COLUMNS} FROM document_access WHERE id=?1"),
            params![id.get()],
            access_from_row,
        )
        .optional()?)
}
