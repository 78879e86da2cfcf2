#![forbid(unsafe_code)]

use super::support::{
    DOCUMENT_COLUMNS, document_from_row, insert_log_entry_tx, now_ms, select_document,
};
use super::{
    CreateDocumentRequest, DocumentUpdate, SqliteStore, StoreError, is_foreign_key_violation,
};
use da_core::changes::document_changes;
use da_core::model::validate_title;
use da_core::{
    Actor, Changes, Document, DocumentId, DocumentPatch, EntityType, LogAction, LogEntry,
};
use rusqlite::{Transaction, params};

impl SqliteStore {
    pub fn document_list(&self) -> Result<Vec<Document>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents ORDER BY id ASC"
        ))?;
        let rows = stmt.query_map([], document_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn document_get(&self, id: DocumentId) -> Result<Option<Document>, StoreError> {
        select_document(&self.conn, id)
    }

    /// Creates a document owned by the actor and logs a `create` entry.
    pub fn document_create(
        &mut self,
        actor: Actor,
        request: CreateDocumentRequest,
    ) -> Result<(Document, LogEntry), StoreError> {
        validate_title(&request.title).map_err(|err| StoreError::InvalidInput(err.message()))?;

        let now_ms = now_ms();
        let tx = self.conn.transaction()?;
        let insert = tx.execute(
            r#"
            INSERT INTO documents(title, content, owner_id, created_at_ms, updated_at_ms)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                request.title,
                request.content,
                actor.user().get(),
                now_ms,
                now_ms
            ],
        );
        if let Err(err) = insert {
            if is_foreign_key_violation(&err) {
                return Err(StoreError::UnknownUser);
            }
            return Err(err.into());
        }

        let document = Document {
            id: DocumentId::new(tx.last_insert_rowid()),
            title: request.title,
            content: request.content,
            owner: actor.user(),
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        };
        let log_entry = insert_log_entry_tx(
            &tx,
            actor,
            LogAction::Create,
            Changes::Absent,
            EntityType::Document,
            document.id.get(),
            now_ms,
        )?;

        tx.commit()?;
        Ok((document, log_entry))
    }

    pub fn document_update(
        &mut self,
        actor: Actor,
        id: DocumentId,
        patch: &DocumentPatch,
    ) -> Result<DocumentUpdate, StoreError> {
        patch
            .validate()
            .map_err(|err| StoreError::InvalidInput(err.message()))?;

        let now_ms = now_ms();
        let tx = self.conn.transaction()?;
        let before = select_document(&tx, id)?.ok_or(StoreError::UnknownId)?;
        let after = patch.apply_to(&before);
        let update = write_document_tx(&tx, actor, &before, after, now_ms)?;
        tx.commit()?;
        Ok(update)
    }

    /// Deletes the document and its grants; its log entries are kept.
    pub fn document_delete(
        &mut self,
        actor: Actor,
        id: DocumentId,
    ) -> Result<(Document, LogEntry), StoreError> {
        let now_ms = now_ms();
        let tx = self.conn.transaction()?;
        let document = select_document(&tx, id)?.ok_or(StoreError::UnknownId)?;

        tx.execute("DELETE FROM documents WHERE id=?1", params![id.get()])?;
        let log_entry = insert_log_entry_tx(
            &tx,
            actor,
            LogAction::Delete,
            Changes::Absent,
            EntityType::Document,
            id.get(),
            now_ms,
        )?;

        tx.commit()?;
        Ok((document, log_entry))
    }
}

/// Persists `after` over `before` and logs exactly the fields that differ.
/// Writes nothing when no audited field changed.
pub(super) fn write_document_tx(
    tx: &Transaction<'_>,
    actor: Actor,
    before: &Document,
    mut after: Document,
    now_ms: i64,
) -> Result<DocumentUpdate, StoreError> {
    let changes = document_changes(before, &after);
    if changes.is_empty() {
        return Ok(DocumentUpdate {
            document: before.clone(),
            log_entry: None,
        });
    }

    after.updated_at_ms = now_ms;
    tx.execute(
        "UPDATE documents SET title=?2, content=?3, updated_at_ms=?4 WHERE id=?1",
        params![after.id.get(), after.title, after.content, after.updated_at_ms],
    )?;
    let log_entry = insert_log_entry_tx(
        tx,
        actor,
        LogAction::Update,
        Changes::Recorded(changes),
        EntityType::Document,
        after.id.get(),
        now_ms,
    )?;

    Ok(DocumentUpdate {
        document: after,
        log_entry: Some(log_entry),
    })
}
