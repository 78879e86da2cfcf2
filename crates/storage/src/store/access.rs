#![forbid(unsafe_code)]

use super::support::{
    ACCESS_COLUMNS, access_from_row, insert_log_entry_tx, now_ms, select_document, select_grant,
    select_user,
};
use super::{CreateGrantRequest, GrantUpdate, SqliteStore, StoreError, is_unique_violation};
use da_core::{
    AccessType, Actor, ChangeSet, Changes, DocumentAccess, DocumentId, EntityType, GrantId,
    LogAction, LogEntry, UserId,
};
use rusqlite::{OptionalExtension, params};

impl SqliteStore {
    /// The unique grant for (document, user), if any. Absence is a normal
    /// result, not an error.
    pub fn grant_for(
        &self,
        document: DocumentId,
        user: UserId,
    ) -> Result<Option<DocumentAccess>, StoreError> {
        Ok(self
            .conn
            .query_row(
                &format!(
                    "SELECT {ACCESS_COLUMNS} FROM document_access \
                     WHERE document_id=?1 AND user_id=?2"
                ),
                params![document.get(), user.get()],
                access_from_row,
            )
            .optional()?)
    }

    pub fn grant_get(&self, id: GrantId) -> Result<Option<DocumentAccess>, StoreError> {
        select_grant(&self.conn, id)
    }

    pub fn grant_list(&self, document: DocumentId) -> Result<Vec<DocumentAccess>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ACCESS_COLUMNS} FROM document_access WHERE document_id=?1 ORDER BY id ASC"
        ))?;
        let rows = stmt.query_map(params![document.get()], access_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn grant_create(
        &mut self,
        actor: Actor,
        request: CreateGrantRequest,
    ) -> Result<(DocumentAccess, LogEntry), StoreError> {
        let now_ms = now_ms();
        let tx = self.conn.transaction()?;

        let document = select_document(&tx, request.document)?.ok_or(StoreError::UnknownId)?;
        if select_user(&tx, request.user)?.is_none() {
            return Err(StoreError::UnknownUser);
        }
        if document.owner == request.user {
            return Err(StoreError::InvalidInput("the owner cannot be granted access"));
        }

        let insert = tx.execute(
            "INSERT INTO document_access(document_id, user_id, access_type) VALUES (?1, ?2, ?3)",
            params![
                request.document.get(),
                request.user.get(),
                request.access_type.as_str()
            ],
        );
        if let Err(err) = insert {
            if is_unique_violation(&err) {
                return Err(StoreError::GrantExists);
            }
            return Err(err.into());
        }

        let grant = DocumentAccess {
            id: GrantId::new(tx.last_insert_rowid()),
            document: request.document,
            user: request.user,
            access_type: request.access_type,
        };
        let log_entry = insert_log_entry_tx(
            &tx,
            actor,
            LogAction::Create,
            Changes::Absent,
            EntityType::DocumentAccess,
            grant.id.get(),
            now_ms,
        )?;

        tx.commit()?;
        Ok((grant, log_entry))
    }

    pub fn grant_update(
        &mut self,
        actor: Actor,
        id: GrantId,
        access_type: AccessType,
    ) -> Result<GrantUpdate, StoreError> {
        let now_ms = now_ms();
        let tx = self.conn.transaction()?;
        let before = select_grant(&tx, id)?.ok_or(StoreError::UnknownId)?;

        let mut changes = ChangeSet::new();
        changes.record(
            "access_type",
            before.access_type.as_str(),
            access_type.as_str(),
        );
        if changes.is_empty() {
            return Ok(GrantUpdate {
                grant: before,
                log_entry: None,
            });
        }

        tx.execute(
            "UPDATE document_access SET access_type=?2 WHERE id=?1",
            params![id.get(), access_type.as_str()],
        )?;
        let log_entry = insert_log_entry_tx(
            &tx,
            actor,
            LogAction::Update,
            Changes::Recorded(changes),
            EntityType::DocumentAccess,
            id.get(),
            now_ms,
        )?;

        tx.commit()?;
        Ok(GrantUpdate {
            grant: DocumentAccess {
                access_type,
                ..before
            },
            log_entry: Some(log_entry),
        })
    }

    pub fn grant_delete(
        &mut self,
        actor: Actor,
        id: GrantId,
    ) -> Result<(DocumentAccess, LogEntry), StoreError> {
        let now_ms = now_ms();
        let tx = self.conn.transaction()?;
        let grant = select_grant(&tx, id)?.ok_or(StoreError::UnknownId)?;

        tx.execute("DELETE FROM document_access WHERE id=?1", params![id.get()])?;
        let log_entry = insert_log_entry_tx(
            &tx,
            actor,
            LogAction::Delete,
            Changes::Absent,
            EntityType::DocumentAccess,
            id.get(),
            now_ms,
        )?;

        tx.commit()?;
        Ok((grant, log_entry))
    }
}
