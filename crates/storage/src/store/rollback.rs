#![forbid(unsafe_code)]

use super::documents::write_document_tx;
use super::support::{now_ms, select_document};
use super::{DocumentUpdate, SqliteStore, StoreError};
use da_core::changes::restore_document;
use da_core::{Actor, ChangeSet, DocumentId};

impl SqliteStore {
    /// Writes the recorded old values of `changes` onto the current document.
    ///
    /// The recorded new values are not compared with the current state, so
    /// edits made after the entry was written are overwritten. The write is
    /// logged like any other update: pre-rollback state to restored state.
    pub fn document_rollback(
        &mut self,
        actor: Actor,
        id: DocumentId,
        changes: &ChangeSet,
    ) -> Result<DocumentUpdate, StoreError> {
        if changes.is_empty() {
            return Err(StoreError::MalformedChanges);
        }

        let now_ms = now_ms();
        let tx = self.conn.transaction()?;
        let before = select_document(&tx, id)?.ok_or(StoreError::UnknownId)?;
        let restored = restore_document(&before, changes).map_err(|err| {
            tracing::warn!(document_id = id.get(), reason = err.message(), "rollback rejected");
            StoreError::MalformedChanges
        })?;
        let update = write_document_tx(&tx, actor, &before, restored, now_ms)?;
        tx.commit()?;
        Ok(update)
    }
}
