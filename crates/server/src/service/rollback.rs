#![forbid(unsafe_code)]

use super::find_document;
use crate::error::{NO_CHANGES_FOUND, ServiceError};
use da_core::{Actor, Document, DocumentId, EntityType, LogEntry, LogId, UserId};
use da_storage::SqliteStore;

pub(crate) const ONLY_OWNER_ROLLS_BACK: &str = "Only owner can rollback.";
const LOG_ENTRY_NOT_FOUND: &str = "Log entry not found.";

#[derive(Clone, Debug)]
pub struct RollbackOutcome {
    pub source: LogId,
    pub document: Document,
    /// `None` when the document already held the recorded old values.
    pub log_entry: Option<LogEntry>,
}

/// Restores the old values recorded in log entry `log_id` of `document`.
///
/// Checks run in a fixed order: the document, the log entry scoped to that
/// document, ownership, then the recorded change set. A change set naming
/// fields that cannot be restored is rejected by the store.
pub fn rollback(
    store: &mut SqliteStore,
    subject: UserId,
    document: DocumentId,
    log_id: LogId,
) -> Result<RollbackOutcome, ServiceError> {
    let current = find_document(store, document)?;
    let entry = store
        .log_get_for(log_id, EntityType::Document, document.get())?
        .ok_or(ServiceError::NotFound(LOG_ENTRY_NOT_FOUND))?;
    if !current.is_owned_by(subject) {
        return Err(ServiceError::Authorization(ONLY_OWNER_ROLLS_BACK));
    }

    let Some(changes) = entry.changes.usable() else {
        if entry.changes.is_malformed() {
            tracing::warn!(log_id = log_id.get(), "log entry has malformed changes");
        }
        return Err(ServiceError::InvalidState(NO_CHANGES_FOUND));
    };
    let update = store.document_rollback(Actor::new(subject), document, changes)?;
    tracing::info!(
        document_id = document.get(),
        source_log_id = log_id.get(),
        log_id = update.log_entry.as_ref().map(|entry| entry.id.get()),
        "document rolled back"
    );
    Ok(RollbackOutcome {
        source: log_id,
        document: update.document,
        log_entry: update.log_entry,
    })
}
