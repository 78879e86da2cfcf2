#![forbid(unsafe_code)]

use super::authorized_document;
use crate::error::ServiceError;
use da_core::{Actor, Document, DocumentId, DocumentPatch, Operation, UserId};
use da_storage::{CreateDocumentRequest, DocumentUpdate, SqliteStore};

/// Every document, regardless of owner or grants.
pub fn list(store: &SqliteStore) -> Result<Vec<Document>, ServiceError> {
    Ok(store.document_list()?)
}

pub fn create(
    store: &mut SqliteStore,
    subject: UserId,
    request: CreateDocumentRequest,
) -> Result<Document, ServiceError> {
    let (document, log_entry) = store.document_create(Actor::new(subject), request)?;
    tracing::info!(
        document_id = document.id.get(),
        log_id = log_entry.id.get(),
        "document created"
    );
    Ok(document)
}

pub fn retrieve(
    store: &SqliteStore,
    subject: UserId,
    id: DocumentId,
) -> Result<Document, ServiceError> {
    authorized_document(store, subject, id, Operation::Read)
}

/// Applies `patch`; a patch that changes nothing writes nothing.
pub fn update(
    store: &mut SqliteStore,
    subject: UserId,
    id: DocumentId,
    patch: &DocumentPatch,
) -> Result<DocumentUpdate, ServiceError> {
    authorized_document(store, subject, id, Operation::Update)?;
    let update = store.document_update(Actor::new(subject), id, patch)?;
    match &update.log_entry {
        Some(entry) => tracing::info!(
            document_id = id.get(),
            log_id = entry.id.get(),
            "document updated"
        ),
        None => tracing::debug!(document_id = id.get(), "document update was a no-op"),
    }
    Ok(update)
}

pub fn delete(
    store: &mut SqliteStore,
    subject: UserId,
    id: DocumentId,
) -> Result<(), ServiceError> {
    authorized_document(store, subject, id, Operation::Delete)?;
    let (_, log_entry) = store.document_delete(Actor::new(subject), id)?;
    tracing::info!(document_id = id.get(), log_id = log_entry.id.get(), "document deleted");
    Ok(())
}
