#![forbid(unsafe_code)]

//! Operations behind the HTTP surface. Each function runs synchronously
//! against one store handle and performs its own authorization.

pub mod documents;
pub mod grants;
pub mod history;
pub mod rollback;

use crate::error::ServiceError;
use da_core::{Document, DocumentId, Operation, UserId, authorize};
use da_storage::SqliteStore;

pub(crate) const DOCUMENT_NOT_FOUND: &str = "Document not found.";
pub(crate) const PERMISSION_DENIED: &str = "You do not have permission to perform this action.";

pub(crate) fn find_document(
    store: &SqliteStore,
    id: DocumentId,
) -> Result<Document, ServiceError> {
    store
        .document_get(id)?
        .ok_or(ServiceError::NotFound(DOCUMENT_NOT_FOUND))
}

/// Loads a document and applies the access policy for `operation`.
pub(crate) fn authorized_document(
    store: &SqliteStore,
    subject: UserId,
    id: DocumentId,
    operation: Operation,
) -> Result<Document, ServiceError> {
    let document = find_document(store, id)?;
    let grant = if document.is_owned_by(subject) {
        None
    } else {
        store.grant_for(id, subject)?
    };

    if !authorize(subject, &document, grant.as_ref(), operation) {
        tracing::info!(
            subject = subject.get(),
            document_id = id.get(),
            operation = operation.as_str(),
            "access denied"
        );
        return Err(ServiceError::Authorization(PERMISSION_DENIED));
    }
    Ok(document)
}

/// Loads a document the subject must own. Used for the owner-only
/// operations that are never delegated through grants.
pub(crate) fn owned_document(
    store: &SqliteStore,
    subject: UserId,
    id: DocumentId,
    denied: &'static str,
) -> Result<Document, ServiceError> {
    let document = find_document(store, id)?;
    if !document.is_owned_by(subject) {
        tracing::info!(
            subject = subject.get(),
            document_id = id.get(),
            "owner-only operation denied"
        );
        return Err(ServiceError::Authorization(denied));
    }
    Ok(document)
}
