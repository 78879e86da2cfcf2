#![forbid(unsafe_code)]

use super::owned_document;
use crate::error::ServiceError;
use da_core::{AccessType, Actor, DocumentAccess, DocumentId, GrantId, UserId};
use da_storage::{CreateGrantRequest, GrantUpdate, SqliteStore};

pub(crate) const ONLY_OWNER_ASSIGNS: &str = "Only owner can assign access.";
pub(crate) const ONLY_OWNER_LISTS: &str = "Only owner can view access list.";
const GRANT_NOT_FOUND: &str = "Access grant not found.";

pub fn create(
    store: &mut SqliteStore,
    subject: UserId,
    document: DocumentId,
    user: UserId,
    access_type: AccessType,
) -> Result<DocumentAccess, ServiceError> {
    owned_document(store, subject, document, ONLY_OWNER_ASSIGNS)?;
    let (grant, log_entry) = store.grant_create(
        Actor::new(subject),
        CreateGrantRequest {
            document,
            user,
            access_type,
        },
    )?;
    tracing::info!(
        document_id = document.get(),
        grant_id = grant.id.get(),
        access_type = access_type.as_str(),
        log_id = log_entry.id.get(),
        "access granted"
    );
    Ok(grant)
}

pub fn list(
    store: &SqliteStore,
    subject: UserId,
    document: DocumentId,
) -> Result<Vec<DocumentAccess>, ServiceError> {
    owned_document(store, subject, document, ONLY_OWNER_LISTS)?;
    Ok(store.grant_list(document)?)
}

pub fn update(
    store: &mut SqliteStore,
    subject: UserId,
    document: DocumentId,
    grant: GrantId,
    access_type: AccessType,
) -> Result<GrantUpdate, ServiceError> {
    owned_document(store, subject, document, ONLY_OWNER_ASSIGNS)?;
    grant_on(store, document, grant)?;
    let update = store.grant_update(Actor::new(subject), grant, access_type)?;
    if update.log_entry.is_some() {
        tracing::info!(
            grant_id = grant.get(),
            access_type = access_type.as_str(),
            "access changed"
        );
    }
    Ok(update)
}

pub fn revoke(
    store: &mut SqliteStore,
    subject: UserId,
    document: DocumentId,
    grant: GrantId,
) -> Result<(), ServiceError> {
    owned_document(store, subject, document, ONLY_OWNER_ASSIGNS)?;
    grant_on(store, document, grant)?;
    store.grant_delete(Actor::new(subject), grant)?;
    tracing::info!(document_id = document.get(), grant_id = grant.get(), "access revoked");
    Ok(())
}

/// A grant id addressed through another document's path is not found.
fn grant_on(
    store: &SqliteStore,
    document: DocumentId,
    grant: GrantId,
) -> Result<DocumentAccess, ServiceError> {
    store
        .grant_get(grant)?
        .filter(|found| found.document == document)
        .ok_or(ServiceError::NotFound(GRANT_NOT_FOUND))
}
