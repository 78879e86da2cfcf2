#![forbid(unsafe_code)]

use crate::service::rollback::RollbackOutcome;
use crate::time::ts_ms_to_rfc3339;
use da_core::{
    AccessType, ChangeSet, Changes, Document, DocumentAccess, DocumentId, EntityType, GrantId,
    LogAction, LogEntry, LogId, User, UserId,
};
use da_storage::{SqliteStore, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Deserialize)]
pub struct CreateDocumentBody {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Body of a full replacement; both fields are required.
#[derive(Debug, Deserialize)]
pub struct ReplaceDocumentBody {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateGrantBody {
    pub user_id: UserId,
    pub access_type: AccessType,
}

#[derive(Debug, Deserialize)]
pub struct UpdateGrantBody {
    pub access_type: AccessType,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            username: value.username,
            email: value.email,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct DocumentResponse {
    pub id: DocumentId,
    pub title: String,
    pub content: String,
    pub owner: Option<UserResponse>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct GrantResponse {
    pub id: GrantId,
    pub document: DocumentId,
    pub user: Option<UserResponse>,
    pub access_type: AccessType,
}

#[derive(Clone, Debug, Serialize)]
pub struct LogEntryResponse {
    pub id: LogId,
    pub actor: Option<UserResponse>,
    pub action: LogAction,
    pub changes: Option<ChangeSet>,
    /// Set when the stored changes could not be parsed; `changes` is null.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub changes_malformed: bool,
    pub entity_type: EntityType,
    pub entity_id: i64,
    pub timestamp: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct RollbackResponse {
    pub detail: String,
    pub document: DocumentResponse,
    pub log_entry: Option<LogEntryResponse>,
}

/// Users referenced by a batch of responses, loaded with one lookup pass.
pub(crate) struct Users(BTreeMap<UserId, User>);

impl Users {
    pub(crate) fn load(
        store: &SqliteStore,
        ids: impl IntoIterator<Item = UserId>,
    ) -> Result<Self, StoreError> {
        let ids: BTreeSet<UserId> = ids.into_iter().collect();
        Ok(Self(store.users_by_ids(&ids)?))
    }

    fn get(&self, id: UserId) -> Option<UserResponse> {
        self.0.get(&id).cloned().map(UserResponse::from)
    }

    pub(crate) fn document(&self, document: Document) -> DocumentResponse {
        DocumentResponse {
            owner: self.get(document.owner),
            id: document.id,
            title: document.title,
            content: document.content,
            created_at: ts_ms_to_rfc3339(document.created_at_ms),
            updated_at: ts_ms_to_rfc3339(document.updated_at_ms),
        }
    }

    pub(crate) fn grant(&self, grant: DocumentAccess) -> GrantResponse {
        GrantResponse {
            id: grant.id,
            document: grant.document,
            user: self.get(grant.user),
            access_type: grant.access_type,
        }
    }

    pub(crate) fn log_entry(&self, entry: LogEntry) -> LogEntryResponse {
        let changes_malformed = entry.changes.is_malformed();
        let changes = match entry.changes {
            Changes::Recorded(set) => Some(set),
            Changes::Absent | Changes::Malformed(_) => None,
        };
        LogEntryResponse {
            id: entry.id,
            actor: entry.actor.and_then(|actor| self.get(actor)),
            action: entry.action,
            changes,
            changes_malformed,
            entity_type: entry.entity_type,
            entity_id: entry.entity_id,
            timestamp: ts_ms_to_rfc3339(entry.ts_ms),
        }
    }
}

pub(crate) fn document_response(
    store: &SqliteStore,
    document: Document,
) -> Result<DocumentResponse, StoreError> {
    Ok(Users::load(store, [document.owner])?.document(document))
}

pub(crate) fn rollback_response(
    store: &SqliteStore,
    outcome: RollbackOutcome,
) -> Result<RollbackResponse, StoreError> {
    let mut ids = vec![outcome.document.owner];
    ids.extend(outcome.log_entry.as_ref().and_then(|entry| entry.actor));
    let users = Users::load(store, ids)?;
    Ok(RollbackResponse {
        detail: format!("Document rolled back using log {}", outcome.source),
        document: users.document(outcome.document),
        log_entry: outcome.log_entry.map(|entry| users.log_entry(entry)),
    })
}
