#![forbid(unsafe_code)]

use da_core::{AccessType, DocumentId, EntityType, UserId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateDocumentRequest {
    pub title: String,
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateGrantRequest {
    pub document: DocumentId,
    pub user: UserId,
    pub access_type: AccessType,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRequest {
    pub entity_type: EntityType,
    pub entity_id: i64,
    pub limit: Option<usize>,
}
