#![forbid(unsafe_code)]

use crate::changes::Changes;
use crate::ids::{DocumentId, GrantId, LogId, UserId};
use serde::{Deserialize, Serialize};

pub const MAX_TITLE_LEN: usize = 255;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    pub content: String,
    pub owner: UserId,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

impl Document {
    pub fn is_owned_by(&self, subject: UserId) -> bool {
        self.owner == subject
    }

    pub fn field(&self, field: DocumentField) -> &str {
        match field {
            DocumentField::Title => &self.title,
            DocumentField::Content => &self.content,
        }
    }

    pub fn set_field(&mut self, field: DocumentField, value: String) {
        match field {
            DocumentField::Title => self.title = value,
            DocumentField::Content => self.content = value,
        }
    }
}

/// The audited, user-editable columns of a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DocumentField {
    Title,
    Content,
}

impl DocumentField {
    pub const ALL: [DocumentField; 2] = [DocumentField::Title, DocumentField::Content];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Content => "content",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DocumentFieldError {
    TitleEmpty,
    TitleTooLong,
}

impl DocumentFieldError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::TitleEmpty => "title must not be empty",
            Self::TitleTooLong => "title must be at most 255 characters",
        }
    }
}

pub fn validate_title(value: &str) -> Result<(), DocumentFieldError> {
    if value.trim().is_empty() {
        return Err(DocumentFieldError::TitleEmpty);
    }
    if value.chars().count() > MAX_TITLE_LEN {
        return Err(DocumentFieldError::TitleTooLong);
    }
    Ok(())
}

/// Field-wise update; `None` keeps the current value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct DocumentPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl DocumentPatch {
    pub fn validate(&self) -> Result<(), DocumentFieldError> {
        match self.title.as_deref() {
            Some(title) => validate_title(title),
            None => Ok(()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }

    pub fn apply_to(&self, document: &Document) -> Document {
        let mut next = document.clone();
        if let Some(title) = &self.title {
            next.title = title.clone();
        }
        if let Some(content) = &self.content {
            next.content = content.clone();
        }
        next
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessType {
    View,
    Edit,
    Delete,
}

impl AccessType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "view" => Some(Self::View),
            "edit" => Some(Self::Edit),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

/// A delegated right on one document for one non-owner user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentAccess {
    pub id: GrantId,
    pub document: DocumentId,
    pub user: UserId,
    pub access_type: AccessType,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogAction {
    Create,
    Update,
    Delete,
}

impl LogAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "create" => Some(Self::Create),
            "update" => Some(Self::Update),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Document,
    DocumentAccess,
}

impl EntityType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::DocumentAccess => "document_access",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "document" => Some(Self::Document),
            "document_access" => Some(Self::DocumentAccess),
            _ => None,
        }
    }
}

/// Identity a mutation is attributed to in the change log.
///
/// Every mutating store call takes one by value; there is no ambient
/// "current actor".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Actor {
    user: UserId,
}

impl Actor {
    pub const fn new(user: UserId) -> Self {
        Self { user }
    }

    pub const fn user(self) -> UserId {
        self.user
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub id: LogId,
    pub actor: Option<UserId>,
    pub action: LogAction,
    pub changes: Changes,
    pub entity_type: EntityType,
    pub entity_id: i64,
    pub ts_ms: i64,
}

impl LogEntry {
    pub fn targets(&self, entity_type: EntityType, entity_id: i64) -> bool {
        self.entity_type == entity_type && self.entity_id == entity_id
    }
}
