#![forbid(unsafe_code)]

pub mod changes;
pub mod ids;
pub mod model;
pub mod policy;

pub use changes::{ChangeSet, ChangeSetError, Changes, FieldChange};
pub use ids::{DocumentId, GrantId, LogId, UserId};
pub use model::{
    AccessType, Actor, Document, DocumentAccess, DocumentField, DocumentFieldError,
    DocumentPatch, EntityType, LogAction, LogEntry, User,
};
pub use policy::{Operation, authorize};
