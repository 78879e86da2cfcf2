#![forbid(unsafe_code)]

//! Access decisions for a subject acting on a document.
//!
//! The owner may do anything. Everybody else needs the single grant stored
//! for (document, subject); any grant allows reading, `edit` allows updates
//! and `delete` allows deletion. Grant management and rollback are not
//! operations here: they are owner-only and checked by their callers.

use crate::ids::UserId;
use crate::model::{AccessType, Document, DocumentAccess};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Read,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// `grant` is the result of looking up the (document, subject) grant. A
/// missing grant is a plain deny, not an error.
pub fn authorize(
    subject: UserId,
    document: &Document,
    grant: Option<&DocumentAccess>,
    operation: Operation,
) -> bool {
    if document.is_owned_by(subject) {
        return true;
    }

    let Some(grant) = grant.filter(|grant| grant.document == document.id && grant.user == subject)
    else {
        return false;
    };

    match operation {
        Operation::Read => matches!(
            grant.access_type,
            AccessType::View | AccessType::Edit | AccessType::Delete
        ),
        Operation::Update => grant.access_type == AccessType::Edit,
        Operation::Delete => grant.access_type == AccessType::Delete,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{DocumentId, GrantId};

    const OWNER: UserId = UserId::new(1);
    const OTHER: UserId = UserId::new(2);

    fn document() -> Document {
        Document {
            id: DocumentId::new(10),
            title: "t".to_string(),
            content: String::new(),
            owner: OWNER,
            created_at_ms: 0,
            updated_at_ms: 0,
        }
    }

    fn grant(access_type: AccessType) -> DocumentAccess {
        DocumentAccess {
            id: GrantId::new(1),
            document: DocumentId::new(10),
            user: OTHER,
            access_type,
        }
    }

    const ALL_OPS: [Operation; 3] = [Operation::Read, Operation::Update, Operation::Delete];

    #[test]
    fn owner_is_allowed_everything() {
        for op in ALL_OPS {
            assert!(authorize(OWNER, &document(), None, op), "{}", op.as_str());
        }
    }

    #[test]
    fn no_grant_denies_everything() {
        for op in ALL_OPS {
            assert!(!authorize(OTHER, &document(), None, op), "{}", op.as_str());
        }
    }

    #[test]
    fn grant_levels() {
        let doc = document();
        let view = grant(AccessType::View);
        let edit = grant(AccessType::Edit);
        let delete = grant(AccessType::Delete);

        for g in [&view, &edit, &delete] {
            assert!(authorize(OTHER, &doc, Some(g), Operation::Read));
        }

        assert!(!authorize(OTHER, &doc, Some(&view), Operation::Update));
        assert!(authorize(OTHER, &doc, Some(&edit), Operation::Update));
        assert!(!authorize(OTHER, &doc, Some(&delete), Operation::Update));

        assert!(!authorize(OTHER, &doc, Some(&view), Operation::Delete));
        assert!(!authorize(OTHER, &doc, Some(&edit), Operation::Delete));
        assert!(authorize(OTHER, &doc, Some(&delete), Operation::Delete));
    }

    #[test]
    fn grant_for_another_pair_is_ignored() {
        let doc = document();
        let mut foreign = grant(AccessType::Edit);
        foreign.document = DocumentId::new(11);
        assert!(!authorize(OTHER, &doc, Some(&foreign), Operation::Read));

        let mut someone_else = grant(AccessType::Edit);
        someone_else.user = UserId::new(3);
        assert!(!authorize(OTHER, &doc, Some(&someone_else), Operation::Read));
    }
}
