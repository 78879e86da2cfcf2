#![forbid(unsafe_code)]

use super::authorized_document;
use crate::error::ServiceError;
use da_core::{DocumentId, EntityType, LogEntry, Operation, UserId};
use da_storage::{HistoryRequest, SqliteStore};

/// Log entries for a readable document, newest first.
pub fn history(
    store: &SqliteStore,
    subject: UserId,
    document: DocumentId,
    limit: Option<usize>,
) -> Result<Vec<LogEntry>, ServiceError> {
    authorized_document(store, subject, document, Operation::Read)?;
    Ok(store.log_list(HistoryRequest {
        entity_type: EntityType::Document,
        entity_id: document.get(),
        limit,
    })?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing;
    use axum::http::StatusCode;
    use da_core::{AccessType, Actor, DocumentPatch, LogAction};

    #[test]
    fn readers_see_history_newest_first() {
        let mut store = testing::store();
        let owner = testing::user(&mut store, "owner");
        let viewer = testing::user(&mut store, "viewer");
        let stranger = testing::user(&mut store, "stranger");
        let doc = testing::document(&mut store, &owner, "v1");
        store
            .document_update(
                Actor::new(owner.id),
                doc.id,
                &DocumentPatch {
                    title: Some("v2".to_string()),
                    content: None,
                },
            )
            .expect("update");
        testing::grant(&mut store, &doc, &viewer, AccessType::View);

        let entries = history(&store, viewer.id, doc.id, None).expect("history");
        let actions: Vec<_> = entries.iter().map(|entry| entry.action).collect();
        assert_eq!(actions, vec![LogAction::Update, LogAction::Create]);

        let limited = history(&store, owner.id, doc.id, Some(1)).expect("limited");
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].action, LogAction::Update);

        let err = history(&store, stranger.id, doc.id, None).unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        let err = history(&store, owner.id, DocumentId::new(404), None).unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
