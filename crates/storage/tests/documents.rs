#![forbid(unsafe_code)]

use da_core::{Actor, Changes, DocumentPatch, EntityType, FieldChange, LogAction, User};
use da_storage::{
    CreateDocumentRequest, CreateUserRequest, HistoryRequest, SqliteStore, StoreError,
};
use tempfile::TempDir;

fn open_store() -> (TempDir, SqliteStore) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = SqliteStore::open(dir.path()).expect("open store");
    (dir, store)
}

fn user(store: &mut SqliteStore, username: &str) -> User {
    store
        .user_create(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
        })
        .expect("create user")
}

fn doc_request(title: &str, content: &str) -> CreateDocumentRequest {
    CreateDocumentRequest {
        title: title.to_string(),
        content: content.to_string(),
    }
}

#[test]
fn create_sets_owner_and_logs_create_without_changes() {
    let (_dir, mut store) = open_store();
    let owner = user(&mut store, "owner");

    let (document, entry) = store
        .document_create(Actor::new(owner.id), doc_request("v1", "body"))
        .expect("create document");

    assert_eq!(document.owner, owner.id);
    assert_eq!(document.created_at_ms, document.updated_at_ms);
    assert_eq!(entry.action, LogAction::Create);
    assert_eq!(entry.actor, Some(owner.id));
    assert_eq!(entry.changes, Changes::Absent);
    assert!(entry.targets(EntityType::Document, document.id.get()));

    let fetched = store.document_get(document.id).expect("get").expect("exists");
    assert_eq!(fetched, document);
}

#[test]
fn create_rejects_blank_title_and_unknown_owner() {
    let (_dir, mut store) = open_store();
    let owner = user(&mut store, "owner");

    let err = store
        .document_create(Actor::new(owner.id), doc_request("   ", "body"))
        .expect_err("blank title");
    assert!(matches!(err, StoreError::InvalidInput("title must not be empty")));

    let err = store
        .document_create(Actor::new(da_core::UserId::new(999)), doc_request("t", ""))
        .expect_err("unknown owner");
    assert!(matches!(err, StoreError::UnknownUser), "got {err:?}");
    assert!(store.document_list().expect("list").is_empty());
}

#[test]
fn update_records_only_changed_fields() {
    let (_dir, mut store) = open_store();
    let owner = user(&mut store, "owner");
    let (document, _) = store
        .document_create(Actor::new(owner.id), doc_request("v1", "body"))
        .expect("create document");

    let patch = DocumentPatch {
        title: Some("v2".to_string()),
        content: Some("body".to_string()),
    };
    let update = store
        .document_update(Actor::new(owner.id), document.id, &patch)
        .expect("update");

    assert_eq!(update.document.title, "v2");
    let entry = update.log_entry.expect("update logged");
    assert_eq!(entry.action, LogAction::Update);
    let Changes::Recorded(changes) = &entry.changes else {
        panic!("expected recorded changes, got {:?}", entry.changes);
    };
    assert_eq!(changes.len(), 1);
    assert_eq!(changes.get("title"), Some(&FieldChange::new("v1", "v2")));
    assert!(changes.get("content").is_none());
}

#[test]
fn update_without_effective_change_writes_nothing() {
    let (_dir, mut store) = open_store();
    let owner = user(&mut store, "owner");
    let (document, _) = store
        .document_create(Actor::new(owner.id), doc_request("v1", "body"))
        .expect("create document");

    let patch = DocumentPatch {
        title: Some("v1".to_string()),
        content: None,
    };
    let update = store
        .document_update(Actor::new(owner.id), document.id, &patch)
        .expect("update");
    assert!(update.log_entry.is_none());
    assert_eq!(update.document, document);

    let history = store
        .log_list(HistoryRequest {
            entity_type: EntityType::Document,
            entity_id: document.id.get(),
            limit: None,
        })
        .expect("history");
    assert_eq!(history.len(), 1);
}

#[test]
fn update_attributes_the_acting_subject() {
    let (_dir, mut store) = open_store();
    let owner = user(&mut store, "owner");
    let editor = user(&mut store, "editor");
    let (document, _) = store
        .document_create(Actor::new(owner.id), doc_request("v1", "body"))
        .expect("create document");

    let patch = DocumentPatch {
        title: None,
        content: Some("edited".to_string()),
    };
    let update = store
        .document_update(Actor::new(editor.id), document.id, &patch)
        .expect("update");
    assert_eq!(update.log_entry.expect("logged").actor, Some(editor.id));
    assert_eq!(update.document.owner, owner.id);
}

#[test]
fn delete_keeps_history_and_unknown_ids_fail() {
    let (_dir, mut store) = open_store();
    let owner = user(&mut store, "owner");
    let (document, _) = store
        .document_create(Actor::new(owner.id), doc_request("v1", "body"))
        .expect("create document");

    let (deleted, entry) = store
        .document_delete(Actor::new(owner.id), document.id)
        .expect("delete");
    assert_eq!(deleted.id, document.id);
    assert_eq!(entry.action, LogAction::Delete);
    assert_eq!(entry.changes, Changes::Absent);
    assert!(store.document_get(document.id).expect("get").is_none());

    let history = store
        .log_list(HistoryRequest {
            entity_type: EntityType::Document,
            entity_id: document.id.get(),
            limit: None,
        })
        .expect("history");
    let actions: Vec<_> = history.iter().map(|entry| entry.action).collect();
    assert_eq!(actions, vec![LogAction::Delete, LogAction::Create]);

    let err = store
        .document_delete(Actor::new(owner.id), document.id)
        .expect_err("already deleted");
    assert!(matches!(err, StoreError::UnknownId));
}

#[test]
fn duplicate_username_is_rejected() {
    let (_dir, mut store) = open_store();
    user(&mut store, "alice");
    let err = store
        .user_create(CreateUserRequest {
            username: "alice".to_string(),
            email: "other@example.com".to_string(),
        })
        .expect_err("duplicate");
    assert!(matches!(err, StoreError::UserExists));
    assert_eq!(store.user_list().expect("list").len(), 1);
}
