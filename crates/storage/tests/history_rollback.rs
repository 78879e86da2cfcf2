#![forbid(unsafe_code)]

use da_core::{
    Actor, ChangeSet, Changes, Document, DocumentPatch, EntityType, FieldChange, LogAction,
    LogEntry, User,
};
use da_storage::{
    CreateDocumentRequest, CreateUserRequest, DB_FILE_NAME, HistoryRequest, SqliteStore,
    StoreError,
};
use rusqlite::{Connection, params};
use tempfile::TempDir;

fn open_store() -> (TempDir, SqliteStore, User) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let mut store = SqliteStore::open(dir.path()).expect("open store");
    let owner = store
        .user_create(CreateUserRequest {
            username: "owner".to_string(),
            email: "owner@example.com".to_string(),
        })
        .expect("owner");
    (dir, store, owner)
}

fn create(store: &mut SqliteStore, owner: &User, title: &str) -> Document {
    store
        .document_create(
            Actor::new(owner.id),
            CreateDocumentRequest {
                title: title.to_string(),
                content: "body".to_string(),
            },
        )
        .expect("create document")
        .0
}

fn retitle(store: &mut SqliteStore, owner: &User, document: &Document, title: &str) -> LogEntry {
    let patch = DocumentPatch {
        title: Some(title.to_string()),
        content: None,
    };
    store
        .document_update(Actor::new(owner.id), document.id, &patch)
        .expect("update")
        .log_entry
        .expect("logged")
}

fn history(store: &SqliteStore, document: &Document) -> Vec<LogEntry> {
    store
        .log_list(HistoryRequest {
            entity_type: EntityType::Document,
            entity_id: document.id.get(),
            limit: None,
        })
        .expect("history")
}

#[test]
fn history_is_newest_first_and_scoped_to_one_document() {
    let (_dir, mut store, owner) = open_store();
    let first = create(&mut store, &owner, "a");
    let second = create(&mut store, &owner, "b");
    let l1 = retitle(&mut store, &owner, &first, "a2");
    let l2 = retitle(&mut store, &owner, &first, "a3");
    retitle(&mut store, &owner, &second, "b2");

    let entries = history(&store, &first);
    let ids: Vec<_> = entries.iter().map(|entry| entry.id).collect();
    assert_eq!(ids.len(), 3);
    assert_eq!(&ids[..2], &[l2.id, l1.id]);
    assert_eq!(entries[2].action, LogAction::Create);

    let limited = store
        .log_list(HistoryRequest {
            entity_type: EntityType::Document,
            entity_id: first.id.get(),
            limit: Some(1),
        })
        .expect("limited");
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].id, l2.id);

    // Restartable: a second query returns the same sequence.
    assert_eq!(history(&store, &first), entries);
}

#[test]
fn scoped_lookup_rejects_entries_of_other_documents() {
    let (_dir, mut store, owner) = open_store();
    let first = create(&mut store, &owner, "a");
    let second = create(&mut store, &owner, "b");
    let entry = retitle(&mut store, &owner, &first, "a2");

    assert!(
        store
            .log_get_for(entry.id, EntityType::Document, first.id.get())
            .expect("lookup")
            .is_some()
    );
    assert!(
        store
            .log_get_for(entry.id, EntityType::Document, second.id.get())
            .expect("lookup")
            .is_none()
    );
    assert!(
        store
            .log_get_for(entry.id, EntityType::DocumentAccess, first.id.get())
            .expect("lookup")
            .is_none()
    );
}

#[test]
fn rollback_replays_old_values_and_logs_the_reverse_change() {
    let (_dir, mut store, owner) = open_store();
    let document = create(&mut store, &owner, "A");
    let entry = retitle(&mut store, &owner, &document, "B");
    let Changes::Recorded(changes) = entry.changes else {
        panic!("expected recorded changes");
    };

    let update = store
        .document_rollback(Actor::new(owner.id), document.id, &changes)
        .expect("rollback");
    assert_eq!(update.document.title, "A");
    assert_eq!(update.document.owner, owner.id);

    let rollback_entry = update.log_entry.expect("rollback logged");
    assert_eq!(rollback_entry.action, LogAction::Update);
    let Changes::Recorded(reverse) = &rollback_entry.changes else {
        panic!("expected recorded changes");
    };
    assert_eq!(reverse.get("title"), Some(&FieldChange::new("B", "A")));
    assert_eq!(history(&store, &document)[0].id, rollback_entry.id);
}

#[test]
fn rollback_overwrites_intervening_edits() {
    let (_dir, mut store, owner) = open_store();
    let document = create(&mut store, &owner, "A");
    let entry = retitle(&mut store, &owner, &document, "B");
    retitle(&mut store, &owner, &document, "C");
    let changes = entry.changes.usable().expect("usable").clone();

    let update = store
        .document_rollback(Actor::new(owner.id), document.id, &changes)
        .expect("rollback");
    assert_eq!(update.document.title, "A");
    let Changes::Recorded(reverse) = &update.log_entry.expect("logged").changes else {
        panic!("expected recorded changes");
    };
    assert_eq!(reverse.get("title"), Some(&FieldChange::new("C", "A")));
}

#[test]
fn rollback_to_current_state_writes_nothing() {
    let (_dir, mut store, owner) = open_store();
    let document = create(&mut store, &owner, "A");
    let entry = retitle(&mut store, &owner, &document, "B");
    retitle(&mut store, &owner, &document, "A");
    let changes = entry.changes.usable().expect("usable").clone();

    let before = history(&store, &document).len();
    let update = store
        .document_rollback(Actor::new(owner.id), document.id, &changes)
        .expect("rollback");
    assert!(update.log_entry.is_none());
    assert_eq!(history(&store, &document).len(), before);
}

#[test]
fn rollback_rejects_empty_or_unrestorable_changes() {
    let (_dir, mut store, owner) = open_store();
    let document = create(&mut store, &owner, "A");

    let err = store
        .document_rollback(Actor::new(owner.id), document.id, &ChangeSet::new())
        .expect_err("empty");
    assert!(matches!(err, StoreError::MalformedChanges));

    let foreign = ChangeSet::parse(r#"{"owner_id": ["1", "2"]}"#).expect("parse");
    let err = store
        .document_rollback(Actor::new(owner.id), document.id, &foreign)
        .expect_err("unknown field");
    assert!(matches!(err, StoreError::MalformedChanges));
    assert_eq!(history(&store, &document).len(), 1);
}

#[test]
fn malformed_changes_column_is_flagged_on_read() {
    let (dir, mut store, owner) = open_store();
    let document = create(&mut store, &owner, "A");
    let entry = retitle(&mut store, &owner, &document, "B");

    {
        let conn = Connection::open(dir.path().join(DB_FILE_NAME)).expect("open db");
        conn.execute(
            "UPDATE log_entries SET changes_json=?2 WHERE id=?1",
            params![entry.id.get(), r#"{"title": "B"}"#],
        )
        .expect("corrupt entry");
    }

    let read = store.log_get(entry.id).expect("get").expect("exists");
    assert!(read.changes.is_malformed());
    assert!(read.changes.usable().is_none());
}
