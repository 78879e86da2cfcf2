#![forbid(unsafe_code)]

use da_core::{Actor, DocumentId, EntityType, User};
use da_storage::{
    CreateDocumentRequest, CreateUserRequest, DB_FILE_NAME, HistoryRequest, SqliteStore,
};
use rusqlite::{Connection, params};

fn owner(store: &mut SqliteStore) -> User {
    store
        .user_create(CreateUserRequest {
            username: "owner".to_string(),
            email: "owner@example.com".to_string(),
        })
        .expect("owner")
}

#[test]
fn failed_log_write_rolls_back_the_entity_write() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let mut store = SqliteStore::open(dir.path()).expect("open store");
    let owner = owner(&mut store);

    // Make every log insert fail so the mutation's transaction cannot commit.
    {
        let conn = Connection::open(dir.path().join(DB_FILE_NAME)).expect("open db");
        conn.execute_batch(
            r#"
            CREATE TRIGGER reject_log_entries BEFORE INSERT ON log_entries
            BEGIN
              SELECT RAISE(ABORT, 'log unavailable');
            END;
            "#,
        )
        .expect("install trigger");
    }

    let err = store
        .document_create(
            Actor::new(owner.id),
            CreateDocumentRequest {
                title: "t".to_string(),
                content: String::new(),
            },
        )
        .expect_err("log insert must fail");
    assert!(err.to_string().contains("log unavailable"), "got {err}");
    assert!(store.document_list().expect("list").is_empty());
}

#[test]
fn uncommitted_transaction_is_not_persisted_after_reopen() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let owner_id = {
        let mut store = SqliteStore::open(dir.path()).expect("open store");
        owner(&mut store).id
    };

    {
        let mut conn = Connection::open(dir.path().join(DB_FILE_NAME)).expect("open db");
        let tx = conn.transaction().expect("begin tx");
        tx.execute(
            "INSERT INTO documents(id, title, content, owner_id, created_at_ms, updated_at_ms) \
             VALUES (?1, ?2, ?3, ?4, 0, 0)",
            params![77i64, "ghost", "", owner_id.get()],
        )
        .expect("insert document");
        // Drop without commit -> rollback (simulated crash before commit).
    }

    let store = SqliteStore::open(dir.path()).expect("open store again");
    assert!(
        store
            .document_get(DocumentId::new(77))
            .expect("get")
            .is_none()
    );
    let history = store
        .log_list(HistoryRequest {
            entity_type: EntityType::Document,
            entity_id: 77,
            limit: None,
        })
        .expect("history");
    assert!(history.is_empty());
}
