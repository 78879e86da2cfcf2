#![forbid(unsafe_code)]

mod access;
mod documents;
mod error;
mod history;
mod requests;
mod rollback;
mod support;
mod types;
mod users;

pub use error::StoreError;
pub use requests::*;
pub use types::*;

use rusqlite::{Connection, ErrorCode};
use std::path::Path;
use std::time::Duration;

pub const DB_FILE_NAME: &str = "doc_audit.db";

/// Entity store and change log on one SQLite connection.
///
/// Every mutating method takes the acting [`da_core::Actor`] explicitly and
/// writes the entity change together with its log entry in one transaction.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;

        let db_path = storage_dir.join(DB_FILE_NAME);
        let conn = Connection::open(&db_path)?;
        let store = Self::init(conn)?;
        tracing::info!(path = %db_path.display(), "store opened");
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        support::migrate_sqlite_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(code, message) => {
            code.code == ErrorCode::ConstraintViolation
                && message
                    .as_deref()
                    .is_some_and(|value| value.contains("UNIQUE constraint failed"))
        }
        _ => false,
    }
}

fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(code, message) => {
            code.code == ErrorCode::ConstraintViolation
                && message
                    .as_deref()
                    .is_some_and(|value| value.contains("FOREIGN KEY constraint failed"))
        }
        _ => false,
    }
}

fn to_sqlite_i64(value: usize) -> Result<i64, StoreError> {
    i64::try_from(value).map_err(|_| StoreError::InvalidInput("numeric overflow"))
}
