#![forbid(unsafe_code)]

use super::support::{USER_COLUMNS, now_ms, select_user, user_from_row};
use super::{CreateUserRequest, SqliteStore, StoreError, is_unique_violation};
use da_core::{User, UserId};
use rusqlite::params;
use std::collections::{BTreeMap, BTreeSet};

impl SqliteStore {
    pub fn user_create(&mut self, request: CreateUserRequest) -> Result<User, StoreError> {
        let username = request.username.trim().to_string();
        if username.is_empty() {
            return Err(StoreError::InvalidInput("username must not be empty"));
        }
        let email = request.email.trim().to_string();

        let insert = self.conn.execute(
            "INSERT INTO users(username, email, created_at_ms) VALUES (?1, ?2, ?3)",
            params![username, email, now_ms()],
        );
        if let Err(err) = insert {
            if is_unique_violation(&err) {
                return Err(StoreError::UserExists);
            }
            return Err(err.into());
        }

        Ok(User {
            id: UserId::new(self.conn.last_insert_rowid()),
            username,
            email,
        })
    }

    pub fn user_get(&self, id: UserId) -> Result<Option<User>, StoreError> {
        select_user(&self.conn, id)
    }

    pub fn user_list(&self) -> Result<Vec<User>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id ASC"))?;
        let rows = stmt.query_map([], user_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Resolves a set of user ids; ids that do not exist are left out.
    pub fn users_by_ids(
        &self,
        ids: &BTreeSet<UserId>,
    ) -> Result<BTreeMap<UserId, User>, StoreError> {
        let mut out = BTreeMap::new();
        for id in ids {
            if let Some(user) = select_user(&self.conn, *id)? {
                out.insert(*id, user);
            }
        }
        Ok(out)
    }
}
