#![forbid(unsafe_code)]

//! HTTP surface. Handlers resolve the caller, run one service call against
//! the store on the blocking pool and render the result.

mod access;
mod auth;
mod documents;
mod dto;
mod extract;
mod history;
mod rollback;
mod users;

pub use auth::{CurrentUser, USER_HEADER};
pub use dto::{DocumentResponse, GrantResponse, LogEntryResponse, RollbackResponse, UserResponse};

use crate::error::ServiceError;
use axum::Router;
use axum::routing::{get, patch, post};
use da_storage::SqliteStore;
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug)]
pub struct AppState {
    store: Arc<Mutex<SqliteStore>>,
}

impl AppState {
    pub fn new(store: SqliteStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Runs `op` with exclusive access to the store on the blocking pool.
    pub(crate) async fn run<T, F>(&self, op: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&mut SqliteStore) -> Result<T, ServiceError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || {
            let mut store = store.lock().map_err(|_| {
                tracing::error!("store mutex poisoned");
                ServiceError::StoreUnavailable
            })?;
            op(&mut store)
        })
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "store task failed");
            ServiceError::StoreUnavailable
        })?
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/documents", get(documents::list).post(documents::create))
        .route(
            "/documents/{doc_id}",
            get(documents::retrieve)
                .put(documents::replace)
                .patch(documents::update)
                .delete(documents::delete),
        )
        .route("/documents/{doc_id}/access", post(access::create))
        .route("/documents/{doc_id}/access/list", get(access::list))
        .route(
            "/documents/{doc_id}/access/{grant_id}",
            patch(access::update).delete(access::revoke),
        )
        .route("/documents/{doc_id}/history", get(history::list))
        .route(
            "/documents/{doc_id}/rollback/{log_id}",
            post(rollback::rollback),
        )
        .route("/users/me", get(users::me))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
