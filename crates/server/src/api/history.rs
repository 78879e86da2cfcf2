#![forbid(unsafe_code)]

use super::dto::{HistoryQuery, LogEntryResponse, Users};
use super::extract::{ApiPath, ApiQuery};
use super::{AppState, CurrentUser};
use crate::error::ServiceError;
use crate::service::history;
use axum::Json;
use axum::extract::State;
use da_core::DocumentId;

#[tracing::instrument(skip(state, user), fields(user_id = %user.id()))]
pub(super) async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(doc_id): ApiPath<DocumentId>,
    ApiQuery(query): ApiQuery<HistoryQuery>,
) -> Result<Json<Vec<LogEntryResponse>>, ServiceError> {
    let subject = user.id();
    let entries = state
        .run(move |store| {
            let entries = history::history(store, subject, doc_id, query.limit)?;
            let users = Users::load(store, entries.iter().filter_map(|entry| entry.actor))?;
            Ok(entries
                .into_iter()
                .map(|entry| users.log_entry(entry))
                .collect::<Vec<_>>())
        })
        .await?;
    Ok(Json(entries))
}
