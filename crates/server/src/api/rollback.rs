#![forbid(unsafe_code)]

use super::dto::{RollbackResponse, rollback_response};
use super::extract::ApiPath;
use super::{AppState, CurrentUser};
use crate::error::ServiceError;
use crate::service::rollback;
use axum::Json;
use axum::extract::State;
use da_core::{DocumentId, LogId};

#[tracing::instrument(skip(state, user), fields(user_id = %user.id()))]
pub(super) async fn rollback(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath((doc_id, log_id)): ApiPath<(DocumentId, LogId)>,
) -> Result<Json<RollbackResponse>, ServiceError> {
    let subject = user.id();
    let response = state
        .run(move |store| {
            let outcome = rollback::rollback(store, subject, doc_id, log_id)?;
            Ok(rollback_response(store, outcome)?)
        })
        .await?;
    Ok(Json(response))
}
