#![forbid(unsafe_code)]

use super::dto::{CreateGrantBody, GrantResponse, UpdateGrantBody, Users};
use super::extract::{ApiJson, ApiPath};
use super::{AppState, CurrentUser};
use crate::error::ServiceError;
use crate::service::grants;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use da_core::{DocumentId, GrantId};

#[tracing::instrument(skip(state, user, body), fields(user_id = %user.id()))]
pub(super) async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(doc_id): ApiPath<DocumentId>,
    ApiJson(body): ApiJson<CreateGrantBody>,
) -> Result<(StatusCode, Json<GrantResponse>), ServiceError> {
    let subject = user.id();
    let grant = state
        .run(move |store| {
            let grant = grants::create(store, subject, doc_id, body.user_id, body.access_type)?;
            Ok(Users::load(store, [grant.user])?.grant(grant))
        })
        .await?;
    Ok((StatusCode::CREATED, Json(grant)))
}

#[tracing::instrument(skip(state, user), fields(user_id = %user.id()))]
pub(super) async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(doc_id): ApiPath<DocumentId>,
) -> Result<Json<Vec<GrantResponse>>, ServiceError> {
    let subject = user.id();
    let grants = state
        .run(move |store| {
            let grants = grants::list(store, subject, doc_id)?;
            let users = Users::load(store, grants.iter().map(|grant| grant.user))?;
            Ok(grants
                .into_iter()
                .map(|grant| users.grant(grant))
                .collect::<Vec<_>>())
        })
        .await?;
    Ok(Json(grants))
}

#[tracing::instrument(skip(state, user, body), fields(user_id = %user.id()))]
pub(super) async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath((doc_id, grant_id)): ApiPath<(DocumentId, GrantId)>,
    ApiJson(body): ApiJson<UpdateGrantBody>,
) -> Result<Json<GrantResponse>, ServiceError> {
    let subject = user.id();
    let grant = state
        .run(move |store| {
            let update = grants::update(store, subject, doc_id, grant_id, body.access_type)?;
            Ok(Users::load(store, [update.grant.user])?.grant(update.grant))
        })
        .await?;
    Ok(Json(grant))
}

#[tracing::instrument(skip(state, user), fields(user_id = %user.id()))]
pub(super) async fn revoke(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath((doc_id, grant_id)): ApiPath<(DocumentId, GrantId)>,
) -> Result<StatusCode, ServiceError> {
    let subject = user.id();
    state
        .run(move |store| grants::revoke(store, subject, doc_id, grant_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
