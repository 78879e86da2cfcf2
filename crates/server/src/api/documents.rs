#![forbid(unsafe_code)]

use super::dto::{
    CreateDocumentBody, DocumentResponse, ReplaceDocumentBody, Users, document_response,
};
use super::extract::{ApiJson, ApiPath};
use super::{AppState, CurrentUser};
use crate::error::ServiceError;
use crate::service::documents;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use da_core::{DocumentId, DocumentPatch};
use da_storage::CreateDocumentRequest;

#[tracing::instrument(skip(state, user), fields(user_id = %user.id()))]
pub(super) async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<DocumentResponse>>, ServiceError> {
    let documents = state
        .run(|store| {
            let documents = documents::list(store)?;
            let users = Users::load(store, documents.iter().map(|doc| doc.owner))?;
            Ok(documents
                .into_iter()
                .map(|doc| users.document(doc))
                .collect::<Vec<_>>())
        })
        .await?;
    Ok(Json(documents))
}

#[tracing::instrument(skip(state, user, body), fields(user_id = %user.id()))]
pub(super) async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiJson(body): ApiJson<CreateDocumentBody>,
) -> Result<(StatusCode, Json<DocumentResponse>), ServiceError> {
    let subject = user.id();
    let document = state
        .run(move |store| {
            let document = documents::create(
                store,
                subject,
                CreateDocumentRequest {
                    title: body.title,
                    content: body.content,
                },
            )?;
            Ok(document_response(store, document)?)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(document)))
}

#[tracing::instrument(skip(state, user), fields(user_id = %user.id()))]
pub(super) async fn retrieve(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(doc_id): ApiPath<DocumentId>,
) -> Result<Json<DocumentResponse>, ServiceError> {
    let subject = user.id();
    let document = state
        .run(move |store| {
            let document = documents::retrieve(store, subject, doc_id)?;
            Ok(document_response(store, document)?)
        })
        .await?;
    Ok(Json(document))
}

#[tracing::instrument(skip(state, user, body), fields(user_id = %user.id()))]
pub(super) async fn replace(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(doc_id): ApiPath<DocumentId>,
    ApiJson(body): ApiJson<ReplaceDocumentBody>,
) -> Result<Json<DocumentResponse>, ServiceError> {
    let patch = DocumentPatch {
        title: Some(body.title),
        content: Some(body.content),
    };
    apply(state, user, doc_id, patch).await
}

#[tracing::instrument(skip(state, user, patch), fields(user_id = %user.id()))]
pub(super) async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(doc_id): ApiPath<DocumentId>,
    ApiJson(patch): ApiJson<DocumentPatch>,
) -> Result<Json<DocumentResponse>, ServiceError> {
    apply(state, user, doc_id, patch).await
}

async fn apply(
    state: AppState,
    user: CurrentUser,
    doc_id: DocumentId,
    patch: DocumentPatch,
) -> Result<Json<DocumentResponse>, ServiceError> {
    let subject = user.id();
    let document = state
        .run(move |store| {
            let update = documents::update(store, subject, doc_id, &patch)?;
            Ok(document_response(store, update.document)?)
        })
        .await?;
    Ok(Json(document))
}

#[tracing::instrument(skip(state, user), fields(user_id = %user.id()))]
pub(super) async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    ApiPath(doc_id): ApiPath<DocumentId>,
) -> Result<StatusCode, ServiceError> {
    let subject = user.id();
    state
        .run(move |store| documents::delete(store, subject, doc_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
