#![forbid(unsafe_code)]

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use da_storage::StoreError;
use serde::Serialize;

/// Failures surfaced to clients, each mapped to one status code.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The subject lacks the required relationship to the document.
    #[error("{0}")]
    Authorization(&'static str),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    /// A log entry without usable change data.
    #[error("{0}")]
    InvalidState(&'static str),
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    Unauthenticated(&'static str),
    #[error("store unavailable")]
    StoreUnavailable,
    #[error("storage failure: {0}")]
    Store(#[source] StoreError),
}

pub const NO_CHANGES_FOUND: &str = "No changes found.";

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Authorization(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InvalidState(_) | Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::StoreUnavailable | Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::UnknownId => Self::NotFound("Not found."),
            StoreError::UnknownUser => Self::NotFound("User not found."),
            StoreError::UserExists => Self::Conflict("Username already taken."),
            StoreError::GrantExists => {
                Self::Conflict("This user already has access to the document.")
            }
            StoreError::MalformedChanges => Self::InvalidState(NO_CHANGES_FOUND),
            StoreError::InvalidInput(message) => Self::InvalidInput(message.to_string()),
            other @ (StoreError::Io(_) | StoreError::Sql(_)) => Self::Store(other),
        }
    }
}

impl From<JsonRejection> for ServiceError {
    fn from(value: JsonRejection) -> Self {
        Self::InvalidInput(value.body_text())
    }
}

impl From<PathRejection> for ServiceError {
    fn from(value: PathRejection) -> Self {
        Self::InvalidInput(value.body_text())
    }
}

impl From<QueryRejection> for ServiceError {
    fn from(value: QueryRejection) -> Self {
        Self::InvalidInput(value.body_text())
    }
}

#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub detail: String,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
            "Internal server error.".to_string()
        } else {
            tracing::debug!(status = status.as_u16(), detail = %self, "request rejected");
            self.to_string()
        };
        (status, Json(DetailResponse { detail })).into_response()
    }
}
