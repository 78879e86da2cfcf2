#![forbid(unsafe_code)]

use super::AppState;
use crate::error::ServiceError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use da_core::{User, UserId};

/// Header carrying the authenticated user id, set by the fronting proxy.
pub const USER_HEADER: &str = "x-user-id";

const MISSING_IDENTITY: &str = "Authentication credentials were not provided.";
const INVALID_IDENTITY: &str = "Invalid user identity.";

/// The user a request acts as.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn id(&self) -> UserId {
        self.0.id
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ServiceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_HEADER)
            .ok_or(ServiceError::Unauthenticated(MISSING_IDENTITY))?;
        let id = raw
            .to_str()
            .ok()
            .and_then(|value| value.trim().parse::<i64>().ok())
            .map(UserId::new)
            .ok_or(ServiceError::Unauthenticated(INVALID_IDENTITY))?;

        let user = state.run(move |store| Ok(store.user_get(id)?)).await?;
        user.map(CurrentUser)
            .ok_or(ServiceError::Unauthenticated(INVALID_IDENTITY))
    }
}
