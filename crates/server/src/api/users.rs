#![forbid(unsafe_code)]

use super::CurrentUser;
use super::dto::UserResponse;
use axum::Json;

pub(super) async fn me(user: CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from(user.0))
}
