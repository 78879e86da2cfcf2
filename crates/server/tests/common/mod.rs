#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use da_core::User;
use da_server::api::USER_HEADER;
use da_server::{AppState, router};
use da_storage::{CreateUserRequest, SqliteStore};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

/// A router over a fresh in-memory store with the given users registered.
pub fn app(usernames: &[&str]) -> (Router, Vec<User>) {
    let mut store = SqliteStore::open_in_memory().expect("store");
    let users = usernames
        .iter()
        .map(|username| {
            store
                .user_create(CreateUserRequest {
                    username: username.to_string(),
                    email: format!("{username}@example.com"),
                })
                .expect("create user")
        })
        .collect();
    (router(AppState::new(store)), users)
}

pub async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    user: Option<&User>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        request = request.header(USER_HEADER, user.id.to_string());
    }
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, value)
}

pub async fn create_document(app: &Router, owner: &User, title: &str) -> i64 {
    let (status, body) = call(
        app,
        Method::POST,
        "/documents",
        Some(owner),
        Some(serde_json::json!({ "title": title, "content": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().expect("document id")
}
