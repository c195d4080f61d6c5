/// Shared helpers for router-level tests
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;
use user_service::{AppState, db::UserStore, router};

pub fn app_with(store: Arc<dyn UserStore>) -> Router {
    router(Arc::new(AppState::new(store)))
}

/// Sends one request and returns the status with the decoded JSON body.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

pub mod fixtures {
    pub const NAME: &str = "John Doe";
    pub const USERNAME: &str = "johndoe";
    pub const PASSWORD: &str = "password";
}
