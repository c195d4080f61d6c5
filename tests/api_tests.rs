/// Router-level tests against the in-memory store
mod common;

use async_trait::async_trait;
use axum::http::{Method, StatusCode};
use common::{app_with, fixtures, send};
use serde_json::json;
use std::sync::Arc;
use user_service::db::{
    MemoryUserStore, NewUser, StoreError, StoreResult, UserFilter, UserRecord, UserStore,
};

fn john() -> serde_json::Value {
    json!({
        "name": fixtures::NAME,
        "username": fixtures::USERNAME,
        "password": fixtures::PASSWORD,
    })
}

/// Store that is down: every call fails.
struct DownStore;

#[async_trait]
impl UserStore for DownStore {
    async fn find(&self, _: &UserFilter) -> StoreResult<Vec<UserRecord>> {
        Err(StoreError("connection refused".into()))
    }
    async fn find_one(&self, _: &UserFilter) -> StoreResult<Option<UserRecord>> {
        Err(StoreError("connection refused".into()))
    }
    async fn create(&self, _: NewUser) -> StoreResult<UserRecord> {
        Err(StoreError("connection refused".into()))
    }
    async fn find_one_and_update(
        &self,
        _: &UserFilter,
        _: &str,
    ) -> StoreResult<Option<UserRecord>> {
        Err(StoreError("connection refused".into()))
    }
    async fn find_one_and_delete(&self, _: &UserFilter) -> StoreResult<Option<UserRecord>> {
        Err(StoreError("connection refused".into()))
    }
    async fn count(&self) -> StoreResult<u64> {
        Err(StoreError("connection refused".into()))
    }
    async fn is_alive(&self) -> bool {
        false
    }
}

#[tokio::test]
async fn test_create_user_returns_201_without_password() {
    let app = app_with(Arc::new(MemoryUserStore::new()));

    let (status, body) = send(&app, Method::POST, "/user/create", Some(john())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({ "id": "1", "name": "John Doe", "username": "johndoe" })
    );
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn test_create_user_missing_fields() {
    let app = app_with(Arc::new(MemoryUserStore::new()));

    let (status, body) = send(&app, Method::POST, "/user/create", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "status": 400, "message": "Name is missing" }));

    let (_, body) = send(
        &app,
        Method::POST,
        "/user/create",
        Some(json!({ "name": "John Doe", "password": "password" })),
    )
    .await;
    assert_eq!(body["message"], "username is missing");

    let (_, body) = send(
        &app,
        Method::POST,
        "/user/create",
        Some(json!({ "name": "John Doe", "username": "johndoe" })),
    )
    .await;
    assert_eq!(body["message"], "password is missing");
}

#[tokio::test]
async fn test_create_user_rejects_malformed_json() {
    let app = app_with(Arc::new(MemoryUserStore::new()));

    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/user/create")
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_duplicate_username() {
    let store = Arc::new(MemoryUserStore::new());
    let app = app_with(store.clone());

    send(&app, Method::POST, "/user/create", Some(john())).await;
    let (status, body) = send(&app, Method::POST, "/user/create", Some(john())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "user already exist");
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_retrieve_routes() {
    let app = app_with(Arc::new(MemoryUserStore::new()));

    let (status, body) = send(&app, Method::GET, "/user/retrieve", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "status": 404, "message": "User not found" }));

    send(&app, Method::POST, "/user/create", Some(john())).await;
    send(
        &app,
        Method::POST,
        "/user/create",
        Some(json!({ "name": "Jane Roe", "username": "janeroe", "password": "pw" })),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/user/retrieve", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = send(&app, Method::GET, "/user/retrieve/2", None).await;
    assert_eq!(
        body,
        json!([{ "id": "2", "name": "Jane Roe", "username": "janeroe" }])
    );

    let (_, body) = send(&app, Method::GET, "/user/retrieve?name=John%20Doe", None).await;
    assert_eq!(body[0]["id"], "1");

    let (_, body) = send(&app, Method::GET, "/user/retrieve/2?name=John%20Doe", None).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, _) = send(&app, Method::GET, "/user/retrieve/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_routes() {
    let app = app_with(Arc::new(MemoryUserStore::new()));

    let (status, body) = send(
        &app,
        Method::PUT,
        "/user/update/1",
        Some(json!({ "newName": "newName" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");

    send(&app, Method::POST, "/user/create", Some(john())).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/user/update/1",
        Some(json!({ "newName": "newName" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "id": "1", "name": "newName", "username": "johndoe" })
    );

    let (status, body) = send(
        &app,
        Method::PUT,
        "/user/update?oldName=newName",
        Some(json!({ "newName": "Johnny" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Johnny");

    let (status, body) = send(
        &app,
        Method::PUT,
        "/user/update?oldName=Nobody",
        Some(json!({ "newName": "Somebody" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");

    let (status, body) = send(&app, Method::PUT, "/user/update", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "oldName query and newName json are missing");

    let (_, body) = send(&app, Method::PUT, "/user/update?oldName=Johnny", None).await;
    assert_eq!(body["message"], "id and newName json are missing");

    let (_, body) = send(
        &app,
        Method::PUT,
        "/user/update/1?oldName=Johnny",
        Some(json!({ "newName": "Johnny" })),
    )
    .await;
    assert_eq!(body["message"], "oldName and newName are the same");
}

#[tokio::test]
async fn test_delete_routes() {
    let store = Arc::new(MemoryUserStore::new());
    let app = app_with(store.clone());

    let (status, body) = send(&app, Method::DELETE, "/user/delete", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "name or id query is missing");

    send(&app, Method::POST, "/user/create", Some(john())).await;

    let (status, body) = send(&app, Method::DELETE, "/user/delete/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("user deleted"));
    assert_eq!(store.count().await.unwrap(), 0);

    let (status, body) = send(&app, Method::DELETE, "/user/delete?name=Nobody", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("user deleted"));
}

#[tokio::test]
async fn test_status_and_stats() {
    let store = Arc::new(MemoryUserStore::new());
    let app = app_with(store.clone());

    let (status, body) = send(&app, Method::GET, "/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "db": true }));

    send(&app, Method::POST, "/user/create", Some(john())).await;

    let (status, body) = send(&app, Method::GET, "/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "users": 1 }));

    store.clear().await;

    let (_, body) = send(&app, Method::GET, "/stats", None).await;
    assert_eq!(body, json!({ "users": 0 }));
    let (status, _) = send(&app, Method::GET, "/user/retrieve", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_store_failures_become_500() {
    let app = app_with(Arc::new(DownStore));

    let (status, body) = send(&app, Method::GET, "/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "db": false }));

    let (status, body) = send(&app, Method::GET, "/user/retrieve", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "status": 500, "message": "connection refused" })
    );

    let (status, _) = send(&app, Method::DELETE, "/user/delete/1", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = send(&app, Method::GET, "/stats", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_update_writes_empty_new_name() {
    let app = app_with(Arc::new(MemoryUserStore::new()));
    send(
        &app,
        Method::POST,
        "/user/create",
        Some(json!({ "name": "A", "username": "a", "password": "pw" })),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/user/update/1?oldName=A",
        Some(json!({ "newName": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "id": "1", "name": "", "username": "a" }));

    let (_, body) = send(&app, Method::GET, "/user/retrieve/1", None).await;
    assert_eq!(body[0]["name"], "");
}

#[tokio::test]
async fn test_extractor_rejections_are_json() {
    let app = app_with(Arc::new(MemoryUserStore::new()));

    let (status, body) = send(&app, Method::GET, "/user/retrieve?name=a&name=b", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert!(body["message"].as_str().unwrap().contains("duplicate field"));

    let (status, body) = send(&app, Method::DELETE, "/user/delete?name=a&name=b", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);

    let (status, body) = send(&app, Method::GET, "/user/retrieve/%FF", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_oversized_body_keeps_413() {
    let app = app_with(Arc::new(MemoryUserStore::new()));

    let padding = "x".repeat(3 * 1024 * 1024);
    let (status, body) = send(
        &app,
        Method::POST,
        "/user/create",
        Some(json!({ "name": padding, "username": "big", "password": "pw" })),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["status"], 413);
    assert!(body["message"].is_string());
}
