// Shared test utilities for integration tests
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use gigbook_db::{AppState, DatabaseConfig};
use gigbook_migration::{Migrator, MigratorTrait};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_ACCESS_KEY: &str = "test-access-key";

/// Router backed by a fresh, migrated in-memory database.
pub async fn test_app() -> (Router, Arc<AppState>) {
    let db = gigbook_db::connect(&DatabaseConfig::in_memory())
        .await
        .expect("in-memory database");
    Migrator::up(&db, None).await.expect("migrations");

    let state = Arc::new(AppState {
        db,
        access_key: TEST_ACCESS_KEY.to_string(),
    });
    (gigbook_server::build_router(state.clone(), &[]), state)
}

/// Send one request and decode the JSON body (`Value::Null` when empty).
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, None).await
}

/// Create an artist and return its id.
pub async fn create_artist(app: &Router, name: &str) -> i64 {
    let (status, body) = post(
        app,
        "/artists",
        serde_json::json!({ "name": name, "genre": "rock", "popularity": 50 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
}

/// Create a performance under `artist_id` and return its id.
pub async fn create_performance(app: &Router, artist_id: i64, title: &str) -> i64 {
    let (status, body) = post(
        app,
        &format!("/artists/{artist_id}/performances"),
        serde_json::json!({ "title": title, "location": "Berlin", "date": "2024-05-01" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
}
