mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{post, test_app, TEST_ACCESS_KEY};
use gigbook_server::api::{users::insert_user, ApiError};
use gigbook_db::entities::user;
use gigbook_db::sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_register_returns_user_and_key() {
    let (app, _) = test_app().await;

    let (status, body) = post(
        &app,
        "/users",
        json!({ "username": "ada", "password": "lovelace" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].as_i64().is_some());
    assert_eq!(body["username"], "ada");
    assert_eq!(body["password"], "lovelace");
    assert_eq!(body["key"], TEST_ACCESS_KEY);
}

#[tokio::test]
async fn test_register_requires_both_fields() {
    let (app, state) = test_app().await;

    let (status, body) = post(&app, "/users", json!({ "username": "ada" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = post(&app, "/users", json!({ "username": "", "password": "x" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(user::Entity::find().count(&state.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_register_duplicate_username_conflicts() {
    let (app, state) = test_app().await;
    let creds = json!({ "username": "grace", "password": "hopper" });

    let (status, _) = post(&app, "/users", creds.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post(&app, "/users", json!({ "username": "grace", "password": "other" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Username already taken");

    let count = user::Entity::find()
        .filter(user::Column::Username.eq("grace"))
        .count(&state.db)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_login_with_correct_credentials() {
    let (app, _) = test_app().await;
    let (_, registered) = post(
        &app,
        "/users",
        json!({ "username": "linus", "password": "penguin" }),
    )
    .await;

    let (status, body) = post(
        &app,
        "/users/login",
        json!({ "username": "linus", "password": "penguin" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], registered["id"]);
    assert_eq!(body["username"], "linus");
    assert_eq!(body["password"], "penguin");
    assert_eq!(body["key"], TEST_ACCESS_KEY);
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let (app, _) = test_app().await;
    post(
        &app,
        "/users",
        json!({ "username": "linus", "password": "penguin" }),
    )
    .await;

    let (status, body) = post(
        &app,
        "/users/login",
        json!({ "username": "linus", "password": "walrus" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.get("key").is_none());
    assert_eq!(body["error"], "Invalid username or password");
}

#[tokio::test]
async fn test_login_unknown_user_or_missing_fields() {
    let (app, _) = test_app().await;

    let (status, _) = post(
        &app,
        "/users/login",
        json!({ "username": "ghost", "password": "boo" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = post(&app, "/users/login", json!({ "username": "ghost" })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_without_body_is_unauthorized() {
    let (app, _) = test_app().await;

    let req = Request::builder()
        .method("POST")
        .uri("/users/login")
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "Invalid username or password");
}

#[tokio::test]
async fn test_login_with_malformed_json_is_unauthorized() {
    let (app, _) = test_app().await;

    let req = Request::builder()
        .method("POST")
        .uri("/users/login")
        .header("content-type", "application/json")
        .body(Body::from("{\"username\": "))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unique_violation_on_insert_is_conflict() {
    let (app, state) = test_app().await;
    let (status, _) = post(
        &app,
        "/users",
        json!({ "username": "grace", "password": "hopper" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Skips the pre-check, as a racing registration would.
    let err = insert_user(&state.db, "grace".to_string(), "other".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)), "{err:?}");
    assert_eq!(err.status(), StatusCode::CONFLICT);

    let count = user::Entity::find()
        .filter(user::Column::Username.eq("grace"))
        .count(&state.db)
        .await
        .unwrap();
    assert_eq!(count, 1);
}
