//! Registration and login.
//!
//! Passwords are stored and compared verbatim and the configured access key
//! is echoed to the client. Both behaviours are kept for compatibility with
//! existing clients; neither is a security mechanism.

use axum::{extract::State, http::StatusCode, Json};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set, SqlErr,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{require_text, ApiError, Payload};
use gigbook_db::entities::user;
use gigbook_db::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CredentialsRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub password: String,
    pub key: String,
}

impl UserResponse {
    fn new(u: user::Model, key: &str) -> Self {
        Self {
            id: u.id,
            username: u.username,
            password: u.password,
            key: key.to_string(),
        }
    }
}

fn username_taken() -> ApiError {
    ApiError::Conflict("Username already taken".to_string())
}

/// Insert a user row. A concurrent registration can pass the pre-check in
/// `register`; the UNIQUE constraint on `username` turns it into `409` here.
pub async fn insert_user<C: ConnectionTrait>(
    db: &C,
    username: String,
    password: String,
) -> Result<user::Model, ApiError> {
    user::ActiveModel {
        username: Set(username),
        password: Set(password),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e: DbErr| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => username_taken(),
        _ => ApiError::Database(e),
    })
}

/// POST /users
pub async fn register(
    State(state): State<Arc<AppState>>,
    Payload(body): Payload<CredentialsRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let (Some(username), Some(password)) = (require_text(body.username), require_text(body.password))
    else {
        return Err(ApiError::BadRequest(
            "Please provide username and password".to_string(),
        ));
    };

    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(&username))
        .one(&state.db)
        .await?;

    if existing.is_some() {
        return Err(username_taken());
    }

    let created = insert_user(&state.db, username, password).await?;

    tracing::info!(user_id = created.id, username = %created.username, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(UserResponse::new(created, &state.access_key)),
    ))
}

/// POST /users/login
///
/// A missing or undecodable body carries no credentials, so it is `401` like
/// any other failed match.
pub async fn login(
    State(state): State<Arc<AppState>>,
    body: Result<Payload<CredentialsRequest>, ApiError>,
) -> Result<Json<UserResponse>, ApiError> {
    let body = body.map(|Payload(body)| body).unwrap_or_default();
    let (Some(username), Some(password)) = (body.username, body.password) else {
        return Err(ApiError::Unauthorized);
    };

    let found = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .filter(user::Column::Password.eq(password))
        .one(&state.db)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    Ok(Json(UserResponse::new(found, &state.access_key)))
}
