use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{parse_id, require_text, ApiError, MessageResponse, Payload};
use gigbook_db::entities::{artist, performance};
use gigbook_db::AppState;

#[derive(Debug, Serialize)]
pub struct PerformanceResponse {
    pub id: i32,
    pub artist_id: i32,
    pub title: String,
    pub location: String,
    pub date: String,
    pub photo_url: Option<String>,
}

impl From<performance::Model> for PerformanceResponse {
    fn from(p: performance::Model) -> Self {
        Self {
            id: p.id,
            artist_id: p.artist_id,
            title: p.title,
            location: p.location,
            date: p.date,
            photo_url: p.photo_url,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CreatePerformanceRequest {
    pub title: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub photo_url: Option<String>,
}

/// Fields of a create request that passed validation.
#[derive(Debug, PartialEq, Eq)]
pub struct NewPerformance {
    pub title: String,
    pub location: String,
    pub date: String,
    pub photo_url: Option<String>,
}

impl CreatePerformanceRequest {
    pub fn validate(self) -> Result<NewPerformance, ApiError> {
        match (
            require_text(self.title),
            require_text(self.location),
            require_text(self.date),
        ) {
            (Some(title), Some(location), Some(date)) => Ok(NewPerformance {
                title,
                location,
                date,
                photo_url: self.photo_url,
            }),
            _ => Err(ApiError::BadRequest(
                "Please provide title, location and date".to_string(),
            )),
        }
    }
}

impl NewPerformance {
    fn into_active_model(self, artist_id: i32) -> performance::ActiveModel {
        performance::ActiveModel {
            artist_id: Set(artist_id),
            title: Set(self.title),
            location: Set(self.location),
            date: Set(self.date),
            photo_url: Set(self.photo_url),
            ..Default::default()
        }
    }
}

async fn artist_exists<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, ApiError> {
    Ok(artist::Entity::find_by_id(id).one(db).await?.is_some())
}

/// POST /artists/:id/performances
pub async fn create_performance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Payload(body): Payload<CreatePerformanceRequest>,
) -> Result<(StatusCode, Json<PerformanceResponse>), ApiError> {
    // Field validation happens before the artist lookup.
    let new_performance = body.validate()?;

    let artist_id = match parse_id(&id) {
        Some(artist_id) if artist_exists(&state.db, artist_id).await? => artist_id,
        _ => return Err(ApiError::artist_not_found()),
    };

    let created = new_performance
        .into_active_model(artist_id)
        .insert(&state.db)
        .await?;

    tracing::info!(
        artist_id,
        performance_id = created.id,
        "performance created"
    );

    Ok((StatusCode::CREATED, Json(PerformanceResponse::from(created))))
}

/// DELETE /artists/:artist_id/performances/:performance_id
///
/// Only a missing artist is an error. A performance id that does not belong
/// to the artist deletes nothing and still reports success.
pub async fn delete_performance(
    State(state): State<Arc<AppState>>,
    Path((artist_id, performance_id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, ApiError> {
    let artist_id = match parse_id(&artist_id) {
        Some(artist_id) if artist_exists(&state.db, artist_id).await? => artist_id,
        _ => return Err(ApiError::artist_not_found()),
    };

    if let Some(performance_id) = parse_id(&performance_id) {
        let result = performance::Entity::delete_many()
            .filter(performance::Column::Id.eq(performance_id))
            .filter(performance::Column::ArtistId.eq(artist_id))
            .exec(&state.db)
            .await?;

        tracing::info!(
            artist_id,
            performance_id,
            rows = result.rows_affected,
            "performance delete"
        );
    }

    Ok(Json(MessageResponse {
        message: "Performance deleted",
    }))
}
