use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::performances::PerformanceResponse;
use super::{parse_id, require_text, ApiError, MessageResponse, Payload};
use gigbook_db::entities::{artist, performance};
use gigbook_db::AppState;

#[derive(Debug, Serialize)]
pub struct ArtistResponse {
    pub id: i32,
    pub name: String,
    pub genre: String,
    pub popularity: i64,
    pub photo_url: Option<String>,
}

impl From<artist::Model> for ArtistResponse {
    fn from(a: artist::Model) -> Self {
        Self {
            id: a.id,
            name: a.name,
            genre: a.genre,
            popularity: a.popularity,
            photo_url: a.photo_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ArtistDetailResponse {
    #[serde(flatten)]
    pub artist: ArtistResponse,
    pub performances: Vec<PerformanceResponse>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateArtistRequest {
    pub name: Option<String>,
    pub genre: Option<String>,
    pub popularity: Option<i64>,
    pub photo_url: Option<String>,
}

/// Fields of a create request that passed validation.
#[derive(Debug, PartialEq, Eq)]
pub struct NewArtist {
    pub name: String,
    pub genre: String,
    pub popularity: i64,
    pub photo_url: Option<String>,
}

impl CreateArtistRequest {
    /// Popularity `0` is rejected alongside missing values; clients of the
    /// original service depend on that.
    pub fn validate(self) -> Result<NewArtist, ApiError> {
        let name = require_text(self.name);
        let genre = require_text(self.genre);
        let popularity = self.popularity.filter(|p| *p != 0);

        match (name, genre, popularity) {
            (Some(name), Some(genre), Some(popularity)) => Ok(NewArtist {
                name,
                genre,
                popularity,
                photo_url: self.photo_url,
            }),
            _ => Err(ApiError::BadRequest(
                "Please provide name, genre and popularity".to_string(),
            )),
        }
    }
}

async fn with_performances<C: ConnectionTrait>(
    db: &C,
    artist_model: artist::Model,
) -> Result<ArtistDetailResponse, ApiError> {
    let performances = performance::Entity::find()
        .filter(performance::Column::ArtistId.eq(artist_model.id))
        .order_by_asc(performance::Column::Id)
        .all(db)
        .await?;

    Ok(ArtistDetailResponse {
        artist: ArtistResponse::from(artist_model),
        performances: performances
            .into_iter()
            .map(PerformanceResponse::from)
            .collect(),
    })
}

/// GET /artists
pub async fn list_artists(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ArtistResponse>>, ApiError> {
    let artists = artist::Entity::find()
        .order_by_asc(artist::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(artists.into_iter().map(ArtistResponse::from).collect()))
}

/// GET /artists/:id
pub async fn get_artist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ArtistDetailResponse>, ApiError> {
    let id = parse_id(&id).ok_or_else(ApiError::artist_not_found)?;

    let artist_model = artist::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(ApiError::artist_not_found)?;

    Ok(Json(with_performances(&state.db, artist_model).await?))
}

/// GET /artists/name/:name
///
/// Names are not unique; the artist with the lowest id wins.
pub async fn get_artist_by_name(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<ArtistDetailResponse>, ApiError> {
    let artist_model = artist::Entity::find()
        .filter(artist::Column::Name.eq(name))
        .order_by_asc(artist::Column::Id)
        .one(&state.db)
        .await?
        .ok_or_else(ApiError::artist_not_found)?;

    Ok(Json(with_performances(&state.db, artist_model).await?))
}

/// POST /artists
pub async fn create_artist(
    State(state): State<Arc<AppState>>,
    Payload(body): Payload<CreateArtistRequest>,
) -> Result<(StatusCode, Json<ArtistResponse>), ApiError> {
    let new_artist = body.validate()?;

    let created = artist::ActiveModel {
        name: Set(new_artist.name),
        genre: Set(new_artist.genre),
        popularity: Set(new_artist.popularity),
        photo_url: Set(new_artist.photo_url),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    tracing::info!(artist_id = created.id, name = %created.name, "artist created");

    Ok((StatusCode::CREATED, Json(ArtistResponse::from(created))))
}

/// DELETE /artists/:id
///
/// Succeeds whether or not the artist existed.
pub async fn delete_artist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    if let Some(id) = parse_id(&id) {
        let txn = state.db.begin().await?;

        let removed = performance::Entity::delete_many()
            .filter(performance::Column::ArtistId.eq(id))
            .exec(&txn)
            .await?;

        let deleted = artist::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        tracing::info!(
            artist_id = id,
            artists = deleted.rows_affected,
            performances = removed.rows_affected,
            "artist deleted"
        );
    }

    Ok(Json(MessageResponse {
        message: "Artist deleted",
    }))
}
