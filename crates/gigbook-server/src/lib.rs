use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use gigbook_db::AppState;
use serde::Serialize;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod api;
pub mod config;

#[derive(Serialize)]
struct ApiStatus {
    status: &'static str,
    version: &'static str,
}

/// Full HTTP surface with tracing and CORS layers applied.
pub fn build_router(state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let artists = Router::new()
        .route(
            "/artists",
            get(api::artists::list_artists).post(api::artists::create_artist),
        )
        .route(
            "/artists/{id}",
            get(api::artists::get_artist).delete(api::artists::delete_artist),
        )
        // Static `name` outranks `{id}`, so `/artists/name/performances` is the
        // by-name lookup and a POST to it is 405, not a create under id "name".
        .route(
            "/artists/name/{name}",
            get(api::artists::get_artist_by_name),
        )
        .route(
            "/artists/{id}/performances",
            post(api::performances::create_performance),
        )
        .route(
            "/artists/{artist_id}/performances/{performance_id}",
            axum::routing::delete(api::performances::delete_performance),
        );

    let users = Router::new()
        .route("/users", post(api::users::register))
        .route("/users/login", post(api::users::login));

    Router::new()
        .route("/healthz", get(healthz))
        .merge(artists)
        .merge(users)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::DELETE,
        Method::OPTIONS,
    ];

    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|s| HeaderValue::from_str(s).ok())
        .collect();
    tracing::info!("CORS allowed origins: {:?}", origins);

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(methods)
        .allow_headers(Any)
}

async fn healthz() -> Json<ApiStatus> {
    Json(ApiStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
