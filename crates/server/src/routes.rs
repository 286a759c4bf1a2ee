use axum::{extract::DefaultBodyLimit, routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;

use common::types::Health;

use crate::state::AppState;

pub mod bookmarks;

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Build the full application router: health, bookmarks API and the front-end assets.
pub fn build_router(state: AppState, cors: CorsLayer, static_dir: &str) -> Router {
    let index = std::path::Path::new(static_dir).join("index.html");
    let assets = ServeDir::new(static_dir).fallback(ServeFile::new(index));

    // the store's quota, not the HTTP layer, bounds what can be saved
    let api = Router::new()
        .route("/api/bookmarks", get(bookmarks::load_bookmarks).put(bookmarks::save_bookmarks))
        .layer(DefaultBodyLimit::disable());

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .fallback_service(assets)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one INFO span per request with method and path
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // status code and latency
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
