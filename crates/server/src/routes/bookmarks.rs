use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;

use crate::errors::ApiError;
use crate::state::AppState;

/// `GET /api/bookmarks`: the stored string, or an empty body.
pub async fn load_bookmarks(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let store = state.bookmarks.clone();
    let body = tokio::task::spawn_blocking(move || store.load()).await?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    ))
}

/// `PUT /api/bookmarks`: replace the stored string with the request body.
pub async fn save_bookmarks(State(state): State<AppState>, body: String) -> Result<StatusCode, ApiError> {
    let store = state.bookmarks.clone();
    tokio::task::spawn_blocking(move || store.save(&body)).await??;
    Ok(StatusCode::NO_CONTENT)
}
