use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::StorageError;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Storage(StorageError::StorageUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let msg = self.to_string();
        error!(status = status.as_u16(), error = %msg, "request failed");
        (status, Json(serde_json::json!({"error": msg}))).into_response()
    }
}
