//! Crate-wide error type and its HTTP mapping.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
};
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
  #[error("failed to get connection from pool: {0}")]
  Pool(#[from] r2d2::Error),

  #[error("storage error: {0}")]
  Storage(#[from] rusqlite::Error),

  #[error("background task failed: {0}")]
  Join(#[from] tokio::task::JoinError),

  #[error("column encoding error: {0}")]
  Encoding(#[from] serde_json::Error),

  #[error("bad request: {0}")]
  BadRequest(String),
}

impl AppError {
  pub fn bad_request(message: impl Into<String>) -> Self {
    Self::BadRequest(message.into())
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    match self {
      AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
      other => {
        error!(target: "biblelit", error = %other, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
      }
    }
  }
}
