//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("validation error: {0}")]
  Validation(String),

  #[error("conflict: {0}")]
  Conflict(String),

  /// Deliberately does not distinguish "unknown user" from "wrong password".
  #[error("invalid username or password")]
  InvalidCredentials,

  #[error("internal error: {0}")]
  Internal(String),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::Validation(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::InvalidCredentials => {
        (StatusCode::UNAUTHORIZED, self.to_string())
      }
      ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m.clone()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

impl From<reclaim_core::Error> for ApiError {
  fn from(e: reclaim_core::Error) -> Self {
    use reclaim_core::Error as E;
    match e {
      E::UserNotFound(_) | E::PostNotFound(_) | E::ClaimNotFound(_) => {
        ApiError::NotFound(e.to_string())
      }
      E::MissingField(_) => ApiError::Validation(e.to_string()),
      E::UsernameTaken(_) | E::PostAlreadyClaimed(_)
      | E::ClaimAlreadyApproved(_) => ApiError::Conflict(e.to_string()),
      E::MissingClaimTarget { .. } | E::Storage(_) => {
        ApiError::Internal(e.to_string())
      }
    }
  }
}

/// Map a store error into the client-facing taxonomy.
pub(crate) fn store_err<E: Into<reclaim_core::Error>>(e: E) -> ApiError {
  ApiError::from(e.into())
}
