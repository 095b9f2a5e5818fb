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
  #[error("{0}")]
  NotFound(String),

  /// Invalid input or a broken business rule.
  #[error("{0}")]
  BadRequest(String),

  #[error("{0}")]
  Unauthorized(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<gym_core::Error> for ApiError {
  fn from(e: gym_core::Error) -> Self {
    match e {
      gym_core::Error::NotFound(m) => Self::NotFound(m),
      gym_core::Error::InvalidArgument(m) | gym_core::Error::Conflict(m) => Self::BadRequest(m),
      gym_core::Error::Store(e) => Self::Store(e),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m.clone()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn core_kinds_map_to_statuses() {
    let cases = [
      (gym_core::Error::NotFound("x".into()), StatusCode::NOT_FOUND),
      (gym_core::Error::InvalidArgument("x".into()), StatusCode::BAD_REQUEST),
      (gym_core::Error::Conflict("x".into()), StatusCode::BAD_REQUEST),
      (gym_core::Error::store(std::fmt::Error), StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (err, status) in cases {
      assert_eq!(ApiError::from(err).into_response().status(), status);
    }
  }
}
