//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error("unauthorized")]
  Unauthorized,

  #[error("invalid input: {0}")]
  Validation(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("internal error: {0}")]
  Internal(String),
}

impl ApiError {
  /// Box any backend error as [`ApiError::Store`].
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    ApiError::Store(Box::new(e))
  }
}

impl From<waypoint_core::Error> for ApiError {
  fn from(e: waypoint_core::Error) -> Self {
    use waypoint_core::Error as Core;
    match e {
      Core::TripNotFound(_) => ApiError::NotFound(e.to_string()),
      Core::NotOwner { .. } => ApiError::Forbidden(e.to_string()),
      Core::Validation(m) => ApiError::Validation(m),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    // Not-found and forbidden carry no detail beyond the error indicator;
    // store failures are logged here and never echoed to the client.
    let (status, message) = match &self {
      ApiError::NotFound(m) => {
        tracing::debug!(detail = %m, "not found");
        (StatusCode::NOT_FOUND, "not found".to_owned())
      }
      ApiError::Forbidden(m) => {
        tracing::warn!(detail = %m, "refused");
        (StatusCode::FORBIDDEN, "forbidden".to_owned())
      }
      ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized".to_owned()),
      ApiError::Validation(m) => (StatusCode::UNPROCESSABLE_ENTITY, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_owned())
      }
      ApiError::Internal(m) => {
        tracing::error!(detail = %m, "internal failure");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_owned())
      }
    };

    let mut res = (status, Json(json!({ "error": message }))).into_response();
    if status == StatusCode::UNAUTHORIZED {
      res
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    }
    res
  }
}
