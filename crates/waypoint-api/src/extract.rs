//! Request-body extractor whose rejections render as [`ApiError`].

use axum::extract::{FromRequest, rejection::JsonRejection};

use crate::error::ApiError;

/// `axum::Json` with its rejection mapped to [`ApiError::Validation`], so a
/// malformed body, a missing key or a wrong `Content-Type` answers 422 with
/// the usual `{"error": ...}` shape.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    ApiError::Validation(rejection.body_text())
  }
}
