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

  #[error("bad request: {0}")]
  BadRequest(String),

  /// Operator credentials missing or wrong.
  #[error("unauthorized")]
  Unauthorized,

  /// The route needs an `x-user-id` header.
  #[error("viewer identity required")]
  ViewerRequired,

  #[error("forbidden")]
  Forbidden,

  #[error("payment required: {0}")]
  PaymentRequired(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }
}

impl From<destiny_core::Error> for ApiError {
  fn from(e: destiny_core::Error) -> Self { Self::BadRequest(e.to_string()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unauthorized | ApiError::ViewerRequired => {
        (StatusCode::UNAUTHORIZED, self.to_string())
      }
      ApiError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
      ApiError::PaymentRequired(m) => (StatusCode::PAYMENT_REQUIRED, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store error");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    let mut res = (status, Json(json!({ "error": message }))).into_response();
    if matches!(self, ApiError::Unauthorized) {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"destiny\""),
      );
    }
    res
  }
}
