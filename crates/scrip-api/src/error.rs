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

  #[error("bad request: {0}")]
  BadRequest(String),

  /// The operation exists on the wire but is refused by design.
  #[error("unsupported: {0}")]
  Unsupported(String),

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Map an engine error onto the HTTP taxonomy. Exhaustion is a client
  /// error, distinct from the 404 of an unknown code.
  pub fn from_engine<E>(e: scrip_engine::Error<E>) -> Self
  where E: std::error::Error + Send + Sync + 'static {
    match e {
      scrip_engine::Error::NotFound(id) => {
        ApiError::NotFound(format!("promo code {id} not found"))
      },
      scrip_engine::Error::CodeNotFound(code) => {
        ApiError::NotFound(format!("promo code {code:?} not found"))
      },
      scrip_engine::Error::Exhausted(code) => {
        ApiError::BadRequest(format!("promo code {code:?} has no remaining uses"))
      },
      scrip_engine::Error::Store(e) => ApiError::Internal(Box::new(e)),
      scrip_engine::Error::Cache(e) => ApiError::Internal(Box::new(e)),
    }
  }
}

impl From<scrip_core::Error> for ApiError {
  fn from(e: scrip_core::Error) -> Self {
    match e {
      scrip_core::Error::Unsupported(what) => ApiError::Unsupported(what.to_owned()),
      other => ApiError::Internal(Box::new(other)),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unsupported(m) => (StatusCode::NOT_IMPLEMENTED, m.clone()),
      ApiError::Internal(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
