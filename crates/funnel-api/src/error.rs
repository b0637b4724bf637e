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
  #[error("unauthorized")]
  Unauthorized,

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a store error into the HTTP taxonomy. Backends guarantee
  /// `Into<funnel_core::Error>`, so not-found and validation failures map to
  /// 404/400 instead of collapsing into 500.
  pub fn from_store<E: Into<funnel_core::Error>>(e: E) -> Self {
    use funnel_core::Error as Core;
    match e.into() {
      Core::LeadNotFound(id) => Self::NotFound(format!("lead {id} not found")),
      Core::NoteNotFound { lead_id, note_id } => {
        Self::NotFound(format!("note {note_id} not found on lead {lead_id}"))
      }
      Core::EmptyField(field) => {
        Self::BadRequest(format!("required field is empty: {field}"))
      }
      Core::UnknownStatus(s) => {
        Self::BadRequest(format!("unknown lead status: {s:?}"))
      }
      other => Self::Store(Box::new(other)),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized".to_string()),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };

    let mut res = (status, Json(json!({ "error": message }))).into_response();
    if status == StatusCode::UNAUTHORIZED {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Bearer realm=\"funnel\""),
      );
    }
    res
  }
}
