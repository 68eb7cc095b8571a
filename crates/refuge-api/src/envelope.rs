//! The uniform JSON envelope every route answers with.
//!
//! ```json
//! { "status_code": 200, "message": "...", "data": ... }
//! ```
//!
//! `message` and `data` are omitted when absent.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T = serde_json::Value> {
  pub status_code: u16,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub message:     Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub data:        Option<T>,
}

impl Envelope<()> {
  /// A 200 carrying only a message.
  pub fn message(message: impl Into<String>) -> Self {
    Self {
      status_code: StatusCode::OK.as_u16(),
      message:     Some(message.into()),
      data:        None,
    }
  }

  /// A failure with the given status and message.
  pub fn failure(status: StatusCode, message: impl Into<String>) -> Self {
    Self {
      status_code: status.as_u16(),
      message:     Some(message.into()),
      data:        None,
    }
  }
}

impl<T> Envelope<T> {
  /// A 200 carrying `data`.
  pub fn data(data: T) -> Self {
    Self {
      status_code: StatusCode::OK.as_u16(),
      message:     None,
      data:        Some(data),
    }
  }

  pub fn with_message(mut self, message: impl Into<String>) -> Self {
    self.message = Some(message.into());
    self
  }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
  fn into_response(self) -> Response {
    let status = StatusCode::from_u16(self.status_code)
      .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(self)).into_response()
  }
}
