//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every failure becomes a 400 envelope. Dependency failures have already
//! been logged with their cause by the [`Tracker`](crate::Tracker); only the
//! generic message reaches the client.

use axum::{
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::warn;

use crate::envelope::Envelope;

/// An error returned by a route.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The request body could not be decoded.
  #[error("unable to parse the request")]
  Rejected(#[from] JsonRejection),

  #[error(transparent)]
  Tracker(#[from] refuge_core::Error),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match &self {
      ApiError::Rejected(rejection) => {
        warn!(error = %rejection.body_text(), "unable to parse the request");
      }
      ApiError::Tracker(refuge_core::Error::Dependency(_)) => {}
      ApiError::Tracker(e) => warn!(error = %e, "request refused"),
    }
    Envelope::failure(StatusCode::BAD_REQUEST, self.to_string()).into_response()
  }
}
