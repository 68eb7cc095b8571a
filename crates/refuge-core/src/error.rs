//! Error types for `refuge-core`.
//!
//! The variants are the taxonomy every handler speaks. All of them are
//! flattened to HTTP 400 at the boundary; only [`Error::Dependency`] hides
//! its cause behind a generic message.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Malformed request body or an unacceptable route parameter.
  #[error("{0}")]
  Validation(String),

  /// The referenced survivor is absent.
  #[error("{0}")]
  NotFound(String),

  /// A survivor with the same identifier already exists.
  #[error("{0}")]
  Conflict(String),

  /// The infection percentage was requested before any survivor exists.
  #[error("no survivors have been recorded yet")]
  NoData,

  /// The database or the external robot feed failed. The source is logged
  /// by whoever builds this variant and never shown to callers.
  #[error("unable to process your request")]
  Dependency(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn dependency<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Dependency(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
