//! The `RobotFeed` trait: the external robot catalog this system mirrors.
//!
//! The HTTP implementation lives in `refuge-server`; tests substitute an
//! in-process feed.

use std::future::Future;

use crate::robot::Robot;

/// A source of the complete robot catalog.
pub trait RobotFeed: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch the full catalog. Each call returns a fresh snapshot.
  fn fetch(&self) -> impl Future<Output = Result<Vec<Robot>, Self::Error>> + Send + '_;
}
