//! Handlers for `/robots` endpoints.

use std::sync::Arc;

use axum::extract::State;
use refuge_core::{feed::RobotFeed, robot::Robot, store::TrackerStore};

use crate::{Tracker, envelope::Envelope, error::ApiError};

/// `POST /robots/load`: pulls the external catalog; `data` is the number of
/// robots stored.
pub async fn load<S, F>(
  State(tracker): State<Arc<Tracker<S, F>>>,
) -> Result<Envelope<usize>, ApiError>
where
  S: TrackerStore + 'static,
  F: RobotFeed + 'static,
{
  let stored = tracker.load_robots().await?;
  Ok(Envelope::data(stored).with_message("successfully loaded robot list"))
}

/// `GET /robots/list`
pub async fn list<S, F>(
  State(tracker): State<Arc<Tracker<S, F>>>,
) -> Result<Envelope<Vec<Robot>>, ApiError>
where
  S: TrackerStore + 'static,
  F: RobotFeed + 'static,
{
  let robots = tracker.list_robots().await?;
  Ok(Envelope::data(robots).with_message("successfully fetched robot list"))
}
