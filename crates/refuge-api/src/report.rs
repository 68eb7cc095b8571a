//! Handlers for `/report` endpoints.
//!
//! `GET /report/percentage` wins over `GET /report/{criteria}` because static
//! segments take priority in the router.

use std::sync::Arc;

use axum::extract::{Path, State};
use refuge_core::{
  feed::RobotFeed, report::InfectionReport, store::TrackerStore,
  survivor::Survivor,
};

use crate::{Tracker, envelope::Envelope, error::ApiError};

/// `GET /report/percentage`: `{"infected": .., "non_infected": ..}`
pub async fn percentage<S, F>(
  State(tracker): State<Arc<Tracker<S, F>>>,
) -> Result<Envelope<InfectionReport>, ApiError>
where
  S: TrackerStore + 'static,
  F: RobotFeed + 'static,
{
  Ok(Envelope::data(tracker.infection_percentage().await?))
}

/// `GET /report/{criteria}` where criteria is `infected` or `non-infected`.
pub async fn by_criteria<S, F>(
  State(tracker): State<Arc<Tracker<S, F>>>,
  Path(criteria): Path<String>,
) -> Result<Envelope<Vec<Survivor>>, ApiError>
where
  S: TrackerStore + 'static,
  F: RobotFeed + 'static,
{
  Ok(Envelope::data(tracker.list_by_criteria(&criteria).await?))
}
