//! Handlers for `/survivors` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/survivors` | Body: [`NewSurvivor`]; 400 if the id is taken |
//! | `PUT`  | `/survivors` | Body: [`SurvivorPatch`]; only supplied fields change |
//! | `PUT`  | `/survivors/infected` | Body: `{"id":"...","reported_by":"..."}` |
//! | `GET`  | `/survivors/{id}` | Single survivor |
//! | `GET`  | `/survivors/{id}/locations` | Movement history, oldest first |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
};
use refuge_core::{
  feed::RobotFeed,
  store::TrackerStore,
  survivor::{InfectionClaim, LocationRecord, NewSurvivor, Survivor, SurvivorPatch},
};

use crate::{Tracker, envelope::Envelope, error::ApiError};

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /survivors`
pub async fn create<S, F>(
  State(tracker): State<Arc<Tracker<S, F>>>,
  body: Result<Json<NewSurvivor>, JsonRejection>,
) -> Result<Envelope<()>, ApiError>
where
  S: TrackerStore + 'static,
  F: RobotFeed + 'static,
{
  let Json(input) = body?;
  tracker.create_survivor(input).await?;
  Ok(Envelope::message("successfully added survivor"))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /survivors`
pub async fn update<S, F>(
  State(tracker): State<Arc<Tracker<S, F>>>,
  body: Result<Json<SurvivorPatch>, JsonRejection>,
) -> Result<Envelope<()>, ApiError>
where
  S: TrackerStore + 'static,
  F: RobotFeed + 'static,
{
  let Json(patch) = body?;
  tracker.update_survivor(patch).await?;
  Ok(Envelope::message("successfully updated survivor"))
}

// ─── Infection report ─────────────────────────────────────────────────────────

/// `PUT /survivors/infected`
pub async fn mark_infected<S, F>(
  State(tracker): State<Arc<Tracker<S, F>>>,
  body: Result<Json<InfectionClaim>, JsonRejection>,
) -> Result<Envelope<()>, ApiError>
where
  S: TrackerStore + 'static,
  F: RobotFeed + 'static,
{
  let Json(claim) = body?;
  tracker.mark_infected(claim).await?;
  Ok(Envelope::message("successfully reported survivor as infected"))
}

// ─── Reads ────────────────────────────────────────────────────────────────────

/// `GET /survivors/{id}`
pub async fn get_one<S, F>(
  State(tracker): State<Arc<Tracker<S, F>>>,
  Path(id): Path<String>,
) -> Result<Envelope<Survivor>, ApiError>
where
  S: TrackerStore + 'static,
  F: RobotFeed + 'static,
{
  Ok(Envelope::data(tracker.get_survivor(&id).await?))
}

/// `GET /survivors/{id}/locations`
pub async fn locations<S, F>(
  State(tracker): State<Arc<Tracker<S, F>>>,
  Path(id): Path<String>,
) -> Result<Envelope<Vec<LocationRecord>>, ApiError>
where
  S: TrackerStore + 'static,
  F: RobotFeed + 'static,
{
  Ok(Envelope::data(tracker.location_history(&id).await?))
}
