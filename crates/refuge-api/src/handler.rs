//! [`Tracker`], the request handlers behind every route.
//!
//! Each method is one operation: enforce its precondition, make one store
//! (or feed) round trip, and translate failures into [`refuge_core::Error`].
//! Storage and feed faults are logged here with the operation name and then
//! reduced to [`Error::Dependency`].

use std::sync::Arc;

use refuge_core::{
  Error, Result,
  feed::RobotFeed,
  report::{Criteria, DEFAULT_INFECTION_THRESHOLD, InfectionFilter, InfectionReport},
  robot::Robot,
  store::TrackerStore,
  survivor::{
    InfectionClaim, LocationRecord, NewSurvivor, Survivor, SurvivorPatch,
    SurvivorUpdate,
  },
};
use tracing::{debug, error, info};

/// Log a dependency failure for `operation` and hide its cause.
fn dependency<E>(operation: &'static str) -> impl FnOnce(E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  move |e| {
    error!(operation, error = %e, "dependency failure");
    Error::dependency(e)
  }
}

fn not_found(id: &str) -> Error {
  Error::NotFound(format!("survivor {id} does not exist"))
}

/// Shared by all routes through axum `State`; built once at startup.
pub struct Tracker<S, F> {
  store:     Arc<S>,
  feed:      Arc<F>,
  threshold: u32,
}

impl<S, F> Tracker<S, F>
where
  S: TrackerStore,
  F: RobotFeed,
{
  pub fn new(store: Arc<S>, feed: Arc<F>) -> Self {
    Self { store, feed, threshold: DEFAULT_INFECTION_THRESHOLD }
  }

  /// Override the report count at which a survivor counts as infected.
  pub fn with_threshold(mut self, threshold: u32) -> Self {
    self.threshold = threshold;
    self
  }

  pub fn threshold(&self) -> u32 { self.threshold }

  // ── Survivors ─────────────────────────────────────────────────────────

  /// Register a new survivor; the identifier must be unused.
  pub async fn create_survivor(&self, input: NewSurvivor) -> Result<()> {
    input.validate()?;
    let id = input.id.clone();

    let inserted = self
      .store
      .insert_survivor(input)
      .await
      .map_err(dependency("create_survivor"))?;
    if !inserted {
      debug!(survivor_id = %id, "duplicate survivor rejected");
      return Err(Error::Conflict(format!("survivor {id} already exists")));
    }

    info!(survivor_id = %id, "survivor added");
    Ok(())
  }

  pub async fn get_survivor(&self, id: &str) -> Result<Survivor> {
    self
      .store
      .get_survivor(id)
      .await
      .map_err(dependency("get_survivor"))?
      .ok_or_else(|| not_found(id))
  }

  /// Apply a partial update. Only non-empty fields overwrite.
  pub async fn update_survivor(&self, patch: SurvivorPatch) -> Result<()> {
    let update = SurvivorUpdate::from(patch);
    let id = update.id.clone();
    let moved = update.location.is_some();

    let updated = self
      .store
      .update_survivor(update)
      .await
      .map_err(dependency("update_survivor"))?;
    if !updated {
      return Err(not_found(&id));
    }

    info!(survivor_id = %id, moved, "survivor updated");
    Ok(())
  }

  /// Record one infection report against a survivor. Repeated reports, even
  /// from the same reporter, all count.
  pub async fn mark_infected(&self, claim: InfectionClaim) -> Result<()> {
    claim.validate()?;

    let marked = self
      .store
      .mark_infected(&claim.id, &claim.reported_by)
      .await
      .map_err(dependency("mark_infected"))?;
    if !marked {
      return Err(not_found(&claim.id));
    }

    info!(
      survivor_id = %claim.id,
      reported_by = %claim.reported_by,
      "infection reported"
    );
    Ok(())
  }

  /// Movement trail of an existing survivor, oldest first.
  pub async fn location_history(&self, id: &str) -> Result<Vec<LocationRecord>> {
    let exists = self
      .store
      .survivor_exists(id)
      .await
      .map_err(dependency("location_history"))?;
    if !exists {
      return Err(not_found(id));
    }

    self
      .store
      .location_history(id)
      .await
      .map_err(dependency("location_history"))
  }

  // ── Reports ───────────────────────────────────────────────────────────

  /// Infected vs. non-infected share of all survivors, in percent.
  pub async fn infection_percentage(&self) -> Result<InfectionReport> {
    let infected = self
      .store
      .count_survivors(Some(InfectionFilter::infected(self.threshold)))
      .await
      .map_err(dependency("infection_percentage"))?;
    let total = self
      .store
      .count_survivors(None)
      .await
      .map_err(dependency("infection_percentage"))?;

    InfectionReport::compute(infected, total)
  }

  /// Survivors on one side of the threshold. `criteria` must be exactly
  /// `infected` or `non-infected`.
  pub async fn list_by_criteria(&self, criteria: &str) -> Result<Vec<Survivor>> {
    let criteria: Criteria = criteria.parse()?;

    self
      .store
      .list_survivors(InfectionFilter { criteria, threshold: self.threshold })
      .await
      .map_err(dependency("list_by_criteria"))
  }

  // ── Robots ────────────────────────────────────────────────────────────

  /// Pull the external catalog and replace the stored one with it.
  /// Returns the number of robots now stored.
  pub async fn load_robots(&self) -> Result<usize> {
    let robots = self.feed.fetch().await.map_err(dependency("fetch_robots"))?;

    let stored = self
      .store
      .replace_robots(robots)
      .await
      .map_err(dependency("load_robots"))?;

    info!(stored, "robot catalog loaded");
    Ok(stored)
  }

  pub async fn list_robots(&self) -> Result<Vec<Robot>> {
    self
      .store
      .list_robots()
      .await
      .map_err(dependency("list_robots"))
  }
}
