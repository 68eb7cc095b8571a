//! The `TrackerStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `refuge-store-sqlite`).
//! The handler layer in `refuge-api` depends on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use crate::{
  report::InfectionFilter,
  robot::Robot,
  survivor::{LocationRecord, NewSurvivor, Survivor, SurvivorUpdate},
};

/// Abstraction over the survivor and robot collections.
///
/// Writes that depend on whether a survivor exists report that fact in their
/// return value instead of requiring a separate existence check, so the
/// backend can answer atomically.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait TrackerStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Survivors ─────────────────────────────────────────────────────────

  /// `true` if a survivor with this identifier is stored.
  fn survivor_exists<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Insert a survivor unless the identifier is already taken.
  ///
  /// Returns `false`, writing nothing, when a survivor with the same
  /// identifier exists. Uniqueness is enforced by the backend itself.
  fn insert_survivor(
    &self,
    input: NewSurvivor,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Retrieve a survivor by identifier. Returns `None` if not found.
  fn get_survivor<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Survivor>, Self::Error>> + Send + 'a;

  /// Overwrite the supplied fields of a survivor.
  ///
  /// When `update.location` is set, exactly one [`LocationRecord`] is
  /// appended. Returns `false`, writing nothing, if the survivor is absent.
  fn update_survivor(
    &self,
    update: SurvivorUpdate,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Increment the report counter by one and append `reported_by` to the
  /// reporter list. Returns `false` if the survivor is absent.
  fn mark_infected<'a>(
    &'a self,
    id: &'a str,
    reported_by: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Count survivors, optionally restricted to one side of the threshold.
  fn count_survivors(
    &self,
    filter: Option<InfectionFilter>,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// List survivors on one side of the threshold.
  fn list_survivors(
    &self,
    filter: InfectionFilter,
  ) -> impl Future<Output = Result<Vec<Survivor>, Self::Error>> + Send + '_;

  /// Movement trail of a survivor, oldest first.
  fn location_history<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Vec<LocationRecord>, Self::Error>> + Send + 'a;

  // ── Robots ────────────────────────────────────────────────────────────

  /// Replace the whole robot catalog with `robots`, returning how many
  /// entries were stored.
  fn replace_robots(
    &self,
    robots: Vec<Robot>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// The current robot catalog, in the order it was loaded.
  fn list_robots(
    &self,
  ) -> impl Future<Output = Result<Vec<Robot>, Self::Error>> + Send + '_;
}
