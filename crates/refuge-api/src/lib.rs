//! JSON REST API for refuge.
//!
//! Exposes an axum [`Router`] backed by a [`Tracker`] over any
//! [`TrackerStore`] and [`RobotFeed`]. Every response, success or failure,
//! is an [`Envelope`]. Transport concerns (listener, tracing layer, version
//! prefix) are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api/v1", refuge_api::api_router(tracker.clone()))
//! ```

pub mod envelope;
pub mod error;
pub mod handler;
pub mod report;
pub mod robots;
pub mod survivors;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use refuge_core::{feed::RobotFeed, store::TrackerStore};

pub use envelope::Envelope;
pub use error::ApiError;
pub use handler::Tracker;

/// Build a fully-materialised API router for `tracker`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, F>(tracker: Arc<Tracker<S, F>>) -> Router<()>
where
  S: TrackerStore + 'static,
  F: RobotFeed + 'static,
{
  Router::new()
    // Survivors
    .route(
      "/survivors",
      post(survivors::create::<S, F>).put(survivors::update::<S, F>),
    )
    .route("/survivors/infected", put(survivors::mark_infected::<S, F>))
    .route("/survivors/{id}", get(survivors::get_one::<S, F>))
    .route("/survivors/{id}/locations", get(survivors::locations::<S, F>))
    // Reports
    .route("/report/percentage", get(report::percentage::<S, F>))
    .route("/report/{criteria}", get(report::by_criteria::<S, F>))
    // Robots
    .route("/robots/load", post(robots::load::<S, F>))
    .route("/robots/list", get(robots::list::<S, F>))
    .with_state(tracker)
}

// ─── Integration tests ────────────────────────────────────────────────────────
