//! Process wiring for the refuge server: configuration, the upstream robot
//! feed client, and the versioned HTTP application.

pub mod feed;

pub use feed::{FeedError, HttpRobotFeed};

use std::{path::Path, sync::Arc};

use axum::Router;
use refuge_api::Tracker;
use refuge_core::{
  feed::RobotFeed, report::DEFAULT_INFECTION_THRESHOLD, store::TrackerStore,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;

/// Prefix of every environment variable the server reads.
pub const ENV_PREFIX: &str = "REFUGE";

/// Path prefix all API routes are mounted under.
pub const API_PREFIX: &str = "/api/v1";

/// Upstream catalog used when `feed_url` is not configured.
pub const DEFAULT_FEED_URL: &str =
  "https://robotstakeover20210903110417.azurewebsites.net/robotcpu";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Affects logging only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
  /// Human-readable logs, `DEBUG` and above.
  #[default]
  Debug,
  /// JSON logs, `INFO` and above.
  Production,
}

impl RunMode {
  pub fn default_level(self) -> LevelFilter {
    match self {
      Self::Debug => LevelFilter::DEBUG,
      Self::Production => LevelFilter::INFO,
    }
  }
}

/// Runtime server configuration: defaults, then an optional TOML file, then
/// `REFUGE_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                String,
  pub server_port:         u16,
  pub mode:                RunMode,
  /// Directory holding the database, or `:memory:`.
  pub database_uri:        String,
  pub database_name:       String,
  pub feed_url:            String,
  pub feed_timeout_secs:   u64,
  pub infection_threshold: u32,
}

impl ServerConfig {
  /// Layer the configuration sources. `env` is normally
  /// `config::Environment::with_prefix(ENV_PREFIX)`.
  pub fn load(
    file: Option<&Path>,
    env: config::Environment,
  ) -> Result<Self, config::ConfigError> {
    let mut builder = config::Config::builder()
      .set_default("host", "0.0.0.0")?
      .set_default("server_port", 8080)?
      .set_default("mode", "debug")?
      .set_default("database_uri", ".")?
      .set_default("database_name", "robot-apocalypse")?
      .set_default("feed_url", DEFAULT_FEED_URL)?
      .set_default("feed_timeout_secs", 30)?
      .set_default("infection_threshold", i64::from(DEFAULT_INFECTION_THRESHOLD))?;

    if let Some(path) = file {
      builder = builder.add_source(config::File::from(path).required(true));
    }

    builder.add_source(env).build()?.try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.server_port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The complete application: the API nested under [`API_PREFIX`], wrapped in
/// a request tracing layer.
pub fn router<S, F>(tracker: Arc<Tracker<S, F>>) -> Router
where
  S: TrackerStore + 'static,
  F: RobotFeed + 'static,
{
  Router::new()
    .nest(API_PREFIX, refuge_api::api_router(tracker))
    .layer(TraceLayer::new_for_http())
}

// ─── Tests ────────────────────────────────────────────────────────────────────
