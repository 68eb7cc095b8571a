//! refuge server binary.
//!
//! Reads configuration from the environment (and optionally `--config`),
//! opens the SQLite store, and serves the survivor tracking API until an
//! interrupt arrives.

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context as _;
use clap::Parser;
use refuge_api::Tracker;
use refuge_server::{ENV_PREFIX, HttpRobotFeed, RunMode, ServerConfig};
use refuge_store_sqlite::SqliteStore;
use tokio::{net::TcpListener, sync::oneshot};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "refuge survivor tracking server")]
struct Cli {
  /// Optional TOML configuration file; `REFUGE_*` variables override it.
  #[arg(short, long)]
  config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  // Load configuration.
  let server_cfg = ServerConfig::load(
    cli.config.as_deref(),
    config::Environment::with_prefix(ENV_PREFIX),
  )
  .context("failed to load configuration")?;

  init_tracing(server_cfg.mode);

  // Open the store; an unusable database is fatal.
  let store =
    SqliteStore::connect(&server_cfg.database_uri, &server_cfg.database_name)
      .await
      .with_context(|| {
        format!(
          "failed to open database {:?} at {:?}",
          server_cfg.database_name, server_cfg.database_uri
        )
      })?;

  let feed = HttpRobotFeed::new(
    server_cfg.feed_url.clone(),
    Duration::from_secs(server_cfg.feed_timeout_secs),
  )
  .context("failed to build robot feed client")?;

  let feed_url = feed.url().to_owned();
  let tracker = Tracker::new(Arc::new(store), Arc::new(feed))
    .with_threshold(server_cfg.infection_threshold);
  info!(
    feed_url = %feed_url,
    infection_threshold = tracker.threshold(),
    "tracker ready"
  );
  let app = refuge_server::router(Arc::new(tracker));

  let address = server_cfg.address();
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;
  info!(mode = ?server_cfg.mode, "listening on http://{address}");

  // Serve in the background; the main task waits for the interrupt.
  let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
  let mut server = tokio::spawn(async move {
    axum::serve(listener, app)
      .with_graceful_shutdown(async {
        shutdown_rx.await.ok();
      })
      .await
  });

  tokio::select! {
    res = &mut server => {
      res.context("server task panicked")?.context("server error")?;
      return Ok(());
    }
    sig = tokio::signal::ctrl_c() => sig.context("failed to listen for interrupt")?,
  }

  info!("gracefully shutting down");
  shutdown_tx.send(()).ok();
  // In-flight requests finish before the listener is released.
  server
    .await
    .context("server task panicked")?
    .context("server error")?;

  info!("shutdown complete");
  Ok(())
}

fn init_tracing(mode: RunMode) {
  let filter = EnvFilter::builder()
    .with_default_directive(mode.default_level().into())
    .from_env_lossy();

  match mode {
    RunMode::Debug => tracing_subscriber::fmt().with_env_filter(filter).init(),
    RunMode::Production => {
      tracing_subscriber::fmt().json().with_env_filter(filter).init()
    }
  }
}
