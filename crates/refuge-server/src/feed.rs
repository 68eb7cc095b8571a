//! [`HttpRobotFeed`] fetches the robot catalog from the upstream HTTP feed.

use std::time::Duration;

use refuge_core::{feed::RobotFeed, robot::Robot};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FeedError {
  /// Transport failure, timeout, or a body that is not a robot array.
  #[error("robot feed request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("robot feed answered {0}")]
  Status(StatusCode),
}

/// Async client for the external robot catalog.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpRobotFeed {
  client: Client,
  url:    String,
}

impl HttpRobotFeed {
  pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FeedError> {
    let client = Client::builder().timeout(timeout).build()?;
    Ok(Self { client, url: url.into() })
  }

  pub fn url(&self) -> &str { &self.url }
}

impl RobotFeed for HttpRobotFeed {
  type Error = FeedError;

  async fn fetch(&self) -> Result<Vec<Robot>, FeedError> {
    let resp = self.client.get(&self.url).send().await?;

    let status = resp.status();
    if !status.is_success() {
      return Err(FeedError::Status(status));
    }

    let robots: Vec<Robot> = resp.json().await?;
    debug!(url = %self.url, count = robots.len(), "fetched robot catalog");
    Ok(robots)
  }
}
