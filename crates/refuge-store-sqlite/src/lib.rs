//! SQLite backend for the refuge survivor tracker.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{IN_MEMORY_URI, SqliteStore};

#[cfg(test)]
mod tests;
