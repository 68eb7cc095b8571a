//! Core types and trait definitions for the refuge survivor tracker.
//!
//! This crate has no HTTP or database dependencies. The storage backend and
//! the HTTP layer both depend on it.

pub mod error;
pub mod feed;
pub mod report;
pub mod robot;
pub mod store;
pub mod survivor;

pub use error::{Error, Result};
