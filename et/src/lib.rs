//! Essential Tracker - daily essentials checklist
//!
//! Items are grouped into categories and ticked off during the day. Once a
//! day, at the configured notification time, every item is unchecked and a
//! reminder goes out.
//!
//! - [`catalog`] keeps items and categories consistent (Unsorted fallback,
//!   unique names, atomic cascades)
//! - [`scheduler`] decides when the daily reset is due and performs it
//! - [`state`] serializes all access through a single actor
//! - [`server`] exposes the REST API

pub mod catalog;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod scheduler;
pub mod server;
pub mod state;
pub mod store;

pub use catalog::{Catalog, CategoryView, ResetOutcome};
pub use config::Config;
pub use error::{StoreError, TrackerError, TrackerResult};
pub use state::StateManager;
