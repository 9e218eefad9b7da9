//! State management with actor pattern
//!
//! StateManager owns the Catalog and processes messages via channels,
//! serializing every read and mutation through a single task.

mod manager;
mod messages;

pub use manager::StateManager;
pub use messages::{DueReset, StateCommand, StateResponse};
