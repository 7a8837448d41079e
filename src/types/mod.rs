//! Core types for deferred values.
//!
//! - [`id`]: Identifier types (`DeferredId`, `TaskId`)
//! - [`state`]: The one-way settlement state machine

pub mod id;
pub mod state;

pub use id::{DeferredId, TaskId};
pub use state::{State, StateKind};
