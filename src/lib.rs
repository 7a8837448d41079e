//! Deferred: one-shot deferred values with chained continuations.
//!
//! # Overview
//!
//! A [`Deferred`] represents a value that is not available yet. It settles at
//! most once, either fulfilled with a value or rejected with a reason, and
//! every handler registered on it observes that single outcome. Registering a
//! handler returns a new downstream `Deferred` immediately, so handlers chain
//! into pipelines where failures travel until some failure handler recovers
//! them.
//!
//! # Core Guarantees
//!
//! - **First settlement wins**: once fulfilled or rejected, state and payload never change
//! - **Ordered draining**: handlers fire in registration order, exactly once
//! - **Late registration**: handlers attached after settlement still run
//! - **Adoption**: a handler returning an [`Awaitable`] settles its downstream with
//!   the awaitable's eventual outcome, success or failure
//! - **Error conversion**: an initializer or handler returning `Err` rejects the
//!   corresponding `Deferred` instead of escaping
//! - **Deferred start**: initializers never run inline with construction; they are
//!   submitted to an injected [`Schedule`] implementation
//!
//! # Module Structure
//!
//! - [`types`]: Identifiers and the settlement state machine
//! - [`deferred`]: The `Deferred` handle, handler queues and resolution engine
//! - [`runtime`]: Scheduler abstraction and the deterministic local scheduler
//! - [`trace`]: Scheduler trace capture
//! - [`config`]: Scheduler configuration and environment overrides
//! - [`error`]: Library error types
//! - [`test_utils`]: Shared helpers for tests
//!
//! # Example
//!
//! ```
//! use deferred::{Deferred, LocalScheduler, Resolution};
//!
//! let scheduler = LocalScheduler::default();
//! let answer: Deferred<i32, String> = Deferred::new(&scheduler, |resolver| {
//!     resolver.resolve(9);
//!     Ok(())
//! });
//! let chained = answer
//!     .then(|v| Ok(Resolution::Value(v + 1)))
//!     .then(|v| Ok(Resolution::Value(v + 2)));
//!
//! scheduler.run_until_quiescent().unwrap();
//! assert_eq!(chained.value(), Some(12));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

pub mod config;
pub mod deferred;
pub mod error;
pub mod runtime;
pub mod test_utils;
pub mod trace;
pub mod types;

pub use config::{ConfigError, SchedulerConfig};
pub use deferred::{Awaitable, Deferred, Handler, Resolution, Resolver};
pub use error::{Error, ErrorKind, Result};
pub use runtime::{LocalScheduler, Schedule, Task};
pub use types::{DeferredId, State, StateKind, TaskId};
