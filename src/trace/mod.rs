//! Scheduler trace capture.
//!
//! The [`LocalScheduler`](crate::LocalScheduler) records what it does with
//! each task into a bounded [`TraceBuffer`], so tests can assert on the
//! exact interleaving of scheduled work.

pub mod buffer;
pub mod event;

pub use buffer::TraceBuffer;
pub use event::{TraceEvent, TraceEventKind};
