//! Task scheduling.
//!
//! The settlement core never runs an initializer inline with construction.
//! It hands a [`Task`] to whatever implements [`Schedule`]; the host decides
//! when that task runs. [`LocalScheduler`] is the deterministic,
//! single-threaded implementation used by tests and simple hosts.

pub mod local;
pub mod scheduler;

pub use local::LocalScheduler;
pub use scheduler::{Schedule, Task};
