//! Test utilities for deferred values.
//!
//! This module provides shared helpers for unit and integration tests:
//! - Consistent tracing-based logging initialization
//! - Phase/section macros for readable test output
//! - Scheduler constructors
//! - Settlement assertion macros
//!
//! Logging initialization needs `tracing-subscriber`, which is a
//! dev-dependency, so it is only compiled for tests.
//!
//! # Example
//! ```ignore
//! use deferred::test_utils::{init_test_logging, test_scheduler};
//!
//! #[test]
//! fn my_test() {
//!     init_test_logging();
//!     let sched = test_scheduler();
//!     // ...
//!     sched.run_until_quiescent().unwrap();
//! }
//! ```

use crate::config::SchedulerConfig;
use crate::runtime::LocalScheduler;

/// Step limit used by [`test_scheduler`].
pub const DEFAULT_TEST_MAX_STEPS: u64 = 10_000;

/// Initialize test logging with trace-level output.
///
/// Safe to call multiple times; only initializes once.
#[cfg(test)]
pub fn init_test_logging() {
    init_test_logging_with_level(tracing::Level::TRACE);
}

/// Initialize test logging with a custom level.
///
/// The first call wins; later calls are no-ops.
#[cfg(test)]
pub fn init_test_logging_with_level(level: tracing::Level) {
    static INIT_LOGGING: std::sync::Once = std::sync::Once::new();
    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_test_writer()
            .with_target(true)
            .with_ansi(false)
            .try_init();
    });
}

/// Create a scheduler with a bounded step count for tests.
#[must_use]
pub fn test_scheduler() -> LocalScheduler {
    LocalScheduler::new(SchedulerConfig::new().max_steps(DEFAULT_TEST_MAX_STEPS))
}

/// Log a test phase transition with a visual separator.
#[macro_export]
macro_rules! test_phase {
    ($name:expr) => {
        tracing::info!(phase = %$name, "========================================");
        tracing::info!(phase = %$name, "TEST PHASE: {}", $name);
        tracing::info!(phase = %$name, "========================================");
    };
}

/// Log a section within a test phase.
#[macro_export]
macro_rules! test_section {
    ($name:expr) => {
        tracing::debug!(section = %$name, "--- {} ---", $name);
    };
}

/// Log test completion with summary.
#[macro_export]
macro_rules! test_complete {
    ($name:expr) => {
        tracing::info!(test = %$name, "test completed successfully: {}", $name);
    };
    ($name:expr, $($key:ident = $value:expr),* $(,)?) => {
        tracing::info!(
            test = %$name,
            $($key = %$value,)*
            "test completed successfully: {}",
            $name
        );
    };
}

/// Log before assertions for context.
#[macro_export]
macro_rules! assert_with_log {
    ($cond:expr, $msg:expr, $expected:expr, $actual:expr) => {
        tracing::debug!(
            expected = ?$expected,
            actual = ?$actual,
            "Asserting: {}",
            $msg
        );
        assert!($cond, "{}: expected {:?}, got {:?}", $msg, $expected, $actual);
    };
}

/// Assert that a deferred value is fulfilled with a specific value.
#[macro_export]
macro_rules! assert_fulfilled {
    ($deferred:expr, $expected:expr) => {
        match $deferred.value() {
            Some(v) => assert_eq!(v, $expected),
            None => unreachable!(
                "expected FULFILLED({:?}), got {}",
                $expected,
                $deferred.state_kind()
            ),
        }
    };
}

/// Assert that a deferred value is rejected, optionally with a specific reason.
#[macro_export]
macro_rules! assert_rejected {
    ($deferred:expr) => {
        assert!(
            $deferred.is_rejected(),
            "expected REJECTED, got {}",
            $deferred.state_kind()
        );
    };
    ($deferred:expr, $expected:expr) => {
        match $deferred.reason() {
            Some(r) => assert_eq!(r, $expected),
            None => unreachable!(
                "expected REJECTED({:?}), got {}",
                $expected,
                $deferred.state_kind()
            ),
        }
    };
}

/// Assert that a deferred value has not settled.
#[macro_export]
macro_rules! assert_pending {
    ($deferred:expr) => {
        assert!(
            $deferred.is_pending(),
            "expected PENDING, got {}",
            $deferred.state_kind()
        );
    };
}
