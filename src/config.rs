//! Scheduler configuration.
//!
//! # Configuration Precedence
//!
//! Settings are resolved in this order (highest priority first):
//!
//! 1. **Programmatic**: values set via builder methods (`max_steps(10)`)
//! 2. **Environment variables**: values from `DEFERRED_*` env vars
//! 3. **Defaults**: built-in defaults from [`SchedulerConfig::default()`]
//!
//! # Supported Environment Variables
//!
//! | Variable | Type | Maps to |
//! |----------|------|---------|
//! | `DEFERRED_MAX_STEPS` | `u64`, `0` or `none` | `max_steps` |
//! | `DEFERRED_TRACE_CAPACITY` | `usize` | `trace_capacity` |

use serde::{Deserialize, Serialize};

/// Environment variable name for the scheduler step limit.
pub const ENV_MAX_STEPS: &str = "DEFERRED_MAX_STEPS";
/// Environment variable name for the trace buffer capacity.
pub const ENV_TRACE_CAPACITY: &str = "DEFERRED_TRACE_CAPACITY";

const DEFAULT_MAX_STEPS: u64 = 100_000;
const DEFAULT_TRACE_CAPACITY: usize = 1024;

/// Error produced while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable held a value that could not be parsed.
    #[error("invalid value for {var}: expected {expected}, got {value:?}")]
    InvalidValue {
        /// The variable name.
        var: &'static str,
        /// What the variable should contain.
        expected: &'static str,
        /// The raw value found.
        value: String,
    },
}

/// Configuration for a [`LocalScheduler`](crate::LocalScheduler).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Maximum number of tasks a single `run_until_quiescent` call executes.
    ///
    /// `None` disables the limit.
    pub max_steps: Option<u64>,
    /// Trace buffer capacity. `0` disables trace capture.
    pub trace_capacity: usize,
}

impl SchedulerConfig {
    /// Creates a configuration with the built-in defaults.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_steps: Some(DEFAULT_MAX_STEPS),
            trace_capacity: DEFAULT_TRACE_CAPACITY,
        }
    }

    /// Creates a configuration from the defaults with environment overrides applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::new();
        apply_env_overrides(&mut config)?;
        Ok(config)
    }

    /// Sets the maximum number of steps.
    #[must_use]
    pub const fn max_steps(mut self, steps: u64) -> Self {
        self.max_steps = Some(steps);
        self
    }

    /// Disables the step limit.
    #[must_use]
    pub const fn no_step_limit(mut self) -> Self {
        self.max_steps = None;
        self
    }

    /// Sets the trace buffer capacity.
    #[must_use]
    pub const fn trace_capacity(mut self, capacity: usize) -> Self {
        self.trace_capacity = capacity;
        self
    }

    /// Returns true if scheduler traces are captured.
    #[must_use]
    pub const fn tracing_enabled(&self) -> bool {
        self.trace_capacity > 0
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply environment variable overrides to a [`SchedulerConfig`].
///
/// Only variables that are set in the environment are applied.
pub fn apply_env_overrides(config: &mut SchedulerConfig) -> Result<(), ConfigError> {
    apply_overrides(config, |name| std::env::var(name).ok())
}

fn apply_overrides<F>(config: &mut SchedulerConfig, read: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = read(ENV_MAX_STEPS) {
        config.max_steps = parse_step_limit(&val)?;
    }
    if let Some(val) = read(ENV_TRACE_CAPACITY) {
        config.trace_capacity =
            val.trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidValue {
                    var: ENV_TRACE_CAPACITY,
                    expected: "unsigned integer",
                    value: val.clone(),
                })?;
    }
    Ok(())
}

fn parse_step_limit(val: &str) -> Result<Option<u64>, ConfigError> {
    let trimmed = val.trim();
    if trimmed.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    match trimmed.parse::<u64>() {
        Ok(0) => Ok(None),
        Ok(steps) => Ok(Some(steps)),
        Err(_) => Err(ConfigError::InvalidValue {
            var: ENV_MAX_STEPS,
            expected: "unsigned integer or \"none\"",
            value: val.to_string(),
        }),
    }
}
