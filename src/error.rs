//! Error types for the deferred crate.
//!
//! Rejection reasons are owned by the caller (`E` in [`Deferred<T, E>`]) and
//! never pass through this module. The types here describe failures of the
//! library machinery itself:
//!
//! - **Settlement**: an attempt to settle an already-settled state
//! - **Scheduling**: a scheduler run that hit its step limit with work left
//! - **Configuration**: invalid configuration values
//!
//! [`Deferred<T, E>`]: crate::Deferred

use core::fmt;

/// The kind of error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The state was already fulfilled or rejected.
    AlreadySettled,
    /// The scheduler stopped at its step limit while tasks were still queued.
    StepLimitExceeded,
    /// A configuration value was rejected.
    InvalidConfig,
}

impl ErrorKind {
    /// Returns a short, stable name for this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AlreadySettled => "already settled",
            Self::StepLimitExceeded => "step limit exceeded",
            Self::InvalidConfig => "invalid configuration",
        }
    }

    /// Returns true if retrying the operation cannot succeed.
    ///
    /// A step limit can be raised and the run resumed; everything else is final.
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        !matches!(self, Self::StepLimitExceeded)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The main error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub const fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the attached message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Adds a message to the error.
    #[must_use]
    pub fn with_message(mut self, msg: impl Into<String>) -> Self {
        self.message = Some(msg.into());
        self
    }

    /// Creates an already-settled error.
    #[must_use]
    pub const fn already_settled() -> Self {
        Self::new(ErrorKind::AlreadySettled)
    }

    /// Creates a step-limit error recording how much work was left behind.
    #[must_use]
    pub fn step_limit(max_steps: u64, pending: usize) -> Self {
        Self::new(ErrorKind::StepLimitExceeded).with_message(format!(
            "stopped after {max_steps} steps with {pending} task(s) still queued"
        ))
    }

    /// Returns true if this error reports an already-settled state.
    #[must_use]
    pub const fn is_already_settled(&self) -> bool {
        matches!(self.kind, ErrorKind::AlreadySettled)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(msg) = &self.message {
            write!(f, ": {msg}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<crate::config::ConfigError> for Error {
    fn from(err: crate::config::ConfigError) -> Self {
        Self::new(ErrorKind::InvalidConfig).with_message(err.to_string())
    }
}

/// A specialized Result type for deferred operations.
pub type Result<T> = core::result::Result<T, Error>;
