//! One-way settlement state machine.
//!
//! ```text
//!              fulfill(v)
//!   Pending ───────────────► Fulfilled(v)
//!      │
//!      │       reject(r)
//!      └───────────────────► Rejected(r)
//! ```
//!
//! Both settled states are terminal. The `Pending` guard in [`State::fulfill`]
//! and [`State::reject`] is what makes the first settlement win.

use crate::error::{Error, Result};
use core::fmt;
use serde::{Deserialize, Serialize};

/// The settlement kind, without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateKind {
    /// Not settled yet.
    Pending,
    /// Settled with a value.
    Fulfilled,
    /// Settled with a reason.
    Rejected,
}

impl StateKind {
    /// Returns true for the two terminal kinds.
    #[must_use]
    pub const fn is_settled(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "PENDING",
            Self::Fulfilled => "FULFILLED",
            Self::Rejected => "REJECTED",
        };
        f.write_str(name)
    }
}

/// Settlement state holding the value or reason once settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State<T, E> {
    /// Not settled yet.
    Pending,
    /// Settled with a value.
    Fulfilled(T),
    /// Settled with a reason.
    Rejected(E),
}

impl<T, E> State<T, E> {
    /// Returns the settlement kind.
    #[must_use]
    pub const fn kind(&self) -> StateKind {
        match self {
            Self::Pending => StateKind::Pending,
            Self::Fulfilled(_) => StateKind::Fulfilled,
            Self::Rejected(_) => StateKind::Rejected,
        }
    }

    /// Returns true if not settled yet.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns true if fulfilled or rejected.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        !self.is_pending()
    }

    /// Returns the fulfillment value, if fulfilled.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Fulfilled(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the rejection reason, if rejected.
    #[must_use]
    pub const fn reason(&self) -> Option<&E> {
        match self {
            Self::Rejected(reason) => Some(reason),
            _ => None,
        }
    }

    /// Transitions `Pending` to `Fulfilled(value)`.
    ///
    /// Fails with [`ErrorKind::AlreadySettled`](crate::ErrorKind::AlreadySettled)
    /// and leaves the state untouched if already settled.
    pub fn fulfill(&mut self, value: T) -> Result<()> {
        if self.is_settled() {
            return Err(Error::already_settled()
                .with_message(format!("cannot fulfill: state is {}", self.kind())));
        }
        *self = Self::Fulfilled(value);
        Ok(())
    }

    /// Transitions `Pending` to `Rejected(reason)`.
    ///
    /// Fails with [`ErrorKind::AlreadySettled`](crate::ErrorKind::AlreadySettled)
    /// and leaves the state untouched if already settled.
    pub fn reject(&mut self, reason: E) -> Result<()> {
        if self.is_settled() {
            return Err(Error::already_settled()
                .with_message(format!("cannot reject: state is {}", self.kind())));
        }
        *self = Self::Rejected(reason);
        Ok(())
    }
}

impl<T, E> Default for State<T, E> {
    fn default() -> Self {
        Self::Pending
    }
}
