//! Handlers and the classification of their return values.

use super::awaitable::Awaitable;
use super::Deferred;
use core::fmt;

/// What a handler produced: a plain value, or something to adopt.
pub enum Resolution<T, E> {
    /// Settle the downstream with this value.
    Value(T),
    /// Settle the downstream with the eventual outcome of this awaitable.
    Adopt(Box<dyn Awaitable<T, E>>),
}

impl<T, E> Resolution<T, E> {
    /// Wraps an awaitable for adoption.
    pub fn adopt<A>(awaitable: A) -> Self
    where
        A: Awaitable<T, E> + 'static,
    {
        Self::Adopt(Box::new(awaitable))
    }

    /// Returns true if this resolution adopts an awaitable.
    #[must_use]
    pub const fn is_adopt(&self) -> bool {
        matches!(self, Self::Adopt(_))
    }
}

impl<T, E> From<Deferred<T, E>> for Resolution<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    fn from(deferred: Deferred<T, E>) -> Self {
        Self::adopt(deferred)
    }
}

impl<T: fmt::Debug, E> fmt::Debug for Resolution<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Adopt(_) => f.write_str("Adopt(..)"),
        }
    }
}

/// Boxed handler callback taking the settled payload `A`.
pub type Callback<A, T, E> = Box<dyn FnOnce(A) -> Result<Resolution<T, E>, E>>;

/// A handler registered through [`Deferred::then_with`] or [`Deferred::catch_with`].
///
/// `A` is the payload the handler receives: the value for continuation
/// handlers, the reason for failure handlers.
pub enum Handler<A, T, E> {
    /// Forward the settled payload unchanged, keeping its settlement kind.
    PassThrough,
    /// Invoke the callback with the settled payload.
    Call(Callback<A, T, E>),
}

impl<A, T, E> Handler<A, T, E> {
    /// Wraps a closure as a handler.
    pub fn call<F>(f: F) -> Self
    where
        F: FnOnce(A) -> Result<Resolution<T, E>, E> + 'static,
    {
        Self::Call(Box::new(f))
    }

    /// Returns true for the forwarding handler.
    #[must_use]
    pub const fn is_pass_through(&self) -> bool {
        matches!(self, Self::PassThrough)
    }
}

impl<A, T, E> fmt::Debug for Handler<A, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PassThrough => f.write_str("PassThrough"),
            Self::Call(_) => f.write_str("Call(..)"),
        }
    }
}
