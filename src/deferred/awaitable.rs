//! The adoption capability.
//!
//! A handler's return value is adopted only when it is explicitly wrapped as
//! [`Resolution::Adopt`](super::Resolution::Adopt). Anything implementing
//! [`Awaitable`] can be adopted, not just [`Deferred`]; plain values never
//! are.

use super::{Deferred, Resolution};

/// Something that eventually reports exactly one outcome.
pub trait Awaitable<T, E> {
    /// Registers the two outcome callbacks.
    ///
    /// An implementation must call at most one of them, at most once. It may
    /// call it inline if the outcome is already known.
    fn subscribe(
        self: Box<Self>,
        on_fulfilled: Box<dyn FnOnce(T)>,
        on_rejected: Box<dyn FnOnce(E)>,
    );
}

impl<T, E> Awaitable<T, E> for Deferred<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    fn subscribe(
        self: Box<Self>,
        on_fulfilled: Box<dyn FnOnce(T)>,
        on_rejected: Box<dyn FnOnce(E)>,
    ) {
        self.then(move |value: T| {
            on_fulfilled(value.clone());
            Ok(Resolution::Value(value))
        });
        self.catch(move |reason: E| {
            on_rejected(reason.clone());
            Err(reason)
        });
    }
}
