//! Initializer invocation and the resolver capability.

use super::awaitable::Awaitable;
use super::Deferred;
use crate::runtime::{Schedule, Task};
use crate::types::DeferredId;
use core::fmt;

/// The resolve and reject capabilities of one [`Deferred`].
///
/// Handed to the initializer passed to [`Deferred::new`]. Clones settle the
/// same value; whichever call lands first wins and the rest are ignored.
pub struct Resolver<T, E> {
    target: Deferred<T, E>,
}

impl<T, E> Resolver<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    /// Fulfills the target. Returns false if it was already settled.
    pub fn resolve(&self, value: T) -> bool {
        self.target.fulfill(value)
    }

    /// Rejects the target. Returns false if it was already settled.
    pub fn reject(&self, reason: E) -> bool {
        self.target.reject(reason)
    }

    /// Settles the target with the eventual outcome of `awaitable`.
    ///
    /// Unlike [`resolve`](Self::resolve), which stores its argument as-is,
    /// this waits for the awaitable and forwards its value or reason. A
    /// direct `resolve` or `reject` landing first still wins.
    pub fn adopt<A>(&self, awaitable: A)
    where
        A: Awaitable<T, E> + 'static,
    {
        self.target.adopt(Box::new(awaitable));
    }
}

impl<T, E> Resolver<T, E> {
    /// Returns the identifier of the value this resolver settles.
    #[must_use]
    pub fn id(&self) -> DeferredId {
        self.target.id()
    }

    /// Returns true once the target has settled.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !self.target.is_pending()
    }
}

impl<T, E> Clone for Resolver<T, E> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
        }
    }
}

impl<T, E> fmt::Debug for Resolver<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("target", &self.target)
            .finish()
    }
}

impl<T, E> Deferred<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    /// Creates a value settled by `initializer`.
    ///
    /// The initializer does not run here: it is submitted to `scheduler` as a
    /// single task, so handlers registered right after construction are
    /// always in place before it can settle anything. Returning `Err(reason)`
    /// from the initializer rejects the value, unless it already settled.
    pub fn new<S, F>(scheduler: &S, initializer: F) -> Self
    where
        S: Schedule + ?Sized,
        F: FnOnce(Resolver<T, E>) -> Result<(), E> + 'static,
    {
        let deferred = Self::pending();
        let resolver = Resolver {
            target: deferred.clone(),
        };
        tracing::trace!(id = %deferred.id(), "scheduling initializer");
        scheduler.schedule(Task::new("deferred-init", move || {
            run_initializer(initializer, resolver);
        }));
        deferred
    }
}

fn run_initializer<T, E, F>(initializer: F, resolver: Resolver<T, E>)
where
    T: Clone + 'static,
    E: Clone + 'static,
    F: FnOnce(Resolver<T, E>) -> Result<(), E>,
{
    let id = resolver.id();
    tracing::trace!(id = %id, "running initializer");
    if let Err(reason) = initializer(resolver.clone()) {
        if !resolver.reject(reason) {
            tracing::debug!(id = %id, "initializer failed after settling; failure ignored");
        }
    }
}
