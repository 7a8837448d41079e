//! Deferred values: settlement, handler registration and draining.
//!
//! ```text
//!   Deferred::new(sched, init) ──► schedule(task) ──► init(resolver)
//!                                                        │
//!                  ┌─────────────── resolve(v) ◄─────────┤
//!                  │                reject(r)  ◄─────────┘
//!                  ▼
//!   state: Pending ──► Fulfilled(v) ──► drain continuation queue
//!                  └─► Rejected(r)  ──► drain failure queue
//!                                   └─► reject continuation downstreams
//! ```
//!
//! Every registration returns its downstream immediately. When the handler
//! eventually runs, its result settles that downstream:
//!
//! - `Ok(Resolution::Value(v))` fulfills it with `v`
//! - `Ok(Resolution::Adopt(a))` settles it with whatever `a` settles with
//! - `Err(r)` rejects it with `r`
//!
//! A failure handler that returns `Ok` recovers the chain onto the success
//! track. A continuation registered on a rejected value can never run, so its
//! downstream is rejected with the same reason. A failure handler registered
//! on a fulfilled value is never driven; its downstream stays pending.
//!
//! # Re-entrancy
//!
//! Handlers run with no internal borrow held, so they may register on or
//! settle any deferred value, including the one being drained. Settlement
//! never runs handlers by native recursion: each drain request goes through
//! the thread's worklist, so a chain of any length settles in constant stack.
//! Work requested from inside a handler runs after that handler returns and
//! before the outermost settling call does.

pub mod awaitable;
mod executor;
pub mod handler;
mod queue;
mod worklist;

pub use awaitable::Awaitable;
pub use executor::Resolver;
pub use handler::{Callback, Handler, Resolution};

use crate::types::{DeferredId, State, StateKind};
use core::fmt;
use queue::{HandlerQueue, Reaction};
use std::cell::RefCell;
use std::rc::Rc;
use worklist::Drain;

/// A value or failure that is not known yet.
///
/// `Deferred` is a shared handle: clones refer to the same settlement. It is
/// single-threaded (`!Send`); all mutation happens from the thread driving
/// its scheduler.
pub struct Deferred<T, E> {
    core: Rc<RefCell<Core<T, E>>>,
}

struct Core<T, E> {
    id: DeferredId,
    state: State<T, E>,
    continuations: HandlerQueue<T, T, E>,
    failures: HandlerQueue<E, T, E>,
}

impl<T, E> Deferred<T, E> {
    /// Creates an unsettled value with no initializer.
    pub(crate) fn pending() -> Self {
        Self {
            core: Rc::new(RefCell::new(Core {
                id: DeferredId::next(),
                state: State::Pending,
                continuations: HandlerQueue::new(),
                failures: HandlerQueue::new(),
            })),
        }
    }

    /// Returns this value's identifier.
    #[must_use]
    pub fn id(&self) -> DeferredId {
        self.core.borrow().id
    }

    /// Returns the current settlement kind.
    #[must_use]
    pub fn state_kind(&self) -> StateKind {
        self.core.borrow().state.kind()
    }

    /// Returns true if not settled yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state_kind() == StateKind::Pending
    }

    /// Returns true if fulfilled.
    #[must_use]
    pub fn is_fulfilled(&self) -> bool {
        self.state_kind() == StateKind::Fulfilled
    }

    /// Returns true if rejected.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        self.state_kind() == StateKind::Rejected
    }

    /// Returns true if both handles refer to the same value.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.core, &other.core)
    }

    /// Number of handlers still queued, continuation and failure combined.
    #[cfg(test)]
    pub(crate) fn queued_handlers(&self) -> usize {
        let core = self.core.borrow();
        core.continuations.len() + core.failures.len()
    }
}

impl<T, E> Deferred<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    /// Creates a value that is already fulfilled.
    ///
    /// No task is scheduled.
    #[must_use]
    pub fn resolved(value: T) -> Self {
        let deferred = Self::pending();
        deferred.fulfill(value);
        deferred
    }

    /// Creates a value that is already rejected.
    ///
    /// No task is scheduled.
    #[must_use]
    pub fn rejected(reason: E) -> Self {
        let deferred = Self::pending();
        deferred.reject(reason);
        deferred
    }

    /// Returns a copy of the fulfillment value, if fulfilled.
    #[must_use]
    pub fn value(&self) -> Option<T> {
        self.core.borrow().state.value().cloned()
    }

    /// Returns a copy of the rejection reason, if rejected.
    #[must_use]
    pub fn reason(&self) -> Option<E> {
        self.core.borrow().state.reason().cloned()
    }

    /// Registers a continuation handler.
    ///
    /// Returns the downstream value the handler's result will settle.
    pub fn then<F>(&self, on_fulfilled: F) -> Self
    where
        F: FnOnce(T) -> Result<Resolution<T, E>, E> + 'static,
    {
        self.then_with(Handler::call(on_fulfilled))
    }

    /// Registers a continuation handler, which may be [`Handler::PassThrough`].
    pub fn then_with(&self, handler: Handler<T, T, E>) -> Self {
        let downstream = Self::pending();
        let (kind, reason) = {
            let mut core = self.core.borrow_mut();
            let kind = core.state.kind();
            tracing::trace!(
                id = %core.id,
                downstream = %downstream.id(),
                state = %kind,
                pass_through = handler.is_pass_through(),
                "continuation registered"
            );
            if kind == StateKind::Rejected {
                (kind, core.state.reason().cloned())
            } else {
                core.continuations
                    .push(Reaction::new(handler, downstream.clone()));
                (kind, None)
            }
        };

        match (kind, reason) {
            (StateKind::Fulfilled, _) => self.request_drain(),
            (StateKind::Rejected, Some(reason)) => {
                downstream.reject(reason);
            }
            _ => {}
        }
        downstream
    }

    /// Registers a failure handler.
    ///
    /// Returns the downstream value the handler's result will settle.
    pub fn catch<F>(&self, on_rejected: F) -> Self
    where
        F: FnOnce(E) -> Result<Resolution<T, E>, E> + 'static,
    {
        self.catch_with(Handler::call(on_rejected))
    }

    /// Registers a failure handler, which may be [`Handler::PassThrough`].
    pub fn catch_with(&self, handler: Handler<E, T, E>) -> Self {
        let downstream = Self::pending();
        let kind = {
            let mut core = self.core.borrow_mut();
            let kind = core.state.kind();
            tracing::trace!(
                id = %core.id,
                downstream = %downstream.id(),
                state = %kind,
                pass_through = handler.is_pass_through(),
                "failure handler registered"
            );
            if kind != StateKind::Fulfilled {
                core.failures.push(Reaction::new(handler, downstream.clone()));
            }
            kind
        };

        match kind {
            StateKind::Rejected => self.request_drain(),
            StateKind::Fulfilled => {
                tracing::debug!(
                    id = %self.id(),
                    downstream = %downstream.id(),
                    "failure handler on fulfilled value dropped; downstream stays pending"
                );
            }
            StateKind::Pending => {}
        }
        downstream
    }

    /// Settles as fulfilled. Returns false if already settled.
    ///
    /// Failure handlers still queued can never run; they are released here
    /// and their downstreams stay pending.
    pub(crate) fn fulfill(&self, value: T) -> bool {
        let released = {
            let mut core = self.core.borrow_mut();
            let id = core.id;
            if let Err(err) = core.state.fulfill(value) {
                tracing::debug!(id = %id, error = %err, "ignored fulfillment");
                return false;
            }
            tracing::debug!(
                id = %id,
                queued = core.continuations.len(),
                released = core.failures.len(),
                "fulfilled"
            );
            std::mem::replace(&mut core.failures, HandlerQueue::new())
        };
        // Handlers may own handles to this value; drop them outside the borrow.
        drop(released);
        self.request_drain();
        true
    }

    /// Settles as rejected. Returns false if already settled.
    ///
    /// Failure handlers drain first; then every continuation downstream is
    /// rejected with the same reason, since those continuations will never run.
    pub(crate) fn reject(&self, reason: E) -> bool {
        {
            let mut core = self.core.borrow_mut();
            let id = core.id;
            if let Err(err) = core.state.reject(reason) {
                tracing::debug!(id = %id, error = %err, "ignored rejection");
                return false;
            }
            if core.failures.is_empty() && core.continuations.is_empty() {
                tracing::debug!(id = %id, "rejected with no handlers registered");
            } else {
                tracing::debug!(
                    id = %id,
                    failure_handlers = core.failures.len(),
                    continuations = core.continuations.len(),
                    "rejected"
                );
            }
        }
        self.request_drain();
        true
    }

    /// Settles with the eventual outcome of `awaitable`.
    pub(crate) fn adopt(&self, awaitable: Box<dyn Awaitable<T, E>>) {
        tracing::trace!(id = %self.id(), "adopting awaitable");
        let on_fulfilled = self.clone();
        let on_rejected = self.clone();
        awaitable.subscribe(
            Box::new(move |value: T| {
                on_fulfilled.fulfill(value);
            }),
            Box::new(move |reason: E| {
                on_rejected.reject(reason);
            }),
        );
    }

    fn settle_with(&self, outcome: Result<Resolution<T, E>, E>) {
        match outcome {
            Ok(Resolution::Value(value)) => {
                self.fulfill(value);
            }
            Ok(Resolution::Adopt(awaitable)) => self.adopt(awaitable),
            Err(reason) => {
                self.reject(reason);
            }
        }
    }

    fn request_drain(&self) {
        worklist::request(Rc::new(self.clone()));
    }

    /// Pops the next runnable reaction together with the payload it needs.
    fn next_step(&self) -> Option<Step<T, E>> {
        let mut core = self.core.borrow_mut();
        let core = &mut *core;
        match &core.state {
            State::Pending => None,
            State::Fulfilled(value) => {
                let reaction = core.continuations.pop()?;
                Some(Step::Continue(reaction, value.clone()))
            }
            State::Rejected(reason) => {
                if let Some(reaction) = core.failures.pop() {
                    return Some(Step::Recover(reaction, reason.clone()));
                }
                let reaction = core.continuations.pop()?;
                Some(Step::Skip(reaction, reason.clone()))
            }
        }
    }
}

/// One unit of drain work, taken out of the core before it runs.
enum Step<T, E> {
    /// A continuation with the fulfillment value.
    Continue(Reaction<T, T, E>, T),
    /// A failure handler with the rejection reason.
    Recover(Reaction<E, T, E>, E),
    /// A continuation that can never run; its downstream takes the reason.
    Skip(Reaction<T, T, E>, E),
}

impl<T, E> Drain for Deferred<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    fn run_next(&self) -> bool {
        let Some(step) = self.next_step() else {
            return false;
        };
        match step {
            Step::Continue(Reaction { handler, downstream }, value) => match handler {
                Handler::PassThrough => {
                    downstream.fulfill(value);
                }
                Handler::Call(on_fulfilled) => downstream.settle_with(on_fulfilled(value)),
            },
            Step::Recover(Reaction { handler, downstream }, reason) => match handler {
                Handler::PassThrough => {
                    downstream.reject(reason);
                }
                Handler::Call(on_rejected) => downstream.settle_with(on_rejected(reason)),
            },
            Step::Skip(Reaction { downstream, .. }, reason) => {
                downstream.reject(reason);
            }
        }
        true
    }
}

impl<T, E> Clone for Deferred<T, E> {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
        }
    }
}

impl<T, E> fmt::Debug for Deferred<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.core.try_borrow() {
            Ok(core) => f
                .debug_struct("Deferred")
                .field("id", &core.id)
                .field("state", &core.state.kind())
                .finish_non_exhaustive(),
            Err(_) => f.write_str("Deferred(<busy>)"),
        }
    }
}
