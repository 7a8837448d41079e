//! Ordered handler queues.
//!
//! Each entry pairs a handler with the downstream it must settle. Entries
//! leave the queue in registration order and exactly once.

use super::handler::Handler;
use super::Deferred;
use std::collections::VecDeque;

/// A queued handler and the downstream it settles.
pub(crate) struct Reaction<A, T, E> {
    pub(crate) handler: Handler<A, T, E>,
    pub(crate) downstream: Deferred<T, E>,
}

impl<A, T, E> Reaction<A, T, E> {
    pub(crate) const fn new(handler: Handler<A, T, E>, downstream: Deferred<T, E>) -> Self {
        Self {
            handler,
            downstream,
        }
    }
}

/// FIFO of reactions awaiting one settlement kind.
pub(crate) struct HandlerQueue<A, T, E> {
    entries: VecDeque<Reaction<A, T, E>>,
}

impl<A, T, E> HandlerQueue<A, T, E> {
    pub(crate) const fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    pub(crate) fn push(&mut self, reaction: Reaction<A, T, E>) {
        self.entries.push_back(reaction);
    }

    pub(crate) fn pop(&mut self) -> Option<Reaction<A, T, E>> {
        self.entries.pop_front()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
