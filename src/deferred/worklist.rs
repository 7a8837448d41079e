//! Per-thread worklist that runs queued reactions.
//!
//! Settling a value requests a drain instead of running its handlers on the
//! spot. The first request on a thread runs the loop below; requests made
//! while the loop is running are pushed onto the worklist and picked up by
//! it. Settling a chain of any length therefore uses constant native stack.
//!
//! The most recent request is served first, so a downstream's handlers run
//! before the next sibling handler of its source (depth-first order).

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// A value with reactions that may become runnable.
pub(crate) trait Drain {
    /// Runs one queued reaction.
    ///
    /// Returns false, without side effects, when nothing runnable is queued.
    fn run_next(&self) -> bool;
}

thread_local! {
    static WORKLIST: RefCell<Vec<Rc<dyn Drain>>> = const { RefCell::new(Vec::new()) };
    static RUNNING: Cell<bool> = const { Cell::new(false) };
}

/// Drains `target`, now or as soon as the running loop reaches it.
pub(crate) fn request(target: Rc<dyn Drain>) {
    WORKLIST.with(|list| list.borrow_mut().push(target));
    if RUNNING.with(Cell::get) {
        return;
    }

    let _running = Running::enter();
    loop {
        // The list borrow must end before running: reactions push more work.
        let Some(top) = WORKLIST.with(|list| list.borrow().last().cloned()) else {
            break;
        };
        if !top.run_next() {
            WORKLIST.with(|list| list.borrow_mut().pop());
        }
    }
}

/// Returns the number of pending drain requests on this thread.
#[cfg(test)]
pub(crate) fn pending() -> usize {
    WORKLIST.with(|list| list.borrow().len())
}

/// Marks the loop as running; resets the thread's worklist on exit,
/// including when a handler unwinds.
struct Running;

impl Running {
    fn enter() -> Self {
        RUNNING.with(|running| running.set(true));
        Self
    }
}

impl Drop for Running {
    fn drop(&mut self) {
        let abandoned = WORKLIST.with(|list| std::mem::take(&mut *list.borrow_mut()));
        RUNNING.with(|running| running.set(false));
        drop(abandoned);
    }
}
