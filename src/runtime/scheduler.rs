//! The scheduling seam between deferred values and their host.

use crate::types::TaskId;
use core::fmt;
use std::rc::Rc;

/// A unit of deferred work.
pub struct Task {
    id: TaskId,
    label: &'static str,
    run: Box<dyn FnOnce()>,
}

impl Task {
    /// Wraps a callback as a task with a fresh ID.
    pub fn new<F>(label: &'static str, run: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self {
            id: TaskId::next(),
            label,
            run: Box::new(run),
        }
    }

    /// Returns the task ID.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the label the task was created with.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.label
    }

    /// Runs the task, consuming it.
    pub fn run(self) {
        (self.run)();
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Defers a task until after the current execution turn.
///
/// Implementations must not run the task inline from `schedule`; callers
/// rely on being able to finish their current turn first.
pub trait Schedule {
    /// Submits a task for later execution.
    fn schedule(&self, task: Task);
}

impl<S: Schedule + ?Sized> Schedule for &S {
    fn schedule(&self, task: Task) {
        (**self).schedule(task);
    }
}

impl<S: Schedule + ?Sized> Schedule for Rc<S> {
    fn schedule(&self, task: Task) {
        (**self).schedule(task);
    }
}
