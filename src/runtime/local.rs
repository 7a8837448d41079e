//! Deterministic single-threaded scheduler.
//!
//! Tasks run strictly in submission order. A task that schedules more work
//! while running appends it behind everything already queued, which models
//! the "after the current turn" contract of a host event loop.

use super::scheduler::{Schedule, Task};
use crate::config::SchedulerConfig;
use crate::error::{Error, Result};
use crate::trace::{TraceBuffer, TraceEventKind};
use crate::types::TaskId;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

/// A FIFO scheduler driven explicitly by its owner.
///
/// Clones share the same queue, so a clone can be moved into initializers
/// and handlers that need to create further deferred values.
#[derive(Debug, Clone)]
pub struct LocalScheduler {
    inner: Rc<LocalInner>,
}

#[derive(Debug)]
struct LocalInner {
    config: SchedulerConfig,
    queue: RefCell<VecDeque<Task>>,
    trace: RefCell<TraceBuffer>,
    steps: Cell<u64>,
}

impl LocalScheduler {
    /// Creates a scheduler with the given configuration.
    #[must_use]
    pub fn new(config: SchedulerConfig) -> Self {
        let trace = TraceBuffer::new(config.trace_capacity);
        Self {
            inner: Rc::new(LocalInner {
                config,
                queue: RefCell::new(VecDeque::new()),
                trace: RefCell::new(trace),
                steps: Cell::new(0),
            }),
        }
    }

    /// Creates a scheduler configured from `DEFERRED_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(SchedulerConfig::from_env()?))
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &SchedulerConfig {
        &self.inner.config
    }

    /// Returns the number of queued tasks.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inner.queue.borrow().len()
    }

    /// Returns true if no tasks are queued.
    #[must_use]
    pub fn is_quiescent(&self) -> bool {
        self.inner.queue.borrow().is_empty()
    }

    /// Returns the total number of tasks run so far.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.inner.steps.get()
    }

    /// Returns a snapshot of the trace buffer.
    #[must_use]
    pub fn trace(&self) -> TraceBuffer {
        self.inner.trace.borrow().clone()
    }

    /// Runs the oldest queued task.
    ///
    /// Returns `false` if the queue was empty.
    pub fn step(&self) -> bool {
        // The queue borrow must end before the task runs: tasks schedule more work.
        let Some(task) = self.inner.queue.borrow_mut().pop_front() else {
            return false;
        };
        let id = task.id();
        let label = task.label();
        self.inner.steps.set(self.inner.steps.get() + 1);
        self.record(id, label, TraceEventKind::Started);
        tracing::trace!(task = %id, label, "running task");
        task.run();
        self.record(id, label, TraceEventKind::Completed);
        true
    }

    /// Runs tasks until the queue is empty.
    ///
    /// Returns the number of tasks run by this call. If the configured step
    /// limit is reached while tasks remain, stops and returns
    /// [`ErrorKind::StepLimitExceeded`](crate::ErrorKind::StepLimitExceeded);
    /// a later call resumes where this one stopped.
    pub fn run_until_quiescent(&self) -> Result<u64> {
        let mut ran = 0_u64;
        while !self.is_quiescent() {
            if let Some(max) = self.inner.config.max_steps {
                if ran >= max {
                    let pending = self.pending();
                    tracing::debug!(max_steps = max, pending, "scheduler step limit reached");
                    return Err(Error::step_limit(max, pending));
                }
            }
            self.step();
            ran += 1;
        }
        tracing::debug!(steps = ran, "scheduler quiescent");
        Ok(ran)
    }

    fn record(&self, id: TaskId, label: &str, kind: TraceEventKind) {
        self.inner.trace.borrow_mut().record(id, label, kind);
    }
}

impl Default for LocalScheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

impl Schedule for LocalScheduler {
    fn schedule(&self, task: Task) {
        self.record(task.id(), task.label(), TraceEventKind::Scheduled);
        tracing::trace!(task = %task.id(), label = task.label(), "task scheduled");
        self.inner.queue.borrow_mut().push_back(task);
    }
}
