//! Trace events emitted by the scheduler.

use crate::types::TaskId;
use core::fmt;
use serde::{Deserialize, Serialize};

/// The kind of trace event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraceEventKind {
    /// A task was submitted to the scheduler.
    Scheduled,
    /// A task began running.
    Started,
    /// A task returned.
    Completed,
}

impl fmt::Display for TraceEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Scheduled => "scheduled",
            Self::Started => "started",
            Self::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// A single trace event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEvent {
    /// Sequence number, increasing across the scheduler's lifetime.
    pub seq: u64,
    /// The task involved.
    pub task: TaskId,
    /// The label the task was submitted with.
    pub label: String,
    /// What happened.
    pub kind: TraceEventKind,
}

impl TraceEvent {
    /// Creates a new trace event.
    #[must_use]
    pub fn new(seq: u64, task: TaskId, label: impl Into<String>, kind: TraceEventKind) -> Self {
        Self {
            seq,
            task,
            label: label.into(),
            kind,
        }
    }
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:06}] {} {} ({})", self.seq, self.task, self.kind, self.label)
    }
}
