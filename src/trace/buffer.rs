//! Bounded ring buffer for trace events.

use super::event::{TraceEvent, TraceEventKind};
use crate::types::TaskId;
use std::collections::VecDeque;

/// A ring buffer for storing trace events.
///
/// When the buffer is full the oldest event is dropped. A buffer with zero
/// capacity records nothing.
#[derive(Debug, Clone, Default)]
pub struct TraceBuffer {
    events: VecDeque<TraceEvent>,
    capacity: usize,
    next_seq: u64,
}

impl TraceBuffer {
    /// Creates a new trace buffer with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity.min(4096)),
            capacity,
            next_seq: 0,
        }
    }

    /// Returns the capacity of the buffer.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of buffered events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if no events are buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Records an event, stamping it with the next sequence number.
    pub fn record(&mut self, task: TaskId, label: &str, kind: TraceEventKind) {
        let seq = self.next_seq;
        self.next_seq += 1;
        if self.capacity == 0 {
            return;
        }
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(TraceEvent::new(seq, task, label, kind));
    }

    /// Returns an iterator over events, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &TraceEvent> {
        self.events.iter()
    }

    /// Returns the most recent event.
    #[must_use]
    pub fn last(&self) -> Option<&TraceEvent> {
        self.events.back()
    }

    /// Returns the labels of started tasks, in execution order.
    #[must_use]
    pub fn started_labels(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter(|event| event.kind == TraceEventKind::Started)
            .map(|event| event.label.as_str())
            .collect()
    }

    /// Clears all events. Sequence numbering continues.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Serializes the buffered events as newline-delimited JSON.
    pub fn to_ndjson(&self) -> serde_json::Result<String> {
        let mut out = String::new();
        for event in &self.events {
            out.push_str(&serde_json::to_string(event)?);
            out.push('\n');
        }
        Ok(out)
    }
}
