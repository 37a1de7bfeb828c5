//! Trace record type.
//!
//! Events themselves are defined by the engine; a record adds the sequence
//! number assigned by the buffer.

use sylloge_engine::TraceEvent;

/// A sequenced trace record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// Sequence number, unique within the tracer's lifetime.
    pub seq: u64,
    /// The trace event.
    pub event: TraceEvent,
}

impl TraceRecord {
    /// Creates a new trace record.
    #[must_use]
    pub fn new(seq: u64, event: TraceEvent) -> Self {
        Self { seq, event }
    }

    /// Returns the event type name.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        self.event.event_type()
    }
}
