//! Trace sink interface.
//!
//! The engine reports every fact it adds and every rule it fires to a
//! [`TraceSink`]. The sink is write-only from the engine's point of view;
//! recording, formatting and explaining traces lives in `sylloge_debug`.

use sylloge_foundation::Fact;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An event emitted during a chaining run.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TraceEvent {
    /// A fact was appended to the fact set.
    FactAdded(Fact),
    /// A rule fired.
    RuleFired {
        /// The rule id.
        rule: String,
        /// Whether the rule is a target rule.
        target: bool,
        /// The fact the rule produced.
        output: Fact,
    },
}

impl TraceEvent {
    /// Returns the event type as a string.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::FactAdded(_) => "fact-added",
            Self::RuleFired { .. } => "rule-fired",
        }
    }
}

/// Receiver of trace events.
pub trait TraceSink {
    /// Records one event.
    fn record(&mut self, event: TraceEvent);

    /// Forgets all recorded events. Called on engine reset.
    fn clear(&mut self);
}

impl TraceSink for Vec<TraceEvent> {
    fn record(&mut self, event: TraceEvent) {
        self.push(event);
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }
}

impl<S: TraceSink + ?Sized> TraceSink for &mut S {
    fn record(&mut self, event: TraceEvent) {
        (**self).record(event);
    }

    fn clear(&mut self) {
        (**self).clear();
    }
}

/// A sink that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl TraceSink for NullSink {
    fn record(&mut self, _event: TraceEvent) {}

    fn clear(&mut self) {}
}
