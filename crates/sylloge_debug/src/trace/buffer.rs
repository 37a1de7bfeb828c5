//! Append-only buffer of trace records.
//!
//! A chaining run emits a bounded number of events (one per added fact and
//! one per fired rule), so records are never evicted; the buffer is emptied
//! only when the engine resets.

use std::collections::HashMap;

use sylloge_engine::TraceEvent;
use sylloge_foundation::Fact;

use super::record::TraceRecord;

// =============================================================================
// Trace Buffer
// =============================================================================

/// Ordered storage for trace records.
#[derive(Clone, Debug, Default)]
pub struct TraceBuffer {
    /// The records, oldest first.
    records: Vec<TraceRecord>,
    /// Next sequence number to assign.
    next_seq: u64,
}

impl TraceBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event and returns its sequence number.
    pub fn push(&mut self, event: TraceEvent) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.records.push(TraceRecord::new(seq, event));
        seq
    }

    /// Returns the number of records in the buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Clears all records from the buffer.
    pub fn clear(&mut self) {
        self.records.clear();
        // Sequence numbers stay monotonic across runs.
    }

    /// Returns an iterator over all records.
    pub fn iter(&self) -> impl Iterator<Item = &TraceRecord> {
        self.records.iter()
    }

    /// Returns the most recent record.
    #[must_use]
    pub fn last(&self) -> Option<&TraceRecord> {
        self.records.last()
    }

    /// Returns the most recent N records.
    #[must_use]
    pub fn recent(&self, count: usize) -> Vec<&TraceRecord> {
        let start = self.records.len().saturating_sub(count);
        self.records[start..].iter().collect()
    }

    /// Returns records matching a predicate.
    pub fn filter<F>(&self, predicate: F) -> Vec<&TraceRecord>
    where
        F: Fn(&TraceRecord) -> bool,
    {
        self.records.iter().filter(|r| predicate(r)).collect()
    }

    /// Facts added, in order.
    #[must_use]
    pub fn facts_added(&self) -> Vec<Fact> {
        self.records
            .iter()
            .filter_map(|r| match r.event {
                TraceEvent::FactAdded(fact) => Some(fact),
                TraceEvent::RuleFired { .. } => None,
            })
            .collect()
    }

    /// Rule firing records, in order.
    #[must_use]
    pub fn rules_fired(&self) -> Vec<&TraceRecord> {
        self.filter(|r| matches!(r.event, TraceEvent::RuleFired { .. }))
    }

    /// Sequence number of the record that added `fact`.
    #[must_use]
    pub fn added_at(&self, fact: Fact) -> Option<u64> {
        self.records
            .iter()
            .find(|r| r.event == TraceEvent::FactAdded(fact))
            .map(|r| r.seq)
    }

    /// The firing that produced `fact`, if a rule produced it.
    #[must_use]
    pub fn fired_for(&self, fact: Fact) -> Option<&TraceRecord> {
        self.records
            .iter()
            .find(|r| matches!(r.event, TraceEvent::RuleFired { output, .. } if output == fact))
    }

    /// Returns statistics about the buffer.
    #[must_use]
    pub fn stats(&self) -> TraceBufferStats {
        let mut event_counts = HashMap::new();
        let mut targets_fired = 0;
        for record in &self.records {
            *event_counts.entry(record.event_type()).or_insert(0) += 1;
            if let TraceEvent::RuleFired { target: true, .. } = record.event {
                targets_fired += 1;
            }
        }

        TraceBufferStats {
            record_count: self.records.len(),
            first_seq: self.records.first().map(|r| r.seq),
            last_seq: self.records.last().map(|r| r.seq),
            targets_fired,
            event_counts,
        }
    }
}

// =============================================================================
// Buffer Statistics
// =============================================================================

/// Statistics about a trace buffer.
#[derive(Clone, Debug)]
pub struct TraceBufferStats {
    /// Number of records currently in buffer.
    pub record_count: usize,
    /// Sequence number of the oldest record.
    pub first_seq: Option<u64>,
    /// Sequence number of the newest record.
    pub last_seq: Option<u64>,
    /// Number of target rules fired.
    pub targets_fired: usize,
    /// Count of each event type.
    pub event_counts: HashMap<&'static str, usize>,
}

impl TraceBufferStats {
    /// Number of facts added.
    #[must_use]
    pub fn facts_added(&self) -> usize {
        self.event_counts.get("fact-added").copied().unwrap_or(0)
    }

    /// Number of rules fired.
    #[must_use]
    pub fn rules_fired(&self) -> usize {
        self.event_counts.get("rule-fired").copied().unwrap_or(0)
    }
}

// =============================================================================
// Tests
// =============================================================================
