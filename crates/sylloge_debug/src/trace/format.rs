//! Trace output formatters.
//!
//! Provides human-readable and JSON formatters for trace records. Facts are
//! rendered by name through the knowledge base's [`Interner`].

use serde_json::{Value, json};
use sylloge_engine::TraceEvent;
use sylloge_foundation::Interner;

use super::record::TraceRecord;

// =============================================================================
// Trace Formatter Trait
// =============================================================================

/// Trait for formatting trace records.
pub trait TraceFormatter {
    /// Formats a single trace record to a string.
    fn format(&self, record: &TraceRecord, interner: &Interner) -> String;

    /// Formats multiple records, one per line.
    fn format_many(&self, records: &[&TraceRecord], interner: &Interner) -> String {
        records
            .iter()
            .map(|r| self.format(r, interner))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// =============================================================================
// Human-Readable Formatter
// =============================================================================

/// Formats trace records in the classic console layout:
///
/// ```text
/// + fact: <B>
/// + rule: <R1> -> <B>
/// + tget: <R2> -> <C>
/// ```
#[derive(Clone, Debug, Default)]
pub struct HumanFormatter {
    /// Whether to prefix each line with its sequence number.
    pub show_seq: bool,
}

impl HumanFormatter {
    /// Creates a new human formatter with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to show sequence numbers.
    #[must_use]
    pub fn with_seq(mut self) -> Self {
        self.show_seq = true;
        self
    }
}

impl TraceFormatter for HumanFormatter {
    fn format(&self, record: &TraceRecord, interner: &Interner) -> String {
        let prefix = if self.show_seq {
            format!("[{:06}] ", record.seq)
        } else {
            String::new()
        };

        let line = match &record.event {
            TraceEvent::FactAdded(fact) => {
                format!("+ fact: <{}>", interner.display(*fact))
            }
            TraceEvent::RuleFired {
                rule,
                target,
                output,
            } => {
                let kind = if *target { "tget" } else { "rule" };
                format!("+ {kind}: <{rule}> -> <{}>", interner.display(*output))
            }
        };

        format!("{prefix}{line}")
    }
}

// =============================================================================
// JSON Formatter
// =============================================================================

/// Formats trace records as JSON objects, one per line unless pretty.
#[derive(Clone, Debug, Default)]
pub struct JsonFormatter {
    /// Whether to pretty-print JSON.
    pub pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method for pretty printing.
    #[must_use]
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Builds the JSON value for a record.
    #[must_use]
    pub fn to_value(record: &TraceRecord, interner: &Interner) -> Value {
        match &record.event {
            TraceEvent::FactAdded(fact) => json!({
                "seq": record.seq,
                "type": record.event_type(),
                "fact": interner.display(*fact).to_string(),
            }),
            TraceEvent::RuleFired {
                rule,
                target,
                output,
            } => json!({
                "seq": record.seq,
                "type": record.event_type(),
                "rule": rule,
                "target": target,
                "output": interner.display(*output).to_string(),
            }),
        }
    }
}

impl TraceFormatter for JsonFormatter {
    fn format(&self, record: &TraceRecord, interner: &Interner) -> String {
        let value = Self::to_value(record, interner);
        if self.pretty {
            format!("{value:#}")
        } else {
            value.to_string()
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
