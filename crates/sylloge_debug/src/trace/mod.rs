//! Trace recording for chaining runs.
//!
//! A [`Tracer`] is handed to the engine as its [`TraceSink`]. It records every
//! event in a [`TraceBuffer`] and can echo each one to stderr as it happens,
//! in human or JSON form. Recording is skipped entirely when disabled.

pub mod buffer;
pub mod format;
pub mod record;

pub use buffer::{TraceBuffer, TraceBufferStats};
pub use format::{HumanFormatter, JsonFormatter, TraceFormatter};
pub use record::TraceRecord;

use std::io::{self, Write};

use sylloge_engine::{TraceEvent, TraceSink};
use sylloge_foundation::Interner;

// =============================================================================
// Tracer Configuration
// =============================================================================

/// Configuration for the tracer.
#[derive(Clone, Debug)]
pub struct TracerConfig {
    /// Whether tracing is enabled.
    pub enabled: bool,
    /// Whether to print each record to stderr as it is recorded.
    pub echo_to_stderr: bool,
    /// Whether to use JSON format.
    pub json: bool,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            echo_to_stderr: false,
            json: false,
        }
    }
}

impl TracerConfig {
    /// Creates a new tracer configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to disable recording.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Builder method to echo records to stderr.
    #[must_use]
    pub fn to_stderr(mut self) -> Self {
        self.echo_to_stderr = true;
        self
    }

    /// Builder method to use JSON format.
    #[must_use]
    pub fn json(mut self) -> Self {
        self.json = true;
        self
    }
}

// =============================================================================
// Tracer
// =============================================================================

/// Records chaining events and renders them by fact name.
#[derive(Clone, Debug, Default)]
pub struct Tracer {
    config: TracerConfig,
    buffer: TraceBuffer,
    /// Fact names used when rendering; unknown facts render as `#n`.
    names: Interner,
    human_formatter: HumanFormatter,
    json_formatter: JsonFormatter,
}

impl Tracer {
    /// Creates a new tracer with the given configuration.
    #[must_use]
    pub fn new(config: TracerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Creates a tracer that records nothing.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(TracerConfig::new().disabled())
    }

    /// Sets the fact names used for rendering, usually the knowledge base's
    /// interner.
    #[must_use]
    pub fn with_names(mut self, names: &Interner) -> Self {
        self.names = names.clone();
        self
    }

    /// Returns whether tracing is enabled.
    #[must_use]
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Enables tracing.
    pub fn enable(&mut self) {
        self.config.enabled = true;
    }

    /// Disables tracing.
    pub fn disable(&mut self) {
        self.config.enabled = false;
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &TracerConfig {
        &self.config
    }

    /// Returns the fact names used for rendering.
    #[must_use]
    pub fn names(&self) -> &Interner {
        &self.names
    }

    /// Records a trace event.
    #[inline]
    pub fn record(&mut self, event: TraceEvent) {
        if !self.config.enabled {
            return;
        }

        let seq = self.buffer.push(event);
        if self.config.echo_to_stderr {
            if let Some(record) = self.buffer.last().filter(|r| r.seq == seq) {
                let line = self.format_record(record);
                let _ = writeln!(io::stderr(), "{line}");
            }
        }
    }

    /// Formats a record using the current format settings.
    #[must_use]
    pub fn format_record(&self, record: &TraceRecord) -> String {
        if self.config.json {
            self.json_formatter.format(record, &self.names)
        } else {
            self.human_formatter.format(record, &self.names)
        }
    }

    /// Formats the whole buffer, one record per line.
    #[must_use]
    pub fn render(&self) -> String {
        let records: Vec<&TraceRecord> = self.buffer.iter().collect();
        if self.config.json {
            self.json_formatter.format_many(&records, &self.names)
        } else {
            self.human_formatter.format_many(&records, &self.names)
        }
    }

    /// Returns the trace buffer.
    #[must_use]
    pub fn buffer(&self) -> &TraceBuffer {
        &self.buffer
    }

    /// Clears the trace buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Returns buffer statistics.
    #[must_use]
    pub fn stats(&self) -> TraceBufferStats {
        self.buffer.stats()
    }
}

impl TraceSink for Tracer {
    fn record(&mut self, event: TraceEvent) {
        Tracer::record(self, event);
    }

    fn clear(&mut self) {
        Tracer::clear(self);
    }
}

// =============================================================================
// Tests
// =============================================================================
