//! Tracing and explanation for Sylloge.
//!
//! This crate provides:
//! - [`Tracer`] - a [`TraceSink`](sylloge_engine::TraceSink) that records,
//!   echoes and formats chaining events
//! - [`WhyQuery`] - "why is this fact known?" over a recorded trace

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod explain;
pub mod trace;

pub use explain::{CausalChain, CausalLink, WhyQuery, WhyResult};
pub use trace::{
    HumanFormatter, JsonFormatter, TraceBuffer, TraceBufferStats, TraceFormatter, TraceRecord,
    Tracer, TracerConfig,
};
