//! Rule engine for Sylloge.
//!
//! This crate provides:
//! - [`Expr`] - Logical activation expressions and unknown-fact discovery
//! - [`Rule`] and [`Question`] - Productions and the questions they ask
//! - [`KnowledgeBase`] - Read-only rule and question catalog
//! - [`Engine`] - Forward (direct) and backward (reverse) chaining
//! - [`FactProvider`] and [`TraceSink`] - Collaborators injected into a run

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod chain;
pub mod expression;
pub mod kb;
pub mod provider;
pub mod rule;
pub mod trace;

pub use chain::{BackwardOutcome, Engine, EngineConfig, ForwardOutcome};
pub use expression::{Expr, Unknown, Unknowns};
pub use kb::KnowledgeBase;
pub use provider::{FactProvider, RefusingProvider, ScriptedProvider};
pub use rule::{Answer, Question, Rule};
pub use trace::{NullSink, TraceEvent, TraceSink};
