//! Sylloge - Production-rule expert system
//!
//! This crate re-exports all layers of the Sylloge system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: sylloge_runtime    - Knowledge-base documents, snapshots, dialog, CLI
//! Layer 2: sylloge_debug      - Trace recording, formatting, "why" explanations
//! Layer 1: sylloge_engine     - Expressions, rules, forward/backward chaining
//! Layer 0: sylloge_foundation - Core types (Fact, FactSet, Error)
//! ```

pub use sylloge_debug as debug;
pub use sylloge_engine as engine;
pub use sylloge_foundation as foundation;
pub use sylloge_runtime as runtime;
