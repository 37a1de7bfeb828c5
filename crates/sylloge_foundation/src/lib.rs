//! Core types for Sylloge.
//!
//! This crate provides:
//! - [`Fact`] - Interned handle for an atomic proposition
//! - [`Interner`] - Name table mapping fact names to handles and back
//! - [`FactSet`] - Ordered, append-only collection of known facts
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod fact;
pub mod fact_set;

pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use fact::{Fact, FactDisplay, Interner};
pub use fact_set::FactSet;
