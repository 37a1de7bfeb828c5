//! Knowledge-base files, console dialog, CLI support, and snapshots for
//! Sylloge.
//!
//! This crate provides:
//! - [`document`] - JSON knowledge-base documents and their compiler
//! - [`serialize`] - `MessagePack` snapshots of compiled knowledge bases
//! - [`Dialog`] - the interactive [`FactProvider`](sylloge_engine::FactProvider)
//! - [`Session`] - one consultation: initial facts, run, report
//! - [`logging`] - subscriber setup for the `sylloge` binary

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod dialog;
pub mod document;
pub mod editor;
pub mod logging;
pub mod serialize;
pub mod session;

pub use dialog::Dialog;
pub use document::{
    KbDocument, compile, decompile, load_document, load_knowledge_base, parse_document, to_json,
};
pub use editor::{LineEditor, ReadResult, RustylineEditor, ScriptedEditor};
pub use serialize::{from_bytes, load_from_file, save_to_file, to_bytes};
pub use session::{Goal, RunOutcome, RunReport, Session};
