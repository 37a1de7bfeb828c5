//! Line editor abstraction for the console dialog.
//!
//! The dialog reads answers through [`LineEditor`], so it can run on rustyline
//! in a terminal and on a [`ScriptedEditor`] in tests and batch mode.

use std::collections::VecDeque;

use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};
use sylloge_foundation::{Error, ErrorKind, Result};

/// Result of reading a line from the editor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReadResult {
    /// A line was successfully read.
    Line(String),
    /// User pressed Ctrl+C.
    Interrupted,
    /// User pressed Ctrl+D (EOF).
    Eof,
}

/// Abstraction over line editing functionality.
pub trait LineEditor {
    /// Read a line with the given prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the terminal fails.
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult>;

    /// Add a line to history.
    fn add_history(&mut self, line: &str);
}

impl<E: LineEditor + ?Sized> LineEditor for &mut E {
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult> {
        (**self).read_line(prompt)
    }

    fn add_history(&mut self, line: &str) {
        (**self).add_history(line);
    }
}

// =============================================================================
// Rustyline Editor
// =============================================================================

/// Line editor implementation using rustyline.
pub struct RustylineEditor {
    editor: Editor<(), DefaultHistory>,
}

impl RustylineEditor {
    /// Creates a new rustyline-based editor.
    ///
    /// # Errors
    ///
    /// Returns an error if rustyline initialization fails.
    pub fn new() -> Result<Self> {
        let config = Config::builder().auto_add_history(false).build();
        let editor = Editor::with_config(config)
            .map_err(|e| Error::new(ErrorKind::Internal(e.to_string())))?;
        Ok(Self { editor })
    }
}

impl LineEditor for RustylineEditor {
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadResult::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadResult::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadResult::Eof),
            Err(e) => Err(Error::new(ErrorKind::Io(e.to_string()))),
        }
    }

    fn add_history(&mut self, line: &str) {
        let _ = self.editor.add_history_entry(line);
    }
}

// =============================================================================
// Scripted Editor
// =============================================================================

/// Replays canned input; reports EOF once the script is exhausted.
#[derive(Clone, Debug, Default)]
pub struct ScriptedEditor {
    input: VecDeque<ReadResult>,
    prompts: Vec<String>,
    history: Vec<String>,
}

impl ScriptedEditor {
    /// Creates an editor that returns `lines` in order.
    #[must_use]
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: lines.into_iter().map(|l| ReadResult::Line(l.into())).collect(),
            ..Self::default()
        }
    }

    /// Appends an interrupt (Ctrl+C) to the script.
    #[must_use]
    pub fn then_interrupt(mut self) -> Self {
        self.input.push_back(ReadResult::Interrupted);
        self
    }

    /// Prompts shown so far.
    #[must_use]
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Lines added to history so far.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl LineEditor for ScriptedEditor {
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult> {
        self.prompts.push(prompt.to_string());
        Ok(self.input.pop_front().unwrap_or(ReadResult::Eof))
    }

    fn add_history(&mut self, line: &str) {
        self.history.push(line.to_string());
    }
}
