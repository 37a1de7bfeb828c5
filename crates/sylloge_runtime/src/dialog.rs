//! Console fact provider.
//!
//! [`Dialog`] prints a question with numbered answers and reads the chosen
//! number:
//!
//! ```text
//! Q: What is the luster?
//! 1) Metallic
//! 2) Dull
//! Enter the answer number (`_` to abort): 1
//! ```
//!
//! Out-of-range or non-numeric input is rejected and the prompt repeats.
//! `_`, Ctrl+C and EOF abort the run.

use std::io::{self, Stdout, Write};

use sylloge_engine::{FactProvider, Question};
use sylloge_foundation::{Error, ErrorKind, Fact, Result};
use tracing::{debug, warn};

use crate::editor::{LineEditor, ReadResult};

const ANSWER_PROMPT: &str = "Enter the answer number (`_` to abort): ";

/// Interactive [`FactProvider`] over a line editor.
pub struct Dialog<E, W = Stdout> {
    editor: E,
    out: W,
}

impl<E: LineEditor> Dialog<E> {
    /// Creates a dialog printing to stdout.
    pub fn new(editor: E) -> Self {
        Self {
            editor,
            out: io::stdout(),
        }
    }
}

impl<E: LineEditor, W: Write> Dialog<E, W> {
    /// Creates a dialog printing to `out`.
    pub fn with_output(editor: E, out: W) -> Self {
        Self { editor, out }
    }

    /// Returns the line editor.
    pub fn editor(&self) -> &E {
        &self.editor
    }

    /// Returns the output sink.
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Consumes the dialog, returning the editor and the output sink.
    pub fn into_parts(self) -> (E, W) {
        (self.editor, self.out)
    }

    /// Asks a yes/no question. Anything but `y`/`Y` counts as no.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor fails.
    pub fn confirm(&mut self, prompt: &str) -> Result<bool> {
        match self.editor.read_line(&format!("{prompt} (Y/N): "))? {
            ReadResult::Line(line) => Ok(matches!(line.trim(), "y" | "Y")),
            ReadResult::Interrupted | ReadResult::Eof => Ok(false),
        }
    }

    /// Writes one line to the output sink.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if writing fails.
    pub fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{text}").map_err(|e| Error::new(ErrorKind::Io(e.to_string())))
    }

    fn show(&mut self, question: &Question) -> Result<()> {
        self.say(&format!("Q: {}", question.prompt))?;
        for (i, answer) in question.answers.iter().enumerate() {
            self.say(&format!("{}) {}", i + 1, answer.label))?;
        }
        self.out
            .flush()
            .map_err(|e| Error::new(ErrorKind::Io(e.to_string())))
    }
}

impl<E: LineEditor, W: Write> FactProvider for Dialog<E, W> {
    fn ask(&mut self, question: &Question) -> Result<Fact> {
        if question.answers.is_empty() {
            warn!(question = %question.id, "question offers no answers");
            return Err(Error::provider_aborted(&question.id));
        }
        self.show(question)?;

        loop {
            let line = match self.editor.read_line(ANSWER_PROMPT)? {
                ReadResult::Line(line) => line,
                ReadResult::Interrupted | ReadResult::Eof => {
                    debug!(question = %question.id, "dialog closed");
                    return Err(Error::provider_aborted(&question.id));
                }
            };

            let choice = line.trim();
            if choice == "_" {
                return Err(Error::provider_aborted(&question.id));
            }
            match choice.parse::<usize>() {
                Ok(n) if (1..=question.answers.len()).contains(&n) => {
                    self.editor.add_history(choice);
                    let answer = &question.answers[n - 1];
                    debug!(question = %question.id, answer = %answer.label, "answered");
                    return Ok(answer.fact);
                }
                _ => self.say("Invalid number")?,
            }
        }
    }
}
