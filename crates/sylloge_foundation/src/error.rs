//! Error types for the Sylloge system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//!
//! Note that an unreachable target is not an error: chaining runs report it
//! as an ordinary outcome.

use std::fmt;

use thiserror::Error;

/// Result type alias using the Sylloge error type.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Sylloge operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a structural error for a rule with neither output nor question.
    #[must_use]
    pub fn structural(rule: impl Into<String>) -> Self {
        Self::new(ErrorKind::Structural { rule: rule.into() })
    }

    /// Creates a provider-aborted error.
    #[must_use]
    pub fn provider_aborted(question: impl Into<String>) -> Self {
        Self::new(ErrorKind::ProviderAborted {
            question: question.into(),
        })
    }

    /// Creates an unknown question reference error.
    #[must_use]
    pub fn unknown_question(rule: impl Into<String>, question: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownQuestion {
            rule: rule.into(),
            question: question.into(),
        })
    }

    /// Creates a duplicate identifier error.
    #[must_use]
    pub fn duplicate_id(kind: &'static str, id: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateId {
            kind,
            id: id.into(),
        })
    }

    /// Creates an invalid answer error.
    #[must_use]
    pub fn invalid_answer(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidAnswer {
            question: question.into(),
            answer: answer.into(),
        })
    }

    /// Creates a knowledge-base parse error.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse {
            message: message.into(),
        })
    }

    /// Returns true if this error ends a chaining run.
    ///
    /// Every error that reaches the engine is fatal: retrying with the same
    /// facts and the same consumed rules would fail again.
    #[must_use]
    pub fn is_fatal_to_run(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Structural { .. }
                | ErrorKind::ProviderAborted { .. }
                | ErrorKind::InvalidAnswer { .. }
                | ErrorKind::UnknownQuestion { .. }
                | ErrorKind::Internal(_)
        )
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A rule has neither a fixed output nor a linked question.
    #[error("rule `{rule}` has neither an output nor a question")]
    Structural {
        /// The offending rule.
        rule: String,
    },

    /// The fact provider declined to answer.
    #[error("answer to question `{question}` was refused")]
    ProviderAborted {
        /// The question that was being asked.
        question: String,
    },

    /// A rule references a question the knowledge base does not define.
    #[error("rule `{rule}` references unknown question `{question}`")]
    UnknownQuestion {
        /// The rule holding the reference.
        rule: String,
        /// The missing question id.
        question: String,
    },

    /// Two rules or two questions share an identifier.
    #[error("duplicate {kind} id `{id}`")]
    DuplicateId {
        /// What kind of item was duplicated (`rule` or `question`).
        kind: &'static str,
        /// The repeated identifier.
        id: String,
    },

    /// The fact provider returned a fact the question does not offer.
    #[error("`{answer}` is not an answer to question `{question}`")]
    InvalidAnswer {
        /// The question that was asked.
        question: String,
        /// The fact that came back.
        answer: String,
    },

    /// Knowledge-base document is malformed.
    #[error("parse error: {message}")]
    Parse {
        /// Description of the problem.
        message: String,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// File or terminal I/O failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Source file or knowledge-base name.
    pub source: Option<String>,
    /// Chain of rules/targets being pursued when the error occurred.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source location.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "in {source}")?;
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  while {frame}")?;
            }
        }
        Ok(())
    }
}
