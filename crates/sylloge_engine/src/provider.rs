//! Fact providers: where answers to questions come from.
//!
//! The engine calls [`FactProvider::ask`] whenever a firing rule depends on a
//! question, or when a stalled forward run asks for a missing premise. The
//! call may block (a console dialog waits for the user). Any error it returns
//! aborts the run; the engine never retries.

use std::collections::{HashMap, VecDeque};

use sylloge_foundation::{Error, Fact, Result};

use crate::rule::Question;

/// Source of answers to questions.
pub trait FactProvider {
    /// Asks a question and returns the chosen answer's fact.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ProviderAborted`](sylloge_foundation::ErrorKind::ProviderAborted)
    /// when no answer is given.
    fn ask(&mut self, question: &Question) -> Result<Fact>;
}

impl<P: FactProvider + ?Sized> FactProvider for &mut P {
    fn ask(&mut self, question: &Question) -> Result<Fact> {
        (**self).ask(question)
    }
}

impl<P: FactProvider + ?Sized> FactProvider for Box<P> {
    fn ask(&mut self, question: &Question) -> Result<Fact> {
        (**self).ask(question)
    }
}

// =============================================================================
// Scripted Provider
// =============================================================================

/// Answers questions from a script.
///
/// Answers registered for a specific question id take precedence; otherwise
/// the next fact in the queue is returned. Once both are exhausted the
/// provider aborts.
#[derive(Clone, Debug, Default)]
pub struct ScriptedProvider {
    queue: VecDeque<Fact>,
    by_question: HashMap<String, Fact>,
    asked: Vec<String>,
}

impl ScriptedProvider {
    /// Creates a provider that answers with `facts` in order.
    #[must_use]
    pub fn new(facts: impl IntoIterator<Item = Fact>) -> Self {
        Self {
            queue: facts.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Registers a fixed answer for one question.
    #[must_use]
    pub fn with_answer_for(mut self, question: impl Into<String>, fact: Fact) -> Self {
        self.by_question.insert(question.into(), fact);
        self
    }

    /// Ids of the questions asked so far, in order.
    #[must_use]
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl FactProvider for ScriptedProvider {
    fn ask(&mut self, question: &Question) -> Result<Fact> {
        self.asked.push(question.id.clone());
        if let Some(&fact) = self.by_question.get(&question.id) {
            return Ok(fact);
        }
        self.queue
            .pop_front()
            .ok_or_else(|| Error::provider_aborted(&question.id))
    }
}

// =============================================================================
// Refusing Provider
// =============================================================================

/// A provider that never answers.
///
/// Useful for knowledge bases that must run without interaction.
#[derive(Clone, Copy, Debug, Default)]
pub struct RefusingProvider;

impl FactProvider for RefusingProvider {
    fn ask(&mut self, question: &Question) -> Result<Fact> {
        Err(Error::provider_aborted(&question.id))
    }
}
