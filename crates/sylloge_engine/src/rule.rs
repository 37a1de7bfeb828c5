//! Production rules and the questions they ask.
//!
//! A [`Rule`] fires when its activating [`Expr`] holds. Firing produces a
//! fact: either the rule's fixed output or the answer to its linked
//! [`Question`], obtained from a [`FactProvider`].

use sylloge_foundation::{Error, Fact, FactSet, Result};

use crate::expression::Expr;
use crate::provider::FactProvider;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// =============================================================================
// Question
// =============================================================================

/// One selectable answer to a question.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Answer {
    /// The fact asserted by choosing this answer.
    pub fact: Fact,
    /// Display label.
    pub label: String,
}

impl Answer {
    /// Creates an answer.
    #[must_use]
    pub fn new(fact: Fact, label: impl Into<String>) -> Self {
        Self {
            fact,
            label: label.into(),
        }
    }
}

/// A question put to the fact provider.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Question {
    /// Identifier referenced by rules.
    pub id: String,
    /// Prompt shown to the user.
    pub prompt: String,
    /// Ordered answer options.
    pub answers: Vec<Answer>,
}

impl Question {
    /// Creates a question with no answers.
    #[must_use]
    pub fn new(id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            answers: Vec::new(),
        }
    }

    /// Appends an answer option.
    #[must_use]
    pub fn with_answer(mut self, fact: Fact, label: impl Into<String>) -> Self {
        self.answers.push(Answer::new(fact, label));
        self
    }

    /// Returns true if one of the answers asserts `fact`.
    #[must_use]
    pub fn offers(&self, fact: Fact) -> bool {
        self.answers.iter().any(|a| a.fact == fact)
    }

    /// Returns true if any answer asserts one of `facts`.
    #[must_use]
    pub fn suitable(&self, facts: &[Fact]) -> bool {
        facts.iter().any(|f| self.offers(*f))
    }
}

// =============================================================================
// Rule
// =============================================================================

/// A named production.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rule {
    /// Rule identifier.
    pub id: String,
    /// Activating expression.
    pub expr: Expr,
    /// Id of the question whose answer is this rule's output.
    pub question: Option<String>,
    /// Fixed output fact.
    pub output: Option<Fact>,
    /// Whether firing this rule concludes a forward run.
    pub target: bool,
}

impl Rule {
    /// Creates a rule with neither output nor question.
    #[must_use]
    pub fn new(id: impl Into<String>, expr: Expr) -> Self {
        Self {
            id: id.into(),
            expr,
            question: None,
            output: None,
            target: false,
        }
    }

    /// Sets the fixed output fact.
    #[must_use]
    pub fn with_output(mut self, fact: Fact) -> Self {
        self.output = Some(fact);
        self
    }

    /// Links the rule to a question.
    #[must_use]
    pub fn with_question(mut self, question: impl Into<String>) -> Self {
        self.question = Some(question.into());
        self
    }

    /// Marks the rule as a target rule.
    #[must_use]
    pub fn as_target(mut self) -> Self {
        self.target = true;
        self
    }

    /// Returns true if the activating expression holds.
    #[must_use]
    #[inline]
    pub fn is(&self, facts: &FactSet) -> bool {
        self.expr.is(facts)
    }

    /// Facts that still have to be present for the rule to fire.
    #[must_use]
    pub fn unknowns(&self, facts: &FactSet) -> Vec<Fact> {
        self.expr.unknowns(facts).required_facts()
    }

    /// Returns true if firing this rule could produce `target`.
    ///
    /// `question` is this rule's linked question, as looked up in the
    /// knowledge base.
    #[must_use]
    pub fn is_possible_output(&self, target: Fact, question: Option<&Question>) -> bool {
        self.output == Some(target) || question.is_some_and(|q| q.offers(target))
    }

    /// Produces the fact this rule asserts when it fires.
    ///
    /// # Errors
    ///
    /// Returns a structural error if the rule has neither an output nor a
    /// question, and propagates any error from the provider.
    pub fn resolve_output<P>(&self, question: Option<&Question>, provider: &mut P) -> Result<Fact>
    where
        P: FactProvider + ?Sized,
    {
        if let Some(fact) = self.output {
            return Ok(fact);
        }
        match question {
            Some(question) => provider.ask(question),
            None => Err(Error::structural(&self.id)),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
