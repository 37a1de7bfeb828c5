//! The knowledge base: questions, rules and the fact name table.
//!
//! A knowledge base is built once (usually by the runtime's document loader)
//! and is read-only while the engine runs. Rules reference questions by id;
//! the reference is checked when the rule is added.

use std::collections::HashSet;

use sylloge_foundation::{Error, ErrorKind, Fact, Interner, Result};

use crate::rule::{Question, Rule};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ordered rules plus the questions they may ask.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KnowledgeBase {
    name: String,
    interner: Interner,
    questions: Vec<Question>,
    rules: Vec<Rule>,
}

impl KnowledgeBase {
    /// Creates an empty knowledge base.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns the knowledge base name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Interns a fact name.
    pub fn fact(&mut self, name: &str) -> Fact {
        self.interner.intern(name)
    }

    /// Returns the fact name table.
    #[must_use]
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Adds a question.
    ///
    /// # Errors
    ///
    /// Returns an error if a question with the same id exists.
    pub fn add_question(&mut self, question: Question) -> Result<()> {
        if self.question(&question.id).is_some() {
            return Err(Error::duplicate_id("question", question.id));
        }
        self.questions.push(question);
        Ok(())
    }

    /// Adds a rule at the end of the evaluation order.
    ///
    /// Rules with neither an output nor a question are accepted; they abort
    /// the run that fires them.
    ///
    /// # Errors
    ///
    /// Returns an error if a rule with the same id exists or the rule links a
    /// question that has not been added.
    pub fn add_rule(&mut self, rule: Rule) -> Result<()> {
        if self.rules.iter().any(|r| r.id == rule.id) {
            return Err(Error::duplicate_id("rule", rule.id));
        }
        if let Some(question) = &rule.question {
            if self.question(question).is_none() {
                return Err(Error::unknown_question(&rule.id, question));
            }
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Looks up a question by id.
    #[must_use]
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Returns the question linked to a rule.
    #[must_use]
    pub fn question_for(&self, rule: &Rule) -> Option<&Question> {
        rule.question.as_deref().and_then(|id| self.question(id))
    }

    /// Looks up a rule by id.
    #[must_use]
    pub fn rule(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// All rules, in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// All questions, in declaration order.
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Facts that some rule or question can produce.
    #[must_use]
    pub fn derivable_facts(&self) -> HashSet<Fact> {
        let mut out = HashSet::new();
        for rule in &self.rules {
            if let Some(fact) = rule.output {
                out.insert(fact);
            }
            if let Some(question) = self.question_for(rule) {
                out.extend(question.answers.iter().map(|a| a.fact));
            }
        }
        out
    }

    /// Checks the invariants that [`add_question`] and [`add_rule`] enforce,
    /// plus that every fact in a rule or answer has a name.
    ///
    /// A knowledge base built through the add methods always passes; a
    /// deserialized one is checked before use.
    ///
    /// # Errors
    ///
    /// Returns the error the add methods would have returned, or an internal
    /// error if the fact name table is inconsistent or a fact is unnamed.
    ///
    /// [`add_question`]: KnowledgeBase::add_question
    /// [`add_rule`]: KnowledgeBase::add_rule
    pub fn validate(&self) -> Result<()> {
        if !self.interner.is_consistent() {
            return Err(Error::new(ErrorKind::Internal(
                "fact name table is inconsistent".to_string(),
            )));
        }
        let unnamed = |owner: &str, fact: Fact| {
            Error::new(ErrorKind::Internal(format!(
                "{owner} references unnamed fact #{}",
                fact.index()
            )))
        };

        let mut rebuilt = Self::new(self.name.as_str());
        for question in &self.questions {
            if let Some(answer) = question
                .answers
                .iter()
                .find(|a| self.interner.resolve(a.fact).is_none())
            {
                return Err(unnamed(&format!("question '{}'", question.id), answer.fact));
            }
            rebuilt.add_question(question.clone())?;
        }
        for rule in &self.rules {
            if let Some(fact) = rule
                .expr
                .facts()
                .into_iter()
                .chain(rule.output)
                .find(|&f| self.interner.resolve(f).is_none())
            {
                return Err(unnamed(&format!("rule '{}'", rule.id), fact));
            }
            rebuilt.add_rule(rule.clone())?;
        }
        Ok(())
    }

    /// Ids of rules that can never fire usefully: no output and no question.
    #[must_use]
    pub fn structural_defects(&self) -> Vec<&str> {
        self.rules
            .iter()
            .filter(|r| r.output.is_none() && r.question.is_none())
            .map(|r| r.id.as_str())
            .collect()
    }
}
