//! The chaining engine.
//!
//! An [`Engine`] borrows a [`KnowledgeBase`] and owns everything a run
//! mutates: the fact set, the agenda of not-yet-fired rules, and the answers
//! given so far. Collaborators are injected: a [`FactProvider`] answers
//! questions and a [`TraceSink`] observes the run.
//!
//! Two search strategies are available:
//! - [`Engine::run_forward`] fires satisfiable rules in agenda order until a
//!   target rule fires or nothing more can be derived
//! - [`Engine::run_backward`] searches for a derivation of one target fact
//!
//! Call [`Engine::reset`] before each logical run.

mod backward;
mod forward;

use std::collections::HashMap;

use sylloge_foundation::{Error, ErrorContext, Fact, FactSet, Interner, Result};
use tracing::debug;

use crate::kb::KnowledgeBase;
use crate::provider::FactProvider;
use crate::rule::{Question, Rule};
use crate::trace::{TraceEvent, TraceSink};

// =============================================================================
// Configuration
// =============================================================================

/// Tuning knobs for a chaining engine.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Ask the provider for a missing premise when a forward run stalls.
    pub ask_missing: bool,
    /// Upper bound on answers collected per run by stall questioning.
    pub max_questions: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ask_missing: true,
            max_questions: None,
        }
    }
}

impl EngineConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to disable stall questioning.
    #[must_use]
    pub fn without_asking(mut self) -> Self {
        self.ask_missing = false;
        self
    }

    /// Builder method to cap stall questioning.
    #[must_use]
    pub fn with_max_questions(mut self, max: usize) -> Self {
        self.max_questions = Some(max);
        self
    }
}

// =============================================================================
// Outcomes
// =============================================================================

/// Result of a forward run.
#[derive(Debug)]
pub enum ForwardOutcome {
    /// A target rule fired with this fact (equal to the requested target, if
    /// one was given).
    Succeeded(Fact),
    /// A target rule fired, but with a different fact than requested.
    Disproved {
        /// The requested target.
        expected: Fact,
        /// The fact the target rule produced.
        actual: Fact,
    },
    /// No target rule can fire from the current knowledge.
    Unreachable,
    /// The run was aborted by a structural defect or a refused question.
    Aborted(Error),
}

impl ForwardOutcome {
    /// Returns true for [`ForwardOutcome::Succeeded`].
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    /// Returns the fact produced by the concluding target rule, if any.
    #[must_use]
    pub fn fact(&self) -> Option<Fact> {
        match self {
            Self::Succeeded(fact) | Self::Disproved { actual: fact, .. } => Some(*fact),
            Self::Unreachable | Self::Aborted(_) => None,
        }
    }
}

/// Result of a backward run.
#[derive(Debug)]
pub enum BackwardOutcome {
    /// The target fact was derived (or already known).
    Reachable,
    /// No derivation of the target exists.
    Unreachable,
    /// The run was aborted by a structural defect or a refused question.
    Aborted(Error),
}

impl BackwardOutcome {
    /// Returns true for [`BackwardOutcome::Reachable`].
    #[must_use]
    pub fn is_reachable(&self) -> bool {
        matches!(self, Self::Reachable)
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Forward and backward chaining over one knowledge base.
pub struct Engine<'kb, P, S> {
    kb: &'kb KnowledgeBase,
    provider: P,
    sink: S,
    config: EngineConfig,
    /// Known facts, in the order they were established.
    facts: FactSet,
    /// Rules that have not fired since the last reset, in evaluation order.
    agenda: Vec<&'kb Rule>,
    /// Answers received this run, by question id.
    answered: HashMap<String, Fact>,
    /// Questions asked this run for missing premises.
    stall_asked: usize,
}

impl<'kb, P: FactProvider, S: TraceSink> Engine<'kb, P, S> {
    /// Creates an engine with an empty fact set and a full agenda.
    pub fn new(kb: &'kb KnowledgeBase, provider: P, sink: S) -> Self {
        let mut engine = Self {
            kb,
            provider,
            sink,
            config: EngineConfig::default(),
            facts: FactSet::new(),
            agenda: Vec::new(),
            answered: HashMap::new(),
            stall_asked: 0,
        };
        engine.reset([]);
        engine
    }

    /// Sets the engine configuration.
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Starts a new logical run.
    ///
    /// Clears the fact set, the trace and remembered answers, restores every
    /// rule to the agenda, then adds `initial` facts in order.
    pub fn reset(&mut self, initial: impl IntoIterator<Item = Fact>) {
        self.facts.clear();
        self.sink.clear();
        self.answered.clear();
        self.stall_asked = 0;
        self.agenda = self.kb.rules().iter().collect();
        for fact in initial {
            self.add_fact(fact);
        }
    }

    /// Known facts, in insertion order.
    #[must_use]
    pub fn facts(&self) -> &FactSet {
        &self.facts
    }

    /// Number of rules that have not fired yet.
    #[must_use]
    pub fn agenda_len(&self) -> usize {
        self.agenda.len()
    }

    /// Ids of rules that have not fired yet, in evaluation order.
    pub fn agenda(&self) -> impl Iterator<Item = &'kb str> + '_ {
        self.agenda.iter().map(|&r| r.id.as_str())
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the trace sink.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Returns the fact provider.
    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Consumes the engine, returning its collaborators.
    pub fn into_parts(self) -> (P, S) {
        (self.provider, self.sink)
    }

    /// The question stall questioning would ask next, without asking it.
    ///
    /// Agenda rules are considered from fewest to most missing premises
    /// (agenda order breaks ties); the first unanswered question offering
    /// one of a rule's missing premises is chosen.
    #[must_use]
    pub fn suggest_question(&self) -> Option<&'kb Question> {
        let mut candidates: Vec<Vec<Fact>> = self
            .agenda
            .iter()
            .map(|rule| rule.unknowns(&self.facts))
            .filter(|missing| !missing.is_empty())
            .collect();
        candidates.sort_by_key(Vec::len);

        let kb = self.kb;
        candidates.iter().find_map(|missing| {
            kb.questions()
                .iter()
                .find(|q| !self.answered.contains_key(&q.id) && q.suitable(missing))
        })
    }

    // -------------------------------------------------------------------------
    // Shared run steps
    // -------------------------------------------------------------------------

    fn add_fact(&mut self, fact: Fact) {
        debug!(fact = %self.kb.interner().display(fact), "fact added");
        self.facts.push(fact);
        self.sink.record(TraceEvent::FactAdded(fact));
    }

    /// Resolves a rule's output, records it, and returns it.
    ///
    /// Does not touch the agenda; callers remove the rule themselves.
    fn fire(&mut self, rule: &'kb Rule) -> Result<Fact> {
        let kb = self.kb;
        let question = kb.question_for(rule);
        let output = {
            let mut provider = Remembering {
                provider: &mut self.provider,
                answered: &mut self.answered,
                interner: kb.interner(),
            };
            rule.resolve_output(question, &mut provider)?
        };

        debug!(
            rule = %rule.id,
            target = rule.target,
            output = %kb.interner().display(output),
            "rule fired"
        );
        self.add_fact(output);
        self.sink.record(TraceEvent::RuleFired {
            rule: rule.id.clone(),
            target: rule.target,
            output,
        });
        Ok(output)
    }

    /// Asks a question outside of any rule and records the answer.
    fn ask(&mut self, question: &'kb Question) -> Result<Fact> {
        debug!(question = %question.id, "asking for missing premise");
        let answer = Remembering {
            provider: &mut self.provider,
            answered: &mut self.answered,
            interner: self.kb.interner(),
        }
        .ask(question)?;
        self.stall_asked += 1;
        self.add_fact(answer);
        Ok(answer)
    }

    fn context(&self, frame: String) -> ErrorContext {
        ErrorContext::new()
            .with_source(self.kb.name())
            .with_frame(frame)
    }
}

// =============================================================================
// Answer memo
// =============================================================================

/// Wraps the injected provider so each question is put to it at most once per
/// run and every answer is checked against the offered options.
struct Remembering<'a, P> {
    provider: &'a mut P,
    answered: &'a mut HashMap<String, Fact>,
    interner: &'a Interner,
}

impl<P: FactProvider> FactProvider for Remembering<'_, P> {
    fn ask(&mut self, question: &Question) -> Result<Fact> {
        if let Some(&fact) = self.answered.get(&question.id) {
            return Ok(fact);
        }
        let fact = self.provider.ask(question)?;
        if !question.offers(fact) {
            return Err(Error::invalid_answer(
                &question.id,
                self.interner.display(fact).to_string(),
            ));
        }
        self.answered.insert(question.id.clone(), fact);
        Ok(fact)
    }
}
