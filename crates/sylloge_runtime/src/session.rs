//! One consultation of a knowledge base.
//!
//! A [`Session`] owns the compiled knowledge base plus the settings for a
//! run: initial facts, engine configuration and trace configuration. Each
//! call to [`Session::run`] resets the engine, runs forward or backward, and
//! hands back a [`RunReport`] with the outcome, the final facts, the recorded
//! trace and the fact provider.

use sylloge_debug::{Tracer, TracerConfig, WhyQuery, WhyResult};
use sylloge_engine::{
    BackwardOutcome, Engine, EngineConfig, FactProvider, ForwardOutcome, KnowledgeBase,
};
use sylloge_foundation::{Error, Fact, Interner};
use tracing::{debug, info};

// =============================================================================
// Goal
// =============================================================================

/// What a run tries to establish, by fact name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Goal {
    /// Forward chaining until a target rule fires, optionally checking that
    /// it produced the named fact.
    Forward(Option<String>),
    /// Backward chaining towards the named fact.
    Prove(String),
}

impl Default for Goal {
    fn default() -> Self {
        Self::Forward(None)
    }
}

// =============================================================================
// Outcome
// =============================================================================

/// Outcome of one run, with the goal it was run for.
#[derive(Debug)]
pub enum RunOutcome {
    /// A forward run.
    Forward {
        /// The requested target, if any.
        requested: Option<Fact>,
        /// What the engine reported.
        outcome: ForwardOutcome,
    },
    /// A backward run.
    Backward {
        /// The fact to prove.
        goal: Fact,
        /// What the engine reported.
        outcome: BackwardOutcome,
    },
}

impl RunOutcome {
    /// Returns the abort error, if the run was aborted.
    #[must_use]
    pub fn error(&self) -> Option<&Error> {
        match self {
            Self::Forward {
                outcome: ForwardOutcome::Aborted(err),
                ..
            }
            | Self::Backward {
                outcome: BackwardOutcome::Aborted(err),
                ..
            } => Some(err),
            _ => None,
        }
    }

    /// Returns true if the goal was established.
    #[must_use]
    pub fn is_success(&self) -> bool {
        match self {
            Self::Forward { outcome, .. } => outcome.is_success(),
            Self::Backward { outcome, .. } => outcome.is_reachable(),
        }
    }

    /// Process exit status: 0 on success, 1 on abort, 2 when the goal was
    /// not established.
    #[must_use]
    pub fn exit_status(&self) -> u8 {
        if self.is_success() {
            0
        } else if self.error().is_some() {
            1
        } else {
            2
        }
    }

    /// One-line summary for the console.
    #[must_use]
    pub fn describe(&self, interner: &Interner) -> String {
        let name = |fact: Fact| interner.display(fact).to_string();
        match self {
            Self::Forward { outcome, .. } => match outcome {
                ForwardOutcome::Succeeded(fact) => format!("Result: {}", name(*fact)),
                ForwardOutcome::Disproved { expected, actual } => format!(
                    "Disproved: expected {}, concluded {}",
                    name(*expected),
                    name(*actual)
                ),
                ForwardOutcome::Unreachable => "No conclusion can be reached".to_string(),
                ForwardOutcome::Aborted(err) => format!("Aborted: {err}"),
            },
            Self::Backward { goal, outcome } => match outcome {
                BackwardOutcome::Reachable => format!("Proved: {}", name(*goal)),
                BackwardOutcome::Unreachable => format!("Not provable: {}", name(*goal)),
                BackwardOutcome::Aborted(err) => format!("Aborted: {err}"),
            },
        }
    }
}

/// Everything a run leaves behind.
#[derive(Debug)]
pub struct RunReport<P> {
    /// The outcome.
    pub outcome: RunOutcome,
    /// Known facts at the end of the run, in insertion order.
    pub facts: Vec<Fact>,
    /// The recorded trace.
    pub tracer: Tracer,
    /// The fact provider, returned for further use.
    pub provider: P,
}

// =============================================================================
// Session
// =============================================================================

/// A knowledge base and the settings for running it.
#[derive(Debug)]
pub struct Session {
    kb: KnowledgeBase,
    initial: Vec<Fact>,
    engine_config: EngineConfig,
    tracer_config: TracerConfig,
}

impl Session {
    /// Creates a session with no initial facts and default settings.
    #[must_use]
    pub fn new(kb: KnowledgeBase) -> Self {
        Self {
            kb,
            initial: Vec::new(),
            engine_config: EngineConfig::default(),
            tracer_config: TracerConfig::default(),
        }
    }

    /// Sets the engine configuration.
    #[must_use]
    pub fn with_engine_config(mut self, config: EngineConfig) -> Self {
        self.engine_config = config;
        self
    }

    /// Sets the trace configuration.
    #[must_use]
    pub fn with_tracer_config(mut self, config: TracerConfig) -> Self {
        self.tracer_config = config;
        self
    }

    /// Returns the knowledge base.
    #[must_use]
    pub fn kb(&self) -> &KnowledgeBase {
        &self.kb
    }

    /// Initial facts, in order.
    #[must_use]
    pub fn initial_facts(&self) -> &[Fact] {
        &self.initial
    }

    /// Adds an initial fact by name.
    ///
    /// Names the knowledge base never mentions are accepted; they simply
    /// cannot activate anything.
    pub fn add_fact(&mut self, name: &str) -> Fact {
        if self.kb.interner().get(name).is_none() {
            debug!(fact = name, "initial fact not mentioned by any rule");
        }
        let fact = self.kb.fact(name);
        self.initial.push(fact);
        fact
    }

    /// Looks up answer facts for a batch of names, interning unknown ones.
    pub fn facts<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) -> Vec<Fact> {
        names.into_iter().map(|n| self.kb.fact(n)).collect()
    }

    /// Runs the knowledge base once from the initial facts.
    pub fn run<P: FactProvider>(&mut self, goal: &Goal, provider: P) -> RunReport<P> {
        let (prove, requested) = match goal {
            Goal::Forward(target) => (None, target.as_deref().map(|n| self.kb.fact(n))),
            Goal::Prove(name) => (Some(self.kb.fact(name)), None),
        };

        let tracer = Tracer::new(self.tracer_config.clone()).with_names(self.kb.interner());
        let mut engine = Engine::new(&self.kb, provider, tracer)
            .with_config(self.engine_config.clone());
        engine.reset(self.initial.iter().copied());

        let outcome = match prove {
            Some(goal) => RunOutcome::Backward {
                goal,
                outcome: engine.run_backward(goal),
            },
            None => RunOutcome::Forward {
                requested,
                outcome: engine.run_forward(requested),
            },
        };
        info!(
            kb = self.kb.name(),
            success = outcome.is_success(),
            facts = engine.facts().len(),
            "session run finished"
        );

        let facts = engine.facts().iter().collect();
        let (provider, tracer) = engine.into_parts();
        RunReport {
            outcome,
            facts,
            tracer,
            provider,
        }
    }

    /// Explains a fact from a finished run.
    #[must_use]
    pub fn why<P>(&self, report: &RunReport<P>, name: &str, depth: usize) -> WhyResult {
        match self.kb.interner().get(name) {
            Some(fact) => WhyQuery::new(report.tracer.buffer(), &self.kb).why_depth(fact, depth),
            None => WhyResult::Unknown,
        }
    }
}
