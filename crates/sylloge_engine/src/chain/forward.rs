//! Direct (forward) chaining.
//!
//! Each pass scans the agenda in order and fires the first rule whose
//! expression holds, removing it from the agenda. A pass that fires nothing
//! may ask one question for a missing premise; a pass that does neither is
//! the last one. Every non-final pass consumes a rule or a question, so the
//! run terminates.

use sylloge_foundation::{Fact, Result};
use tracing::{debug, info, instrument, warn};

use super::{Engine, ForwardOutcome};
use crate::provider::FactProvider;
use crate::trace::TraceSink;

impl<P: FactProvider, S: TraceSink> Engine<'_, P, S> {
    /// Runs forward chaining until a target rule fires or nothing changes.
    ///
    /// With `target` set, the concluding target rule's fact is compared to
    /// it: equal facts succeed, different facts are reported as
    /// [`ForwardOutcome::Disproved`].
    #[instrument(level = "debug", skip(self), fields(kb = %self.kb.name()))]
    pub fn run_forward(&mut self, target: Option<Fact>) -> ForwardOutcome {
        match self.forward(target) {
            Ok(outcome) => {
                info!(?outcome, facts = self.facts.len(), "forward run finished");
                outcome
            }
            Err(err) => {
                warn!(%err, "forward run aborted");
                let frame = match target {
                    Some(fact) => format!("deriving {}", self.kb.interner().display(fact)),
                    None => "deriving a target".to_string(),
                };
                ForwardOutcome::Aborted(err.with_context(self.context(frame)))
            }
        }
    }

    fn forward(&mut self, target: Option<Fact>) -> Result<ForwardOutcome> {
        loop {
            if let Some(idx) = self.agenda.iter().position(|r| r.is(&self.facts)) {
                let rule = self.agenda.remove(idx);
                let output = self.fire(rule)?;
                if rule.target {
                    return Ok(match target {
                        Some(expected) if expected != output => ForwardOutcome::Disproved {
                            expected,
                            actual: output,
                        },
                        _ => ForwardOutcome::Succeeded(output),
                    });
                }
                continue;
            }

            if self.config.ask_missing && self.ask_for_missing_premise()? {
                continue;
            }

            debug!(agenda = self.agenda.len(), "no rule can fire");
            return Ok(ForwardOutcome::Unreachable);
        }
    }

    /// Asks the suggested question, if any. Returns true if an answer was added.
    fn ask_for_missing_premise(&mut self) -> Result<bool> {
        if self
            .config
            .max_questions
            .is_some_and(|max| self.stall_asked >= max)
        {
            return Ok(false);
        }
        let Some(question) = self.suggest_question() else {
            return Ok(false);
        };
        self.ask(question)?;
        Ok(true)
    }
}
