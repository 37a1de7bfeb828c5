//! Reverse (backward) chaining.
//!
//! Proving a target walks an implicit AND/OR tree: candidate rules that could
//! produce the target are alternatives, and a candidate's missing premises
//! are sub-targets. The fact set is shared across the whole search, so a
//! fact proved once is never derived again.
//!
//! Every rule is taken from the candidate pool at most once per top-level
//! [`Engine::run_backward`] call, including across nested sub-targets. This
//! bounds recursion depth by the number of rules.

use sylloge_foundation::{Fact, Result};
use tracing::{info, instrument, trace, warn};

use super::{BackwardOutcome, Engine};
use crate::provider::FactProvider;
use crate::rule::Rule;
use crate::trace::TraceSink;

impl<'kb, P: FactProvider, S: TraceSink> Engine<'kb, P, S> {
    /// Tries to derive `target` from the current facts.
    ///
    /// Candidates are drawn from the rules that have not fired yet. A target
    /// already in the fact set is reachable without firing anything.
    #[instrument(level = "debug", skip(self), fields(kb = %self.kb.name()))]
    pub fn run_backward(&mut self, target: Fact) -> BackwardOutcome {
        let mut pool = self.agenda.clone();
        match self.prove(target, &mut pool, 0) {
            Ok(true) => {
                info!(facts = self.facts.len(), "target reachable");
                BackwardOutcome::Reachable
            }
            Ok(false) => {
                info!(facts = self.facts.len(), "target unreachable");
                BackwardOutcome::Unreachable
            }
            Err(err) => {
                warn!(%err, "backward run aborted");
                let frame = format!("proving {}", self.kb.interner().display(target));
                BackwardOutcome::Aborted(err.with_context(self.context(frame)))
            }
        }
    }

    fn prove(&mut self, target: Fact, pool: &mut Vec<&'kb Rule>, depth: usize) -> Result<bool> {
        if self.facts.contains(target) {
            return Ok(true);
        }

        let kb = self.kb;
        while let Some(idx) = pool
            .iter()
            .position(|r| r.is_possible_output(target, kb.question_for(r)))
        {
            let rule = pool.remove(idx);
            trace!(
                rule = %rule.id,
                target = %kb.interner().display(target),
                depth,
                "trying candidate"
            );
            // A nested sub-target may have derived `target` through another
            // candidate even if this one stalled.
            if self.establish(rule, target, pool, depth)? || self.facts.contains(target) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Fires `rule` once its expression holds, proving missing premises first.
    ///
    /// Returns true if the rule fired and produced `target`. A rule that
    /// fires with another fact (a question answered differently) still adds
    /// that fact.
    fn establish(
        &mut self,
        rule: &'kb Rule,
        target: Fact,
        pool: &mut Vec<&'kb Rule>,
        depth: usize,
    ) -> Result<bool> {
        loop {
            if rule.is(&self.facts) {
                self.agenda.retain(|r| !std::ptr::eq(*r, rule));
                let output = self.fire(rule)?;
                return Ok(output == target);
            }

            let mut progressed = false;
            for premise in rule.unknowns(&self.facts) {
                if self.prove(premise, pool, depth + 1)? {
                    progressed = true;
                    break;
                }
            }
            if !progressed {
                return Ok(false);
            }
        }
    }
}
