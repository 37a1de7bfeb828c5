//! Multi-hop "why" queries over a chaining trace.
//!
//! A fact is either *given* (an initial fact, or an answer collected while a
//! forward run stalled) or *derived* by a rule firing. For a derived fact the
//! query reports the rule and the facts of its expression that were already
//! known when it fired, then follows those premises back, breadth first, up
//! to the requested depth.
//!
//! # Example
//!
//! ```text
//! $ sylloge minerals.json --fact Glitter --why Silver
//! Silver <- silver (Glitter, Metallic)
//!   Metallic <- ask-luster (Glitter)
//!   given: Glitter
//! ```

use std::collections::{HashSet, VecDeque};
use std::fmt::Write;

use sylloge_engine::{KnowledgeBase, TraceEvent};
use sylloge_foundation::{Fact, Interner};

use crate::trace::{TraceBuffer, TraceRecord};

// =============================================================================
// Causal Link
// =============================================================================

/// One rule firing in a derivation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CausalLink {
    /// The fact the rule produced.
    pub fact: Fact,

    /// The rule that fired.
    pub rule: String,

    /// Whether the rule is a target rule.
    pub target: bool,

    /// Sequence number of the firing record.
    pub seq: u64,

    /// Facts of the rule's expression that were known when it fired.
    pub premises: Vec<Fact>,

    /// Distance from the queried fact (0 for the immediate cause).
    pub level: usize,
}

// =============================================================================
// Causal Chain
// =============================================================================

/// A derivation, most recent firing first.
#[derive(Clone, Debug, Default)]
pub struct CausalChain {
    /// The firings, in breadth-first order from the queried fact.
    pub links: Vec<CausalLink>,

    /// Given facts reached while following premises.
    pub given: Vec<Fact>,

    /// True if derived premises were left unexplored due to the depth limit.
    pub truncated: bool,
}

impl CausalChain {
    /// Creates an empty causal chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of links in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns true if the chain is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Returns the firing that produced the queried fact.
    #[must_use]
    pub fn immediate_cause(&self) -> Option<&CausalLink> {
        self.links.first()
    }

    /// Renders the chain, one firing per line, indented by level.
    #[must_use]
    pub fn render(&self, interner: &Interner) -> String {
        let mut out = String::new();
        for link in &self.links {
            let indent = "  ".repeat(link.level);
            let _ = write!(out, "{indent}{} <- {}", interner.display(link.fact), link.rule);
            if !link.premises.is_empty() {
                let premises: Vec<String> = link
                    .premises
                    .iter()
                    .map(|p| interner.display(*p).to_string())
                    .collect();
                let _ = write!(out, " ({})", premises.join(", "));
            }
            out.push('\n');
        }
        if !self.given.is_empty() {
            let given: Vec<String> = self
                .given
                .iter()
                .map(|f| interner.display(*f).to_string())
                .collect();
            let _ = writeln!(out, "  given: {}", given.join(", "));
        }
        if self.truncated {
            out.push_str("  ...\n");
        }
        out
    }
}

// =============================================================================
// Why Result
// =============================================================================

/// Result of a "why" query.
#[derive(Clone, Debug)]
pub enum WhyResult {
    /// The fact was known without any rule producing it.
    Given(Fact),

    /// The fact was derived.
    Chain(CausalChain),

    /// The fact does not appear in the trace.
    Unknown,
}

impl WhyResult {
    /// Returns true if the fact appears in the trace.
    #[must_use]
    pub fn found(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Returns the firing that produced the fact, if any.
    #[must_use]
    pub fn immediate_cause(&self) -> Option<&CausalLink> {
        match self {
            Self::Chain(chain) => chain.immediate_cause(),
            Self::Given(_) | Self::Unknown => None,
        }
    }

    /// Returns the rule that produced the fact, if any.
    #[must_use]
    pub fn producing_rule(&self) -> Option<&str> {
        self.immediate_cause().map(|link| link.rule.as_str())
    }

    /// Renders the result for display.
    #[must_use]
    pub fn render(&self, interner: &Interner) -> String {
        match self {
            Self::Given(fact) => format!("{} is given\n", interner.display(*fact)),
            Self::Chain(chain) => chain.render(interner),
            Self::Unknown => "not known\n".to_string(),
        }
    }
}

// =============================================================================
// Why Query
// =============================================================================

/// Performs "why" queries against a recorded trace.
pub struct WhyQuery<'a> {
    buffer: &'a TraceBuffer,
    kb: &'a KnowledgeBase,
}

impl<'a> WhyQuery<'a> {
    /// Creates a new why query over a trace of a run of `kb`.
    #[must_use]
    pub fn new(buffer: &'a TraceBuffer, kb: &'a KnowledgeBase) -> Self {
        Self { buffer, kb }
    }

    /// Answers "why is this fact known?" with its immediate cause only.
    #[must_use]
    pub fn why(&self, fact: Fact) -> WhyResult {
        self.why_depth(fact, 1)
    }

    /// Answers "why" following premises back through at most `depth` firings.
    #[must_use]
    pub fn why_depth(&self, fact: Fact, depth: usize) -> WhyResult {
        if depth == 0 {
            return WhyResult::Unknown;
        }
        if self.buffer.fired_for(fact).is_none() {
            return match self.buffer.added_at(fact) {
                Some(_) => WhyResult::Given(fact),
                None => WhyResult::Unknown,
            };
        }

        let mut chain = CausalChain::new();
        let mut seen = HashSet::from([fact]);
        let mut queue = VecDeque::from([(fact, 0)]);

        while let Some((current, level)) = queue.pop_front() {
            let Some(record) = self.buffer.fired_for(current) else {
                continue;
            };
            let Some(link) = self.link(record, level) else {
                continue;
            };

            for &premise in &link.premises {
                if !seen.insert(premise) {
                    continue;
                }
                if self.buffer.fired_for(premise).is_none() {
                    chain.given.push(premise);
                } else if level + 1 < depth {
                    queue.push_back((premise, level + 1));
                } else {
                    chain.truncated = true;
                }
            }
            chain.links.push(link);
        }

        WhyResult::Chain(chain)
    }

    /// Builds the link for a firing record.
    fn link(&self, record: &TraceRecord, level: usize) -> Option<CausalLink> {
        let TraceEvent::RuleFired {
            rule,
            target,
            output,
        } = &record.event
        else {
            return None;
        };

        let mut unique = HashSet::new();
        let premises = self
            .kb
            .rule(rule)
            .map(|r| {
                r.expr
                    .facts()
                    .into_iter()
                    .filter(|&f| f != *output && unique.insert(f))
                    .filter(|&f| self.buffer.added_at(f).is_some_and(|seq| seq < record.seq))
                    .collect()
            })
            .unwrap_or_default();

        Some(CausalLink {
            fact: *output,
            rule: rule.clone(),
            target: *target,
            seq: record.seq,
            premises,
            level,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
