//! Logical activation expressions.
//!
//! An [`Expr`] is an owned tree of fact tests, negations, conjunctions and
//! disjunctions. Besides plain evaluation ([`Expr::is`]) it supports partial
//! evaluation ([`Expr::unknowns`]): finding the facts whose presence or
//! absence would move the expression towards being true. The chaining engine
//! uses the latter to decide which premises to prove or ask about.
//!
//! # Polarity
//!
//! Unknown discovery is evaluated with a polarity flag. A negation evaluates
//! its child with the flag inverted, so `Not(e)` reports the unknowns that
//! would make `e` false, each carrying `required == false`. Under inverted
//! polarity a conjunction behaves as a disjunction and vice versa.

use std::fmt;

use sylloge_foundation::{Fact, FactSet, Interner};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// =============================================================================
// Unknowns
// =============================================================================

/// A fact whose presence (`required == true`) or absence (`required == false`)
/// is needed and is not established by the current fact set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Unknown {
    /// Required polarity of the fact.
    pub required: bool,
    /// The undetermined fact.
    pub fact: Fact,
}

impl Unknown {
    /// Creates an unknown that needs `fact` to be present.
    #[must_use]
    pub const fn present(fact: Fact) -> Self {
        Self {
            required: true,
            fact,
        }
    }

    /// Creates an unknown that needs `fact` to be absent.
    #[must_use]
    pub const fn absent(fact: Fact) -> Self {
        Self {
            required: false,
            fact,
        }
    }
}

/// A list of unknowns keyed by fact. No fact appears twice.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Unknowns(Vec<Unknown>);

impl Unknowns {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn single(unknown: Unknown) -> Self {
        Self(vec![unknown])
    }

    /// Returns the number of distinct facts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nothing is missing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates entries in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &Unknown> {
        self.0.iter()
    }

    /// Looks up the entry for a fact.
    #[must_use]
    pub fn get(&self, fact: Fact) -> Option<&Unknown> {
        self.0.iter().find(|u| u.fact == fact)
    }

    /// Merges another list into this one.
    ///
    /// A fact already present keeps its position; its polarity becomes
    /// required if either side requires it.
    pub fn plex(&mut self, other: Unknowns) {
        for incoming in other.0 {
            match self.0.iter_mut().find(|u| u.fact == incoming.fact) {
                Some(existing) => existing.required |= incoming.required,
                None => self.0.push(incoming),
            }
        }
    }

    /// Projects out the facts that still need to be present.
    #[must_use]
    pub fn required_facts(&self) -> Vec<Fact> {
        self.0
            .iter()
            .filter(|u| u.required)
            .map(|u| u.fact)
            .collect()
    }
}

impl IntoIterator for Unknowns {
    type Item = Unknown;
    type IntoIter = std::vec::IntoIter<Unknown>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<Unknown> for Unknowns {
    fn from_iter<I: IntoIterator<Item = Unknown>>(iter: I) -> Self {
        let mut list = Self::new();
        for unknown in iter {
            list.plex(Self::single(unknown));
        }
        list
    }
}

// =============================================================================
// Expression
// =============================================================================

/// A logical expression over facts.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    /// True iff the fact is known.
    Fact(Fact),
    /// True iff the inner expression is false.
    Not(Box<Expr>),
    /// True iff every child is true; vacuously true when empty.
    And(Vec<Expr>),
    /// True iff some child is true; vacuously false when empty.
    Or(Vec<Expr>),
}

impl Expr {
    /// Creates a fact test.
    #[must_use]
    pub fn fact(fact: Fact) -> Self {
        Self::Fact(fact)
    }

    /// Creates a negation.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Expr) -> Self {
        Self::Not(Box::new(inner))
    }

    /// Creates a conjunction.
    #[must_use]
    pub fn and(children: impl IntoIterator<Item = Expr>) -> Self {
        Self::And(children.into_iter().collect())
    }

    /// Creates a disjunction.
    #[must_use]
    pub fn or(children: impl IntoIterator<Item = Expr>) -> Self {
        Self::Or(children.into_iter().collect())
    }

    /// The expression that is always true (an empty conjunction).
    #[must_use]
    pub fn always() -> Self {
        Self::And(Vec::new())
    }

    /// Evaluates the expression against a fact set.
    #[must_use]
    pub fn is(&self, facts: &FactSet) -> bool {
        match self {
            Self::Fact(fact) => facts.contains(*fact),
            Self::Not(inner) => !inner.is(facts),
            Self::And(children) => children.iter().all(|c| c.is(facts)),
            Self::Or(children) => children.iter().any(|c| c.is(facts)),
        }
    }

    /// Returns the facts that are missing for this expression to hold.
    ///
    /// Empty when the expression is already true. A conjunction reports only
    /// the unknowns of its most-blocked child; a disjunction reports nothing
    /// if any branch already holds, and otherwise the merge of all branches.
    #[must_use]
    pub fn unknowns(&self, facts: &FactSet) -> Unknowns {
        self.unknowns_with(facts, true)
    }

    fn unknowns_with(&self, facts: &FactSet, positive: bool) -> Unknowns {
        match self {
            Self::Fact(fact) => {
                if facts.contains(*fact) == positive {
                    Unknowns::new()
                } else {
                    Unknowns::single(Unknown {
                        required: positive,
                        fact: *fact,
                    })
                }
            }
            Self::Not(inner) => inner.unknowns_with(facts, !positive),
            Self::And(children) if positive => Self::hardest(children, facts, positive),
            Self::And(children) => Self::plexed(children, facts, positive),
            Self::Or(children) if positive => Self::plexed(children, facts, positive),
            Self::Or(children) => Self::hardest(children, facts, positive),
        }
    }

    /// Unknowns of the child with the longest list. Ties go to the first.
    fn hardest(children: &[Expr], facts: &FactSet, positive: bool) -> Unknowns {
        children
            .iter()
            .map(|c| c.unknowns_with(facts, positive))
            .fold(Unknowns::new(), |best, next| {
                if next.len() > best.len() { next } else { best }
            })
    }

    /// Merge of every child's unknowns, or nothing if some child already holds.
    fn plexed(children: &[Expr], facts: &FactSet, positive: bool) -> Unknowns {
        let mut merged = Unknowns::new();
        for child in children {
            let branch = child.unknowns_with(facts, positive);
            if branch.is_empty() {
                return Unknowns::new();
            }
            merged.plex(branch);
        }
        merged
    }

    /// Every fact mentioned by the expression, in tree order.
    #[must_use]
    pub fn facts(&self) -> Vec<Fact> {
        let mut out = Vec::new();
        self.collect_facts(&mut out);
        out
    }

    fn collect_facts(&self, out: &mut Vec<Fact>) {
        match self {
            Self::Fact(fact) => out.push(*fact),
            Self::Not(inner) => inner.collect_facts(out),
            Self::And(children) | Self::Or(children) => {
                for child in children {
                    child.collect_facts(out);
                }
            }
        }
    }

    /// Nesting depth; a bare fact has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Fact(_) => 1,
            Self::Not(inner) => 1 + inner.depth(),
            Self::And(children) | Self::Or(children) => {
                1 + children.iter().map(Expr::depth).max().unwrap_or(0)
            }
        }
    }

    /// Returns a displayable form that names facts through the interner.
    #[must_use]
    pub fn display<'a>(&'a self, interner: &'a Interner) -> ExprDisplay<'a> {
        ExprDisplay {
            expr: self,
            interner,
        }
    }
}

/// Renders an expression as an s-expression, e.g. `(and A (not B))`.
pub struct ExprDisplay<'a> {
    expr: &'a Expr,
    interner: &'a Interner,
}

impl fmt::Display for ExprDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (op, children) = match self.expr {
            Expr::Fact(fact) => return write!(f, "{}", self.interner.display(*fact)),
            Expr::Not(inner) => return write!(f, "(not {})", inner.display(self.interner)),
            Expr::And(children) => ("and", children),
            Expr::Or(children) => ("or", children),
        };
        write!(f, "({op}")?;
        for child in children {
            write!(f, " {}", child.display(self.interner))?;
        }
        write!(f, ")")
    }
}

// =============================================================================
// Tests
// =============================================================================
