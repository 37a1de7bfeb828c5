//! The ordered set of known facts.

use std::collections::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::fact::Fact;

/// Insertion-ordered, append-only collection of known facts.
///
/// Duplicates are kept in the sequence but membership is what expressions
/// observe. The most recently appended fact is the "current result" of a
/// forward run.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FactSet {
    order: Vec<Fact>,
    members: HashSet<Fact>,
}

impl FactSet {
    /// Creates an empty fact set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a fact. Returns true if the fact was not already present.
    pub fn push(&mut self, fact: Fact) -> bool {
        self.order.push(fact);
        self.members.insert(fact)
    }

    /// Returns true if the fact is known.
    #[must_use]
    #[inline]
    pub fn contains(&self, fact: Fact) -> bool {
        self.members.contains(&fact)
    }

    /// Returns the most recently appended fact.
    #[must_use]
    pub fn last(&self) -> Option<Fact> {
        self.order.last().copied()
    }

    /// Returns the number of appended facts, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if no fact has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates facts in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = Fact> + '_ {
        self.order.iter().copied()
    }

    /// Forgets every fact.
    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }
}

impl FromIterator<Fact> for FactSet {
    fn from_iter<I: IntoIterator<Item = Fact>>(iter: I) -> Self {
        let mut set = Self::new();
        for fact in iter {
            set.push(fact);
        }
        set
    }
}

impl Extend<Fact> for FactSet {
    fn extend<I: IntoIterator<Item = Fact>>(&mut self, iter: I) {
        for fact in iter {
            self.push(fact);
        }
    }
}
