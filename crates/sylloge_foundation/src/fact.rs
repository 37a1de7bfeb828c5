//! Fact handles and the name interner.
//!
//! Facts are interned so that expression evaluation compares small integers
//! instead of strings. A [`Fact`] is only meaningful together with the
//! [`Interner`] that produced it, which is owned by the knowledge base.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Interned fact identifier.
///
/// Facts are atomic propositions such as `BlueColor` or `Glitter`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Fact(pub(crate) u32);

impl Fact {
    /// Returns the raw index of this fact.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fact({})", self.0)
    }
}

/// Interner for fact names.
///
/// This is a simple interner that maps strings to unique IDs and back.
/// It is not thread-safe; use external synchronization if needed.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interner {
    /// Name storage, indexed by fact.
    names: Vec<Arc<str>>,
    /// Map from name to fact.
    name_to_fact: HashMap<Arc<str>, Fact>,
}

impl Interner {
    /// Creates an empty interner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a fact name, returning its [`Fact`].
    ///
    /// # Panics
    ///
    /// Panics if the number of interned facts exceeds `u32::MAX`.
    pub fn intern(&mut self, name: &str) -> Fact {
        if let Some(&fact) = self.name_to_fact.get(name) {
            return fact;
        }

        let idx = u32::try_from(self.names.len()).expect("too many interned facts");
        let arc: Arc<str> = name.into();
        self.names.push(arc.clone());

        let fact = Fact(idx);
        self.name_to_fact.insert(arc, fact);
        fact
    }

    /// Looks up a fact by name without interning it.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Fact> {
        self.name_to_fact.get(name).copied()
    }

    /// Gets the name of a fact.
    #[must_use]
    pub fn resolve(&self, fact: Fact) -> Option<&str> {
        self.names.get(fact.0 as usize).map(AsRef::as_ref)
    }

    /// Returns a displayable wrapper for a fact.
    #[must_use]
    pub fn display(&self, fact: Fact) -> FactDisplay<'_> {
        FactDisplay {
            interner: self,
            fact,
        }
    }

    /// Returns the number of interned facts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if nothing has been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns true if every name maps back to its own fact and no other
    /// names are mapped. Always true for an interner built by [`intern`];
    /// a deserialized one may not be.
    ///
    /// [`intern`]: Interner::intern
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.names.len() == self.name_to_fact.len()
            && self.names.iter().enumerate().all(|(i, name)| {
                self.name_to_fact
                    .get(name)
                    .is_some_and(|fact| fact.0 as usize == i)
            })
    }
}

/// Renders a fact by name, or as `#<index>` if the interner doesn't know it.
#[derive(Clone, Copy)]
pub struct FactDisplay<'a> {
    interner: &'a Interner,
    fact: Fact,
}

impl fmt::Display for FactDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.interner.resolve(self.fact) {
            Some(name) => f.write_str(name),
            None => write!(f, "#{}", self.fact.0),
        }
    }
}
