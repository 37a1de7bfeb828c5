//! Integration tests for facts, the interner, and fact sets

use proptest::prelude::*;
use sylloge_foundation::{Fact, FactSet, Interner};

// =============================================================================
// Interner
// =============================================================================

#[test]
fn interning_is_idempotent() {
    let mut interner = Interner::new();
    let a = interner.intern("BlueColor");
    let b = interner.intern("BlueColor");
    assert_eq!(a, b);
    assert_eq!(interner.len(), 1);
}

#[test]
fn distinct_names_get_distinct_facts() {
    let mut interner = Interner::new();
    let a = interner.intern("Glitter");
    let b = interner.intern("Metallic");
    assert_ne!(a, b);
    assert_eq!(interner.resolve(a), Some("Glitter"));
    assert_eq!(interner.resolve(b), Some("Metallic"));
}

#[test]
fn lookup_does_not_intern() {
    let mut interner = Interner::new();
    assert!(interner.get("Quartz").is_none());
    assert!(interner.is_empty());

    let quartz = interner.intern("Quartz");
    assert_eq!(interner.get("Quartz"), Some(quartz));
}

#[test]
fn display_uses_name() {
    let mut interner = Interner::new();
    let fact = interner.intern("Silver");
    assert_eq!(interner.display(fact).to_string(), "Silver");
}

#[test]
fn facts_from_other_interner_do_not_resolve() {
    let mut big = Interner::new();
    for name in ["A", "B", "C"] {
        big.intern(name);
    }
    let c = big.get("C").unwrap();

    let mut small = Interner::new();
    small.intern("A");
    assert!(small.resolve(c).is_none());
}

// =============================================================================
// FactSet
// =============================================================================

#[test]
fn fact_set_keeps_insertion_order() {
    let mut interner = Interner::new();
    let a = interner.intern("A");
    let b = interner.intern("B");
    let c = interner.intern("C");

    let mut set = FactSet::new();
    set.push(c);
    set.push(a);
    set.push(b);

    assert_eq!(set.iter().collect::<Vec<_>>(), vec![c, a, b]);
    assert_eq!(set.last(), Some(b));
}

#[test]
fn duplicate_push_is_reported_but_kept() {
    let mut interner = Interner::new();
    let a = interner.intern("A");

    let mut set = FactSet::new();
    assert!(set.push(a));
    assert!(!set.push(a));
    assert_eq!(set.len(), 2);
    assert!(set.contains(a));
}

#[test]
fn cleared_set_is_empty() {
    let mut interner = Interner::new();
    let a = interner.intern("A");

    let mut set: FactSet = [a].into_iter().collect();
    set.clear();
    assert!(set.is_empty());
    assert!(!set.contains(a));
    assert_eq!(set.last(), None);
}

// =============================================================================
// Properties
// =============================================================================

fn fact_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[A-Z][a-z]{0,6}", 0..32)
}

proptest! {
    #[test]
    fn interned_names_resolve_back(names in fact_names()) {
        let mut interner = Interner::new();
        let facts: Vec<Fact> = names.iter().map(|n| interner.intern(n)).collect();
        for (name, fact) in names.iter().zip(&facts) {
            prop_assert_eq!(interner.resolve(*fact), Some(name.as_str()));
        }
    }

    #[test]
    fn membership_matches_pushed_facts(names in fact_names()) {
        let mut interner = Interner::new();
        let mut set = FactSet::new();
        for name in &names {
            set.push(interner.intern(name));
        }
        prop_assert_eq!(set.len(), names.len());
        for name in &names {
            prop_assert!(set.contains(interner.get(name).unwrap()));
        }
    }
}
