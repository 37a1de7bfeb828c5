//! Property tests for chaining runs over generated knowledge bases.

use std::collections::HashMap;

use proptest::prelude::*;
use sylloge_engine::{
    BackwardOutcome, Engine, EngineConfig, Expr, ForwardOutcome, KnowledgeBase, RefusingProvider,
    Rule, TraceEvent,
};
use sylloge_foundation::{Fact, FactSet};

const FACTS: usize = 6;

/// Expression shape over fact indices, turned into an `Expr` once facts exist.
#[derive(Clone, Debug)]
enum Shape {
    Fact(usize),
    Not(Box<Shape>),
    And(Vec<Shape>),
    Or(Vec<Shape>),
}

impl Shape {
    fn build(&self, facts: &[Fact]) -> Expr {
        match self {
            Self::Fact(i) => Expr::fact(facts[*i]),
            Self::Not(inner) => Expr::not(inner.build(facts)),
            Self::And(children) => Expr::and(children.iter().map(|c| c.build(facts))),
            Self::Or(children) => Expr::or(children.iter().map(|c| c.build(facts))),
        }
    }
}

fn shape() -> impl Strategy<Value = Shape> {
    let leaf = (0..FACTS).prop_map(Shape::Fact);
    leaf.prop_recursive(3, 16, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(|s| Shape::Not(Box::new(s))),
            prop::collection::vec(inner.clone(), 0..3).prop_map(Shape::And),
            prop::collection::vec(inner, 0..3).prop_map(Shape::Or),
        ]
    })
}

/// (expression, output index, target flag) per rule.
fn rules() -> impl Strategy<Value = Vec<(Shape, usize, bool)>> {
    prop::collection::vec((shape(), 0..FACTS, any::<bool>()), 0..8)
}

fn initial() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0..FACTS, 0..4)
}

fn build_kb(rules: &[(Shape, usize, bool)]) -> (KnowledgeBase, Vec<Fact>) {
    let mut kb = KnowledgeBase::new("generated");
    let facts: Vec<Fact> = (0..FACTS).map(|i| kb.fact(&format!("F{i}"))).collect();
    for (i, (shape, output, target)) in rules.iter().enumerate() {
        let mut rule = Rule::new(format!("r{i}"), shape.build(&facts)).with_output(facts[*output]);
        if *target {
            rule = rule.as_target();
        }
        kb.add_rule(rule).unwrap();
    }
    (kb, facts)
}

fn fire_counts(events: &[TraceEvent]) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for event in events {
        if let TraceEvent::RuleFired { rule, .. } = event {
            *counts.entry(rule.as_str()).or_insert(0) += 1;
        }
    }
    counts
}

proptest! {
    #[test]
    fn forward_run_is_monotonic_and_fires_each_rule_once(
        rules in rules(),
        start in initial(),
    ) {
        let (kb, facts) = build_kb(&rules);
        let start: Vec<Fact> = start.into_iter().map(|i| facts[i]).collect();

        let mut engine = Engine::new(&kb, RefusingProvider, Vec::new());
        engine.reset(start.iter().copied());
        let outcome = engine.run_forward(None);

        prop_assert!(!matches!(outcome, ForwardOutcome::Aborted(_)));
        for fact in &start {
            prop_assert!(engine.facts().contains(*fact));
        }
        let added = engine
            .sink()
            .iter()
            .filter(|e| matches!(e, TraceEvent::FactAdded(_)))
            .count();
        prop_assert_eq!(added, engine.facts().len());

        let counts = fire_counts(engine.sink());
        prop_assert!(counts.values().all(|&n| n == 1));
        prop_assert_eq!(counts.len() + engine.agenda_len(), kb.rules().len());
    }

    #[test]
    fn forward_success_comes_from_target_rule(rules in rules(), start in initial()) {
        let (kb, facts) = build_kb(&rules);
        let mut engine = Engine::new(&kb, RefusingProvider, Vec::new());
        engine.reset(start.into_iter().map(|i| facts[i]));

        if let ForwardOutcome::Succeeded(fact) = engine.run_forward(None) {
            let last_fired = engine.sink().iter().rev().find_map(|e| match e {
                TraceEvent::RuleFired { target, output, .. } => Some((*target, *output)),
                TraceEvent::FactAdded(_) => None,
            });
            prop_assert_eq!(last_fired, Some((true, fact)));
        }
    }

    #[test]
    fn backward_run_terminates_and_consumes_rules_once(
        rules in rules(),
        start in initial(),
        goal in 0..FACTS,
    ) {
        let (kb, facts) = build_kb(&rules);
        let mut engine = Engine::new(&kb, RefusingProvider, Vec::new());
        engine.reset(start.into_iter().map(|i| facts[i]));

        let outcome = engine.run_backward(facts[goal]);
        match outcome {
            BackwardOutcome::Reachable => prop_assert!(engine.facts().contains(facts[goal])),
            BackwardOutcome::Unreachable => prop_assert!(!engine.facts().contains(facts[goal])),
            BackwardOutcome::Aborted(err) => prop_assert!(false, "aborted: {err}"),
        }
        let counts = fire_counts(engine.sink());
        prop_assert!(counts.values().all(|&n| n == 1));
    }

    #[test]
    fn unknowns_are_empty_when_expression_holds(
        shape in shape(),
        known in prop::collection::vec(0..FACTS, 0..FACTS),
    ) {
        let (_, facts) = build_kb(&[]);
        let expr = shape.build(&facts);
        let set: FactSet = known.into_iter().map(|i| facts[i]).collect();

        if expr.is(&set) {
            prop_assert!(expr.unknowns(&set).is_empty());
        }
    }

    #[test]
    fn required_unknowns_are_missing_facts(
        shape in shape(),
        known in prop::collection::vec(0..FACTS, 0..FACTS),
    ) {
        let (_, facts) = build_kb(&[]);
        let expr = shape.build(&facts);
        let set: FactSet = known.into_iter().map(|i| facts[i]).collect();

        for fact in expr.unknowns(&set).required_facts() {
            prop_assert!(!set.contains(fact));
        }
    }

    #[test]
    fn stall_questioning_off_matches_refusing_provider(rules in rules(), start in initial()) {
        let (kb, facts) = build_kb(&rules);
        let start: Vec<Fact> = start.into_iter().map(|i| facts[i]).collect();

        let mut plain = Engine::new(&kb, RefusingProvider, Vec::new());
        plain.reset(start.iter().copied());
        let plain_outcome = plain.run_forward(None);

        let mut quiet = Engine::new(&kb, RefusingProvider, Vec::new())
            .with_config(EngineConfig::new().without_asking());
        quiet.reset(start.iter().copied());
        let quiet_outcome = quiet.run_forward(None);

        prop_assert_eq!(plain_outcome.fact(), quiet_outcome.fact());
        prop_assert_eq!(plain.sink(), quiet.sink());
    }
}
