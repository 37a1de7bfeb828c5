//! End-to-end chaining scenarios over small knowledge bases.

use sylloge_engine::{
    BackwardOutcome, Engine, Expr, ForwardOutcome, KnowledgeBase, Question, RefusingProvider,
    Rule, ScriptedProvider, TraceEvent,
};
use sylloge_foundation::{ErrorKind, FactSet};

/// R1: A -> B, R2: B -> C (target).
fn chain_kb() -> KnowledgeBase {
    let mut kb = KnowledgeBase::new("chain");
    let a = kb.fact("A");
    let b = kb.fact("B");
    let c = kb.fact("C");
    kb.add_rule(Rule::new("R1", Expr::fact(a)).with_output(b)).unwrap();
    kb.add_rule(Rule::new("R2", Expr::fact(b)).with_output(c).as_target())
        .unwrap();
    kb
}

#[test]
fn forward_chain_reaches_target() {
    let kb = chain_kb();
    let a = kb.interner().get("A").unwrap();
    let b = kb.interner().get("B").unwrap();
    let c = kb.interner().get("C").unwrap();

    let mut engine = Engine::new(&kb, RefusingProvider, Vec::new());
    engine.reset([a]);
    let outcome = engine.run_forward(None);

    assert!(matches!(outcome, ForwardOutcome::Succeeded(f) if f == c));
    let trace = engine.sink();
    assert!(trace.contains(&TraceEvent::FactAdded(b)));
    assert!(trace.contains(&TraceEvent::RuleFired {
        rule: "R2".to_string(),
        target: true,
        output: c,
    }));
}

#[test]
fn forward_chain_asks_for_missing_premise() {
    let mut kb = chain_kb();
    let a = kb.fact("A");
    let c = kb.fact("C");
    kb.add_question(Question::new("start", "Is A the case?").with_answer(a, "Yes"))
        .unwrap();

    let mut engine = Engine::new(&kb, ScriptedProvider::new([a]), Vec::new());
    engine.reset([]);
    let outcome = engine.run_forward(None);

    assert!(matches!(outcome, ForwardOutcome::Succeeded(f) if f == c));
    assert_eq!(engine.provider().asked(), ["start".to_string()]);
}

#[test]
fn negated_premise_blocks_without_unknowns() {
    let mut kb = KnowledgeBase::new("negation");
    let x = kb.fact("X");
    let y = kb.fact("Y");
    let z = kb.fact("Z");
    kb.add_rule(
        Rule::new("R", Expr::and([Expr::fact(x), Expr::not(Expr::fact(y))])).with_output(z),
    )
    .unwrap();

    let facts: FactSet = [x, y].into_iter().collect();
    let rule = kb.rule("R").unwrap();
    assert!(!rule.is(&facts));
    assert!(rule.unknowns(&facts).is_empty());
}

#[test]
fn backward_unrelated_target_is_unreachable() {
    let mut kb = chain_kb();
    let a = kb.fact("A");
    let q = kb.fact("Q");

    let mut engine = Engine::new(&kb, RefusingProvider, Vec::new());
    engine.reset([a]);
    let outcome = engine.run_backward(q);

    assert!(matches!(outcome, BackwardOutcome::Unreachable));
    assert!(!engine.facts().contains(q));
}

#[test]
fn forward_structural_defect_aborts() {
    let mut kb = KnowledgeBase::new("broken");
    kb.add_rule(Rule::new("empty", Expr::always()).as_target())
        .unwrap();

    let mut engine = Engine::new(&kb, RefusingProvider, Vec::new());
    engine.reset([]);
    let outcome = engine.run_forward(None);

    let ForwardOutcome::Aborted(err) = outcome else {
        panic!("expected abort, got {outcome:?}");
    };
    assert!(matches!(err.kind, ErrorKind::Structural { ref rule } if rule == "empty"));
    let context = err.context.unwrap();
    assert_eq!(context.source.as_deref(), Some("broken"));
}

#[test]
fn minerals_consultation() {
    let mut kb = KnowledgeBase::new("minerals");
    let glitter = kb.fact("Glitter");
    let metallic = kb.fact("Metallic");
    let dull = kb.fact("Dull");
    let silver = kb.fact("Silver");
    let galena = kb.fact("Galena");
    kb.add_question(
        Question::new("luster", "What is the luster?")
            .with_answer(metallic, "Metallic")
            .with_answer(dull, "Dull"),
    )
    .unwrap();
    kb.add_rule(Rule::new("ask-luster", Expr::fact(glitter)).with_question("luster"))
        .unwrap();
    kb.add_rule(
        Rule::new("silver", Expr::and([Expr::fact(glitter), Expr::fact(metallic)]))
            .with_output(silver)
            .as_target(),
    )
    .unwrap();
    kb.add_rule(
        Rule::new("galena", Expr::and([Expr::fact(glitter), Expr::fact(dull)]))
            .with_output(galena)
            .as_target(),
    )
    .unwrap();

    let mut engine = Engine::new(&kb, ScriptedProvider::new([dull]), Vec::new());
    engine.reset([glitter]);
    assert!(matches!(engine.run_forward(Some(silver)), ForwardOutcome::Disproved { expected, actual } if expected == silver && actual == galena));

    engine.reset([glitter]);
    assert!(matches!(engine.run_backward(galena), BackwardOutcome::Aborted(_)));

    let mut engine = Engine::new(&kb, ScriptedProvider::new([metallic]), Vec::new());
    engine.reset([glitter]);
    assert!(engine.run_backward(silver).is_reachable());
    assert!(engine.facts().contains(metallic));
}
