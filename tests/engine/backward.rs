//! Integration tests for reverse (backward) chaining
//!
//! Tests cyclic rule sets, alternatives, and interaction with forward runs.

use sylloge_engine::{
    BackwardOutcome, Engine, Expr, ForwardOutcome, KnowledgeBase, NullSink, Question,
    RefusingProvider, Rule, ScriptedProvider, TraceEvent,
};
use sylloge_foundation::ErrorKind;

#[test]
fn cyclic_rules_terminate() {
    let mut kb = KnowledgeBase::new("cycle");
    let a = kb.fact("A");
    let b = kb.fact("B");
    kb.add_rule(Rule::new("a-from-b", Expr::fact(b)).with_output(a)).unwrap();
    kb.add_rule(Rule::new("b-from-a", Expr::fact(a)).with_output(b)).unwrap();

    let mut engine = Engine::new(&kb, RefusingProvider, Vec::new());
    engine.reset([]);

    assert!(matches!(engine.run_backward(a), BackwardOutcome::Unreachable));
    assert!(engine.sink().is_empty());
}

#[test]
fn disjunctive_premise_tries_each_branch() {
    let mut kb = KnowledgeBase::new("either");
    let x = kb.fact("X");
    let y = kb.fact("Y");
    let seed = kb.fact("Seed");
    let goal = kb.fact("Goal");
    kb.add_rule(Rule::new("y-from-seed", Expr::fact(seed)).with_output(y))
        .unwrap();
    kb.add_rule(
        Rule::new("goal", Expr::or([Expr::fact(x), Expr::fact(y)]))
            .with_output(goal)
            .as_target(),
    )
    .unwrap();

    let mut engine = Engine::new(&kb, RefusingProvider, Vec::new());
    engine.reset([seed]);

    assert!(engine.run_backward(goal).is_reachable());
    assert!(engine.facts().contains(y));
    assert!(!engine.facts().contains(x));
}

#[test]
fn question_answered_differently_still_adds_fact() {
    let mut kb = KnowledgeBase::new("luster");
    let metallic = kb.fact("Metallic");
    let dull = kb.fact("Dull");
    kb.add_question(
        Question::new("luster", "What is the luster?")
            .with_answer(metallic, "Metallic")
            .with_answer(dull, "Dull"),
    )
    .unwrap();
    kb.add_rule(Rule::new("ask-luster", Expr::always()).with_question("luster"))
        .unwrap();

    let mut engine = Engine::new(&kb, ScriptedProvider::new([dull]), Vec::new());
    engine.reset([]);

    assert!(matches!(engine.run_backward(metallic), BackwardOutcome::Unreachable));
    assert!(engine.facts().contains(dull));
    assert_eq!(engine.agenda_len(), 0);
}

#[test]
fn fired_rules_leave_forward_agenda() {
    let mut kb = KnowledgeBase::new("chain");
    let a = kb.fact("A");
    let b = kb.fact("B");
    let c = kb.fact("C");
    kb.add_rule(Rule::new("R1", Expr::fact(a)).with_output(b)).unwrap();
    kb.add_rule(Rule::new("R2", Expr::fact(b)).with_output(c).as_target())
        .unwrap();

    let mut engine = Engine::new(&kb, RefusingProvider, Vec::new());
    engine.reset([a]);
    assert!(engine.run_backward(b).is_reachable());
    assert_eq!(engine.agenda().collect::<Vec<_>>(), vec!["R2"]);

    // R1 is spent; the forward run picks up from B.
    assert!(matches!(engine.run_forward(None), ForwardOutcome::Succeeded(f) if f == c));
    let fired: Vec<_> = engine
        .sink()
        .iter()
        .filter_map(|e| match e {
            TraceEvent::RuleFired { rule, .. } => Some(rule.as_str()),
            TraceEvent::FactAdded(_) => None,
        })
        .collect();
    assert_eq!(fired, vec!["R1", "R2"]);
}

#[test]
fn abort_reports_top_level_target() {
    let mut kb = KnowledgeBase::new("minerals");
    let glitter = kb.fact("Glitter");
    let silver = kb.fact("Silver");
    kb.add_question(Question::new("glitter", "Does it glitter?").with_answer(glitter, "Yes"))
        .unwrap();
    kb.add_rule(Rule::new("ask-glitter", Expr::always()).with_question("glitter"))
        .unwrap();
    kb.add_rule(Rule::new("silver", Expr::fact(glitter)).with_output(silver))
        .unwrap();

    let mut engine = Engine::new(&kb, RefusingProvider, NullSink);
    engine.reset([]);

    let BackwardOutcome::Aborted(err) = engine.run_backward(silver) else {
        panic!("expected abort");
    };
    assert!(matches!(err.kind, ErrorKind::ProviderAborted { .. }));
    let context = err.context.unwrap();
    assert_eq!(context.source.as_deref(), Some("minerals"));
    assert_eq!(context.stack, vec!["proving Silver".to_string()]);
}
