//! Consulting the demo knowledge base through a session.

use sylloge_engine::{EngineConfig, RefusingProvider, ScriptedProvider};
use sylloge_foundation::ErrorKind;
use sylloge_runtime::{Dialog, Goal, RunOutcome, ScriptedEditor, Session};

use crate::minerals;

fn dialog(lines: &[&str]) -> Dialog<ScriptedEditor, Vec<u8>> {
    Dialog::with_output(ScriptedEditor::new(lines.iter().copied()), Vec::new())
}

#[test]
fn demo_document_compiles() {
    let kb = minerals();
    assert_eq!(kb.name(), "minerals");
    assert_eq!(kb.questions().len(), 3);
    assert_eq!(kb.rules().len(), 8);
    assert!(kb.structural_defects().is_empty());
    assert_eq!(kb.rules().iter().filter(|r| r.target).count(), 5);
}

#[test]
fn dialog_consultation_identifies_gold() {
    let mut session = Session::new(minerals());
    let report = session.run(&Goal::Forward(None), dialog(&["1", "1", "1"]));

    assert!(report.outcome.is_success());
    assert_eq!(
        report.outcome.describe(session.kb().interner()),
        "Result: Gold"
    );
    assert_eq!(report.outcome.exit_status(), 0);

    let (editor, out) = report.provider.into_parts();
    let out = String::from_utf8(out).unwrap();
    assert!(out.starts_with("Q: Does the mineral glitter?\n1) Yes\n2) No\n"));
    assert!(out.contains("Q: What is the luster?"));
    assert!(out.contains("Q: What is the color?"));
    assert_eq!(editor.prompts().len(), 3);
}

#[test]
fn dialog_reprompts_then_continues() {
    let mut session = Session::new(minerals());
    let report = session.run(&Goal::Forward(None), dialog(&["2", "9", "2"]));

    assert_eq!(report.outcome.describe(session.kb().interner()), "Result: Quartz");
    let (_, out) = report.provider.into_parts();
    assert_eq!(String::from_utf8(out).unwrap().matches("Invalid number").count(), 1);
}

#[test]
fn negated_premise_selects_talc() {
    let mut session = Session::new(minerals());
    let no_glitter_grey = session.facts(["NoGlitter", "Grey"]);
    let report = session.run(&Goal::Forward(None), ScriptedProvider::new(no_glitter_grey));

    assert_eq!(report.outcome.describe(session.kb().interner()), "Result: Talc");
}

#[test]
fn dialog_abort_reports_question() {
    let mut session = Session::new(minerals());
    let report = session.run(&Goal::Forward(None), dialog(&["1", "_"]));

    assert_eq!(report.outcome.exit_status(), 1);
    let err = report.outcome.error().unwrap();
    assert!(matches!(err.kind, ErrorKind::ProviderAborted { ref question } if question == "luster"));
    assert!(
        report
            .outcome
            .describe(session.kb().interner())
            .starts_with("Aborted:")
    );
}

#[test]
fn requested_target_is_checked() {
    let mut session = Session::new(minerals());
    let answers = session.facts(["Glitter", "Metallic", "Yellow"]);
    let report = session.run(
        &Goal::Forward(Some("Silver".to_string())),
        ScriptedProvider::new(answers),
    );

    assert!(matches!(report.outcome, RunOutcome::Forward { .. }));
    assert_eq!(
        report.outcome.describe(session.kb().interner()),
        "Disproved: expected Silver, concluded Gold"
    );
    assert_eq!(report.outcome.exit_status(), 2);
}

#[test]
fn backward_proof_asks_only_what_it_needs() {
    let mut session = Session::new(minerals());
    let answers = session.facts(["Glitter", "Dull"]);
    let report = session.run(&Goal::Prove("Galena".to_string()), ScriptedProvider::new(answers));

    assert_eq!(report.outcome.describe(session.kb().interner()), "Proved: Galena");
    assert_eq!(
        report.provider.asked(),
        ["glitter".to_string(), "luster".to_string()]
    );
}

#[test]
fn initial_facts_skip_questions() {
    let mut session = Session::new(minerals())
        .with_engine_config(EngineConfig::new().without_asking());
    session.add_fact("NoGlitter");
    session.add_fact("White");

    let report = session.run(&Goal::Prove("Quartz".to_string()), RefusingProvider);
    assert!(report.outcome.is_success());

    // Forward runs fire ask-glitter first, and refusing its question aborts.
    let report = session.run(&Goal::Forward(None), RefusingProvider);
    assert_eq!(report.outcome.exit_status(), 1);
}

#[test]
fn unprovable_goal_is_not_an_error() {
    let mut session = Session::new(minerals());
    let report = session.run(&Goal::Prove("Diamond".to_string()), RefusingProvider);

    assert!(report.outcome.error().is_none());
    assert_eq!(
        report.outcome.describe(session.kb().interner()),
        "Not provable: Diamond"
    );
    assert_eq!(report.outcome.exit_status(), 2);
}

#[test]
fn sessions_can_run_repeatedly() {
    let mut session = Session::new(minerals());
    for (answers, expected) in [
        (["Glitter", "Metallic", "White"], "Result: Silver"),
        (["Glitter", "Metallic", "Yellow"], "Result: Gold"),
    ] {
        let facts = session.facts(answers);
        let report = session.run(&Goal::Forward(None), ScriptedProvider::new(facts));
        assert_eq!(report.outcome.describe(session.kb().interner()), expected);
    }
}
