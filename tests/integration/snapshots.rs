//! Document and snapshot persistence of the demo knowledge base.

use std::fs;

use sylloge_engine::ScriptedProvider;
use sylloge_foundation::ErrorKind;
use sylloge_runtime::{
    Goal, Session, compile, decompile, from_bytes, load_from_file, parse_document,
    save_to_file, to_bytes, to_json,
};

use crate::{minerals, minerals_path};

#[test]
fn json_roundtrip_preserves_rules() {
    let kb = minerals();
    let text = to_json(&kb).unwrap();
    let restored = compile(&parse_document(&text).unwrap()).unwrap();

    assert_eq!(restored.rules(), kb.rules());
    assert_eq!(restored.questions(), kb.questions());
    assert_eq!(decompile(&restored), decompile(&kb));
}

#[test]
fn snapshot_file_roundtrip_runs_the_same() {
    let kb = minerals();
    let path = std::env::temp_dir().join(format!("sylloge-minerals-{}.msgpack", std::process::id()));
    save_to_file(&kb, &path).unwrap();
    let restored = load_from_file(&path).unwrap();
    let _ = fs::remove_file(&path);

    assert_eq!(restored.name(), "minerals");
    let mut session = Session::new(restored);
    let answers = session.facts(["Glitter", "Dull"]);
    let report = session.run(&Goal::Forward(None), ScriptedProvider::new(answers));
    assert_eq!(report.outcome.describe(session.kb().interner()), "Result: Galena");
}

#[test]
fn corrupt_snapshot_is_rejected() {
    let mut bytes = to_bytes(&minerals()).unwrap();
    bytes.truncate(bytes.len() / 2);

    let err = from_bytes(&bytes).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Serialization(_)));
}

#[test]
fn snapshot_of_json_file_is_not_a_document() {
    let text = fs::read(minerals_path()).unwrap();
    assert!(from_bytes(&text).is_err());
}
