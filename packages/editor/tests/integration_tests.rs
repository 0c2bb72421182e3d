//! Integration tests for editor crate

use cnx_editor::{Command, Document, DocumentStorage, EditorConfig, EditorError, Point, Selection};
use cnx_model::Key;
use std::fs;

const MODULE: &str = r#"<document xmlns="http://cnx.rice.edu/cnxml"><content>
    <section id="intro">
        <title>Introduction</title>
        <para id="p1">Read <emphasis effect="italics">carefully</emphasis>.</para>
        <para id="p2">What is 2 + 2?</para>
    </section>
</content></document>"#;

#[test]
fn test_document_lifecycle() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("module.cnxml");
    fs::write(&path, MODULE)?;

    let mut doc = Document::load(&path)?;
    assert_eq!(doc.storage(), &DocumentStorage::File { dirty: false });
    assert_eq!(doc.version, 0);

    let anchor = Point::start_of(doc.tree(), &Key::from_id("p2")).unwrap();
    doc.set_selection(Some(Selection::collapsed(anchor)));
    assert!(doc.run(Command::InsertExercise)?.value);
    assert!(doc.run(Command::InsertSolution)?.value);
    assert!(doc.is_dirty());

    doc.save()?;
    assert!(!doc.is_dirty());

    // What was saved loads back into the same tree
    let reloaded = Document::load(&path)?;
    assert_eq!(
        reloaded.tree().outline(reloaded.tree().root()),
        doc.tree().outline(doc.tree().root())
    );
    assert!(reloaded.violations().is_empty());

    let saved = fs::read_to_string(&path)?;
    assert!(saved.contains(r#"<exercise><problem><para id="p2">What is 2 + 2?</para></problem><solution><para></para></solution></exercise>"#));
    Ok(())
}

#[test]
fn test_config_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("editor.json");
    fs::write(&path, r#"{ "maxNormalizePasses": 3 }"#)?;

    let config = EditorConfig::load(&path)?;

    assert_eq!(config.max_normalize_passes, 3);
    assert!(config.normalize_on_load);
    Ok(())
}

#[test]
fn test_load_errors() {
    let missing = Document::load("does/not/exist.cnxml");
    assert!(matches!(missing, Err(EditorError::Io(_))));

    let malformed = Document::from_source("bad.cnxml", "<content><para>open</content>");
    assert!(matches!(malformed, Err(EditorError::Load(_))));
}

#[test]
fn test_json_dump() {
    let doc = Document::from_source("module.cnxml", MODULE).unwrap();
    let json: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();

    assert_eq!(json[0]["object"], "element");
    assert_eq!(json[0]["type"], "section");
    assert_eq!(json[0]["key"], "intro");
}
