//! Integration tests for editing a theme end to end.

use swatch::{
    AttrKey, AttrType, Catalog, EditError, FileStorage, MemoryStorage, ResolveError, Snapshot,
    SnapshotEntry, SnapshotStorage, Store, ThemeEditor, ValidationError,
};
use tempfile::TempDir;

// ============================================================================
// Test fixtures
// ============================================================================

/// Initialize tracing for tests, respecting RUST_LOG.
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

fn key(s: &str) -> AttrKey {
    s.parse().unwrap()
}

fn editor() -> ThemeEditor {
    init_logging();
    ThemeEditor::new(Catalog::builtin()).unwrap()
}

fn resolved(store: &Store, k: &str) -> String {
    store.get(&key(k)).unwrap().resolved_value().to_string()
}

fn edit(editor: &mut ThemeEditor, k: &str, value: &str) -> Result<Vec<AttrKey>, EditError> {
    editor.open(&key(k))?;
    editor.set_buffer(value)?;
    let result = editor.commit();
    editor.close();
    result.map(|commit| commit.updated)
}

// ============================================================================
// Referencing
// ============================================================================

#[test]
fn chained_references_follow_the_source() {
    let mut editor = editor();
    edit(&mut editor, "colors.secondary", "{colors.primary}").unwrap();
    edit(&mut editor, "textfield.color", "{colors.secondary}").unwrap();

    let updated = edit(&mut editor, "colors.primary", "red").unwrap();

    assert_eq!(
        updated,
        vec![key("colors.primary"), key("colors.secondary"), key("textfield.color")]
    );
    assert_eq!(resolved(editor.store(), "colors.secondary"), "red");
    assert_eq!(resolved(editor.store(), "textfield.color"), "red");
}

#[test]
fn several_attributes_reference_one_source() {
    let mut editor = editor();
    edit(&mut editor, "buttons.color", "{colors.highlight1}").unwrap();
    edit(&mut editor, "links.fontColor", "{colors.highlight1}").unwrap();
    edit(&mut editor, "textfield.border", "1px solid {colors.highlight1}").unwrap();

    edit(&mut editor, "colors.highlight1", "yellow").unwrap();

    let store = editor.store();
    assert_eq!(resolved(store, "buttons.color"), "yellow");
    assert_eq!(resolved(store, "links.fontColor"), "yellow");
    assert_eq!(resolved(store, "textfield.border"), "1px solid yellow");
}

#[test]
fn raw_input_keeps_tokens() {
    let mut editor = editor();
    edit(&mut editor, "buttons.fontSize", "calc({sizes.text}*1.2)").unwrap();

    let attribute = editor.store().get(&key("buttons.fontSize")).unwrap();
    assert_eq!(attribute.raw_input(), "calc({sizes.text}*1.2)");
    assert_eq!(attribute.resolved_value(), "calc(1.1*1.2)");
    assert!(attribute.has_references());
}

#[test]
fn style_value_gains_unit_after_propagation() {
    let mut editor = editor();
    edit(&mut editor, "links.fontSize", "{sizes.text}").unwrap();
    edit(&mut editor, "sizes.text", "1.3").unwrap();

    let k = key("links.fontSize");
    assert_eq!(editor.view(&k).unwrap().style, "1.3em");
}

// ============================================================================
// Rejected edits
// ============================================================================

#[test]
fn self_reference_leaves_store_unchanged() {
    let mut editor = editor();
    let before = editor.store().clone();

    let err = edit(&mut editor, "sizes.h1", "calc({sizes.h1}*2)").unwrap_err();

    assert_eq!(
        err,
        EditError::Rejected(vec![ValidationError::SelfReference { key: key("sizes.h1") }])
    );
    assert_eq!(editor.store(), &before);
}

#[test]
fn unbalanced_input_leaves_store_unchanged() {
    let mut editor = editor();
    let before = editor.store().clone();

    let err = edit(&mut editor, "buttons.fontSize", "calc(1.1*1.2").unwrap_err();

    assert!(matches!(err, EditError::Rejected(ref errors) if errors.len() == 1));
    assert_eq!(editor.store(), &before);
}

#[test]
fn cycle_is_reported_with_its_path() {
    let mut editor = editor();
    edit(&mut editor, "colors.secondary", "{colors.primary}").unwrap();
    edit(&mut editor, "textfield.color", "{colors.secondary}").unwrap();
    let before = editor.store().clone();

    let err = edit(&mut editor, "colors.primary", "{textfield.color}").unwrap_err();

    match err {
        EditError::Resolve(ResolveError::CyclicReference { path }) => {
            assert_eq!(
                path,
                vec![
                    key("colors.primary"),
                    key("colors.secondary"),
                    key("textfield.color"),
                    key("colors.primary"),
                ]
            );
        }
        other => panic!("expected a cycle, got {other:?}"),
    }
    assert_eq!(editor.store(), &before);
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn saved_theme_is_restored() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileStorage::new(temp_dir.path().join("theme.json"));

    let mut editor = editor();
    edit(&mut editor, "colors.primary", "{colors.highlight2}").unwrap();
    editor.save(&storage).unwrap();

    let restored = ThemeEditor::load(Catalog::builtin(), &storage).unwrap();
    assert_eq!(resolved(restored.store(), "colors.primary"), "#ffab40");
    assert_eq!(
        restored.store().get(&key("colors.primary")).unwrap().raw_input(),
        "{colors.highlight2}"
    );

    let mut restored = restored;
    edit(&mut restored, "colors.highlight2", "orange").unwrap();
    assert_eq!(resolved(restored.store(), "colors.primary"), "orange");
}

#[test]
fn restore_rejects_dangling_reference() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileStorage::new(temp_dir.path().join("theme.json"));

    let mut snapshot = editor().store().to_snapshot();
    if let Some(entry) = snapshot.attributes.get_mut(&key("colors.primary")) {
        entry.raw_input = "{colors.gone}".to_string();
    }
    storage.save(&snapshot).unwrap();

    assert!(ThemeEditor::load(Catalog::builtin(), &storage).is_err());
}

#[test]
fn partial_snapshot_resolves_missing_defaults() {
    let catalog = Catalog::new().group("c", "Colors", true, |g| {
        g.attr("base", "Base", "#111111", AttrType::Color)
            .attr("accent", "Accent", "{c.base}", AttrType::Color)
    });
    let mut snapshot = Snapshot::default();
    snapshot.attributes.insert(
        key("c.base"),
        SnapshotEntry {
            raw_input: "red".to_string(),
            resolved_value: "red".to_string(),
            attr_type: AttrType::Color,
        },
    );
    let storage = MemoryStorage::new();
    storage.save(&snapshot).unwrap();

    let restored = ThemeEditor::load(catalog, &storage).unwrap();
    let accent = restored.store().get(&key("c.accent")).unwrap();
    assert_eq!(accent.raw_input(), "{c.base}");
    assert_eq!(accent.resolved_value(), "red");
}

#[test]
fn reset_and_clear_return_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileStorage::new(temp_dir.path().join("theme.json"));

    let mut editor = editor();
    edit(&mut editor, "sizes.h1", "2").unwrap();
    editor.save(&storage).unwrap();

    storage.clear().unwrap();
    let fresh = ThemeEditor::load(Catalog::builtin(), &storage).unwrap();
    assert_eq!(resolved(fresh.store(), "sizes.h1"), "1.4");

    editor.reset().unwrap();
    assert_eq!(editor.store(), fresh.store());
}

// ============================================================================
// Custom catalogs
// ============================================================================

#[test]
fn catalog_from_yaml_drives_the_editor() {
    let yaml = r##"
- group: palette
  title: Palette
  attributes:
    - name: base
      label: Base color
      value: "#111111"
      type: color
    - name: accent
      label: Accent color
      value: "{palette.base}"
      type: color
"##;
    let catalog = Catalog::from_yaml(yaml).unwrap();
    let mut editor = ThemeEditor::new(catalog).unwrap();
    assert_eq!(resolved(editor.store(), "palette.accent"), "#111111");

    edit(&mut editor, "palette.base", "#222222").unwrap();
    assert_eq!(resolved(editor.store(), "palette.accent"), "#222222");
}
