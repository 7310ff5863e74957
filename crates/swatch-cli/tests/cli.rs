//! Integration tests running the `swatch` binary.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn swatch(state: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_swatch"))
        .args(args)
        .env("SWATCH_STATE", state)
        .env_remove("SWATCH_CATALOG")
        .env("NO_COLOR", "1")
        .env("CLICOLOR", "0")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn set_then_get_across_runs() {
    let dir = TempDir::new().unwrap();
    let state = dir.path().join("state.json");

    let out = swatch(&state, &["set", "colors.secondary", "{colors.primary}"]);
    assert!(out.status.success());
    let out = swatch(&state, &["set", "colors.primary", "red"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("colors.secondary"));

    let out = swatch(&state, &["get", "colors.secondary"]);
    assert!(stdout(&out).contains("resolved: red"));
}

#[test]
fn rejected_edit_exits_with_error() {
    let dir = TempDir::new().unwrap();
    let state = dir.path().join("state.json");

    let out = swatch(&state, &["set", "sizes.h1", "1.4 {sizes.h1}"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Self-referencing is not allowed."));
    assert!(!state.exists());
}

#[test]
fn export_is_valid_json() {
    let dir = TempDir::new().unwrap();
    let state = dir.path().join("state.json");

    let out = swatch(&state, &["export", "--format", "json"]);
    assert!(out.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(
        value["attributes"]["links.fontColor"]["resolvedValue"],
        "#007bff"
    );
}
