//! Integration tests for the `screen-text` binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use serde_json::Value;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Config with no settle delays so replays finish immediately.
fn fast_config(dir: &Path) -> PathBuf {
    let path = dir.join("config.toml");
    std::fs::write(
        &path,
        "[scroll]\nscroll_settle_ms = 0\ninitial_settle_ms = 0\n\n[selection]\nselect_settle_ms = 0\ncopy_settle_ms = 0\n",
    )
    .unwrap();
    path
}

fn screen_text(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_screen-text"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn replay(name: &str) -> (Output, Value) {
    let dir = tempfile::tempdir().unwrap();
    let config = fast_config(dir.path());
    let output = screen_text(&[
        "--config-file",
        config.to_str().unwrap(),
        "--replay",
        fixture(name).to_str().unwrap(),
    ]);
    let json = serde_json::from_slice(&output.stdout).unwrap_or(Value::Null);
    (output, json)
}

#[test]
fn test_replay_scrolling_feed() {
    let (output, json) = replay("feed.json");
    assert!(output.status.success());

    assert_eq!(json["status"], "found");
    assert_eq!(json["extraction_method"], "scroll");
    assert_eq!(
        json["content"],
        "Release notes\nVersion 2.1\nFaster sync\nDark mode\nBug fixes"
    );
    assert_eq!(json["line_count"], 5);
    assert_eq!(json["scroll"]["scrolls_to_top"], 1);
    assert_eq!(json["scroll"]["scrolls_forward"], 2);
    assert_eq!(json["scroll"]["restored"], 1);
    assert_eq!(json["cancelled"], false);
}

#[test]
fn test_replay_selectable_article() {
    let (output, json) = replay("article.json");
    assert!(output.status.success());
    assert_eq!(json["extraction_method"], "selection");
    assert_eq!(
        json["content"],
        "Full article\nEvery paragraph, including the ones below the fold."
    );
    assert!(json.get("scroll").is_none());
}

#[test]
fn test_replay_empty_screen_is_no_text_found() {
    let (output, json) = replay("empty.json");
    assert!(output.status.success());
    assert_eq!(json["status"], "no_text_found");
}

#[test]
fn test_replay_malformed_fixture_fails() {
    let (output, _) = replay("broken.json");
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error"));
}

#[test]
fn test_replay_missing_fixture_fails() {
    let (output, _) = replay("does-not-exist.json");
    assert!(!output.status.success());
}

#[test]
fn test_print_config_uses_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "[scroll]\nmax_scroll_attempts = 75\n").unwrap();

    let output = screen_text(&["--config-file", config.to_str().unwrap(), "--config"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("max_scroll_attempts = 75"));
    assert!(stdout.contains("convergence_threshold = 3"));
}

#[test]
fn test_help_and_unknown_arguments() {
    let help = screen_text(&["--help"]);
    assert!(help.status.success());
    assert!(String::from_utf8_lossy(&help.stdout).contains("--replay"));

    let unknown = screen_text(&["--bogus"]);
    assert_eq!(unknown.status.code(), Some(1));
}
