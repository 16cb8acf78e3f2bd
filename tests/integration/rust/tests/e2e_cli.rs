//! End-to-End CLI Integration Tests
//!
//! Tests the linter through the lint_cli API, from files on disk to
//! rendered output.

use lint_cli::{run, Cli, Linter};
use std::fs;
use tempfile::TempDir;

/// Test: linting a string through the Linter
#[test]
fn test_e2e_lint_string() {
    let linter = Linter::new(Default::default());
    let report = linter.lint_string("let a = [1];\na.pop();\n");

    assert!(report.ok, "{:?}", report.warnings);
}

/// Test: options from flags change the outcome
#[test]
fn test_e2e_options_from_flags() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bits.js");
    fs::write(&path, "let a = 1;\nlet b = a | 2;\nb.toString();\n").unwrap();
    let file = path.to_str().unwrap().to_string();

    let mut out = Vec::new();
    assert!(!run(&Cli::with_file(file.clone()), &mut out).unwrap());

    let mut cli = Cli::with_file(file);
    cli.options.push("bitwise".to_string());
    let mut out = Vec::new();
    assert!(run(&cli, &mut out).unwrap(), "{}", String::from_utf8_lossy(&out));
}

/// Test: JSON output parses back
#[test]
fn test_e2e_json_output() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.js");
    fs::write(&path, "let a = b;\n").unwrap();

    let mut cli = Cli::with_file(path.to_str().unwrap());
    cli.json = true;
    let mut out = Vec::new();
    assert!(!run(&cli, &mut out).unwrap());

    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["warnings"][0]["code"], "undeclared_a");
    assert_eq!(value["stop"], false);
}
