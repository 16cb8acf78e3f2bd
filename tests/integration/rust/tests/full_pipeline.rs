//! Full Pipeline Integration Tests
//!
//! Tests the complete flow: Source -> Lexer -> Parser -> Walker -> Sweep ->
//! Whitespace audit -> Report, through the `analyze` entry point.

use analyzer::{analyze, Report};
use core_types::{Code, Options};

/// Helper function to analyze source with default options
fn lint(source: &str) -> Report {
    analyze(source, &Options::default(), &[])
}

fn codes(report: &Report) -> Vec<Code> {
    report.warnings.iter().map(|w| w.code).collect()
}

/// Test: `var` is rejected in favor of block-scoped declarations
#[test]
fn test_full_pipeline_var_is_fatal() {
    let report = lint("var x = 1;");

    assert!(report.stop);
    assert!(!report.ok);
    assert_eq!(codes(&report), vec![Code::UnexpectedVar]);
}

/// Test: a variable that is only assigned is unused
#[test]
fn test_full_pipeline_assigned_only() {
    let report = lint("let x = 1;\nx = 2;\n");

    assert_eq!(codes(&report), vec![Code::UnusedA]);
    assert_eq!(report.warnings[0].message, "Unused 'x'.");
}

/// Test: reading a variable before it has a value
#[test]
fn test_full_pipeline_uninitialized() {
    let report = lint("let x;\nif (x) {\n    x = 1;\n}\n");

    let warning = report
        .warnings
        .iter()
        .find(|w| w.code == Code::UninitializedA)
        .expect("uninitialized warning");
    assert_eq!(warning.a.as_deref(), Some("x"));
    assert_eq!(warning.line, 1);
}

/// Test: an 81-column line is too long unless `long` is set
#[test]
fn test_full_pipeline_line_length() {
    let source = format!("let a = \"{}\";\n", "z".repeat(70));

    let report = lint(&source);
    let warning = report
        .warnings
        .iter()
        .find(|w| w.code == Code::TooLong)
        .expect("too_long warning");
    assert_eq!((warning.line, warning.column), (0, 80));

    let report = analyze(source.as_str(), &Options::from_map([("long", true)]), &[]);
    assert!(report.warnings.iter().all(|w| w.code != Code::TooLong));
}

/// Test: loose equality inside a function
#[test]
fn test_full_pipeline_loose_equality() {
    let report = lint("function f(a, b) {\n    return a == b;\n}\nf(1, 2);\n");

    assert_eq!(report.warnings[0].code, Code::ExpectedAB);
    assert_eq!(
        report.warnings[0].message,
        "Expected '===' and instead saw '=='."
    );
}

/// Test: nested template literals are never accepted
#[test]
fn test_full_pipeline_nested_template() {
    let report = lint("let a = `outer ${`inner`}`;\n");

    assert!(report.stop);
    assert!(!report.ok);
}

/// Test: canonical JSON is clean
#[test]
fn test_full_pipeline_json() {
    let report = lint("{\"a\":1,\"b\":[true,false,null]}");

    assert!(report.json);
    assert!(report.ok);
    assert!(report.warnings.is_empty());
}

/// Test: a tidy module passes every phase
#[test]
fn test_full_pipeline_clean_module() {
    let source = "\
import fs from \"fs\";

function read(name) {
    return fs.readFileSync(name, \"utf8\");
}

export default Object.freeze(read);
";
    let report = lint(source);

    assert!(report.ok, "{:?}", report.warnings);
    assert!(report.module);
    assert_eq!(report.froms, vec!["fs".to_string()]);
    assert!(report.exports.contains_key("default"));
}

/// Test: identical input gives identical results
#[test]
fn test_full_pipeline_idempotent() {
    let source = "let a = 1;\nlet b = (a ? true : false);\nlet c = a == b;\n";

    let first = lint(source);
    let second = lint(source);

    assert_eq!(first.warnings, second.warnings);
    assert_eq!(first.tree, second.tree);
}

/// Test: warnings come back sorted by position
#[test]
fn test_full_pipeline_sorted() {
    let report = lint("let a = b;\nlet c = d;\nlet e = a == c;\n");

    assert!(report.warnings.len() >= 3);
    for pair in report.warnings.windows(2) {
        assert!((pair[0].line, pair[0].column) <= (pair[1].line, pair[1].column));
    }
}
