//! Contract tests for the analyzer API
//!
//! These tests verify `analyze` fills every part of its report.

use analyzer::{analyze, EDITION};
use core_types::{Code, Options, Source};
use parser::{DirectiveKind, Role, Tree};

// =============================================================================
// Report Shape
// =============================================================================

#[test]
fn test_report_carries_source_and_tokens() {
    let report = analyze("let a = 1;\n", &Options::default(), &[]);
    assert_eq!(report.edition, EDITION);
    assert_eq!(report.lines, vec!["let a = 1;", ""]);
    assert_eq!(report.tokens.last().map(|t| t.id.as_str()), Some("(end)"));
    assert!(matches!(report.tree, Some(Tree::Program(ref body)) if body.len() == 1));
    assert!(!report.json);
    assert!(!report.module);
}

#[test]
fn test_line_sources_are_accepted() {
    let lines = vec!["let a = 1;".to_string(), "let b = a;".to_string()];
    let report = analyze(Source::from(lines), &Options::default(), &[]);
    assert_eq!(report.lines.len(), 2);
    assert_eq!(report.warnings[0].code, Code::UnusedA);
}

#[test]
fn test_global_scope_lists_declarations() {
    let report = analyze("let a = 1;\nlet b = a;\n", &Options::default(), &[]);
    let global = report.global();
    assert!(global.context.contains_key("a"));
    assert_eq!(report.global_names(), vec!["a".to_string(), "b".to_string()]);
    let a = report.scopes.binding(global.context["a"]);
    assert_eq!(a.role, Role::Variable);
    assert_eq!(a.used, 1);
}

#[test]
fn test_json_report() {
    let report = analyze("{\"a\":1,\"b\":[true,false,null]}", &Options::default(), &[]);
    assert!(report.json);
    assert!(report.ok, "{:?}", report.warnings);
    assert!(matches!(report.tree, Some(Tree::Json(_))));
}

#[test]
fn test_stop_keeps_partial_output() {
    let report = analyze("let a = 1;\nvar b = 2;\n", &Options::default(), &[]);
    assert!(report.stop);
    assert!(!report.ok);
    assert!(report.tokens.len() > 5);
    assert!(report.tree.is_some());
}

#[test]
fn test_report_serializes_to_json() {
    let report = analyze("let a = b;\n", &Options::default(), &[]);
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["ok"], false);
    assert_eq!(value["edition"], EDITION);
    assert_eq!(value["warnings"][0]["code"], "undeclared_a");
    assert_eq!(value["warnings"][0]["a"], "b");
}

// =============================================================================
// Modules, Directives, Properties
// =============================================================================

#[test]
fn test_imports_are_collected() {
    let report = analyze(
        "import fs from \"fs\";\nlet m = import(\"./m.js\");\n",
        &Options::default(),
        &[],
    );
    assert!(report.module);
    assert_eq!(report.froms, vec!["fs".to_string(), "./m.js".to_string()]);
}

#[test]
fn test_directives_are_reported() {
    let report = analyze(
        "/*jslint devel*/\ndebugger;\n",
        &Options::default(),
        &[],
    );
    assert_eq!(report.directives.len(), 1);
    assert_eq!(report.directives[0].directive, Some(DirectiveKind::Jslint));
    assert!(report.option.devel);
}

#[test]
fn test_property_tally_and_directive() {
    let report = analyze(
        "let o = {alpha: 1};\nlet b = o.alpha + o.beta;\n",
        &Options::default(),
        &[],
    );
    assert_eq!(report.property.get("alpha"), Some(&2));
    assert_eq!(report.property.get("beta"), Some(&1));
    assert_eq!(
        report.property_directive().as_deref(),
        Some("/*property\n    alpha, beta\n*/\n")
    );
}

#[test]
fn test_shebang_is_reported() {
    let report = analyze("#!/usr/bin/env node\nlet a = 1;\n", &Options::default(), &[]);
    assert_eq!(report.shebang.as_deref(), Some("#!/usr/bin/env node"));
}

// =============================================================================
// Isolation
// =============================================================================

#[test]
fn test_analyses_do_not_share_state() {
    let text = "let a = 1;\nlet b = a == 2;\n";
    let first = analyze(text, &Options::default(), &[]);
    analyze("/*jslint bitwise*/\nlet x = 1;\n", &Options::default(), &[]);
    let again = analyze(text, &Options::default(), &[]);
    assert_eq!(first.warnings, again.warnings);
    assert!(!again.option.bitwise);
}
