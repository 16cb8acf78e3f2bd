//! Rule scenarios run through the whole pipeline

use analyzer::{analyze, Report};
use core_types::{Code, Options};

fn lint(text: &str) -> Report {
    analyze(text, &Options::default(), &[])
}

fn codes(report: &Report) -> Vec<Code> {
    report.warnings.iter().map(|w| w.code).collect()
}

#[test]
fn test_clean_program_is_ok() {
    let report = lint("function add(a, b) {\n    return a + b;\n}\nadd(1, 2);\n");
    assert!(report.ok, "{:?}", report.warnings);
    assert!(!report.stop);
}

#[test]
fn test_var_stops_analysis() {
    let report = lint("var x = 1;");
    assert!(report.stop);
    assert!(!report.ok);
    assert_eq!(codes(&report), vec![Code::UnexpectedVar]);
}

#[test]
fn test_assigned_but_never_read_is_unused() {
    let report = lint("let x = 1;\nx = 2;\n");
    assert_eq!(codes(&report), vec![Code::UnusedA]);
    assert_eq!(report.warnings[0].a.as_deref(), Some("x"));
    assert_eq!(report.warnings[0].line, 0);
}

#[test]
fn test_read_before_assignment() {
    let report = lint("let x;\nif (x) {\n    x = 1;\n}\n");
    assert!(codes(&report).contains(&Code::UninitializedA));
    assert!(!report.ok);
}

#[test]
fn test_long_line() {
    let line = format!("let a = \"{}\";\n", "x".repeat(70));
    let report = lint(&line);
    let too_long: Vec<_> = report
        .warnings
        .iter()
        .filter(|w| w.code == Code::TooLong)
        .collect();
    assert_eq!(too_long.len(), 1);
    assert_eq!((too_long[0].line, too_long[0].column), (0, 80));

    let report = analyze(line.as_str(), &Options::from_map([("long", true)]), &[]);
    assert!(!codes(&report).contains(&Code::TooLong));
}

#[test]
fn test_loose_equality_in_function() {
    let report = lint("function f(a, b) {\n    return a == b;\n}\nf(1, 2);\n");
    let warning = &report.warnings[0];
    assert_eq!(warning.code, Code::ExpectedAB);
    assert_eq!(warning.a.as_deref(), Some("==="));
    assert_eq!(warning.b.as_deref(), Some("=="));
}

#[test]
fn test_nested_template_is_fatal() {
    let report = lint("let a = `x${`y`}`;\n");
    assert!(report.stop);
    assert!(!report.ok);
}

#[test]
fn test_sweep_skipped_after_other_warnings() {
    let report = lint("let a = 1;\nlet b = a == 2;\n");
    assert_eq!(codes(&report), vec![Code::ExpectedAB]);
}

#[test]
fn test_whitespace_skipped_with_white_option() {
    let text = "function f(a) {\n    return a;\n}\nf(1 +2);\n";
    assert!(codes(&lint(text)).contains(&Code::ExpectedSpaceAB));
    let report = analyze(text, &Options::from_map([("white", true)]), &[]);
    assert!(!codes(&report).contains(&Code::ExpectedSpaceAB));
}

#[test]
fn test_global_directive_needs_browser() {
    let text = "/*global foo*/\nfoo();\n";
    assert_eq!(codes(&lint(text)), vec![Code::MissingBrowser]);
    let report = analyze(text, &Options::from_map([("browser", true)]), &[]);
    assert!(report.ok, "{:?}", report.warnings);
}

#[test]
fn test_extra_globals_are_declared() {
    let text = "foo();\n";
    assert_eq!(codes(&lint(text)), vec![Code::UndeclaredA]);
    let report = analyze(text, &Options::default(), &["foo".to_string()]);
    assert!(report.ok, "{:?}", report.warnings);
}

#[test]
fn test_capitalised_call() {
    let report = lint("function Thing() {\n    return 1;\n}\nThing();\n");
    assert!(codes(&report).contains(&Code::ExpectedABeforeB));
}

#[test]
fn test_constant_condition() {
    let report = lint("let a = 1;\nlet b = (a && true);\n");
    assert!(codes(&report).contains(&Code::WeirdConditionA));
}

#[test]
fn test_wrapped_immediate_invocation() {
    let report = lint("let a = function () {\n    return 1;\n}();\n");
    assert!(codes(&report).contains(&Code::WrapImmediate));
}

#[test]
fn test_new_object_and_array() {
    let report = lint("let a = new Object();\nlet b = new Array(1, 2);\n");
    let found: Vec<(Code, Option<&str>)> = report
        .warnings
        .iter()
        .map(|w| (w.code, w.a.as_deref()))
        .collect();
    assert!(found.contains(&(Code::ExpectedAB, Some("Object.create(null)"))));
    assert!(found.contains(&(Code::ExpectedAB, Some("[]"))));
}

#[test]
fn test_unused_parameter_is_reported() {
    let report = lint("function f(a, b) {\n    return a;\n}\nf(1, 2);\n");
    assert_eq!(codes(&report), vec![Code::UnusedA]);
    assert_eq!(report.warnings[0].a.as_deref(), Some("b"));
}

#[test]
fn test_underscore_parameter_is_not_reported() {
    let report = lint("function f(a, _) {\n    return a;\n}\nf(1, 2);\n");
    assert!(report.ok, "{:?}", report.warnings);
}

#[test]
fn test_forward_call_to_function_statement() {
    let report = lint(
        "function a() {\n    return b();\n}\nfunction b() {\n    return 1;\n}\nexport default Object.freeze([a]);\n",
    );
    let warning = &report.warnings[0];
    assert_eq!((warning.line, warning.column, warning.code), (1, 11, Code::OutOfScopeA));
}

#[test]
fn test_mutually_recursive_functions_are_clean() {
    let report = lint(
        "function a(n) {\n    return b(n);\n}\nfunction b(n) {\n    return a(n);\n}\nexport default Object.freeze([a]);\n",
    );
    assert!(report.ok, "{:?}", report.warnings);
}
