//! Parser -> Analyzer Integration Tests
//!
//! Checks that the analyzer's report agrees with what the parser alone
//! produces for the same source.

use analyzer::analyze;
use core_types::{Options, Source};
use parser::{parse, tokenize, Context, Tree};

fn parsed(source: &str) -> (Context, Option<Tree>) {
    let mut ctx = Context::new(Options::default(), &[]);
    ctx.lines = Source::from(source).into_lines();
    tokenize(&mut ctx).expect("tokenize failed");
    let (tree, outcome) = parse(&mut ctx);
    outcome.expect("parse failed");
    (ctx, tree)
}

/// Test: the report carries the parser's tokens and tree
#[test]
fn test_parser_analyzer_same_tokens_and_tree() {
    let source = "function f(a) {\n    return a + 1;\n}\nf(2);\n";
    let (ctx, tree) = parsed(source);
    let report = analyze(source, &Options::default(), &[]);

    assert_eq!(report.tokens, ctx.tokens);
    assert_eq!(report.tree, tree);
}

/// Test: parse-time warnings survive into the report
#[test]
fn test_parser_analyzer_parse_warnings_kept() {
    let source = "let a = 1;\ndebugger;\n";
    let (ctx, _) = parsed(source);
    let report = analyze(source, &Options::default(), &[]);

    assert!(!ctx.warnings.is_empty());
    for warning in &ctx.warnings {
        assert!(report.warnings.contains(warning));
    }
}

/// Test: bindings created while parsing are resolved by the walker
#[test]
fn test_parser_analyzer_binding_use_counts() {
    let source = "let a = 1;\nlet b = [a, a];\nb.pop();\n";
    let (ctx, _) = parsed(source);
    let report = analyze(source, &Options::default(), &[]);

    let parsed_a = ctx.scopes.binding(ctx.scopes.get(0, "a").unwrap());
    assert_eq!(parsed_a.used, 0);
    let global = report.global();
    let walked_a = report.scopes.binding(global.context["a"]);
    assert_eq!(walked_a.used, 2);
}
