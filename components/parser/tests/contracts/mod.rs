//! Contract tests for parser API
//!
//! These tests verify the parser component implements its contract correctly.

use core_types::{Code, LintResult, Options, Source};
use parser::{
    parse, tokenize, Arity, Context, ModuleMode, NodeKind, Role, ScopeKind, Tree, GLOBAL,
};

fn context(text: &str, options: Options) -> Context {
    let mut ctx = Context::new(options, &[]);
    ctx.lines = Source::from(text).into_lines();
    ctx
}

fn run(text: &str) -> (Context, Option<Tree>, LintResult<()>) {
    let mut ctx = context(text, Options::default());
    if let Err(err) = tokenize(&mut ctx) {
        return (ctx, None, Err(err));
    }
    let (tree, outcome) = parse(&mut ctx);
    (ctx, tree, outcome)
}

// =============================================================================
// Lexer Contract Tests
// =============================================================================

#[test]
fn test_tokenize_fills_tokens_and_meta() {
    let mut ctx = context("let x = 42;\n", Options::default());
    tokenize(&mut ctx).unwrap();
    let ids: Vec<&str> = ctx.tokens.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["let", "x", "=", "(number)", ";", "(end)"]);
    assert_eq!(ctx.meta.len(), ctx.tokens.len());
}

#[test]
fn test_tokens_carry_positions() {
    let mut ctx = context("a\n  bb\n", Options::default());
    tokenize(&mut ctx).unwrap();
    let bb = &ctx.tokens[1];
    assert_eq!((bb.line, bb.from, bb.thru), (1, 2, 4));
    assert!(bb.identifier);
}

#[test]
fn test_jslint_directive_enables_option() {
    let mut ctx = context("/*jslint browser*/\ndocument.title = \"x\";\n", Options::default());
    tokenize(&mut ctx).unwrap();
    assert!(ctx.options.browser);
    assert!(ctx.declared_globals.contains("document"));
}

#[test]
fn test_global_directive_sets_module_mode() {
    let mut ctx = context("/*global foo*/\nfoo();\n", Options::default());
    tokenize(&mut ctx).unwrap();
    assert!(ctx.declared_globals.contains("foo"));
    assert!(matches!(ctx.module_mode, ModuleMode::GlobalDirective(_)));
}

// =============================================================================
// Parser Contract Tests
// =============================================================================

#[test]
fn test_parse_returns_program() {
    let (ctx, tree, outcome) = run("let x = 42;\n");
    assert!(outcome.is_ok());
    assert!(ctx.warnings.is_empty(), "{:?}", ctx.warnings);
    let Some(Tree::Program(body)) = tree else {
        panic!("expected a program");
    };
    assert_eq!(body.len(), 1);
    assert!(matches!(body[0].kind, NodeKind::Let { .. }));
}

#[test]
fn test_parse_json_file() {
    let (_, tree, outcome) = run("[1, 2, 3]\n");
    assert!(outcome.is_ok());
    assert!(matches!(tree, Some(Tree::Json(_))));
}

#[test]
fn test_stop_keeps_completed_statements() {
    let (ctx, tree, outcome) = run("let a = 1;\nlet b = ;\n");
    let err = outcome.unwrap_err();
    assert!(err.is_stop());
    let Some(Tree::Program(body)) = tree else {
        panic!("expected a partial program");
    };
    assert_eq!(body.len(), 1);
    assert_eq!(ctx.warnings.last().map(|w| w.line), Some(1));
}

#[test]
fn test_function_creates_scope_with_parameters() {
    let (ctx, tree, outcome) = run("function f(a, b) {\n    return a + b;\n}\n");
    assert!(outcome.is_ok(), "{:?}", ctx.warnings);
    let Some(Tree::Program(body)) = tree else {
        panic!("expected a program");
    };
    let NodeKind::Function(function) = &body[0].kind else {
        panic!("expected a function statement");
    };
    assert!(function.statement);
    assert_eq!(function.params.len(), 2);
    let scope = ctx.scopes.scope(function.scope);
    assert_eq!(scope.kind, ScopeKind::Function);
    assert_eq!(scope.level, 1);
    let a = ctx.scopes.get(function.scope, "a").unwrap();
    assert_eq!(ctx.scopes.binding(a).role, Role::Parameter);
    let f = ctx.scopes.get(GLOBAL, "f").unwrap();
    assert_eq!(ctx.scopes.binding(f).role, Role::Variable);
}

#[test]
fn test_module_tracks_imports_and_exports() {
    let (ctx, _, outcome) = run("import x from \"mod\";\nexport default Object.freeze(x);\n");
    assert!(outcome.is_ok(), "{:?}", ctx.warnings);
    assert_eq!(ctx.module_mode, ModuleMode::Module);
    assert_eq!(ctx.froms, vec!["mod".to_string()]);
    assert!(ctx.exports.contains_key("default"));
}

#[test]
fn test_layout_table_records_arity() {
    let (ctx, _, outcome) = run("let a = -b;\n");
    assert!(outcome.is_ok());
    let minus = ctx.tokens.iter().position(|t| t.id == "-").unwrap();
    assert!(ctx.meta[minus].is(Arity::Unary));
    assert!(ctx.meta[0].statement);
}

#[test]
fn test_for_statement_is_rejected() {
    let (ctx, _, outcome) = run("for (;;) {\n    a();\n}\n");
    assert!(outcome.is_err());
    assert!(ctx
        .warnings
        .iter()
        .any(|w| w.code == Code::UnexpectedA && w.a.as_deref() == Some("for")));
}
