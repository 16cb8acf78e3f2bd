//! Analyzer Component
//!
//! Back half of the linter and its entry point. [`analyze`] runs the whole
//! pipeline on one source text with a fresh [`parser::Context`]:
//!
//! 1. tokenize and parse (or read the file as JSON)
//! 2. walk the tree, resolving every name and applying the rules
//! 3. if nothing was reported, sweep for unused and uninitialized names
//!    and audit the whitespace
//!
//! A fatal diagnostic ends the pipeline early; the [`Report`] then carries
//! `stop = true` along with the tokens and tree built so far.
//!
//! # Example
//!
//! ```
//! use analyzer::analyze;
//! use core_types::{Code, Options};
//!
//! let report = analyze("let a = 1;\nlet b = a == 2;\n", &Options::default(), &[]);
//! assert!(!report.ok);
//! assert_eq!(report.warnings[0].code, Code::ExpectedAB);
//!
//! let report = analyze("{\"a\": [true, null]}\n", &Options::default(), &[]);
//! assert!(report.ok && report.json);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod report;
mod rules;
mod sweep;
mod walker;
mod whitage;

pub use report::{Report, EDITION};

use core_types::{Code, LintError, LintResult, Options, Source};
use parser::{parse, tokenize, Context, DirectiveKind, ModuleMode, Tree};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, instrument, warn};

/// Analyze one source text
///
/// `globals` names extra identifiers that may be used without being
/// declared. Unknown option names in `options` have already been dropped by
/// [`Options::from_map`]. This never fails: fatal diagnostics, internal
/// errors and panics are folded into the report.
#[instrument(skip_all, fields(globals = globals.len()))]
pub fn analyze(source: impl Into<Source>, options: &Options, globals: &[String]) -> Report {
    let mut ctx = Context::new(options.clone(), globals);
    ctx.lines = source.into().into_lines();
    let (tree, stop) = contain(&mut ctx, run);
    finish(ctx, tree, stop)
}

/// Run the pipeline, folding stops, internal errors and panics into `ctx`
///
/// Returns the tree and whether the pipeline ended early.
fn contain<F>(ctx: &mut Context, pipeline: F) -> (Option<Tree>, bool)
where
    F: FnOnce(&mut Context) -> (Option<Tree>, LintResult<()>),
{
    let (tree, outcome) = match panic::catch_unwind(AssertUnwindSafe(|| pipeline(ctx))) {
        Ok(result) => result,
        Err(payload) => (None, Err(LintError::Internal(panic_text(payload.as_ref())))),
    };
    let stop = match outcome {
        Ok(()) => false,
        Err(LintError::Stop(warning)) => {
            debug!(code = warning.code.as_str(), line = warning.line, "stopped");
            true
        }
        Err(LintError::Internal(text)) => {
            warn!(error = %text, "internal error");
            ctx.warn_at(Code::InternalError, 0, 0, &[&text]);
            true
        }
    };
    (tree, stop)
}

fn panic_text(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "panic".to_string()
    }
}

/// The pipeline proper; stops surface as errors
fn run(ctx: &mut Context) -> (Option<Tree>, LintResult<()>) {
    if let Err(err) = tokenize(ctx) {
        return (None, Err(err));
    }
    debug!(tokens = ctx.tokens.len(), json = ctx.json_mode, "tokenized");
    let (tree, outcome) = parse(ctx);
    if outcome.is_err() {
        return (tree, outcome);
    }
    let walked = match &tree {
        Some(Tree::Program(statements)) => {
            debug!(statements = statements.len(), "parsed");
            Some(walker::walk(ctx, statements))
        }
        _ => None,
    };
    match walked {
        Some(Err(err)) => return (tree, Err(err)),
        Some(Ok(())) => {
            let clean = ctx.warnings.is_empty();
            if clean {
                sweep::sweep(ctx);
                if !ctx.options.white {
                    whitage::audit(ctx);
                }
            }
            debug!(
                warnings = ctx.warnings.len(),
                swept = clean,
                audited = clean && !ctx.options.white,
                "walked"
            );
        }
        None => {}
    }
    if !ctx.options.browser {
        let globals: Vec<usize> = ctx
            .directives
            .iter()
            .copied()
            .filter(|&nr| {
                ctx.tokens
                    .get(nr)
                    .is_some_and(|t| t.directive == Some(DirectiveKind::Global))
            })
            .collect();
        for nr in globals {
            ctx.warn(Code::MissingBrowser, nr, &[]);
        }
    }
    (tree, Ok(()))
}

fn finish(ctx: Context, tree: Option<Tree>, stop: bool) -> Report {
    let mut warnings = ctx.warnings;
    warnings.sort_by_key(|w| (w.line, w.column));
    let directives = ctx
        .directives
        .iter()
        .filter_map(|&nr| ctx.tokens.get(nr).cloned())
        .collect();
    let shebang = if ctx.shebang {
        ctx.lines.first().cloned()
    } else {
        None
    };
    Report {
        ok: warnings.is_empty() && !stop,
        stop,
        warnings,
        tree,
        tokens: ctx.tokens,
        scopes: ctx.scopes,
        exports: ctx.exports,
        froms: ctx.froms,
        module: ctx.module_mode == ModuleMode::Module,
        json: ctx.json_mode,
        property: ctx.property,
        directives,
        edition: EDITION,
        lines: ctx.lines,
        shebang,
        option: ctx.options,
    }
}
