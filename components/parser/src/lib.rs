//! JavaScript Parser Component
//!
//! Front half of the linter: tokenizes source text, reads directive
//! comments, and builds a syntax tree with a Pratt parser. Scopes and
//! bindings are created while parsing and stored in the shared
//! [`Context`], together with a per-token layout table used later by the
//! whitespace auditor.
//!
//! # Overview
//!
//! - [`tokenize`] - Splits source lines into [`Token`]s and applies directives
//! - [`parse`] - Builds a [`Tree`] from the token list
//! - [`Context`] - Per-analysis state threaded through every phase
//! - [`Scopes`] - Arena of scopes and bindings
//!
//! # Example
//!
//! ```
//! use core_types::{Options, Source};
//! use parser::{parse, tokenize, Context, Tree};
//!
//! let mut ctx = Context::new(Options::default(), &[]);
//! ctx.lines = Source::from("let x = 42;\n").into_lines();
//! tokenize(&mut ctx).unwrap();
//! let (tree, outcome) = parse(&mut ctx);
//! assert!(outcome.is_ok());
//! assert!(matches!(tree, Some(Tree::Program(_))));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod context;
mod expression;
pub mod grammar;
mod json;
pub mod lexer;
pub mod parser;
pub mod patterns;
pub mod scope;
pub mod token;

pub use ast::{Node, NodeKind, Tree};
pub use context::{Context, ModuleMode};
pub use lexer::tokenize;
pub use parser::{parse, Parser};
pub use patterns::Pattern;
pub use scope::{Binding, BindingId, Role, Scope, ScopeId, ScopeKind, Scopes, GLOBAL};
pub use token::{Arity, DirectiveKind, Token, TokenMeta};
