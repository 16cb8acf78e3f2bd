//! Compiled text patterns shared by the lexer, parser and walker
//!
//! Patterns are compiled on first use. A pattern that fails to compile is
//! reported as an internal error instead of panicking.

use core_types::{LintError, LintResult};
use regex::Regex;
use std::sync::LazyLock;

/// Named text patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Whole-string identifier
    Identifier,
    /// Module specifier accepted by `import`
    ModuleName,
    /// Property names that look private or synchronous
    BadProperty,
    /// Marker of unfinished work in a comment
    Todo,
    /// Directive comment: word and body
    Directive,
    /// One `name` or `name: value` item of a directive body, and the rest
    DirectivePart,
    /// Number text allowed in JSON
    JsonNumber,
    /// Leading capital letter
    InitialCap,
}

impl Pattern {
    const ALL: [Pattern; 8] = [
        Pattern::Identifier,
        Pattern::ModuleName,
        Pattern::BadProperty,
        Pattern::Todo,
        Pattern::Directive,
        Pattern::DirectivePart,
        Pattern::JsonNumber,
        Pattern::InitialCap,
    ];

    fn source(self) -> &'static str {
        match self {
            Pattern::Identifier => r"^([a-zA-Z_$][a-zA-Z0-9_$]*)$",
            Pattern::ModuleName => r"^[a-zA-Z0-9_$:.@\-/]+$",
            Pattern::BadProperty => r"^_|\$|Sync$|_$",
            Pattern::Todo => r"\b(?:todo|TO\s?DO|HACK)\b",
            Pattern::Directive => r"^(jslint|property|global)\s+(.*)$",
            Pattern::DirectivePart => {
                r"^([a-zA-Z$_][a-zA-Z0-9$_]*)(?::\s*(true|false))?,?\s*(.*)$"
            }
            Pattern::JsonNumber => r"^-?(?:0|[1-9]\d*)(?:\.\d*)?(?:[eE][\-+]?\d+)?$",
            Pattern::InitialCap => r"^[A-Z]",
        }
    }

    /// The compiled pattern
    pub fn regex(self) -> LintResult<&'static Regex> {
        match COMPILED.get(self as usize) {
            Some(Ok(regex)) => Ok(regex),
            Some(Err(err)) => Err(LintError::Internal(format!(
                "pattern {self:?} does not compile: {err}"
            ))),
            None => Err(LintError::Internal(format!("pattern {self:?} is missing"))),
        }
    }

    /// True if the pattern matches somewhere in `text`
    pub fn is_match(self, text: &str) -> LintResult<bool> {
        Ok(self.regex()?.is_match(text))
    }
}

static COMPILED: LazyLock<Vec<Result<Regex, regex::Error>>> =
    LazyLock::new(|| Pattern::ALL.iter().map(|p| Regex::new(p.source())).collect());
