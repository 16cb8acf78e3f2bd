//! Per-call analysis state
//!
//! One [`Context`] is created for each analysis and threaded by `&mut`
//! through the lexer, parser, walker and whitespace auditor. Nothing is kept
//! in statics, so separate analyses never share state.

use crate::scope::Scopes;
use crate::token::{Token, TokenMeta};
use core_types::{Code, LintError, OptionName, Options, Warning, LANGUAGE_GLOBALS};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Whether the file is a script, a module, or declared its globals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModuleMode {
    /// No `import`, `export` or `/*global*/` seen
    #[default]
    Script,
    /// A `/*global*/` directive was seen; holds the comment token
    GlobalDirective(usize),
    /// `import` or `export` was used
    Module,
}

/// Shared state of one analysis
#[derive(Debug)]
pub struct Context {
    /// Effective options; directive comments may change them
    pub options: Options,
    /// 1 if reported numbers in messages start at one, else 0
    pub fudge: usize,
    /// Source lines
    pub lines: Vec<String>,
    /// Every token, comments included
    pub tokens: Vec<Token>,
    /// Layout facts, parallel to `tokens`
    pub meta: Vec<TokenMeta>,
    /// Collected diagnostics in emission order
    pub warnings: Vec<Warning>,
    warned: HashSet<usize>,
    /// Names that may be referenced without a declaration
    pub declared_globals: BTreeSet<String>,
    /// Token numbers of directive comments
    pub directives: Vec<usize>,
    /// True until the first real token is made
    pub directive_mode: bool,
    /// True when the first token is `{` or `[`
    pub json_mode: bool,
    /// Script or module
    pub module_mode: ModuleMode,
    /// True if line 0 starts with `#!`
    pub shebang: bool,
    /// Tally of property names
    pub property: BTreeMap<String, u32>,
    /// Registered property names from `/*property*/`
    pub tenure: Option<BTreeSet<String>>,
    /// Exported names mapped to the token of the exported thing
    pub exports: BTreeMap<String, usize>,
    /// Module specifiers, in order seen
    pub froms: Vec<String>,
    /// Scope and binding arena
    pub scopes: Scopes,
}

impl Context {
    /// Create a fresh context for the given options and extra globals
    pub fn new(options: Options, globals: &[String]) -> Self {
        let mut declared_globals: BTreeSet<String> =
            LANGUAGE_GLOBALS.iter().map(|s| (*s).to_string()).collect();
        declared_globals.extend(globals.iter().cloned());
        for name in options.enabled() {
            declared_globals.extend(name.preset_globals().into_iter().map(String::from));
        }
        Self {
            fudge: options.fudge(),
            options,
            lines: Vec::new(),
            tokens: Vec::new(),
            meta: Vec::new(),
            warnings: Vec::new(),
            warned: HashSet::new(),
            declared_globals,
            directives: Vec::new(),
            directive_mode: true,
            json_mode: false,
            module_mode: ModuleMode::Script,
            shebang: false,
            property: BTreeMap::new(),
            tenure: None,
            exports: BTreeMap::new(),
            froms: Vec::new(),
            scopes: Scopes::new(),
        }
    }

    /// Turn an option on from a directive, predeclaring its globals
    pub fn enable_option(&mut self, name: OptionName) {
        self.options.set(name, true);
        self.declared_globals
            .extend(name.preset_globals().into_iter().map(String::from));
    }

    /// Diagnostic text for a token
    pub fn artifact(&self, nr: usize) -> String {
        self.tokens
            .get(nr)
            .map(|t| t.artifact().to_string())
            .unwrap_or_default()
    }

    /// Line of a token plus fudge, as message text
    pub fn artifact_line(&self, nr: usize) -> String {
        let line = self.tokens.get(nr).map_or(0, |t| t.line);
        (line + self.fudge).to_string()
    }

    /// Column of a token plus fudge, as message text
    pub fn artifact_column(&self, nr: usize) -> String {
        let from = self.tokens.get(nr).map_or(0, |t| t.from);
        (from + self.fudge).to_string()
    }

    /// Record a warning at a position not tied to a token
    pub fn warn_at(&mut self, code: Code, line: usize, column: usize, exhibits: &[&str]) {
        self.warnings.push(Warning::new(code, line, column, exhibits));
    }

    /// Record a warning on a token, unless that token already has one
    ///
    /// Exhibit `a` defaults to the token's artifact when missing or empty.
    /// Returns true if the warning was recorded.
    pub fn warn(&mut self, code: Code, nr: usize, exhibits: &[&str]) -> bool {
        if self.warned.contains(&nr) {
            return false;
        }
        let Some(token) = self.tokens.get(nr) else {
            return false;
        };
        let (line, from) = (token.line, token.from);
        let fallback;
        let mut filled: Vec<&str> = exhibits.to_vec();
        match filled.first() {
            Some(a) if !a.is_empty() => {}
            _ => {
                fallback = self.artifact(nr);
                if filled.is_empty() {
                    filled.push(&fallback);
                } else {
                    filled[0] = &fallback;
                }
            }
        }
        self.warnings
            .push(Warning::new(code, line, from, &filled).on_token(nr));
        self.warned.insert(nr);
        true
    }

    /// Record a fatal warning on a token and return the stop error
    ///
    /// An earlier warning on the same token is replaced.
    pub fn stop(&mut self, code: Code, nr: usize, exhibits: &[&str]) -> LintError {
        if self.warned.remove(&nr) {
            self.warnings.retain(|w| w.token != Some(nr));
        }
        self.warn(code, nr, exhibits);
        match self.warnings.last() {
            Some(w) if w.token == Some(nr) => LintError::stop(w.clone()),
            _ => LintError::Internal(format!("stop on missing token {nr}")),
        }
    }

    /// Record a fatal warning at a position and return the stop error
    pub fn stop_at(&mut self, code: Code, line: usize, column: usize, exhibits: &[&str]) -> LintError {
        let warning = Warning::new(code, line, column, exhibits);
        self.warnings.push(warning.clone());
        LintError::stop(warning)
    }

    /// True if any warning was recorded on the token
    pub fn has_warning(&self, nr: usize) -> bool {
        self.warned.contains(&nr)
    }

    /// Make room in the layout table for every token
    pub fn sync_meta(&mut self) {
        self.meta.resize(self.tokens.len(), TokenMeta::default());
    }

    /// Mutable layout facts for a token
    ///
    /// Synthetic token numbers outside the list get a scratch entry.
    pub fn meta_mut(&mut self, nr: usize) -> &mut TokenMeta {
        if nr >= self.meta.len() {
            self.meta.resize(nr + 1, TokenMeta::default());
        }
        &mut self.meta[nr]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_tokens(ids: &[&str]) -> Context {
        let mut ctx = Context::new(Options::default(), &[]);
        for (nr, id) in ids.iter().enumerate() {
            ctx.tokens.push(Token::new(nr, *id, 0, nr * 2, nr * 2 + 1));
        }
        ctx
    }

    #[test]
    fn test_language_globals_are_predeclared() {
        let ctx = Context::new(Options::default(), &["extra".to_string()]);
        assert!(ctx.declared_globals.contains("Math"));
        assert!(ctx.declared_globals.contains("extra"));
        assert!(!ctx.declared_globals.contains("document"));
    }

    #[test]
    fn test_preset_globals_follow_options() {
        let ctx = Context::new(Options::from_map([("browser", true)]), &[]);
        assert!(ctx.declared_globals.contains("document"));
    }

    #[test]
    fn test_warn_once_per_token() {
        let mut ctx = with_tokens(&["a", "b"]);
        assert!(ctx.warn(Code::UnexpectedA, 0, &[]));
        assert!(!ctx.warn(Code::UnusedA, 0, &[]));
        assert_eq!(ctx.warnings.len(), 1);
        assert_eq!(ctx.warnings[0].a.as_deref(), Some("a"));
    }

    #[test]
    fn test_stop_replaces_earlier_warning() {
        let mut ctx = with_tokens(&["a", "b"]);
        ctx.warn(Code::UnexpectedA, 1, &[]);
        ctx.warn(Code::UnexpectedA, 0, &[]);
        let err = ctx.stop(Code::UnexpectedVar, 1, &[]);
        assert!(err.is_stop());
        assert_eq!(ctx.warnings.len(), 2);
        assert_eq!(ctx.warnings[1].code, Code::UnexpectedVar);
        assert_eq!(ctx.warnings[1].column, 2);
    }

    #[test]
    fn test_empty_first_exhibit_uses_artifact() {
        let mut ctx = with_tokens(&["x"]);
        ctx.warn(Code::ExpectedAB, 0, &["", "y"]);
        assert_eq!(ctx.warnings[0].message, "Expected 'x' and instead saw 'y'.");
    }
}
