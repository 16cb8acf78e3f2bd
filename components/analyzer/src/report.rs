//! Analysis result

use core_types::{Options, Warning};
use parser::{Scope, Scopes, Token, Tree, GLOBAL};
use serde::Serialize;
use std::collections::BTreeMap;

/// Version tag carried by every report
pub const EDITION: &str = "2025-05-28";

/// Everything one analysis produced
///
/// A report is returned even when analysis stopped early; `tree` and
/// `tokens` then hold whatever was built before the stop.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// True if there are no warnings and analysis ran to completion
    pub ok: bool,
    /// True if a fatal diagnostic ended analysis early
    pub stop: bool,
    /// Diagnostics sorted by line, then column
    pub warnings: Vec<Warning>,
    /// Syntax tree, absent when a JSON parse stopped
    pub tree: Option<Tree>,
    /// Every token, comments included
    pub tokens: Vec<Token>,
    /// Scope and binding arena; scope 0 is the file
    pub scopes: Scopes,
    /// Exported names mapped to the token of the exported thing
    pub exports: BTreeMap<String, usize>,
    /// Module specifiers of static and dynamic imports
    pub froms: Vec<String>,
    /// True if the file used `import` or `export`
    pub module: bool,
    /// True if the file was read as JSON
    pub json: bool,
    /// Property names and how often each was seen
    pub property: BTreeMap<String, u32>,
    /// Directive comment tokens
    pub directives: Vec<Token>,
    /// Version tag
    pub edition: &'static str,
    /// Source lines
    pub lines: Vec<String>,
    /// The `#!` line, if the file had one
    pub shebang: Option<String>,
    /// Options in effect at the end of analysis
    pub option: Options,
}

impl Report {
    /// The file scope
    pub fn global(&self) -> &Scope {
        self.scopes.scope(GLOBAL)
    }

    /// Names declared at file level, sorted
    pub fn global_names(&self) -> Vec<String> {
        self.scopes.global_names()
    }

    /// Canonical `/*property*/` directive listing every property seen
    ///
    /// Names are sorted and wrapped so no line passes 80 columns. Returns
    /// `None` when no property was seen.
    pub fn property_directive(&self) -> Option<String> {
        if self.property.is_empty() {
            return None;
        }
        let mut text = String::from("/*property");
        let mut length = 1111;
        for (index, key) in self.property.keys().enumerate() {
            if index > 0 {
                text.push(',');
                length += 2;
            }
            if length + key.len() >= 80 {
                length = 4;
                text.push_str("\n   ");
            }
            text.push(' ');
            text.push_str(key);
            length += key.len();
        }
        text.push_str("\n*/\n");
        Some(text)
    }
}
