//! Shared vocabulary of the linter: diagnostics, errors, options, and source.
//!
//! This crate provides the types every analysis stage speaks in, so the
//! lexer, parser, walker and whitespace auditor can all report through the
//! same [`Warning`] record.
//!
//! # Overview
//!
//! - [`Code`] - Stable diagnostic identifiers and their message templates
//! - [`Warning`] - One diagnostic with position and exhibits
//! - [`LintError`] - Fatal stop or internal failure
//! - [`Options`] / [`OptionName`] - Analysis switches and preset globals
//! - [`Source`] - Program text in either string or line form
//!
//! # Examples
//!
//! ```
//! use core_types::{Code, Options, Source, Warning};
//!
//! let lines = Source::from("let a = 1;\n").into_lines();
//! assert_eq!(lines.len(), 2);
//!
//! let options = Options::from_map([("white", true)]);
//! assert!(options.white);
//!
//! let warning = Warning::new(Code::UndeclaredA, 0, 4, &["b"]);
//! assert_eq!(warning.message, "Undeclared 'b'.");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod diagnostic;
mod error;
mod options;
mod source;

pub use diagnostic::{supplant, Code, Warning};
pub use error::{LintError, LintResult};
pub use options::{OptionName, Options, UnknownOption, LANGUAGE_GLOBALS, WEB_GLOBALS};
pub use source::Source;
