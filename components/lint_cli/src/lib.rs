//! Linter CLI Library
//!
//! Provides the [`Linter`] and supporting modules for the `corten-lint`
//! command: argument parsing, file loading, and report rendering.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod error;
pub mod linter;
pub mod render;

pub use cli::Cli;
pub use error::{CliError, CliResult};
pub use linter::{run, Linter};
