//! File loading and the command driver

use crate::cli::Cli;
use crate::error::{CliError, CliResult};
use crate::render;
use analyzer::{analyze, Report};
use core_types::Options;
use std::io::Write;
use tracing::{debug, info};

/// Analyzes source text with a fixed option set and global list
#[derive(Debug, Clone, Default)]
pub struct Linter {
    options: Options,
    globals: Vec<String>,
}

impl Linter {
    /// Create a linter with the given options
    ///
    /// # Example
    /// ```
    /// use core_types::Options;
    /// use lint_cli::Linter;
    ///
    /// let linter = Linter::new(Options::default());
    /// assert!(!linter.lint_string("let a = b;\n").ok);
    /// ```
    pub fn new(options: Options) -> Self {
        Self {
            options,
            globals: Vec::new(),
        }
    }

    /// Allow extra global names
    pub fn with_globals(mut self, globals: Vec<String>) -> Self {
        self.globals = globals;
        self
    }

    /// Analyze text held in memory
    pub fn lint_string(&self, text: &str) -> Report {
        analyze(text, &self.options, &self.globals)
    }

    /// Read and analyze a file
    ///
    /// # Errors
    /// Returns `CliError::Io` if the file cannot be read
    pub fn lint_file(&self, path: &str) -> CliResult<Report> {
        let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_string(),
            source,
        })?;
        debug!(path, bytes = text.len(), "read source");
        Ok(self.lint_string(&text))
    }
}

/// Analyze every file named on the command line and write the reports
///
/// Returns true if every file was clean.
pub fn run(cli: &Cli, out: &mut impl Write) -> CliResult<bool> {
    let linter = Linter::new(cli.analysis_options()?).with_globals(cli.globals.clone());
    let mut clean = true;
    for file in &cli.files {
        let report = linter.lint_file(file)?;
        info!(file = %file, ok = report.ok, warnings = report.warnings.len(), "analyzed");
        clean &= report.ok;
        if cli.json {
            writeln!(out, "{}", render::json(&report)?)?;
        } else {
            write!(out, "{}", render::text(file, &report))?;
        }
        if cli.property {
            if let Some(directive) = report.property_directive() {
                write!(out, "{directive}")?;
            }
        }
    }
    Ok(clean)
}
