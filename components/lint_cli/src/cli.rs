//! Command-line arguments

use crate::error::{CliError, CliResult};
use clap::{ArgAction, Parser};
use core_types::Options;

/// Corten Lint: static analysis for JavaScript source files
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "corten-lint")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Source files to analyze
    #[arg(required = true)]
    pub files: Vec<String>,

    /// Set an option, as `name` or `name=true|false` (repeatable)
    #[arg(short, long = "option", value_name = "NAME[=BOOL]")]
    pub options: Vec<String>,

    /// Allow an extra global name (repeatable)
    #[arg(short, long = "global", value_name = "NAME")]
    pub globals: Vec<String>,

    /// Print each report as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the canonical /*property*/ directive for each file
    #[arg(long)]
    pub property: bool,

    /// Increase logging verbosity (-v: debug, -vv+: trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Create a CLI value that analyzes one file with default settings
    ///
    /// # Example
    /// ```
    /// use lint_cli::Cli;
    ///
    /// let cli = Cli::with_file("app.js");
    /// assert_eq!(cli.files, vec!["app.js".to_string()]);
    /// assert!(!cli.json);
    /// ```
    pub fn with_file(file: impl Into<String>) -> Self {
        Self {
            files: vec![file.into()],
            options: Vec::new(),
            globals: Vec::new(),
            json: false,
            property: false,
            verbose: 0,
        }
    }

    /// Build the option set from the `--option` flags
    ///
    /// Unlike options passed to the analyzer directly, an unknown name here
    /// is an error.
    pub fn analysis_options(&self) -> CliResult<Options> {
        let mut options = Options::default();
        for flag in &self.options {
            let (name, value) = match flag.split_once('=') {
                Some((name, "true")) => (name, true),
                Some((name, "false")) => (name, false),
                Some(_) => return Err(CliError::BadOption(flag.clone())),
                None => (flag.as_str(), true),
            };
            options
                .set_named(name, value)
                .map_err(|_| CliError::BadOption(flag.clone()))?;
        }
        Ok(options)
    }

    /// Default log filter for the verbosity level
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}
