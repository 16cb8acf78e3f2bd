//! Error types for the CLI

use thiserror::Error;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    /// A source file could not be read
    #[error("could not read '{path}': {source}")]
    Io {
        /// Path as given on the command line
        path: String,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// `--option` named an unknown option or gave a non-boolean value
    #[error("bad option '{0}'")]
    BadOption(String),

    /// Report could not be encoded as JSON
    #[error("could not encode report: {0}")]
    Json(#[from] serde_json::Error),

    /// Output could not be written
    #[error("could not write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
