//! Corten Lint CLI
//!
//! Entry point for the linter. Parses CLI arguments, installs the log
//! subscriber, and delegates to [`lint_cli::run`]. Exits with 0 when every
//! file is clean, 1 when any file has warnings, and 2 on usage or I/O
//! errors.

use clap::Parser as ClapParser;
use lint_cli::{run, Cli};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_directive())),
        )
        .with_writer(std::io::stderr)
        .init();

    let stdout = std::io::stdout();
    match run(&cli, &mut stdout.lock()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(2)
        }
    }
}
