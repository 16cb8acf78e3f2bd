//! Integration test suite for Corten Lint
//!
//! This crate provides integration tests that verify the components work
//! together correctly across component boundaries.

/// Re-export components for test convenience
pub mod components {
    pub use analyzer;
    pub use core_types;
    pub use lint_cli;
    pub use parser;
}
