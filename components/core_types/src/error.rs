//! Error type shared by every stage of the analysis pipeline.
//!
//! Recoverable findings are not errors: they are [`Warning`]s collected by the
//! diagnostics sink. A [`LintError`] is reserved for conditions that make
//! further analysis of the current unit unreliable, and for internal
//! invariant violations.

use crate::Warning;
use thiserror::Error;

/// Reason a pipeline stage gave up.
///
/// # Examples
///
/// ```
/// use core_types::{Code, LintError, Warning};
///
/// let stop = LintError::stop(Warning::new(Code::UnclosedString, 0, 7, &[]));
/// assert!(stop.is_stop());
/// assert_eq!(stop.to_string(), "analysis stopped at 0:7: Unclosed string.");
/// ```
#[derive(Debug, Clone, Error)]
pub enum LintError {
    /// A fatal diagnostic; the warning has already been recorded.
    #[error("analysis stopped at {}:{}: {}", .0.line, .0.column, .0.message)]
    Stop(Box<Warning>),

    /// Something that should be impossible for any input.
    #[error("internal error: {0}")]
    Internal(String),
}

impl LintError {
    /// Wrap a fatal warning.
    pub fn stop(warning: Warning) -> Self {
        LintError::Stop(Box::new(warning))
    }

    /// True for fatal diagnostics, false for internal errors.
    pub fn is_stop(&self) -> bool {
        matches!(self, LintError::Stop(_))
    }
}

/// Result alias used throughout the pipeline.
pub type LintResult<T> = Result<T, LintError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Code;

    #[test]
    fn test_internal_error_display() {
        let err = LintError::Internal("token cursor past end".into());
        assert!(!err.is_stop());
        assert_eq!(err.to_string(), "internal error: token cursor past end");
    }

    #[test]
    fn test_stop_carries_warning() {
        let err = LintError::stop(Warning::new(Code::UnexpectedVar, 2, 0, &[]));
        match err {
            LintError::Stop(w) => assert_eq!(w.code, Code::UnexpectedVar),
            LintError::Internal(_) => panic!("expected stop"),
        }
    }
}
