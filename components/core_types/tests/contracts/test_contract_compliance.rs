//! Contract compliance tests for core_types
//!
//! These tests pin the public identifiers that reports expose, since
//! downstream tooling matches on them.

use core_types::{Code, Options, Warning};

#[cfg(test)]
mod code_contract_tests {
    use super::*;

    /// Contract: identifiers are stable strings
    #[test]
    fn test_well_known_identifiers() {
        for (code, name) in [
            (Code::UnexpectedVar, "unexpected_var"),
            (Code::UnusedA, "unused_a"),
            (Code::UninitializedA, "uninitialized_a"),
            (Code::TooLong, "too_long"),
            (Code::ExpectedAB, "expected_a_b"),
            (Code::UndeclaredA, "undeclared_a"),
            (Code::NumberIsNaN, "number_isNaN"),
            (Code::InternalError, "internal_error"),
        ] {
            assert_eq!(code.as_str(), name);
            assert_eq!(Code::from_name(name), Some(code));
        }
    }

    /// Contract: every code renders without leftover placeholders once all
    /// four exhibits are supplied
    #[test]
    fn test_templates_fully_supplant() {
        for code in Code::ALL {
            let w = Warning::new(*code, 0, 0, &["a", "b", "c", "d"]);
            assert!(!w.message.contains("{a}"), "{code}");
            assert!(!w.message.contains("{d}"), "{code}");
        }
    }
}

#[cfg(test)]
mod options_contract_tests {
    use super::*;

    /// Contract: option set is exactly the documented one
    #[test]
    fn test_option_count() {
        assert_eq!(Options::default().enabled().count(), 0);
        assert_eq!(core_types::OptionName::ALL.len(), 17);
    }
}
