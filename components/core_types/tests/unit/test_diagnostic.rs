//! Unit tests for the diagnostic catalog and the warning record

use core_types::{supplant, Code, LintError, Warning};

#[cfg(test)]
mod code_tests {
    use super::*;

    #[test]
    fn test_code_template_has_slots_for_named_exhibits() {
        for code in Code::ALL {
            let name = code.as_str();
            let template = code.template();
            for (suffix, slot) in [("_a", "{a}"), ("_b", "{b}"), ("_c", "{c}"), ("_d", "{d}")] {
                if name.ends_with(suffix) {
                    assert!(template.contains(slot), "{name} lacks {slot}");
                }
            }
        }
    }

    #[test]
    fn test_code_display_matches_name() {
        assert_eq!(Code::UnexpectedVar.to_string(), "unexpected_var");
        assert_eq!(Code::ExpectedAB.to_string(), "expected_a_b");
    }
}

#[cfg(test)]
mod warning_tests {
    use super::*;

    #[test]
    fn test_warning_new_fills_exhibits_in_order() {
        let w = Warning::new(Code::ExpectedABFromCD, 2, 0, &["}", "{", "1", "]"]);
        assert_eq!(
            w.message,
            "Expected '}' to match '{' from line 1 and instead saw ']'."
        );
        assert_eq!(w.name, "LintError");
        assert_eq!(w.d.as_deref(), Some("]"));
    }

    #[test]
    fn test_warning_without_exhibits() {
        let w = Warning::new(Code::TooLong, 0, 80, &[]);
        assert_eq!(w.message, "Line is longer than 80 characters.");
        assert_eq!(w.a, None);
        assert_eq!(w.token, None);
    }

    #[test]
    fn test_warning_on_token() {
        let w = Warning::new(Code::UnusedA, 0, 4, &["x"]).on_token(3);
        assert_eq!(w.token, Some(3));
    }

    #[test]
    fn test_supplant_is_literal_for_braces_in_values() {
        assert_eq!(supplant("'{a}'", &[Some("{b}")]), "'{b}'");
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn test_stop_keeps_the_warning() {
        let err = LintError::stop(Warning::new(Code::UnexpectedVar, 0, 0, &[]));
        match err {
            LintError::Stop(w) => assert_eq!(w.code, Code::UnexpectedVar),
            LintError::Internal(_) => panic!("expected a stop"),
        }
    }
}
