//! Property tests for whole analyses

use analyzer::analyze;
use core_types::Options;
use proptest::prelude::*;
use std::collections::HashSet;

proptest! {
    #[test]
    fn test_analysis_is_idempotent(text in "[a-z(){};=+ \\n\"0-9.,\\[\\]]{0,60}") {
        let first = analyze(text.as_str(), &Options::default(), &[]);
        let second = analyze(text.as_str(), &Options::default(), &[]);
        prop_assert_eq!(first.warnings, second.warnings);
        prop_assert_eq!(first.tree, second.tree);
        prop_assert_eq!(first.stop, second.stop);
    }

    #[test]
    fn test_warnings_are_sorted(text in "[a-z(){};=+ \\n0-9.,]{0,80}") {
        let report = analyze(text.as_str(), &Options::default(), &[]);
        for pair in report.warnings.windows(2) {
            prop_assert!((pair[0].line, pair[0].column) <= (pair[1].line, pair[1].column));
        }
    }

    #[test]
    fn test_one_warning_per_token(text in "[a-z(){};=+!? \\n0-9.,]{0,80}") {
        let report = analyze(text.as_str(), &Options::default(), &[]);
        let mut seen = HashSet::new();
        for token in report.warnings.iter().filter_map(|w| w.token) {
            prop_assert!(seen.insert(token), "token {} warned twice", token);
        }
    }

    #[test]
    fn test_ok_means_no_warnings(text in "[a-z;= \\n0-9]{0,40}") {
        let report = analyze(text.as_str(), &Options::default(), &[]);
        prop_assert_eq!(report.ok, report.warnings.is_empty() && !report.stop);
    }
}
