//! Report rendering

use crate::error::CliResult;
use analyzer::Report;
use std::fmt::Write;

/// Plain-text listing of a report's warnings
///
/// Each warning shows its position, message and code, then the offending
/// source line. Positions start at one when the `fudge` option is set.
/// A clean report renders as nothing.
pub fn text(file: &str, report: &Report) -> String {
    let fudge = report.option.fudge();
    let mut output = String::new();
    for warning in &report.warnings {
        let _ = writeln!(
            output,
            "{file}:{}.{} {} [{}]",
            warning.line + fudge,
            warning.column + fudge,
            warning.message,
            warning.code
        );
        let source = report.lines.get(warning.line).map_or("", String::as_str);
        let _ = writeln!(output, "    {}", source.trim_end());
    }
    if report.stop {
        let _ = writeln!(output, "{file}: analysis stopped");
    }
    output
}

/// The whole report as JSON
pub fn json(report: &Report) -> CliResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use analyzer::analyze;
    use core_types::Options;

    #[test]
    fn test_clean_report_renders_nothing() {
        let report = analyze("let a = [1];\na.pop();\n", &Options::default(), &[]);
        assert!(report.ok, "{:?}", report.warnings);
        assert!(text("a.js", &report).is_empty());
    }

    #[test]
    fn test_warning_line() {
        let report = analyze("let a = b;\n", &Options::default(), &[]);
        let rendered = text("a.js", &report);
        assert!(rendered.starts_with("a.js:0.8 Undeclared 'b'. [undeclared_a]\n"));
        assert!(rendered.contains("    let a = b;\n"));
    }

    #[test]
    fn test_fudged_positions() {
        let options = Options::from_map([("fudge", true)]);
        let report = analyze("let a = b;\n", &options, &[]);
        assert!(text("a.js", &report).starts_with("a.js:1.9 "));
    }

    #[test]
    fn test_stop_is_reported() {
        let report = analyze("var a;\n", &Options::default(), &[]);
        assert!(text("a.js", &report).ends_with("a.js: analysis stopped\n"));
    }

    #[test]
    fn test_json_rendering() {
        let report = analyze("let a = b;\n", &Options::default(), &[]);
        let value: serde_json::Value = serde_json::from_str(&json(&report).unwrap()).unwrap();
        assert_eq!(value["ok"], false);
        assert_eq!(value["warnings"][0]["code"], "undeclared_a");
    }
}
