//! Source text accepted by the analyzer.
//!
//! Callers hand over either one string or a list of pre-split lines. Both
//! forms are normalized to a list of lines without terminators.

/// Program text to analyze.
///
/// # Examples
///
/// ```
/// use core_types::Source;
///
/// let lines = Source::from("a\r\nb\rc\n").into_lines();
/// assert_eq!(lines, vec!["a", "b", "c", ""]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A single string with `\n`, `\r\n` or `\r` line terminators
    Text(String),
    /// Lines that have already been split
    Lines(Vec<String>),
}

impl Source {
    /// Split into lines.
    ///
    /// Mixed terminators are allowed. A trailing terminator produces a final
    /// empty line.
    pub fn into_lines(self) -> Vec<String> {
        match self {
            Source::Lines(lines) => lines,
            Source::Text(text) => split_lines(&text),
        }
    }
}

fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                lines.push(std::mem::take(&mut current));
            }
            '\n' => lines.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    lines.push(current);
    lines
}

impl From<String> for Source {
    fn from(text: String) -> Self {
        Source::Text(text)
    }
}

impl From<&str> for Source {
    fn from(text: &str) -> Self {
        Source::Text(text.to_string())
    }
}

impl From<Vec<String>> for Source {
    fn from(lines: Vec<String>) -> Self {
        Source::Lines(lines)
    }
}

impl From<&[&str]> for Source {
    fn from(lines: &[&str]) -> Self {
        Source::Lines(lines.iter().map(|s| (*s).to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_one_empty_line() {
        assert_eq!(Source::from("").into_lines(), vec![String::new()]);
    }

    #[test]
    fn test_lines_pass_through() {
        let lines: &[&str] = &["let a;", "", "a = 1;"];
        assert_eq!(Source::from(lines).into_lines(), vec!["let a;", "", "a = 1;"]);
    }

    #[test]
    fn test_crlf_counts_once() {
        assert_eq!(Source::from("x\r\n\r\ny").into_lines(), vec!["x", "", "y"]);
    }
}
