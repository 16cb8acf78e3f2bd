//! Whitespace auditor
//!
//! Walks adjacent pairs of non-comment tokens and checks the space between
//! them. Brackets open either a closed form, with the contents on the same
//! line as the opener, or an open form, with each item on its own line
//! indented four columns past the enclosing margin. Continuation lines of
//! an expression are indented eight columns.

use core_types::Code;
use parser::{Arity, Context};

/// Operators that want one space on each side
const SPACE_OPS: [&str; 32] = [
    "!=", "!==", "%", "%=", "&", "&=", "&&", "*", "*=", "+=", "-=", "/", "/=", "<", "<=", "<<",
    "<<=", "=", "==", "===", "=>", ">", ">=", ">>", ">>=", ">>>", ">>>=", "^", "^=", "|", "|=",
    "||",
];

/// The closer matching an opener
fn closer_of(id: &str) -> Option<&'static str> {
    match id {
        "(" => Some(")"),
        "[" => Some("]"),
        "{" | "${" => Some("}"),
        _ => None,
    }
}

/// The facts about one token the auditor looks at
#[derive(Debug, Clone, Default)]
struct Mark {
    nr: Option<usize>,
    id: String,
    line: usize,
    from: usize,
    thru: usize,
    identifier: bool,
    arity: Option<Arity>,
    statement: bool,
    label: bool,
    open: bool,
    free: bool,
}

impl Mark {
    /// The pseudo-token standing before the first real token
    fn global() -> Self {
        Self {
            id: "(global)".to_string(),
            ..Self::default()
        }
    }

    fn of(ctx: &Context, nr: usize) -> Self {
        let token = &ctx.tokens[nr];
        let meta = ctx.meta.get(nr).cloned().unwrap_or_default();
        Self {
            nr: Some(nr),
            id: token.id.clone(),
            line: token.line,
            from: token.from,
            thru: token.thru,
            identifier: token.identifier,
            arity: meta.arity,
            statement: meta.statement,
            label: meta.label,
            open: meta.open,
            free: meta.free,
        }
    }

    fn is(&self, arity: Arity) -> bool {
        self.arity == Some(arity)
    }

    fn is_word_like(&self) -> bool {
        self.identifier || self.id == "(string)" || self.id == "(number)"
    }

    fn is_additive(&self) -> bool {
        self.is(Arity::Binary) && (self.id == "+" || self.id == "-")
    }
}

/// Layout state saved when a bracket opens
#[derive(Debug, Clone)]
struct Frame {
    closer: &'static str,
    free: bool,
    margin: usize,
    open: bool,
    opening: bool,
}

struct Auditor<'c> {
    ctx: &'c mut Context,
    closer: &'static str,
    free: bool,
    margin: usize,
    comments_skipped: usize,
    open: bool,
    opening: bool,
    stack: Vec<Frame>,
    left: Mark,
    right: Mark,
}

/// Check the spacing and indentation of every token
pub fn audit(ctx: &mut Context) {
    let mut auditor = Auditor {
        ctx,
        closer: "(end)",
        free: false,
        margin: 0,
        comments_skipped: 0,
        open: true,
        opening: true,
        stack: Vec::new(),
        left: Mark::global(),
        right: Mark::global(),
    };
    auditor.run();
}

impl Auditor<'_> {
    fn run(&mut self) {
        for nr in 0..self.ctx.tokens.len() {
            self.right = Mark::of(self.ctx, nr);
            if self.right.id == "(comment)" || self.right.id == "(end)" {
                self.comments_skipped += 1;
                continue;
            }
            self.step();
            self.comments_skipped = 0;
            self.left = std::mem::take(&mut self.right);
        }
    }

    fn step(&mut self) {
        if let Some(new_closer) = closer_of(&self.left.id) {
            if new_closer != self.right.id {
                self.enter_bracket(new_closer);
            } else if self.left.line == self.right.line {
                self.no_space();
            } else {
                self.at_margin(0);
            }
        } else if self.right.statement {
            if self.left.id == "else" {
                self.one_space_only();
            } else {
                self.at_margin(0);
                self.open = false;
            }
        } else if self.right.id == self.closer {
            self.pop();
            if self.opening && self.right.id != ";" {
                self.at_margin(0);
            } else {
                self.no_space_only();
            }
        } else {
            self.between();
        }
    }

    fn enter_bracket(&mut self, new_closer: &'static str) {
        self.opening = self.left.open || self.left.line != self.right.line;
        self.stack.push(Frame {
            closer: self.closer,
            free: self.free,
            margin: self.margin,
            open: self.open,
            opening: self.opening,
        });
        self.closer = new_closer;
        if self.opening {
            self.free = self.closer == ")" && self.left.free;
            self.open = true;
            self.margin += 4;
            if self.right.label {
                if self.right.from != 0 {
                    self.expected_at(0);
                }
            } else {
                self.at_margin(0);
            }
        } else {
            if self.right.statement || self.right.label {
                self.warn_pair(Code::ExpectedLineBreakAB);
            }
            self.free = false;
            self.open = false;
            self.no_space_only();
        }
    }

    fn pop(&mut self) {
        if let Some(frame) = self.stack.pop() {
            self.closer = frame.closer;
            self.free = frame.free;
            self.margin = frame.margin;
            self.open = frame.open;
            self.opening = frame.opening;
        }
    }

    /// Left is not an opener and right is not a closer
    fn between(&mut self) {
        let (left, right) = (&self.left, &self.right);
        if right.label {
            if right.from != 0 {
                self.expected_at(0);
            }
        } else if left.id == "," {
            if !self.open || ((self.free || self.closer == "]") && left.line == right.line) {
                self.one_space();
            } else {
                self.at_margin(0);
            }
        } else if right.is(Arity::Ternary) {
            if right.id == "?" {
                if self.open {
                    self.at_margin(0);
                } else if let Some(nr) = right.nr {
                    self.ctx.warn(Code::UseOpen, nr, &[]);
                }
            }
        } else if right.is(Arity::Binary) && right.id == "(" && self.free {
            self.no_space();
        } else if matches!(left.id.as_str(), "." | "?." | "...")
            || matches!(right.id.as_str(), "," | ";" | ":")
            || (right.is(Arity::Binary) && (right.id == "(" || right.id == "["))
            || (right.is(Arity::Function) && left.id != "function")
            || right.id == "."
            || right.id == "?."
        {
            self.no_space_only();
        } else if left.id == ";" {
            if self.open {
                self.at_margin(0);
            }
        } else if left.is(Arity::Ternary)
            || matches!(
                left.id.as_str(),
                "case" | "catch" | "else" | "finally" | "while"
            )
            || matches!(right.id.as_str(), "catch" | "else" | "finally")
            || (right.id == "while" && !right.statement)
            || (left.id == ")" && right.id == "{")
        {
            self.one_space_only();
        } else if SPACE_OPS.contains(&left.id.as_str())
            || SPACE_OPS.contains(&right.id.as_str())
            || left.is_additive()
            || right.is_additive()
            || left.id == "function"
            || left.id == ":"
            || (left.is_word_like() && right.is_word_like())
            || (left.is(Arity::Statement) && right.id != ";")
        {
            self.one_space();
        } else if left.is(Arity::Unary) && left.id != "`" {
            self.no_space_only();
        }
    }

    fn warn_pair(&mut self, code: Code) {
        let Some(nr) = self.right.nr else {
            return;
        };
        let left = self.left.nr.map(|n| self.ctx.artifact(n)).unwrap_or_default();
        let right = self.ctx.artifact(nr);
        self.ctx.warn(code, nr, &[&left, &right]);
    }

    fn expected_at(&mut self, at: usize) {
        let Some(nr) = self.right.nr else {
            return;
        };
        let artifact = self.ctx.artifact(nr);
        let at = (self.ctx.fudge + at).to_string();
        let column = self.ctx.artifact_column(nr);
        self.ctx
            .warn(Code::ExpectedAAtBC, nr, &[&artifact, &at, &column]);
    }

    fn at_margin(&mut self, fit: usize) {
        let at = self.margin + fit;
        if self.right.from != at {
            self.expected_at(at);
        }
    }

    fn no_space_only(&mut self) {
        let (left, right) = (&self.left, &self.right);
        let adjacent = left.nr.is_some_and(|n| Some(n + 1) == right.nr);
        if adjacent && (left.line != right.line || left.thru != right.from) {
            self.warn_pair(Code::UnexpectedSpaceAB);
        }
    }

    fn no_space(&mut self) {
        if self.left.line == self.right.line {
            if self.left.thru != self.right.from && self.comments_skipped == 0 {
                self.warn_pair(Code::UnexpectedSpaceAB);
            }
        } else if self.open {
            let at = if self.free {
                self.margin
            } else {
                self.margin + 8
            };
            if self.right.from < at {
                self.expected_at(at);
            }
        } else if self.right.from != self.margin + 8 {
            self.expected_at(self.margin + 8);
        }
    }

    fn one_space_only(&mut self) {
        if self.left.line != self.right.line || self.left.thru + 1 != self.right.from {
            self.warn_pair(Code::ExpectedSpaceAB);
        }
    }

    fn one_space(&mut self) {
        if self.left.line == self.right.line || !self.open {
            if self.left.thru + 1 != self.right.from && self.comments_skipped == 0 {
                self.warn_pair(Code::ExpectedSpaceAB);
            }
        } else if self.right.from != self.margin {
            self.expected_at(self.margin);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{Options, Source};
    use parser::{parse, tokenize};

    fn audited(text: &str) -> Vec<(Code, usize, usize)> {
        let mut ctx = Context::new(Options::default(), &[]);
        ctx.lines = Source::from(text).into_lines();
        tokenize(&mut ctx).unwrap();
        let (_, outcome) = parse(&mut ctx);
        outcome.unwrap();
        audit(&mut ctx);
        ctx.warnings
            .iter()
            .map(|w| (w.code, w.line, w.column))
            .collect()
    }

    #[test]
    fn test_well_formed_program() {
        let text = "function f(a, b) {\n    if (a) {\n        return b;\n    }\n    return a;\n}\nf(1, 2);\n";
        assert!(audited(text).is_empty());
    }

    #[test]
    fn test_missing_space_around_operator() {
        assert_eq!(audited("let a =1;\n"), vec![(Code::ExpectedSpaceAB, 0, 7)]);
    }

    #[test]
    fn test_space_before_semicolon() {
        assert_eq!(
            audited("let a = 1 ;\n"),
            vec![(Code::UnexpectedSpaceAB, 0, 10)]
        );
    }

    #[test]
    fn test_statement_off_margin() {
        let found = audited("function f() {\n  return 1;\n}\nf();\n");
        assert_eq!(found, vec![(Code::ExpectedAAtBC, 1, 2)]);
    }

    #[test]
    fn test_space_inside_closed_brackets() {
        assert_eq!(
            audited("let a = [ 1];\n"),
            vec![(Code::UnexpectedSpaceAB, 0, 10)]
        );
    }

    #[test]
    fn test_open_array_form() {
        assert!(audited("let a = [\n    1,\n    2\n];\n").is_empty());
    }

    #[test]
    fn test_expected_at_message_uses_fudged_columns() {
        let mut ctx = Context::new(Options::from_map([("fudge", true)]), &[]);
        ctx.lines = Source::from("function f() {\n  return 1;\n}\nf();\n").into_lines();
        tokenize(&mut ctx).unwrap();
        parse(&mut ctx).1.unwrap();
        audit(&mut ctx);
        let warning = &ctx.warnings[0];
        assert_eq!(warning.b.as_deref(), Some("5"));
        assert_eq!(warning.c.as_deref(), Some("3"));
    }
}
