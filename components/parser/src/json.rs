//! Strict JSON parsing
//!
//! Used when the first token of a file is `{` or `[`. Only double-quoted
//! strings, JSON numbers, `true`, `false` and `null` are accepted as
//! scalars; a leading `-` is the only operator.

use crate::ast::{Node, NodeKind, Property};
use crate::parser::Parser;
use crate::patterns::Pattern;
use crate::token::Arity;
use core_types::{Code, LintResult};
use std::collections::HashSet;

impl Parser<'_> {
    /// Parse the whole token list as one JSON value
    pub(crate) fn parse_json(&mut self) -> LintResult<Node> {
        self.next = self.dispense()?;
        let value = self.json_value()?;
        self.expect("(end)")?;
        Ok(value)
    }

    fn json_value(&mut self) -> LintResult<Node> {
        match self.next_id() {
            "{" => self.json_object(),
            "[" => self.json_array(),
            "true" | "false" | "null" => {
                self.advance()?;
                Ok(Node::new(self.token, NodeKind::Constant))
            }
            "(number)" => {
                self.json_number_check(self.next)?;
                self.advance()?;
                Ok(Node::new(self.token, NodeKind::Number))
            }
            "(string)" => {
                self.json_quote_check(self.next);
                self.advance()?;
                Ok(Node::new(self.token, NodeKind::String))
            }
            "-" => {
                let negative = self.next;
                self.set_arity(negative, Arity::Unary);
                self.expect("-")?;
                self.expect("(number)")?;
                let number = self.token;
                self.json_number_check(number)?;
                Ok(Node::new(
                    negative,
                    NodeKind::Unary {
                        operand: Box::new(Node::new(number, NodeKind::Number)),
                    },
                ))
            }
            _ => Err(self.stop(Code::UnexpectedA, self.next, &[])),
        }
    }

    fn json_object(&mut self) -> LintResult<Node> {
        let brace = self.next;
        self.expect("{")?;
        let mut seen = HashSet::new();
        let mut properties = Vec::new();
        if self.next_id() != "}" {
            loop {
                self.json_quote_check(self.next);
                self.expect("(string)")?;
                let key = self.token;
                let name = self.value(key).unwrap_or_default().to_string();
                if seen.contains(&name) {
                    self.ctx.warn(Code::DuplicateA, key, &[]);
                } else if name == "__proto__" {
                    self.ctx.warn(Code::BadPropertyA, key, &[]);
                } else {
                    seen.insert(name);
                }
                self.expect(":")?;
                let value = self.json_value()?;
                properties.push(Property {
                    key,
                    value,
                    accessor: None,
                });
                if self.next_id() != "," {
                    break;
                }
                self.expect(",")?;
            }
        }
        self.expect_match("}", brace)?;
        Ok(Node::new(brace, NodeKind::Object { properties }))
    }

    fn json_array(&mut self) -> LintResult<Node> {
        let bracket = self.next;
        self.expect("[")?;
        let mut elements = Vec::new();
        if self.next_id() != "]" {
            loop {
                elements.push(self.json_value()?);
                if self.next_id() != "," {
                    break;
                }
                self.expect(",")?;
            }
        }
        self.expect_match("]", bracket)?;
        Ok(Node::new(bracket, NodeKind::Array { elements }))
    }

    fn json_quote_check(&mut self, nr: usize) {
        let quote = self.ctx.tokens.get(nr).and_then(|t| t.quote);
        if let Some(quote) = quote.filter(|&q| q != '"') {
            self.ctx.warn(Code::UnexpectedA, nr, &[&quote.to_string()]);
        }
    }

    fn json_number_check(&mut self, nr: usize) -> LintResult<()> {
        let text = self.value(nr).unwrap_or_default().to_string();
        if !Pattern::JsonNumber.is_match(&text)? {
            self.ctx.warn(Code::UnexpectedA, nr, &[]);
        }
        Ok(())
    }
}
