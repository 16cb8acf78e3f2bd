//! Shape predicates and operator tables used by the walker

use parser::{Node, NodeKind, Token};
use std::collections::HashSet;

/// Operators that need the `bitwise` option
pub(crate) const BITWISE_OPS: [&str; 13] = [
    "~", "^", "^=", "&", "&=", "|", "|=", "<<", "<<=", ">>", ">>=", ">>>", ">>>=",
];

/// Comparison operators
pub(crate) const RELATION_OPS: [&str; 8] = ["!=", "!==", "==", "===", "<", "<=", ">", ">="];

/// Strings `typeof` can produce that may be compared against
pub(crate) const TYPEOF_RESULTS: [&str; 6] =
    ["boolean", "function", "number", "object", "string", "symbol"];

/// Constructors that must not be called with `new`
pub(crate) const PRIMITIVE_WRAPPERS: [&str; 4] = ["Boolean", "Number", "String", "Symbol"];

/// Members of `import.meta` that may be read
pub(crate) const IMPORT_META_NAMES: [&str; 3] = ["resolve", "url", "main"];

pub(crate) fn is_bitwise(id: &str) -> bool {
    BITWISE_OPS.contains(&id)
}

pub(crate) fn is_relation(id: &str) -> bool {
    RELATION_OPS.contains(&id)
}

/// Literals and functions that make no sense as an operand
pub(crate) fn is_weird(node: &Node) -> bool {
    matches!(
        node.kind,
        NodeKind::Regexp
            | NodeKind::Object { .. }
            | NodeKind::Arrow(_)
            | NodeKind::Function(_)
            | NodeKind::Array { .. }
    )
}

/// Expressions whose value is known without running the program
///
/// Literal constants are recognised from their token; derived constants
/// (folded unary and binary expressions, templates without live parts) are
/// recorded by the walker in a set keyed by node token.
pub(crate) struct Constants {
    derived: HashSet<usize>,
}

impl Constants {
    pub(crate) fn new() -> Self {
        Self {
            derived: HashSet::new(),
        }
    }

    pub(crate) fn mark(&mut self, node: &Node) {
        self.derived.insert(node.tok);
    }

    pub(crate) fn contains(&self, node: &Node, tokens: &[Token]) -> bool {
        node.is_literal_constant(tokens)
            || (matches!(node.kind, NodeKind::Constant) && node.id(tokens) == "null")
            || self.derived.contains(&node.tok)
    }

    /// String value of a string literal or a constant template
    fn string_of<'t>(&self, node: &Node, tokens: &'t [Token]) -> Option<&'t str> {
        match &node.kind {
            NodeKind::String => node.string_value(tokens),
            NodeKind::Template { strings, .. } if self.derived.contains(&node.tok) => strings
                .first()
                .and_then(|&nr| tokens.get(nr))
                .and_then(|t| t.value.as_deref()),
            _ => None,
        }
    }

    /// True if two expressions have the same structure and names
    pub(crate) fn are_similar(&self, a: &Node, b: &Node, tokens: &[Token]) -> bool {
        if let (NodeKind::Number, NodeKind::Number) = (&a.kind, &b.kind) {
            let value = |n: &Node| tokens.get(n.tok).and_then(|t| t.value.clone());
            return value(a) == value(b);
        }
        if let Some(a_string) = self.string_of(a, tokens) {
            return self.string_of(b, tokens) == Some(a_string);
        }
        if is_weird(a) || is_weird(b) {
            return false;
        }
        if a.arity() != b.arity() || a.id(tokens) != b.id(tokens) {
            return false;
        }
        let both = |x: &Node, y: &Node| self.are_similar(x, y, tokens);
        let all = |xs: &[Node], ys: &[Node]| {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| both(x, y))
        };
        match (&a.kind, &b.kind) {
            (
                NodeKind::Member { object, name },
                NodeKind::Member {
                    object: other,
                    name: other_name,
                },
            ) => {
                both(object, other)
                    && tokens.get(*name).map(|t| &t.id) == tokens.get(*other_name).map(|t| &t.id)
            }
            (NodeKind::Unary { operand }, NodeKind::Unary { operand: other })
            | (NodeKind::Pre { operand }, NodeKind::Pre { operand: other })
            | (NodeKind::Post { operand }, NodeKind::Post { operand: other }) => both(operand, other),
            (NodeKind::Template { exprs, .. }, NodeKind::Template { exprs: other, .. }) => {
                all(exprs, other)
            }
            (
                NodeKind::Binary { left, right },
                NodeKind::Binary {
                    left: other_left,
                    right: other_right,
                },
            )
            | (
                NodeKind::Assign {
                    target: left,
                    value: right,
                },
                NodeKind::Assign {
                    target: other_left,
                    value: other_right,
                },
            )
            | (
                NodeKind::Index {
                    object: left,
                    index: right,
                },
                NodeKind::Index {
                    object: other_left,
                    index: other_right,
                },
            ) => both(left, other_left) && both(right, other_right),
            (
                NodeKind::TaggedTemplate { tag, exprs, .. },
                NodeKind::TaggedTemplate {
                    tag: other_tag,
                    exprs: other_exprs,
                    ..
                },
            ) => both(tag, other_tag) && all(exprs, other_exprs),
            (NodeKind::Call { .. }, NodeKind::Call { .. }) => false,
            (
                NodeKind::Ternary {
                    test,
                    consequent,
                    alternate,
                },
                NodeKind::Ternary {
                    test: t,
                    consequent: c,
                    alternate: e,
                },
            ) => both(test, t) && both(consequent, c) && both(alternate, e),
            _ => true,
        }
    }
}
