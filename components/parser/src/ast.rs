//! Abstract Syntax Tree node definitions
//!
//! Every node points back at the token that introduced it (`tok`), so
//! operator text, literal values and positions are read from the token list
//! instead of being copied into the tree. Statements and expressions share
//! one [`Node`] type; [`Node::arity`] tells them apart.

use crate::scope::{BindingId, ScopeId};
use crate::token::{Arity, Token};
use serde::Serialize;

/// Result of parsing one source unit
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tree {
    /// Statement list of a script or module
    Program(Vec<Node>),
    /// Single JSON value
    Json(Node),
}

/// A tree node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    /// Token that introduced the node
    pub tok: usize,
    /// Variant data
    pub kind: NodeKind,
    /// Expression was written inside parens
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub wrapped: bool,
    /// Preceded by `...`
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub ellipsis: bool,
    /// Statement unconditionally leaves the enclosing block
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disrupt: bool,
}

/// Node variants
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    /// Number literal; the text is the token value
    Number,
    /// String literal; the text and quote are on the token
    String,
    /// Regular expression literal
    Regexp,
    /// Constant name such as `true`, `undefined`, `null` or `this`
    Constant,
    /// Identifier reference
    Variable,
    /// Prefix operator: `+ - ~ ! !! typeof void new`
    Unary {
        /// Operand
        operand: Box<Node>,
    },
    /// Array literal
    Array {
        /// Elements in order
        elements: Vec<Node>,
    },
    /// Object literal
    Object {
        /// Members in order
        properties: Vec<Property>,
    },
    /// Untagged template literal
    Template {
        /// String part tokens
        strings: Vec<usize>,
        /// Substitutions
        exprs: Vec<Node>,
    },
    /// Tagged template
    TaggedTemplate {
        /// The tag expression
        tag: Box<Node>,
        /// String part tokens
        strings: Vec<usize>,
        /// Substitutions
        exprs: Vec<Node>,
    },
    /// Function statement, expression or method
    Function(Box<Function>),
    /// Arrow function
    Arrow(Box<Arrow>),
    /// Binary operator other than member access and call
    Binary {
        /// Left operand
        left: Box<Node>,
        /// Right operand
        right: Box<Node>,
    },
    /// Invocation
    Call {
        /// Callee
        callee: Box<Node>,
        /// Arguments in order
        args: Vec<Node>,
    },
    /// `.` or `?.` member access
    Member {
        /// Object expression
        object: Box<Node>,
        /// Property name token
        name: usize,
    },
    /// `[` subscript
    Index {
        /// Object expression
        object: Box<Node>,
        /// Subscript expression
        index: Box<Node>,
    },
    /// Assignment operator
    Assign {
        /// Assigned place
        target: Box<Node>,
        /// Assigned value
        value: Box<Node>,
    },
    /// `++x` or `--x`
    Pre {
        /// Operand
        operand: Box<Node>,
    },
    /// `x++` or `x--`
    Post {
        /// Operand
        operand: Box<Node>,
    },
    /// Conditional expression
    Ternary {
        /// Condition
        test: Box<Node>,
        /// Value when true
        consequent: Box<Node>,
        /// Value when false
        alternate: Box<Node>,
    },
    /// `let` or `const`
    Let {
        /// Declared names
        names: Vec<Declarator>,
        /// Source of a destructuring declaration
        init: Option<Box<Node>>,
    },
    /// `if` statement
    If {
        /// Condition
        test: Box<Node>,
        /// Then block
        consequent: Block,
        /// Else block or chained `if`
        alternate: Option<Box<Node>>,
    },
    /// Naked block
    Block(Block),
    /// `while` loop
    While {
        /// Condition
        test: Box<Node>,
        /// Loop body
        body: Block,
        /// Statement label
        label: Option<usize>,
    },
    /// `do ... while` loop
    DoWhile {
        /// Loop body
        body: Block,
        /// Condition
        test: Box<Node>,
        /// Statement label
        label: Option<usize>,
    },
    /// `return`
    Return {
        /// Returned value
        value: Option<Box<Node>>,
    },
    /// `throw`
    Throw {
        /// Thrown value
        value: Box<Node>,
    },
    /// `delete`
    Delete {
        /// Deleted member
        target: Box<Node>,
    },
    /// `break`
    Break {
        /// Target label token
        label: Option<usize>,
    },
    /// `continue`
    Continue,
    /// `debugger`
    Debugger,
    /// Lone `;`
    Empty,
    /// `try` statement
    Try {
        /// Guarded block
        block: Block,
        /// Catch clause
        catch: Option<Catch>,
        /// Finally block
        finally: Option<Block>,
    },
    /// `import` statement
    Import {
        /// Imported names
        names: Vec<Declarator>,
        /// Module specifier string token
        source: usize,
    },
    /// `export` statement
    Export {
        /// Exported values
        items: Vec<Node>,
    },
}

/// A braced statement list with its own scope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    /// The `{` token
    pub tok: usize,
    /// Scope owned by the block
    pub scope: ScopeId,
    /// Statements
    pub body: Vec<Node>,
    /// Last statement disrupts
    pub disrupt: bool,
}

/// A declared name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Declarator {
    /// Name token
    pub tok: usize,
    /// Binding, unless the name was rejected
    pub binding: Option<BindingId>,
    /// Initializer or default value
    pub init: Option<Node>,
    /// Rest element
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub ellipsis: bool,
}

/// Accessor marker on an object member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Accessor {
    /// `get name() {}`
    Get,
    /// `set name(v) {}`
    Set,
}

/// Object literal member
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    /// Key token
    pub key: usize,
    /// Member value
    pub value: Node,
    /// Accessor kind
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessor: Option<Accessor>,
}

/// Function parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Param {
    /// Plain, defaulted or rest parameter
    Name(Declarator),
    /// `{a, b}` or `[a, b]` pattern
    Destructure {
        /// The `{` or `[` token
        tok: usize,
        /// Names in the pattern
        names: Vec<Declarator>,
    },
}

impl Param {
    /// Token of the parameter or pattern
    pub fn tok(&self) -> usize {
        match self {
            Param::Name(d) => d.tok,
            Param::Destructure { tok, .. } => *tok,
        }
    }
}

/// Function statement, expression or method
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Function {
    /// Scope holding the parameters
    pub scope: ScopeId,
    /// Name token, for named functions
    pub name: Option<usize>,
    /// Binding of the name
    pub binding: Option<BindingId>,
    /// Name guessed for anonymous functions, or the method name
    pub display_name: String,
    /// Parameters in order
    pub params: Vec<Param>,
    /// Function body
    pub body: Block,
    /// Accessor kind for `get`/`set` methods
    pub accessor: Option<Accessor>,
    /// Parsed as a statement
    pub statement: bool,
    /// Object literal method shorthand
    pub method: bool,
}

/// Arrow function body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ArrowBody {
    /// `=> expr`
    Expression(Node),
    /// `=> { ... }`
    Block(Block),
}

/// Arrow function
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Arrow {
    /// Scope holding the parameters
    pub scope: ScopeId,
    /// Parameters in order
    pub params: Vec<Param>,
    /// Body
    pub body: ArrowBody,
}

/// Catch clause
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catch {
    /// The `catch` token
    pub tok: usize,
    /// Exception name token, unless ignored
    pub name: Option<usize>,
    /// Exception binding
    pub binding: Option<BindingId>,
    /// Handler block
    pub block: Block,
}

impl Node {
    /// Create a node with no flags set
    pub fn new(tok: usize, kind: NodeKind) -> Self {
        Self {
            tok,
            kind,
            wrapped: false,
            ellipsis: false,
            disrupt: false,
        }
    }

    /// The node's id: its token id, or `function` for methods
    pub fn id<'t>(&self, tokens: &'t [Token]) -> &'t str {
        match &self.kind {
            NodeKind::Function(_) => "function",
            _ => tokens.get(self.tok).map_or("", |t| t.id.as_str()),
        }
    }

    /// How the node was parsed
    ///
    /// Literals and constants have no arity.
    pub fn arity(&self) -> Option<Arity> {
        match &self.kind {
            NodeKind::Number | NodeKind::String | NodeKind::Regexp | NodeKind::Constant => None,
            NodeKind::Variable => Some(Arity::Variable),
            NodeKind::Unary { .. }
            | NodeKind::Array { .. }
            | NodeKind::Object { .. }
            | NodeKind::Template { .. } => Some(Arity::Unary),
            NodeKind::Function(f) if f.statement => Some(Arity::Statement),
            NodeKind::Function(_) => Some(Arity::Unary),
            NodeKind::Arrow(_)
            | NodeKind::Binary { .. }
            | NodeKind::Call { .. }
            | NodeKind::Member { .. }
            | NodeKind::Index { .. }
            | NodeKind::TaggedTemplate { .. } => Some(Arity::Binary),
            NodeKind::Assign { .. } => Some(Arity::Assignment),
            NodeKind::Pre { .. } => Some(Arity::Pre),
            NodeKind::Post { .. } => Some(Arity::Post),
            NodeKind::Ternary { .. } => Some(Arity::Ternary),
            NodeKind::Let { .. }
            | NodeKind::If { .. }
            | NodeKind::Block(_)
            | NodeKind::While { .. }
            | NodeKind::DoWhile { .. }
            | NodeKind::Return { .. }
            | NodeKind::Throw { .. }
            | NodeKind::Delete { .. }
            | NodeKind::Break { .. }
            | NodeKind::Continue
            | NodeKind::Debugger
            | NodeKind::Empty
            | NodeKind::Try { .. }
            | NodeKind::Import { .. }
            | NodeKind::Export { .. } => Some(Arity::Statement),
        }
    }

    /// True for literal nodes whose value is known while parsing
    pub fn is_literal_constant(&self, tokens: &[Token]) -> bool {
        match self.kind {
            NodeKind::Number | NodeKind::String | NodeKind::Regexp => true,
            NodeKind::Constant => matches!(
                self.id(tokens),
                "true" | "false" | "undefined" | "NaN" | "Infinity"
            ),
            _ => false,
        }
    }

    /// True if the node's token is identifier-shaped
    pub fn is_identifier(&self, tokens: &[Token]) -> bool {
        match &self.kind {
            NodeKind::Function(f) if f.method => false,
            _ => tokens.get(self.tok).is_some_and(|t| t.identifier),
        }
    }

    /// Literal string value of a string node or a constant template
    pub fn string_value<'t>(&self, tokens: &'t [Token]) -> Option<&'t str> {
        match &self.kind {
            NodeKind::String => tokens.get(self.tok).and_then(|t| t.value.as_deref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens() -> Vec<Token> {
        let mut t = vec![
            Token::new(0, "a", 0, 0, 1),
            Token::new(1, "+", 0, 2, 3),
            Token::new(2, "(string)", 0, 4, 7),
            Token::new(3, "true", 0, 8, 12),
        ];
        t[0].identifier = true;
        t[3].identifier = true;
        t[2].value = Some("x".into());
        t
    }

    #[test]
    fn test_binary_node_id_and_arity() {
        let tokens = tokens();
        let node = Node::new(
            1,
            NodeKind::Binary {
                left: Box::new(Node::new(0, NodeKind::Variable)),
                right: Box::new(Node::new(2, NodeKind::String)),
            },
        );
        assert_eq!(node.id(&tokens), "+");
        assert_eq!(node.arity(), Some(Arity::Binary));
    }

    #[test]
    fn test_literal_constants() {
        let tokens = tokens();
        assert!(Node::new(2, NodeKind::String).is_literal_constant(&tokens));
        assert!(Node::new(3, NodeKind::Constant).is_literal_constant(&tokens));
        assert!(!Node::new(0, NodeKind::Variable).is_literal_constant(&tokens));
        assert_eq!(Node::new(2, NodeKind::String).string_value(&tokens), Some("x"));
    }

    #[test]
    fn test_statement_arity() {
        assert_eq!(Node::new(0, NodeKind::Empty).arity(), Some(Arity::Statement));
        assert_eq!(Node::new(0, NodeKind::Number).arity(), None);
    }
}
