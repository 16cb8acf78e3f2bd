//! Tokens and the layout side table
//!
//! A [`Token`] is immutable once the lexer has made it. Facts learned while
//! parsing that the whitespace auditor needs later (how a token was used, and
//! whether a bracket opened a multi-line form) live in a parallel
//! [`TokenMeta`] table indexed by token number.

use serde::Serialize;

/// Kind of directive comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectiveKind {
    /// `/*jslint ...*/` sets options
    Jslint,
    /// `/*property ...*/` registers property names
    Property,
    /// `/*global ...*/` predeclares globals
    Global,
}

impl DirectiveKind {
    /// Parse the directive word at the start of a comment
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "jslint" => Some(DirectiveKind::Jslint),
            "property" => Some(DirectiveKind::Property),
            "global" => Some(DirectiveKind::Global),
            _ => None,
        }
    }

    /// The directive word
    pub fn as_str(self) -> &'static str {
        match self {
            DirectiveKind::Jslint => "jslint",
            DirectiveKind::Property => "property",
            DirectiveKind::Global => "global",
        }
    }
}

/// Token produced by the lexer
///
/// `id` is the lexeme for identifiers and punctuators, or a class name in
/// parens for literals: `(string)`, `(number)`, `(regexp)`, `(comment)` and
/// `(end)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    /// Sequence number in the token list
    pub nr: usize,
    /// Lexeme or literal class
    pub id: String,
    /// Zero-based line
    pub line: usize,
    /// Starting column
    pub from: usize,
    /// Column just past the token
    pub thru: usize,
    /// True for identifier-shaped tokens, including keywords
    pub identifier: bool,
    /// True for an identifier that follows `.`
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub dot: bool,
    /// Literal body: string contents, number text, regexp body, comment text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Opening quote of a string: `"`, `'` or `` ` ``
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<char>,
    /// Regexp flags in source order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<String>,
    /// Directive carried by a comment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directive: Option<DirectiveKind>,
}

impl Token {
    /// Create a token with no literal payload
    pub fn new(nr: usize, id: impl Into<String>, line: usize, from: usize, thru: usize) -> Self {
        Self {
            nr,
            id: id.into(),
            line,
            from,
            thru,
            identifier: false,
            dot: false,
            value: None,
            quote: None,
            flags: None,
            directive: None,
        }
    }

    /// True for `(comment)` tokens
    pub fn is_comment(&self) -> bool {
        self.id == "(comment)"
    }

    /// The text a diagnostic shows for this token
    ///
    /// Strings and numbers show their value; everything else shows its id.
    pub fn artifact(&self) -> &str {
        match self.id.as_str() {
            "(string)" | "(number)" => self.value.as_deref().unwrap_or(""),
            _ => &self.id,
        }
    }
}

/// How the parser used a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Arity {
    /// Identifier used as a variable reference
    Variable,
    /// Prefix operator or literal container
    Unary,
    /// Infix operator, call, member access or arrow
    Binary,
    /// `?` or `:` of a conditional
    Ternary,
    /// Assignment operator
    Assignment,
    /// Prefix `++`/`--`
    Pre,
    /// Postfix `++`/`--`
    Post,
    /// Statement keyword or block brace
    Statement,
    /// Opening paren of a parameter list
    Function,
}

/// Layout facts recorded by the parser for one token
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenMeta {
    /// Grammatical role, if the parser assigned one
    pub arity: Option<Arity>,
    /// First token of a statement
    pub statement: bool,
    /// Paren whose contents may align freely
    pub free: bool,
    /// Bracket whose contents must use the multi-line form
    pub open: bool,
    /// Token was enrolled as a statement label
    pub label: bool,
}

impl TokenMeta {
    /// True if the token was parsed with the given arity
    pub fn is(&self, arity: Arity) -> bool {
        self.arity == Some(arity)
    }
}
