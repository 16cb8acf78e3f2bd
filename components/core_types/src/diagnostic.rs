//! Diagnostic codes, message templates, and the warning record.
//!
//! Every diagnostic the analyzer can emit is identified by a stable [`Code`].
//! A code maps to an English template with up to four substitution slots
//! (`{a}` through `{d}`). The engine only records the code and the slot
//! values; the rendered `message` is a convenience for renderers that do not
//! localize.

use serde::{Serialize, Serializer};
use std::fmt;

macro_rules! codes {
    ($($variant:ident => $name:literal, $template:literal;)*) => {
        /// Stable diagnostic identifier.
        ///
        /// The string form (see [`Code::as_str`]) is what appears in reports
        /// and is guaranteed not to change between releases.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Code {
            $(
                #[doc = $template]
                $variant,
            )*
        }

        impl Code {
            /// Every known code, in catalog order.
            pub const ALL: &'static [Code] = &[$(Code::$variant,)*];

            /// The stable string identifier of this code.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Code::$variant => $name,)*
                }
            }

            /// The English message template with `{a}`..`{d}` slots.
            pub fn template(self) -> &'static str {
                match self {
                    $(Code::$variant => $template,)*
                }
            }

            /// Look up a code by its string identifier.
            pub fn from_name(name: &str) -> Option<Code> {
                match name {
                    $($name => Some(Code::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

codes! {
    And => "and", "The '&&' subexpression should be wrapped in parens.";
    BadAssignmentA => "bad_assignment_a", "Bad assignment to '{a}'.";
    BadDirectiveA => "bad_directive_a", "Bad directive '{a}'.";
    BadGet => "bad_get", "A get function takes no parameters.";
    BadImportMetaA => "bad_import_meta_a", "Bad import.meta property '{a}'.";
    BadModuleNameA => "bad_module_name_a", "Bad module name '{a}'.";
    BadOptionA => "bad_option_a", "Bad option '{a}'.";
    BadPropertyA => "bad_property_a", "Bad property name '{a}'.";
    BadSet => "bad_set", "A set function takes one parameter.";
    DuplicateA => "duplicate_a", "Duplicate '{a}'.";
    EmptyBlock => "empty_block", "Empty block.";
    ExpectedA => "expected_a", "Expected '{a}'.";
    ExpectedAAtBC => "expected_a_at_b_c", "Expected '{a}' at column {b}, not column {c}.";
    ExpectedAB => "expected_a_b", "Expected '{a}' and instead saw '{b}'.";
    ExpectedABFromCD => "expected_a_b_from_c_d",
        "Expected '{a}' to match '{b}' from line {c} and instead saw '{d}'.";
    ExpectedABeforeB => "expected_a_before_b", "Expected '{a}' before '{b}'.";
    ExpectedANextAtB => "expected_a_next_at_b", "Expected '{a}' at column {b} on the next line.";
    ExpectedDigitsAfterA => "expected_digits_after_a", "Expected digits after '{a}'.";
    ExpectedFourDigits => "expected_four_digits", "Expected four digits after '\\u'.";
    ExpectedIdentifierA => "expected_identifier_a", "Expected an identifier and instead saw '{a}'.";
    ExpectedLineBreakAB => "expected_line_break_a_b", "Expected a line break between '{a}' and '{b}'.";
    ExpectedRegexpFactorA => "expected_regexp_factor_a", "Expected a regexp factor and instead saw '{a}'.";
    ExpectedSpaceAB => "expected_space_a_b", "Expected one space between '{a}' and '{b}'.";
    ExpectedStatementsA => "expected_statements_a", "Expected statements before '{a}'.";
    ExpectedStringA => "expected_string_a", "Expected a string and instead saw '{a}'.";
    ExpectedTypeStringA => "expected_type_string_a", "Expected a type string and instead saw '{a}'.";
    FreezeExports => "freeze_exports", "Expected 'Object.freeze('. All export values should be frozen.";
    FunctionInLoop => "function_in_loop", "Don't make functions within a loop.";
    InfixIn => "infix_in",
        "Unexpected 'in'. Compare with undefined, or use the hasOwnProperty method instead.";
    InternalError => "internal_error", "Internal error: {a}";
    LabelA => "label_a", "'{a}' is a statement label.";
    MisplacedA => "misplaced_a", "Place '{a}' at the outermost level.";
    MisplacedDirectiveA => "misplaced_directive_a", "Place the '/*{a}*/' directive before the first statement.";
    MissingBrowser => "missing_browser", "/*global*/ requires the Assume a browser option.";
    MissingM => "missing_m", "Expected 'm' flag on a multiline regular expression.";
    NakedBlock => "naked_block", "Naked block.";
    NestedComment => "nested_comment", "Nested comment.";
    NotLabelA => "not_label_a", "'{a}' is not a label.";
    NumberIsNaN => "number_isNaN", "Use Number.isNaN function to compare with NaN.";
    OutOfScopeA => "out_of_scope_a", "'{a}' is out of scope.";
    RedefinitionAB => "redefinition_a_b", "Redefinition of '{a}' from line {b}.";
    RequiredAOptionalB => "required_a_optional_b", "Required parameter '{a}' after optional parameter '{b}'.";
    ReservedA => "reserved_a", "Reserved name '{a}'.";
    SubscriptA => "subscript_a", "['{a}'] is better written in dot notation.";
    TodoComment => "todo_comment", "Unexpected TODO comment.";
    TooLong => "too_long", "Line is longer than 80 characters.";
    TooManyDigits => "too_many_digits", "Too many digits.";
    UnclosedComment => "unclosed_comment", "Unclosed comment.";
    UnclosedMega => "unclosed_mega", "Unclosed mega literal.";
    UnclosedString => "unclosed_string", "Unclosed string.";
    UndeclaredA => "undeclared_a", "Undeclared '{a}'.";
    UnexpectedA => "unexpected_a", "Unexpected '{a}'.";
    UnexpectedAAfterB => "unexpected_a_after_b", "Unexpected '{a}' after '{b}'.";
    UnexpectedABeforeB => "unexpected_a_before_b", "Unexpected '{a}' before '{b}'.";
    UnexpectedAtTopLevelA => "unexpected_at_top_level_a", "Expected '{a}' to be in a function.";
    UnexpectedCharA => "unexpected_char_a", "Unexpected character '{a}'.";
    UnexpectedComment => "unexpected_comment", "Unexpected comment.";
    UnexpectedDirectiveA => "unexpected_directive_a", "When using modules, don't use directive '/*{a}'.";
    UnexpectedExpressionA => "unexpected_expression_a", "Unexpected expression '{a}' in statement position.";
    UnexpectedLabelA => "unexpected_label_a", "Unexpected label '{a}'.";
    UnexpectedParens => "unexpected_parens", "Don't wrap function literals in parens.";
    UnexpectedSpaceAB => "unexpected_space_a_b", "Unexpected space between '{a}' and '{b}'.";
    UnexpectedStatementA => "unexpected_statement_a", "Unexpected statement '{a}' in expression position.";
    UnexpectedTrailingSpace => "unexpected_trailing_space", "Unexpected trailing space.";
    UnexpectedTypeofA => "unexpected_typeof_a", "Unexpected 'typeof'. Use '===' to compare directly with {a}.";
    UnexpectedVar => "unexpected_var", "Unexpected var, use let or const instead.";
    UninitializedA => "uninitialized_a", "Uninitialized '{a}'.";
    UnreachableA => "unreachable_a", "Unreachable '{a}'.";
    UnregisteredPropertyA => "unregistered_property_a", "Unregistered property name '{a}'.";
    UnusedA => "unused_a", "Unused '{a}'.";
    UseDouble => "use_double", "Use double quotes, not single quotes.";
    UseOpen => "use_open", "Wrap a ternary expression in parens, with a line break after the left paren.";
    UseSpaces => "use_spaces", "Use spaces, not tabs.";
    WeirdConditionA => "weird_condition_a", "Weird condition '{a}'.";
    WeirdExpressionA => "weird_expression_a", "Weird expression '{a}'.";
    WeirdLoop => "weird_loop", "Weird loop.";
    WeirdRelationA => "weird_relation_a", "Weird relation '{a}'.";
    WrapCondition => "wrap_condition", "Wrap the condition in parens.";
    WrapImmediate => "wrap_immediate",
        "Wrap an immediate function invocation in parentheses to assist the reader in understanding that the expression is the result of a function, and not the function itself.";
    WrapParameter => "wrap_parameter", "Wrap the parameter in parens.";
    WrapRegexp => "wrap_regexp", "Wrap this regexp in parens to avoid confusion.";
    WrapUnary => "wrap_unary", "Wrap the unary expression in parens.";
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Code {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Replace `{a}`..`{d}` placeholders in `template` with the given exhibits.
///
/// A placeholder whose slot is `None` (or that names an unknown slot) is left
/// untouched.
///
/// # Examples
///
/// ```
/// use core_types::supplant;
///
/// let text = supplant("Expected '{a}' and instead saw '{b}'.", &[Some("==="), Some("==")]);
/// assert_eq!(text, "Expected '===' and instead saw '=='.");
/// ```
pub fn supplant(template: &str, exhibits: &[Option<&str>]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find(['{', '}']) {
            Some(close) if after.as_bytes()[close] == b'}' => {
                let key = &after[..close];
                let slot = match key {
                    "a" => Some(0),
                    "b" => Some(1),
                    "c" => Some(2),
                    "d" => Some(3),
                    _ => None,
                };
                match slot.and_then(|i| exhibits.get(i).copied().flatten()) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// A single diagnostic produced by the analyzer.
///
/// `line` and `column` are zero-based; renderers add one when the `fudge`
/// option is set. The exhibits `a`..`d` hold the structured slot values the
/// message was rendered from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    /// Always `"LintError"`; lets a warning be told apart from foreign errors
    pub name: &'static str,
    /// Zero-based line number
    pub line: usize,
    /// Zero-based column number
    pub column: usize,
    /// Stable diagnostic code
    pub code: Code,
    /// Rendered English message
    pub message: String,
    /// Exhibit A
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a: Option<String>,
    /// Exhibit B
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b: Option<String>,
    /// Exhibit C
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c: Option<String>,
    /// Exhibit D
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
    /// Sequence number of the token this warning is attached to, if any
    #[serde(skip)]
    pub token: Option<usize>,
}

impl Warning {
    /// Build a warning at a position, rendering its message from the exhibits.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_types::{Code, Warning};
    ///
    /// let w = Warning::new(Code::UnusedA, 3, 4, &["x"]);
    /// assert_eq!(w.message, "Unused 'x'.");
    /// assert_eq!(w.a.as_deref(), Some("x"));
    /// assert!(w.b.is_none());
    /// ```
    pub fn new(code: Code, line: usize, column: usize, exhibits: &[&str]) -> Self {
        let slot = |i: usize| exhibits.get(i).map(|s| (*s).to_string());
        let refs: Vec<Option<&str>> = (0..4).map(|i| exhibits.get(i).copied()).collect();
        Self {
            name: "LintError",
            line,
            column,
            code,
            message: supplant(code.template(), &refs),
            a: slot(0),
            b: slot(1),
            c: slot(2),
            d: slot(3),
            token: None,
        }
    }

    /// Attach this warning to a token sequence number.
    pub fn on_token(mut self, nr: usize) -> Self {
        self.token = Some(nr);
        self
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} {} ({})", self.line, self.column, self.message, self.code)
    }
}
