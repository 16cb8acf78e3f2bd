//! Grammar table
//!
//! Maps each token id to its parsing behavior: a left binding power and the
//! optional prefix (`nud`), infix (`led`) and statement (`fud`) handlers.
//! Handlers are plain enum values dispatched by the parser with `match`.
//!
//! The table is built once and shared by every analysis. Any id present in
//! the table is a reserved word for declarations.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Prefix handler kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nud {
    /// Literal or plain constant (`true`, `NaN`, a string...)
    Constant,
    /// `arguments`
    Arguments,
    /// `eval` and `Function`
    Eval,
    /// `import` used as an expression
    Import,
    /// `_` used as an expression
    Ignore,
    /// `isFinite`
    IsFinite,
    /// `isNaN`
    IsNaN,
    /// `null`
    Null,
    /// `this`
    This,
    /// `++x` and `--x`
    Pre,
    /// Generic prefix operator (`+ - ~ ! !! typeof`)
    Prefix,
    /// Array literal
    Array,
    /// `/=` where an expression should begin
    SlashAssign,
    /// `=>` without parameters
    FatArrow,
    /// `new`
    New,
    /// `void`
    Void,
    /// Function expression
    Function,
    /// Parenthesized expression or arrow parameter list
    Paren,
    /// Template literal
    Tick,
    /// Object literal
    Brace,
}

/// Infix handler kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Led {
    /// Assignment operators
    Assignment,
    /// Left-associative binary operator
    Infix,
    /// Right-associative binary operator
    Infixr,
    /// Call
    Call,
    /// `.` member access
    Dot,
    /// `?.` member access
    OptionalDot,
    /// `[` subscript
    Subscript,
    /// `=>` after an unwrapped parameter
    FatArrow,
    /// Tagged template
    Tick,
    /// `x++` and `x--`
    Post,
    /// `?` of a conditional
    Ternary,
}

/// Statement handler kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fud {
    /// Empty statement
    Semicolon,
    /// Naked block
    Block,
    /// `break`
    Break,
    /// `let` and `const`
    Let,
    /// `continue`
    Continue,
    /// `debugger`
    Debugger,
    /// `delete`
    Delete,
    /// `do`
    Do,
    /// `export`
    Export,
    /// `function` statement
    Function,
    /// `if`
    If,
    /// `import` statement
    Import,
    /// `return`
    Return,
    /// `throw`
    Throw,
    /// `try`
    Try,
    /// `var`
    Var,
    /// `while`
    While,
    /// Always rejected: `for`, `switch`, `with`
    Rejected,
}

/// One grammar table entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// Token id
    pub id: &'static str,
    /// Left binding power
    pub lbp: u32,
    /// Prefix handler
    pub nud: Option<Nud>,
    /// Infix handler
    pub led: Option<Led>,
    /// Statement handler
    pub fud: Option<Fud>,
    /// True for literal and constant names
    pub constant: bool,
}

struct Builder {
    table: HashMap<&'static str, Symbol>,
}

impl Builder {
    /// An existing entry keeps its binding power.
    fn symbol(&mut self, id: &'static str, bp: u32) -> &mut Symbol {
        self.table.entry(id).or_insert(Symbol {
            id,
            lbp: bp,
            nud: None,
            led: None,
            fud: None,
            constant: false,
        })
    }

    fn constant(&mut self, id: &'static str, nud: Nud) {
        let symbol = self.symbol(id, 0);
        symbol.constant = true;
        symbol.nud = Some(nud);
    }

    fn led(&mut self, id: &'static str, bp: u32, led: Led) {
        self.symbol(id, bp).led = Some(led);
    }

    fn nud(&mut self, id: &'static str, nud: Nud) {
        self.symbol(id, 0).nud = Some(nud);
    }

    fn stmt(&mut self, id: &'static str, fud: Fud) {
        self.symbol(id, 0).fud = Some(fud);
    }
}

static GRAMMAR: LazyLock<HashMap<&'static str, Symbol>> = LazyLock::new(build);

fn build() -> HashMap<&'static str, Symbol> {
    let mut g = Builder {
        table: HashMap::new(),
    };

    for id in [
        "}", ")", "]", ",", ";", ":", "*/", "await", "case", "catch", "class",
        "default", "else", "enum", "finally", "implements", "interface",
        "package", "private", "protected", "public", "static", "super",
        "switch", "void", "yield",
    ] {
        g.symbol(id, 0);
    }

    for id in ["(number)", "(regexp)", "(string)", "false", "Infinity", "NaN", "true", "undefined"] {
        g.constant(id, Nud::Constant);
    }
    g.constant("arguments", Nud::Arguments);
    g.constant("eval", Nud::Eval);
    g.constant("Function", Nud::Eval);
    g.constant("import", Nud::Import);
    g.constant("_", Nud::Ignore);
    g.constant("isFinite", Nud::IsFinite);
    g.constant("isNaN", Nud::IsNaN);
    g.constant("null", Nud::Null);
    g.constant("this", Nud::This);

    for id in [
        "=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<=", ">>=", ">>>=",
    ] {
        g.led(id, 20, Led::Assignment);
    }

    for (id, bp) in [
        ("??", 35),
        ("||", 40),
        ("&&", 50),
        ("|", 70),
        ("^", 80),
        ("&", 90),
        ("==", 100),
        ("===", 100),
        ("!=", 100),
        ("!==", 100),
        ("<", 110),
        (">", 110),
        ("<=", 110),
        (">=", 110),
        ("in", 110),
        ("instanceof", 110),
        ("<<", 120),
        (">>", 120),
        (">>>", 120),
        ("+", 130),
        ("-", 130),
        ("*", 140),
        ("/", 140),
        ("%", 140),
    ] {
        g.led(id, bp, Led::Infix);
    }
    g.led("**", 150, Led::Infixr);
    g.led("(", 160, Led::Call);
    g.led(".", 170, Led::Dot);
    g.led("?.", 170, Led::OptionalDot);
    g.led("[", 170, Led::Subscript);
    g.led("=>", 170, Led::FatArrow);
    g.led("`", 160, Led::Tick);
    g.led("++", 150, Led::Post);
    g.led("--", 150, Led::Post);

    g.nud("++", Nud::Pre);
    g.nud("--", Nud::Pre);
    for id in ["+", "-", "~", "!", "!!", "typeof"] {
        g.nud(id, Nud::Prefix);
    }
    g.nud("[", Nud::Array);
    g.nud("/=", Nud::SlashAssign);
    g.nud("=>", Nud::FatArrow);
    g.nud("new", Nud::New);
    g.nud("void", Nud::Void);
    g.nud("function", Nud::Function);
    g.nud("(", Nud::Paren);
    g.nud("`", Nud::Tick);
    g.nud("{", Nud::Brace);

    g.stmt(";", Fud::Semicolon);
    g.stmt("{", Fud::Block);
    g.stmt("break", Fud::Break);
    g.stmt("const", Fud::Let);
    g.stmt("continue", Fud::Continue);
    g.stmt("debugger", Fud::Debugger);
    g.stmt("delete", Fud::Delete);
    g.stmt("do", Fud::Do);
    g.stmt("export", Fud::Export);
    g.stmt("for", Fud::Rejected);
    g.stmt("function", Fud::Function);
    g.stmt("if", Fud::If);
    g.stmt("import", Fud::Import);
    g.stmt("let", Fud::Let);
    g.stmt("return", Fud::Return);
    g.stmt("switch", Fud::Rejected);
    g.stmt("throw", Fud::Throw);
    g.stmt("try", Fud::Try);
    g.stmt("var", Fud::Var);
    g.stmt("while", Fud::While);
    g.stmt("with", Fud::Rejected);

    g.led("?", 30, Led::Ternary);

    g.table
}

/// Look up a token id in the grammar table
pub fn symbol(id: &str) -> Option<&'static Symbol> {
    GRAMMAR.get(id)
}

/// True if `id` may not be used as a declared name
pub fn is_reserved(id: &str) -> bool {
    GRAMMAR.contains_key(id)
}

/// True if the id names a constant (literal or constant global)
pub fn is_constant_symbol(id: &str) -> bool {
    GRAMMAR.get(id).is_some_and(|s| s.constant)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_powers() {
        assert_eq!(symbol("=").map(|s| s.lbp), Some(20));
        assert_eq!(symbol("?").map(|s| s.lbp), Some(30));
        assert_eq!(symbol("??").map(|s| s.lbp), Some(35));
        assert_eq!(symbol("**").map(|s| s.lbp), Some(150));
        assert_eq!(symbol("(").map(|s| s.lbp), Some(160));
        assert_eq!(symbol(".").map(|s| s.lbp), Some(170));
    }

    #[test]
    fn test_first_registration_keeps_binding_power() {
        let plus = symbol("+").expect("plus is registered");
        assert_eq!(plus.lbp, 130);
        assert_eq!(plus.nud, Some(Nud::Prefix));
        assert_eq!(plus.led, Some(Led::Infix));

        let slash_assign = symbol("/=").expect("slash assign is registered");
        assert_eq!(slash_assign.lbp, 20);
        assert_eq!(slash_assign.nud, Some(Nud::SlashAssign));
    }

    #[test]
    fn test_reserved_words() {
        for id in ["var", "case", "yield", "import", "this", "_", "enum"] {
            assert!(is_reserved(id), "{id} should be reserved");
        }
        assert!(!is_reserved("foo"));
        assert!(!is_reserved("of"));
    }

    #[test]
    fn test_statement_and_expression_roles() {
        let function = symbol("function").expect("function is registered");
        assert_eq!(function.nud, Some(Nud::Function));
        assert_eq!(function.fud, Some(Fud::Function));
        assert!(symbol("in").is_some_and(|s| s.nud.is_none()));
        assert!(is_constant_symbol("null"));
        assert!(!is_constant_symbol("new"));
    }
}
