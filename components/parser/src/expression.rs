//! Expression handlers of the parser
//!
//! `parse_expression` is the Pratt loop. Every prefix and infix handler
//! named in the grammar table is implemented here, along with function,
//! arrow, object literal and template parsing.

use crate::ast::{Accessor, Arrow, ArrowBody, Declarator, Function, Node, NodeKind, Param, Property};
use crate::grammar::{self, Led, Nud};
use crate::parser::{BlockForm, Parser};
use crate::patterns::Pattern;
use crate::scope::{BindingId, Role, ScopeKind};
use crate::token::Arity;
use core_types::{Code, LintResult};
use std::collections::{BTreeSet, HashMap};

/// Node kind of a literal or constant token
fn literal_kind(id: &str) -> NodeKind {
    match id {
        "(number)" => NodeKind::Number,
        "(string)" => NodeKind::String,
        "(regexp)" => NodeKind::Regexp,
        _ => NodeKind::Constant,
    }
}

/// Who a function belongs to while its header is parsed
struct FunctionHead {
    tok: usize,
    name: Option<usize>,
    binding: Option<BindingId>,
    display_name: String,
    statement: bool,
    method: bool,
    accessor: Option<Accessor>,
}

impl Parser<'_> {
    /// Parse an expression whose operators bind tighter than `rbp`
    ///
    /// With `initial` the first token is already current.
    pub(crate) fn parse_expression(&mut self, rbp: u32, initial: bool) -> LintResult<Node> {
        if !initial {
            self.advance()?;
        }
        let nr = self.token;
        let nud = grammar::symbol(self.id(nr)).and_then(|s| s.nud);
        let mut left = match nud {
            Some(nud) => self.nud(nud)?,
            None if self.is_identifier(nr) => {
                self.set_arity(nr, Arity::Variable);
                Node::new(nr, NodeKind::Variable)
            }
            None => return Err(self.stop(Code::UnexpectedA, nr, &[])),
        };
        loop {
            let Some(symbol) = grammar::symbol(self.next_id()) else {
                break;
            };
            let Some(led) = symbol.led else {
                break;
            };
            if rbp >= symbol.lbp {
                break;
            }
            self.advance()?;
            left = self.led(led, symbol.lbp, left)?;
        }
        Ok(left)
    }

    fn nud(&mut self, nud: Nud) -> LintResult<Node> {
        let nr = self.token;
        let constant = Node::new(nr, literal_kind(self.id(nr)));
        match nud {
            Nud::Constant => Ok(constant),
            Nud::Arguments | Nud::Ignore => {
                self.ctx.warn(Code::UnexpectedA, nr, &[]);
                Ok(constant)
            }
            Nud::Eval => {
                if !self.ctx.options.eval {
                    self.ctx.warn(Code::UnexpectedA, nr, &[]);
                } else if self.next_id() != "(" {
                    let saw = self.ctx.artifact(self.next);
                    self.ctx.warn(Code::ExpectedABeforeB, self.next, &["(", &saw]);
                }
                Ok(constant)
            }
            Nud::Import => {
                if !matches!(self.next_id(), "(" | ".") {
                    self.ctx.warn(Code::UnexpectedA, self.next, &[]);
                }
                Ok(constant)
            }
            Nud::IsFinite => {
                self.ctx
                    .warn(Code::ExpectedAB, nr, &["Number.isFinite", "isFinite"]);
                Ok(constant)
            }
            Nud::IsNaN => {
                self.ctx.warn(Code::NumberIsNaN, nr, &[]);
                Ok(constant)
            }
            Nud::Null => {
                let allowed = self.ctx.options.null
                    || nr
                        .checked_sub(1)
                        .map_or(true, |previous| self.create_parens.contains(&previous));
                if !allowed {
                    self.ctx.warn(Code::UnexpectedA, nr, &[]);
                }
                Ok(constant)
            }
            Nud::This => {
                if !self.ctx.options.this {
                    self.ctx.warn(Code::UnexpectedA, nr, &[]);
                }
                Ok(constant)
            }
            Nud::Pre => {
                self.set_arity(nr, Arity::Pre);
                let operand = self.parse_expression(150, false)?;
                self.mutation_check(&operand);
                Ok(Node::new(
                    nr,
                    NodeKind::Pre {
                        operand: Box::new(operand),
                    },
                ))
            }
            Nud::Prefix => {
                self.set_arity(nr, Arity::Unary);
                let operand = self.parse_expression(150, false)?;
                Ok(Node::new(
                    nr,
                    NodeKind::Unary {
                        operand: Box::new(operand),
                    },
                ))
            }
            Nud::Array => {
                self.set_arity(nr, Arity::Unary);
                let mut elements = Vec::new();
                if self.next_id() != "]" {
                    loop {
                        elements.push(self.parse_element()?);
                        if self.next_id() != "," {
                            break;
                        }
                        self.expect(",")?;
                    }
                }
                self.expect("]")?;
                Ok(Node::new(nr, NodeKind::Array { elements }))
            }
            Nud::SlashAssign => Err(self.stop(Code::ExpectedAB, nr, &["/\\=", "/="])),
            Nud::FatArrow => Err(self.stop(Code::ExpectedABeforeB, nr, &["()", "=>"])),
            Nud::New => {
                self.set_arity(nr, Arity::Unary);
                let operand = self.parse_expression(160, false)?;
                if self.next_id() != "(" {
                    let saw = self.ctx.artifact(self.next);
                    self.ctx.warn(Code::ExpectedABeforeB, self.next, &["()", &saw]);
                }
                Ok(Node::new(
                    nr,
                    NodeKind::Unary {
                        operand: Box::new(operand),
                    },
                ))
            }
            Nud::Void => {
                self.set_arity(nr, Arity::Unary);
                self.ctx.warn(Code::UnexpectedA, nr, &[]);
                let operand = self.parse_expression(0, false)?;
                Ok(Node::new(
                    nr,
                    NodeKind::Unary {
                        operand: Box::new(operand),
                    },
                ))
            }
            Nud::Function => {
                self.set_arity(nr, Arity::Unary);
                self.parse_function(false)
            }
            Nud::Paren => {
                self.set_arity(nr, Arity::Unary);
                self.parse_paren()
            }
            Nud::Tick => {
                self.set_arity(nr, Arity::Unary);
                let (strings, exprs) = self.parse_template()?;
                Ok(Node::new(nr, NodeKind::Template { strings, exprs }))
            }
            Nud::Brace => {
                self.set_arity(nr, Arity::Unary);
                self.parse_object()
            }
        }
    }

    fn led(&mut self, led: Led, lbp: u32, left: Node) -> LintResult<Node> {
        let nr = self.token;
        match led {
            Led::Assignment => {
                self.set_arity(nr, Arity::Assignment);
                let value = self.parse_expression(19, false)?;
                if matches!(
                    value.arity(),
                    Some(Arity::Assignment | Arity::Pre | Arity::Post)
                ) {
                    self.ctx.warn(Code::UnexpectedA, value.tok, &[]);
                }
                self.mutation_check(&left);
                Ok(Node::new(
                    nr,
                    NodeKind::Assign {
                        target: Box::new(left),
                        value: Box::new(value),
                    },
                ))
            }
            Led::Infix | Led::Infixr => {
                self.set_arity(nr, Arity::Binary);
                let bp = if led == Led::Infixr { lbp - 1 } else { lbp };
                let right = self.parse_expression(bp, false)?;
                Ok(Node::new(
                    nr,
                    NodeKind::Binary {
                        left: Box::new(left),
                        right: Box::new(right),
                    },
                ))
            }
            Led::Call => {
                self.set_arity(nr, Arity::Binary);
                self.parse_call(left)
            }
            Led::Dot | Led::OptionalDot => {
                self.set_arity(nr, Arity::Binary);
                let name = self.next;
                if led == Led::OptionalDot || !self.dot_is_exempt(&left, name) {
                    self.left_check(&left, nr);
                }
                if !self.is_identifier(name) {
                    return Err(self.stop(Code::ExpectedIdentifierA, name, &[]));
                }
                self.advance()?;
                self.survey(name)?;
                Ok(Node::new(
                    nr,
                    NodeKind::Member {
                        object: Box::new(left),
                        name,
                    },
                ))
            }
            Led::Subscript => {
                self.set_arity(nr, Arity::Binary);
                let index = self.parse_expression(0, false)?;
                let name = match &index.kind {
                    NodeKind::String => Some(self.survey(index.tok)?),
                    NodeKind::Template { strings, exprs } if exprs.is_empty() => {
                        let text = strings
                            .first()
                            .and_then(|&part| self.value(part))
                            .unwrap_or_default()
                            .to_string();
                        if Pattern::Identifier.is_match(&text)? {
                            Some(self.tally(text, index.tok, false)?)
                        } else {
                            None
                        }
                    }
                    _ => None,
                };
                if let Some(name) = name {
                    if Pattern::Identifier.is_match(&name)? {
                        self.ctx.warn(Code::SubscriptA, index.tok, &[&name]);
                    }
                }
                self.left_check(&left, nr);
                self.expect("]")?;
                Ok(Node::new(
                    nr,
                    NodeKind::Index {
                        object: Box::new(left),
                        index: Box::new(index),
                    },
                ))
            }
            Led::FatArrow => Err(self.stop(Code::WrapParameter, left.tok, &[])),
            Led::Tick => {
                self.set_arity(nr, Arity::Binary);
                let (strings, exprs) = self.parse_template()?;
                self.left_check(&left, nr);
                Ok(Node::new(
                    nr,
                    NodeKind::TaggedTemplate {
                        tag: Box::new(left),
                        strings,
                        exprs,
                    },
                ))
            }
            Led::Post => {
                self.set_arity(nr, Arity::Post);
                self.mutation_check(&left);
                Ok(Node::new(
                    nr,
                    NodeKind::Post {
                        operand: Box::new(left),
                    },
                ))
            }
            Led::Ternary => {
                let consequent = self.parse_expression(20, false)?;
                self.expect(":")?;
                let colon = self.token;
                self.set_arity(colon, Arity::Ternary);
                self.set_arity(nr, Arity::Ternary);
                let alternate = self.parse_expression(10, false)?;
                Ok(Node::new(
                    nr,
                    NodeKind::Ternary {
                        test: Box::new(left),
                        consequent: Box::new(consequent),
                        alternate: Box::new(alternate),
                    },
                ))
            }
        }
    }

    /// Array element or call argument, possibly spread
    fn parse_element(&mut self) -> LintResult<Node> {
        let mut ellipsis = false;
        if self.next_id() == "..." {
            ellipsis = true;
            self.expect("...")?;
        }
        let mut element = self.parse_expression(10, false)?;
        element.ellipsis = ellipsis;
        Ok(element)
    }

    fn parse_call(&mut self, callee: Node) -> LintResult<Node> {
        let paren = self.token;
        if self.node_id(&callee) != "function" {
            self.left_check(&callee, paren);
        }
        if let Some(Some(caller)) = self.callers.last().copied() {
            if matches!(callee.kind, NodeKind::Variable) {
                let name = self.node_id(&callee).to_string();
                if let Some(calls) = self.ctx.scopes.binding_mut(caller).calls.as_mut() {
                    calls.insert(name);
                }
            }
        }
        if self.is_member_of(&callee, "Object", "create") {
            self.create_parens.insert(paren);
        }
        let mut args = Vec::new();
        if self.next_id() != ")" {
            loop {
                args.push(self.parse_element()?);
                if self.next_id() != "," {
                    break;
                }
                self.expect(",")?;
            }
        }
        self.expect_match(")", paren)?;
        if let [only] = args.as_mut_slice() {
            self.meta(paren).free = true;
            if only.wrapped {
                self.ctx.warn(Code::UnexpectedA, paren, &[]);
            }
            if matches!(only.id(&self.ctx.tokens), "(" | "?") {
                only.wrapped = true;
            }
        } else {
            self.meta(paren).free = false;
        }
        Ok(Node::new(
            paren,
            NodeKind::Call {
                callee: Box::new(callee),
                args,
            },
        ))
    }

    /// Member names that may follow a literal without a left check
    fn dot_is_exempt(&self, left: &Node, name: usize) -> bool {
        let name = self.id(name);
        match self.node_id(left) {
            "(string)" => matches!(name, "indexOf" | "repeat"),
            "[" => matches!(name, "concat" | "forEach" | "join" | "map" | "reduce"),
            "+" => name == "slice",
            "(regexp)" => matches!(name, "exec" | "test"),
            _ => false,
        }
    }

    fn is_left_shaped(&self, left: &Node) -> bool {
        if left.is_identifier(&self.ctx.tokens) {
            return true;
        }
        match &left.kind {
            NodeKind::Ternary {
                consequent,
                alternate,
                ..
            } => self.is_left_shaped(consequent) || self.is_left_shaped(alternate),
            _ => {
                left.arity() == Some(Arity::Binary)
                    && matches!(self.node_id(left), "." | "?." | "(" | "[")
            }
        }
    }

    /// Warn on `right` unless `left` may be called, indexed or selected
    pub(crate) fn left_check(&mut self, left: &Node, right: usize) -> bool {
        let shaped = self.is_left_shaped(left);
        if !shaped {
            self.ctx.warn(Code::UnexpectedA, right, &[]);
        }
        shaped
    }

    /// Warn unless the node may be assigned to
    pub(crate) fn mutation_check(&mut self, node: &Node) -> bool {
        let assignable = node.arity() == Some(Arity::Variable)
            || matches!(self.node_id(node), "." | "[" | "{");
        if !assignable {
            self.ctx.warn(Code::BadAssignmentA, node.tok, &[]);
        }
        assignable
    }

    /// Default value of a parameter or destructured name
    pub(crate) fn default_expression(&mut self) -> LintResult<Node> {
        let value = self.parse_expression(150, false)?;
        if self.node_id(&value) == "undefined" {
            self.ctx.warn(Code::UnexpectedA, value.tok, &[]);
        }
        Ok(value)
    }

    /// Template parts after the opening backtick
    fn parse_template(&mut self) -> LintResult<(Vec<usize>, Vec<Node>)> {
        let mut strings = Vec::new();
        let mut exprs = Vec::new();
        if self.next_id() != "`" {
            loop {
                self.expect("(string)")?;
                strings.push(self.token);
                if self.next_id() != "${" {
                    break;
                }
                self.expect("${")?;
                exprs.push(self.parse_expression(0, false)?);
                self.expect("}")?;
            }
        }
        self.expect("`")?;
        Ok((strings, exprs))
    }

    /// Parameters up to and including the closing paren
    fn parse_parameter_list(&mut self) -> LintResult<Vec<Param>> {
        let mut list = Vec::new();
        let mut optional: Option<usize> = None;
        if matches!(self.next_id(), ")" | "(end)") {
            self.expect(")")?;
            return Ok(list);
        }
        loop {
            if matches!(self.next_id(), "{" | "[") {
                let open = self.next;
                let brace = self.next_id() == "{";
                if let Some(earlier) = optional {
                    self.required_after_optional(open, earlier);
                }
                self.advance()?;
                let mut names = Vec::new();
                loop {
                    let mut name = self.next;
                    if !self.is_identifier(name) {
                        return Err(self.stop(Code::ExpectedIdentifierA, name, &[]));
                    }
                    if brace {
                        self.survey(name)?;
                    }
                    self.advance()?;
                    if brace && self.next_id() == ":" {
                        self.expect(":")?;
                        name = self.next;
                        if !self.is_identifier(name) {
                            return Err(self.stop(Code::ExpectedIdentifierA, name, &[]));
                        }
                        self.advance()?;
                    }
                    let mut declarator = Declarator {
                        tok: name,
                        binding: None,
                        init: None,
                        ellipsis: false,
                    };
                    if self.next_id() == "=" {
                        self.expect("=")?;
                        declarator.init = Some(self.default_expression()?);
                        self.meta(open).open = true;
                    }
                    names.push(declarator);
                    if self.next_id() != "," {
                        break;
                    }
                    self.expect(",")?;
                }
                list.push(Param::Destructure { tok: open, names });
                self.expect(if brace { "}" } else { "]" })?;
            } else {
                let mut ellipsis = false;
                if self.next_id() == "..." {
                    ellipsis = true;
                    self.expect("...")?;
                    if let Some(earlier) = optional {
                        self.required_after_optional(self.next, earlier);
                    }
                }
                let name = self.next;
                if !self.is_identifier(name) {
                    return Err(self.stop(Code::ExpectedIdentifierA, name, &[]));
                }
                self.advance()?;
                let mut declarator = Declarator {
                    tok: name,
                    binding: None,
                    init: None,
                    ellipsis,
                };
                if ellipsis {
                    list.push(Param::Name(declarator));
                    break;
                }
                if self.next_id() == "=" {
                    optional = Some(name);
                    self.expect("=")?;
                    declarator.init = Some(self.default_expression()?);
                } else if let Some(earlier) = optional {
                    self.required_after_optional(name, earlier);
                }
                list.push(Param::Name(declarator));
            }
            if self.next_id() != "," {
                break;
            }
            self.expect(",")?;
        }
        self.expect(")")?;
        Ok(list)
    }

    fn required_after_optional(&mut self, nr: usize, optional: usize) {
        let required = self.id(nr).to_string();
        let optional = self.id(optional).to_string();
        self.ctx
            .warn(Code::RequiredAOptionalB, nr, &[&required, &optional]);
    }

    /// Enroll every name of a parameter list into the current scope
    fn enroll_parameters(&mut self, params: &mut [Param], readonly: bool) {
        for param in params {
            let names = match param {
                Param::Name(declarator) => std::slice::from_mut(declarator),
                Param::Destructure { names, .. } => names.as_mut_slice(),
            };
            for declarator in names {
                declarator.binding = self.enroll(declarator.tok, Role::Parameter, readonly);
            }
        }
    }

    /// `function` statement or expression; the `function` token is current
    pub(crate) fn parse_function(&mut self, statement: bool) -> LintResult<Node> {
        let tok = self.token;
        let mut head = FunctionHead {
            tok,
            name: None,
            binding: None,
            display_name: self.anon.clone(),
            statement,
            method: false,
            accessor: None,
        };
        if statement {
            let name = self.next;
            if !self.is_identifier(name) {
                return Err(self.stop(Code::ExpectedIdentifierA, name, &[]));
            }
            let binding = self.enroll(name, Role::Variable, true);
            if let Some(b) = self.binding_mut(binding) {
                b.init = true;
                b.calls = Some(BTreeSet::new());
            }
            head.name = Some(name);
            head.binding = binding;
            head.display_name = self.id(name).to_string();
            self.advance()?;
        } else if self.is_identifier(self.next) {
            head.name = Some(self.next);
            head.display_name = self.next_id().to_string();
            self.advance()?;
        }
        let function = self.parse_function_rest(head)?;
        Ok(Node::new(tok, NodeKind::Function(Box::new(function))))
    }

    /// Parameters and body of a function whose header was consumed
    fn parse_function_rest(&mut self, mut head: FunctionHead) -> LintResult<Function> {
        let caller = if head.statement { head.binding } else { None };
        let scope = self.push_function(ScopeKind::Function, head.tok, caller);
        self.ctx.scopes.scope_mut(scope).expression = !head.statement;
        if !head.statement {
            if let Some(name) = head.name {
                head.binding = self.enroll(name, Role::Function, true);
                if let Some(b) = self.binding_mut(head.binding) {
                    b.dead = false;
                    b.init = true;
                    b.used = 1;
                }
            }
        }
        self.ctx.scopes.scope_mut(scope).name = head.binding;

        self.expect("(")?;
        let paren = self.token;
        self.meta(paren).free = false;
        self.set_arity(paren, Arity::Function);
        let mut params = self.parse_parameter_list()?;
        self.enroll_parameters(&mut params, false);

        let body = self.parse_block(BlockForm::Body)?;
        if head.statement && self.line(self.next) == self.line(self.token) {
            return Err(self.stop(Code::UnexpectedA, self.next, &[]));
        }
        if matches!(self.next_id(), "." | "?." | "[") {
            self.ctx.warn(Code::UnexpectedA, self.next, &[]);
        }
        self.pop_function();
        Ok(Function {
            scope,
            name: head.name,
            binding: head.binding,
            display_name: head.display_name,
            params,
            body,
            accessor: head.accessor,
            statement: head.statement,
            method: head.method,
        })
    }

    /// Arrow function; `=>` is the lookahead token
    fn parse_arrow(&mut self, mut params: Vec<Param>) -> LintResult<Node> {
        self.expect("=>")?;
        let tok = self.token;
        self.set_arity(tok, Arity::Binary);
        let scope = self.push_function(ScopeKind::Arrow, tok, None);
        self.enroll_parameters(&mut params, true);
        let body = if self.next_id() == "{" {
            self.ctx.warn(Code::ExpectedAB, tok, &["function", "=>"]);
            ArrowBody::Block(self.parse_block(BlockForm::Body)?)
        } else {
            ArrowBody::Expression(self.parse_expression(0, false)?)
        };
        self.pop_function();
        Ok(Node::new(
            tok,
            NodeKind::Arrow(Box::new(Arrow {
                scope,
                params,
                body,
            })),
        ))
    }

    /// Parenthesized expression or arrow parameter list; `(` is current
    fn parse_paren(&mut self) -> LintResult<Node> {
        let paren = self.token;
        let cadet = self.lookahead()?;
        if matches!(self.next_id(), ")" | "...")
            || (self.is_identifier(self.next) && matches!(self.id(cadet), "," | "="))
        {
            self.meta(paren).free = false;
            let params = self.parse_parameter_list()?;
            return self.parse_arrow(params);
        }
        self.meta(paren).free = true;
        let mut value = self.parse_expression(0, false)?;
        if value.wrapped {
            self.ctx.warn(Code::UnexpectedA, paren, &[]);
        }
        value.wrapped = true;
        self.expect_match(")", paren)?;
        if self.next_id() != "=>" {
            return Ok(value);
        }
        if value.arity() != Some(Arity::Variable) {
            if matches!(self.node_id(&value), "{" | "[") {
                self.ctx
                    .warn(Code::ExpectedABeforeB, paren, &["function", "("]);
                return Err(self.stop(Code::ExpectedAB, self.next, &["{", "=>"]));
            }
            return Err(self.stop(Code::ExpectedIdentifierA, value.tok, &[]));
        }
        let param = Param::Name(Declarator {
            tok: value.tok,
            binding: None,
            init: None,
            ellipsis: false,
        });
        self.parse_arrow(vec![param])
    }

    /// Object literal; `{` is current
    fn parse_object(&mut self) -> LintResult<Node> {
        let brace = self.token;
        let mut seen: HashMap<String, bool> = HashMap::new();
        let mut properties = Vec::new();
        if self.next_id() != "}" {
            loop {
                let mut key = self.next;
                self.advance()?;
                let mut accessor = None;
                let name;
                if matches!(self.id(key), "get" | "set") && self.is_identifier(self.next) {
                    if !self.ctx.options.getset {
                        self.ctx.warn(Code::UnexpectedA, key, &[]);
                    }
                    accessor = Some(if self.id(key) == "get" {
                        Accessor::Get
                    } else {
                        Accessor::Set
                    });
                    let full = format!("{} {}", self.id(key), self.next_id());
                    key = self.next;
                    self.advance()?;
                    name = self.survey(key)?;
                    if seen.get(&full) == Some(&true) || seen.get(&name) == Some(&true) {
                        self.ctx.warn(Code::DuplicateA, key, &[]);
                    }
                    seen.insert(name.clone(), false);
                    seen.insert(full, true);
                } else {
                    name = self.survey(key)?;
                    if seen.contains_key(&name) {
                        self.ctx.warn(Code::DuplicateA, key, &[]);
                    }
                    seen.insert(name.clone(), true);
                }

                let value = if !self.is_identifier(key) {
                    self.expect(":")?;
                    self.parse_expression(0, false)?
                } else if matches!(self.next_id(), "}" | ",") {
                    if accessor.is_some() {
                        self.expect("(")?;
                    }
                    self.parse_expression(u32::MAX, true)?
                } else if self.next_id() == "(" {
                    let display_name = match accessor {
                        Some(Accessor::Get) => "get".to_string(),
                        Some(Accessor::Set) => "set".to_string(),
                        None => name.clone(),
                    };
                    let function = self.parse_function_rest(FunctionHead {
                        tok: key,
                        name: None,
                        binding: None,
                        display_name,
                        statement: false,
                        method: true,
                        accessor,
                    })?;
                    Node::new(key, NodeKind::Function(Box::new(function)))
                } else {
                    if accessor.is_some() {
                        self.expect("(")?;
                    }
                    let colon = self.next;
                    self.expect(":")?;
                    let value = self.parse_expression(0, false)?;
                    let key_id = self.id(key).to_string();
                    if self.node_id(&value) == key_id && key_id != "function" {
                        self.ctx
                            .warn(Code::UnexpectedA, colon, &[&format!(": {key_id}")]);
                    }
                    value
                };
                properties.push(Property {
                    key,
                    value,
                    accessor,
                });
                if self.next_id() != "," {
                    break;
                }
                self.expect(",")?;
            }
        }
        self.expect("}")?;
        Ok(Node::new(brace, NodeKind::Object { properties }))
    }
}
