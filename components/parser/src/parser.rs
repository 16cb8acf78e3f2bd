//! Top down operator precedence parser
//!
//! The parser pulls tokens from the finished token list, skipping comments,
//! and dispatches on the grammar table: `nud` handlers for tokens that start
//! an expression, `led` handlers for tokens that continue one, and `fud`
//! handlers for tokens that start a statement. Expression handlers live in
//! `expression.rs`, the JSON subset in `json.rs`.
//!
//! While parsing, names are enrolled into the scope arena and layout facts
//! are recorded in the token side table for the whitespace auditor.

use crate::ast::{Block, Catch, Declarator, Node, NodeKind, Tree};
use crate::context::{Context, ModuleMode};
use crate::grammar::{self, Fud};
use crate::patterns::Pattern;
use crate::scope::{Binding, BindingId, Role, Scope, ScopeId, ScopeKind, GLOBAL};
use crate::token::{Arity, TokenMeta};
use core_types::{Code, LintError, LintResult};
use std::collections::HashSet;
use tracing::debug;

/// Expression ids that make a poor condition
const ANTICONDITION: [&str; 16] = [
    "?", "~", "&", "|", "^", "<<", ">>", ">>>", "+", "-", "*", "/", "%", "typeof", "(number)",
    "(string)",
];

/// How a block is opened and checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockForm {
    /// Ordinary braced block
    Plain,
    /// Function body; may start with `"use strict";`
    Body,
    /// Block of an ignored `catch`; may be empty
    Ignore,
    /// The `{` was already consumed by the statement
    Naked,
}

/// Parse the tokens of `ctx`
///
/// Returns the tree built so far together with the outcome. A stopped
/// program parse keeps the top-level statements completed before the stop.
pub fn parse(ctx: &mut Context) -> (Option<Tree>, LintResult<()>) {
    let json = ctx.json_mode;
    let mut parser = Parser::new(ctx);
    if json {
        return match parser.parse_json() {
            Ok(value) => (Some(Tree::Json(value)), Ok(())),
            Err(err) => (None, Err(err)),
        };
    }
    let mut program = Vec::new();
    let outcome = parser.parse_program(&mut program);
    debug!(statements = program.len(), stopped = outcome.is_err(), "parsed program");
    (Some(Tree::Program(program)), outcome)
}

/// Parser state over one analysis context
pub struct Parser<'c> {
    pub(crate) ctx: &'c mut Context,
    token_nr: usize,
    /// Current token
    pub(crate) token: usize,
    /// Lookahead token
    pub(crate) next: usize,
    /// Name given to the next anonymous function
    pub(crate) anon: String,
    /// Open scopes, innermost last
    pub(crate) blocks: Vec<ScopeId>,
    /// Open function scopes, innermost last
    pub(crate) functions: Vec<ScopeId>,
    /// Name binding of each open function, when it is a function statement
    pub(crate) callers: Vec<Option<BindingId>>,
    /// Call parens of `Object.create(`
    pub(crate) create_parens: HashSet<usize>,
}

impl<'c> Parser<'c> {
    /// Create a parser positioned before the first token
    pub fn new(ctx: &'c mut Context) -> Self {
        Self {
            ctx,
            token_nr: 0,
            token: 0,
            next: 0,
            anon: "anonymous".to_string(),
            blocks: vec![GLOBAL],
            functions: vec![GLOBAL],
            callers: vec![None],
            create_parens: HashSet::new(),
        }
    }

    /// Parse a script or module into `program`
    pub fn parse_program(&mut self, program: &mut Vec<Node>) -> LintResult<()> {
        self.next = self.dispense()?;
        if self.ctx.options.browser {
            if self.next_id() == ";" {
                self.expect(";")?;
            }
        } else if self.value(self.next) == Some("use strict") {
            self.expect("(string)")?;
            self.expect(";")?;
        }
        self.parse_statements_into(program)?;
        self.expect("(end)")
    }

    // Token access

    pub(crate) fn id(&self, nr: usize) -> &str {
        self.ctx.tokens.get(nr).map_or("", |t| t.id.as_str())
    }

    pub(crate) fn next_id(&self) -> &str {
        self.id(self.next)
    }

    pub(crate) fn is_identifier(&self, nr: usize) -> bool {
        self.ctx.tokens.get(nr).is_some_and(|t| t.identifier)
    }

    pub(crate) fn line(&self, nr: usize) -> usize {
        self.ctx.tokens.get(nr).map_or(0, |t| t.line)
    }

    pub(crate) fn value(&self, nr: usize) -> Option<&str> {
        self.ctx.tokens.get(nr).and_then(|t| t.value.as_deref())
    }

    pub(crate) fn node_id(&self, node: &Node) -> &str {
        node.id(&self.ctx.tokens)
    }

    pub(crate) fn meta(&mut self, nr: usize) -> &mut TokenMeta {
        self.ctx.meta_mut(nr)
    }

    pub(crate) fn set_arity(&mut self, nr: usize, arity: Arity) {
        self.ctx.meta_mut(nr).arity = Some(arity);
    }

    pub(crate) fn stop(&mut self, code: Code, nr: usize, exhibits: &[&str]) -> LintError {
        self.ctx.stop(code, nr, exhibits)
    }

    // Cursor

    /// Deliver the next token, skipping comments
    pub(crate) fn dispense(&mut self) -> LintResult<usize> {
        loop {
            let nr = self.token_nr;
            let Some(cadet) = self.ctx.tokens.get(nr) else {
                return Err(LintError::Internal(format!("token cursor {nr} past the end")));
            };
            self.token_nr += 1;
            if !cadet.is_comment() {
                return Ok(nr);
            }
            if self.ctx.json_mode {
                self.ctx.warn(Code::UnexpectedA, nr, &[]);
            }
        }
    }

    /// The token after the lookahead token
    pub(crate) fn lookahead(&mut self) -> LintResult<usize> {
        let saved = self.token_nr;
        let cadet = self.dispense();
        self.token_nr = saved;
        cadet
    }

    /// Promote the lookahead token to current
    pub(crate) fn advance(&mut self) -> LintResult<()> {
        let current = self.token;
        if self.is_identifier(current) && self.id(current) != "function" {
            self.anon = self.id(current).to_string();
        } else if self.id(current) == "(string)" {
            let text = self.value(current).unwrap_or_default().to_string();
            if Pattern::Identifier.is_match(&text)? {
                self.anon = text;
            }
        }
        self.token = self.next;
        self.next = self.dispense()?;
        if self.next_id() == "(end)" {
            self.token_nr -= 1;
        }
        Ok(())
    }

    /// Advance over a token that must have the given id
    pub(crate) fn expect(&mut self, id: &str) -> LintResult<()> {
        if self.next_id() != id {
            let saw = self.ctx.artifact(self.next);
            return Err(self.stop(Code::ExpectedAB, self.next, &[id, &saw]));
        }
        self.advance()
    }

    /// Advance over a closer, naming its opener on a mismatch
    pub(crate) fn expect_match(&mut self, id: &str, opener: usize) -> LintResult<()> {
        if self.next_id() != id {
            let open = self.ctx.artifact(opener);
            let open_line = self.ctx.artifact_line(opener);
            let saw = self.ctx.artifact(self.next);
            return Err(self.stop(
                Code::ExpectedABFromCD,
                self.next,
                &[id, &open, &open_line, &saw],
            ));
        }
        self.advance()
    }

    /// Match a `;`, reporting a missing one at the end of the current token
    pub(crate) fn semicolon(&mut self) -> LintResult<()> {
        if self.next_id() == ";" {
            self.expect(";")?;
        } else {
            let (line, thru) = self
                .ctx
                .tokens
                .get(self.token)
                .map_or((0, 0), |t| (t.line, t.thru));
            let saw = self.ctx.artifact(self.next);
            self.ctx.warn_at(Code::ExpectedAB, line, thru, &[";", &saw]);
        }
        self.anon = "anonymous".to_string();
        Ok(())
    }

    // Names

    /// Tally a property name, returning its text
    pub(crate) fn survey(&mut self, nr: usize) -> LintResult<String> {
        let Some(token) = self.ctx.tokens.get(nr) else {
            return Err(LintError::Internal(format!("survey of missing token {nr}")));
        };
        if token.id == "(string)" {
            let text = token.value.clone().unwrap_or_default();
            if !Pattern::Identifier.is_match(&text)? {
                return Ok(text);
            }
            return self.tally(text, nr, false);
        }
        if !token.identifier {
            return Err(self.stop(Code::ExpectedIdentifierA, nr, &[]));
        }
        let name = token.id.clone();
        self.tally(name, nr, true)
    }

    /// Count one sighting of a property name
    pub(crate) fn tally(&mut self, name: String, nr: usize, identifier: bool) -> LintResult<String> {
        if let Some(count) = self.ctx.property.get_mut(&name) {
            *count += 1;
            return Ok(name);
        }
        match self.ctx.tenure.as_ref().map(|tenure| tenure.contains(&name)) {
            Some(false) => {
                self.ctx.warn(Code::UnregisteredPropertyA, nr, &[]);
            }
            Some(true) => {}
            None => {
                if identifier && Pattern::BadProperty.is_match(&name)? {
                    self.ctx.warn(Code::BadPropertyA, nr, &[]);
                }
            }
        }
        self.ctx.property.insert(name.clone(), 1);
        Ok(name)
    }

    /// Declare a name in the innermost scope
    ///
    /// Reserved words and same-scope redefinitions are reported and not
    /// enrolled. Shadowing an outer name is reported unless the roles make
    /// it harmless.
    pub(crate) fn enroll(&mut self, nr: usize, role: Role, readonly: bool) -> Option<BindingId> {
        let name = self.id(nr).to_string();
        if grammar::is_reserved(&name) && name != "_" {
            self.ctx.warn(Code::ReservedA, nr, &[]);
            return None;
        }
        let current = self.current_block();
        if let Some(earlier) = self.ctx.scopes.get(current, &name) {
            let line = (self.ctx.scopes.binding(earlier).line + self.ctx.fudge).to_string();
            self.ctx.warn(Code::RedefinitionAB, nr, &[&name, &line]);
            return None;
        }
        let outer = self.blocks[..self.blocks.len() - 1]
            .iter()
            .rev()
            .find_map(|&scope| self.ctx.scopes.get(scope, &name));
        if let Some(earlier) = outer {
            let earlier = self.ctx.scopes.binding(earlier);
            let (earlier_role, earlier_line) = (earlier.role, earlier.line);
            if name == "_" {
                if earlier_role == Role::Variable {
                    self.ctx.warn(Code::UnexpectedA, nr, &[]);
                }
            } else if (role != Role::Exception || earlier_role != Role::Exception)
                && role != Role::Parameter
                && role != Role::Function
            {
                let line = (earlier_line + self.ctx.fudge).to_string();
                self.ctx.warn(Code::RedefinitionAB, nr, &[&name, &line]);
            }
        }
        let (line, column) = self
            .ctx
            .tokens
            .get(nr)
            .map_or((0, 0), |t| (t.line, t.from));
        if role == Role::Label {
            self.meta(nr).label = true;
        }
        Some(self.ctx.scopes.add_binding(Binding {
            name,
            token: Some(nr),
            line,
            column,
            role,
            scope: current,
            function: self.current_function(),
            writable: !readonly,
            used: 0,
            init: false,
            dead: true,
            closure: false,
            calls: None,
        }))
    }

    pub(crate) fn current_block(&self) -> ScopeId {
        self.blocks.last().copied().unwrap_or(GLOBAL)
    }

    pub(crate) fn current_function(&self) -> ScopeId {
        self.functions.last().copied().unwrap_or(GLOBAL)
    }

    pub(crate) fn binding_mut(&mut self, binding: Option<BindingId>) -> Option<&mut Binding> {
        binding.map(|id| self.ctx.scopes.binding_mut(id))
    }

    /// Open a function or arrow scope and make it current
    pub(crate) fn push_function(&mut self, kind: ScopeKind, tok: usize, caller: Option<BindingId>) -> ScopeId {
        let parent = self.current_function();
        let level = self.ctx.scopes.scope(parent).level + 1;
        if self.ctx.scopes.scope(parent).loop_depth > 0 {
            self.ctx.warn(Code::FunctionInLoop, tok, &[]);
        }
        let scope = self.ctx.scopes.push_scope(kind, Some(tok));
        self.ctx.scopes.scope_mut(scope).level = level;
        self.blocks.push(scope);
        self.functions.push(scope);
        self.callers.push(caller);
        scope
    }

    pub(crate) fn pop_function(&mut self) {
        self.blocks.pop();
        self.functions.pop();
        self.callers.pop();
    }

    fn function_depths(&mut self) -> &mut Scope {
        let function = self.current_function();
        self.ctx.scopes.scope_mut(function)
    }

    fn not_top_level(&mut self, nr: usize) {
        if self.current_function() == GLOBAL {
            self.ctx.warn(Code::UnexpectedAtTopLevelA, nr, &[]);
        }
    }

    // Statements

    fn parse_statement(&mut self) -> LintResult<Node> {
        self.advance()?;
        if self.is_identifier(self.token) && self.next_id() == ":" {
            let label = self.token;
            if self.id(label) == "_" {
                self.ctx.warn(Code::UnexpectedA, label, &[]);
            }
            self.expect(":")?;
            if matches!(self.next_id(), "do" | "while") {
                let binding = self.enroll(label, Role::Label, true);
                if let Some(b) = self.binding_mut(binding) {
                    b.init = true;
                    b.dead = false;
                }
                let mut statement = self.parse_statement()?;
                if let Some(b) = self.binding_mut(binding) {
                    b.dead = true;
                }
                if let NodeKind::While { label: slot, .. } | NodeKind::DoWhile { label: slot, .. } =
                    &mut statement.kind
                {
                    *slot = Some(label);
                }
                self.meta(statement.tok).statement = true;
                return Ok(statement);
            }
            self.advance()?;
            self.ctx.warn(Code::UnexpectedLabelA, label, &[]);
        }

        let first = self.token;
        self.meta(first).statement = true;
        let fud = grammar::symbol(self.id(first)).and_then(|s| s.fud);
        match fud {
            Some(fud) if !(self.id(first) == "import" && self.next_id() == "(") => {
                self.set_arity(first, Arity::Statement);
                self.parse_fud(fud)
            }
            _ => {
                let statement = self.parse_expression(0, true)?;
                if statement.wrapped && self.node_id(&statement) != "(" {
                    self.ctx.warn(Code::UnexpectedA, first, &[]);
                }
                if let NodeKind::Call { callee, .. } = &statement.kind {
                    if self.node_id(callee) == "import" {
                        self.ctx.warn(Code::UnexpectedA, self.next, &[]);
                    }
                }
                self.semicolon()?;
                Ok(statement)
            }
        }
    }

    fn parse_statements_into(&mut self, list: &mut Vec<Node>) -> LintResult<()> {
        let mut disrupt = false;
        while !matches!(self.next_id(), "}" | "else" | "(end)") {
            let statement = self.parse_statement()?;
            if disrupt {
                self.ctx.warn(Code::UnreachableA, statement.tok, &[]);
            }
            disrupt = statement.disrupt;
            list.push(statement);
        }
        Ok(())
    }

    /// Open a block scope; the caller may enroll names before finishing it
    pub(crate) fn open_block(&mut self, form: BlockForm) -> LintResult<(usize, ScopeId)> {
        if form != BlockForm::Naked {
            self.expect("{")?;
        }
        let tok = self.token;
        self.set_arity(tok, Arity::Statement);
        let level = self.ctx.scopes.scope(self.current_function()).level;
        let scope = self.ctx.scopes.push_scope(ScopeKind::Block, Some(tok));
        let block = self.ctx.scopes.scope_mut(scope);
        block.body = form == BlockForm::Body;
        block.level = level;
        self.blocks.push(scope);
        Ok((tok, scope))
    }

    pub(crate) fn finish_block(&mut self, tok: usize, scope: ScopeId, form: BlockForm) -> LintResult<Block> {
        if form == BlockForm::Body
            && self.functions.len() == 2
            && self.value(self.next) == Some("use strict")
        {
            let pragma = self.next;
            self.meta(pragma).statement = true;
            self.expect("(string)")?;
            self.expect(";")?;
        }
        let mut body = Vec::new();
        self.parse_statements_into(&mut body)?;
        let disrupt = match body.last() {
            Some(last) => last.disrupt,
            None => {
                if !self.ctx.options.devel && form != BlockForm::Ignore {
                    self.ctx.warn(Code::EmptyBlock, tok, &[]);
                }
                false
            }
        };
        self.blocks.pop();
        self.expect("}")?;
        Ok(Block {
            tok,
            scope,
            body,
            disrupt,
        })
    }

    pub(crate) fn parse_block(&mut self, form: BlockForm) -> LintResult<Block> {
        let (tok, scope) = self.open_block(form)?;
        self.finish_block(tok, scope, form)
    }

    /// Parenthesized condition of `if`, `while` and `do`
    fn parse_condition(&mut self) -> LintResult<Node> {
        let paren = self.next;
        self.meta(paren).free = true;
        self.expect("(")?;
        let value = self.parse_expression(0, false)?;
        self.expect(")")?;
        if value.wrapped {
            self.ctx.warn(Code::UnexpectedA, paren, &[]);
        }
        if ANTICONDITION.contains(&self.node_id(&value)) {
            self.ctx.warn(Code::UnexpectedA, value.tok, &[]);
        }
        Ok(value)
    }

    fn parse_fud(&mut self, fud: Fud) -> LintResult<Node> {
        let tok = self.token;
        match fud {
            Fud::Semicolon => {
                self.ctx.warn(Code::UnexpectedA, tok, &[]);
                Ok(Node::new(tok, NodeKind::Empty))
            }
            Fud::Block => {
                self.ctx.warn(Code::NakedBlock, tok, &[]);
                let block = self.parse_block(BlockForm::Naked)?;
                let mut node = Node::new(tok, NodeKind::Empty);
                node.disrupt = block.disrupt;
                node.kind = NodeKind::Block(block);
                Ok(node)
            }
            Fud::Break => self.parse_break_statement(),
            Fud::Let => self.parse_let_statement(),
            Fud::Continue => {
                let depths = self.function_depths();
                if depths.loop_depth < 1 || depths.finally_depth > 0 {
                    self.ctx.warn(Code::UnexpectedA, tok, &[]);
                }
                self.not_top_level(tok);
                self.ctx.warn(Code::UnexpectedA, tok, &[]);
                self.expect(";")?;
                let mut node = Node::new(tok, NodeKind::Continue);
                node.disrupt = true;
                Ok(node)
            }
            Fud::Debugger => {
                if !self.ctx.options.devel {
                    self.ctx.warn(Code::UnexpectedA, tok, &[]);
                }
                self.semicolon()?;
                Ok(Node::new(tok, NodeKind::Debugger))
            }
            Fud::Delete => {
                let target = self.parse_expression(0, false)?;
                let member = matches!(target.kind, NodeKind::Member { .. } | NodeKind::Index { .. })
                    && self.node_id(&target) != "?.";
                if !member {
                    let saw = self.ctx.artifact(target.tok);
                    return Err(self.stop(Code::ExpectedAB, target.tok, &[".", &saw]));
                }
                self.semicolon()?;
                Ok(Node::new(
                    tok,
                    NodeKind::Delete {
                        target: Box::new(target),
                    },
                ))
            }
            Fud::Do => self.parse_do_statement(),
            Fud::Export => self.parse_export_statement(),
            Fud::Function => self.parse_function(true),
            Fud::If => self.parse_if_statement(),
            Fud::Import => self.parse_import_statement(),
            Fud::Return => {
                self.not_top_level(tok);
                if self.function_depths().finally_depth > 0 {
                    self.ctx.warn(Code::UnexpectedA, tok, &[]);
                }
                let value = if self.next_id() != ";" && self.line(tok) == self.line(self.next) {
                    Some(Box::new(self.parse_expression(10, false)?))
                } else {
                    None
                };
                self.expect(";")?;
                let mut node = Node::new(tok, NodeKind::Return { value });
                node.disrupt = true;
                Ok(node)
            }
            Fud::Throw => {
                let value = self.parse_expression(10, false)?;
                self.semicolon()?;
                if self.function_depths().try_depth > 0 {
                    self.ctx.warn(Code::UnexpectedA, tok, &[]);
                }
                let mut node = Node::new(
                    tok,
                    NodeKind::Throw {
                        value: Box::new(value),
                    },
                );
                node.disrupt = true;
                Ok(node)
            }
            Fud::Try => self.parse_try_statement(),
            Fud::Var => Err(self.stop(Code::UnexpectedVar, tok, &[])),
            Fud::While => self.parse_while_statement(),
            Fud::Rejected => Err(self.stop(Code::UnexpectedA, tok, &[])),
        }
    }

    fn parse_break_statement(&mut self) -> LintResult<Node> {
        let tok = self.token;
        let depths = self.function_depths();
        if depths.loop_depth < 1 || depths.finally_depth > 0 {
            self.ctx.warn(Code::UnexpectedA, tok, &[]);
        }
        let mut label = None;
        if self.is_identifier(self.next) && self.line(tok) == self.line(self.next) {
            let name = self.next_id().to_string();
            let mut found = None;
            for &scope in self.blocks[..self.blocks.len() - 1].iter().rev() {
                if let Some(binding) = self.ctx.scopes.get(scope, &name) {
                    if self.ctx.scopes.binding(binding).role == Role::Label {
                        found = Some(binding);
                        break;
                    }
                }
                if self.ctx.scopes.scope(scope).kind != ScopeKind::Block {
                    break;
                }
            }
            match found {
                None => {
                    self.ctx.warn(Code::NotLabelA, self.next, &[]);
                }
                Some(binding) if self.ctx.scopes.binding(binding).dead => {
                    self.ctx.warn(Code::OutOfScopeA, self.next, &[]);
                }
                Some(binding) => self.ctx.scopes.binding_mut(binding).used += 1,
            }
            label = Some(self.next);
            self.advance()?;
        }
        self.expect(";")?;
        let mut node = Node::new(tok, NodeKind::Break { label });
        node.disrupt = true;
        Ok(node)
    }

    /// `let` and `const`, one declaration per statement
    fn parse_let_statement(&mut self) -> LintResult<Node> {
        let tok = self.token;
        let is_const = self.id(tok) == "const";
        let mut names = Vec::new();
        let mut init = None;
        match self.next_id() {
            "{" | "[" => {
                let open = self.next;
                let brace = self.next_id() == "{";
                self.advance()?;
                loop {
                    let mut ellipsis = false;
                    if !brace && self.next_id() == "..." {
                        ellipsis = true;
                        self.expect("...")?;
                    }
                    if !self.is_identifier(self.next) {
                        return Err(self.stop(Code::ExpectedIdentifierA, self.next, &[]));
                    }
                    let name = self.next;
                    if brace {
                        self.survey(name)?;
                    }
                    self.advance()?;
                    let binding = self.enroll(name, Role::Variable, is_const);
                    if let Some(b) = self.binding_mut(binding) {
                        b.init = true;
                    }
                    let mut declarator = Declarator {
                        tok: name,
                        binding,
                        init: None,
                        ellipsis,
                    };
                    if ellipsis {
                        names.push(declarator);
                        break;
                    }
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
                self.expect(if brace { "}" } else { "]" })?;
                self.expect("=")?;
                init = Some(Box::new(self.parse_expression(0, false)?));
            }
            _ if self.is_identifier(self.next) => {
                let name = self.next;
                self.advance()?;
                if self.id(name) == "_" {
                    self.ctx.warn(Code::UnexpectedA, name, &[]);
                }
                let binding = self.enroll(name, Role::Variable, is_const);
                let mut declarator = Declarator {
                    tok: name,
                    binding,
                    init: None,
                    ellipsis: false,
                };
                if self.next_id() == "=" || is_const {
                    self.expect("=")?;
                    if let Some(b) = self.binding_mut(binding) {
                        b.init = true;
                    }
                    declarator.init = Some(self.parse_expression(0, false)?);
                }
                names.push(declarator);
            }
            _ => return Err(self.stop(Code::ExpectedIdentifierA, self.next, &[])),
        }
        self.semicolon()?;
        Ok(Node::new(tok, NodeKind::Let { names, init }))
    }

    fn parse_do_statement(&mut self) -> LintResult<Node> {
        let tok = self.token;
        self.not_top_level(tok);
        self.function_depths().loop_depth += 1;
        let body = self.parse_block(BlockForm::Plain)?;
        self.expect("while")?;
        let test = self.parse_condition()?;
        self.semicolon()?;
        if body.disrupt {
            self.ctx.warn(Code::WeirdLoop, tok, &[]);
        }
        self.function_depths().loop_depth -= 1;
        Ok(Node::new(
            tok,
            NodeKind::DoWhile {
                body,
                test: Box::new(test),
                label: None,
            },
        ))
    }

    fn parse_while_statement(&mut self) -> LintResult<Node> {
        let tok = self.token;
        self.not_top_level(tok);
        self.function_depths().loop_depth += 1;
        let test = self.parse_condition()?;
        let body = self.parse_block(BlockForm::Plain)?;
        if body.disrupt {
            self.ctx.warn(Code::WeirdLoop, tok, &[]);
        }
        self.function_depths().loop_depth -= 1;
        Ok(Node::new(
            tok,
            NodeKind::While {
                test: Box::new(test),
                body,
                label: None,
            },
        ))
    }

    fn parse_if_statement(&mut self) -> LintResult<Node> {
        let tok = self.token;
        let test = self.parse_condition()?;
        let consequent = self.parse_block(BlockForm::Plain)?;
        let mut disrupt = false;
        let mut alternate = None;
        if self.next_id() == "else" {
            self.expect("else")?;
            let the_else = self.token;
            let node = if self.next_id() == "if" {
                self.parse_statement()?
            } else {
                let block = self.parse_block(BlockForm::Plain)?;
                let mut node = Node::new(block.tok, NodeKind::Empty);
                node.disrupt = block.disrupt;
                node.kind = NodeKind::Block(block);
                node
            };
            if consequent.disrupt {
                if node.disrupt {
                    disrupt = true;
                } else {
                    self.ctx.warn(Code::UnexpectedA, the_else, &[]);
                }
            }
            alternate = Some(Box::new(node));
        }
        let mut node = Node::new(
            tok,
            NodeKind::If {
                test: Box::new(test),
                consequent,
                alternate,
            },
        );
        node.disrupt = disrupt;
        Ok(node)
    }

    fn parse_try_statement(&mut self) -> LintResult<Node> {
        let tok = self.token;
        if self.function_depths().try_depth > 0 {
            self.ctx.warn(Code::UnexpectedA, tok, &[]);
        }
        self.function_depths().try_depth += 1;
        let block = self.parse_block(BlockForm::Plain)?;
        let mut disrupt = block.disrupt;
        let mut catch = None;
        if self.next_id() == "catch" {
            let catch_tok = self.next;
            self.expect("catch")?;
            let mut name = None;
            if self.next_id() == "(" {
                self.expect("(")?;
                if !self.is_identifier(self.next) {
                    return Err(self.stop(Code::ExpectedIdentifierA, self.next, &[]));
                }
                if self.next_id() != "_" {
                    name = Some(self.next);
                }
                self.advance()?;
                self.expect(")")?;
            }
            let form = if name.is_some() {
                BlockForm::Plain
            } else {
                BlockForm::Ignore
            };
            let (brace, scope) = self.open_block(form)?;
            let binding = name.and_then(|nr| self.enroll(nr, Role::Exception, true));
            let handler = self.finish_block(brace, scope, form)?;
            if !handler.disrupt {
                disrupt = false;
            }
            catch = Some(Catch {
                tok: catch_tok,
                name,
                binding,
                block: handler,
            });
        } else {
            let saw = self.ctx.artifact(self.next);
            self.ctx
                .warn(Code::ExpectedABeforeB, self.next, &["catch", &saw]);
        }
        let mut finally = None;
        if self.next_id() == "finally" {
            self.function_depths().finally_depth += 1;
            self.expect("finally")?;
            let block = self.parse_block(BlockForm::Plain)?;
            disrupt = block.disrupt;
            finally = Some(block);
            self.function_depths().finally_depth -= 1;
        }
        self.function_depths().try_depth -= 1;
        let mut node = Node::new(
            tok,
            NodeKind::Try {
                block,
                catch,
                finally,
            },
        );
        node.disrupt = disrupt;
        Ok(node)
    }

    fn parse_import_statement(&mut self) -> LintResult<Node> {
        let tok = self.token;
        if let ModuleMode::GlobalDirective(comment) = self.ctx.module_mode {
            let word = self.ctx.tokens[comment]
                .directive
                .map_or("global", |d| d.as_str());
            self.ctx.warn(Code::UnexpectedDirectiveA, comment, &[word]);
        }
        self.ctx.module_mode = ModuleMode::Module;
        let mut names = Vec::new();
        if self.is_identifier(self.next) {
            names.push(self.import_name()?);
        } else {
            self.expect("{")?;
            if self.next_id() != "}" {
                loop {
                    if !self.is_identifier(self.next) {
                        return Err(self.stop(Code::ExpectedIdentifierA, self.next, &[]));
                    }
                    names.push(self.import_name()?);
                    if self.next_id() != "," {
                        break;
                    }
                    self.expect(",")?;
                }
            }
            self.expect("}")?;
        }
        self.expect("from")?;
        self.expect("(string)")?;
        let source = self.token;
        let module = self.value(source).unwrap_or_default().to_string();
        if !Pattern::ModuleName.is_match(&module)? {
            self.ctx.warn(Code::BadModuleNameA, source, &[]);
        }
        self.ctx.froms.push(module);
        self.semicolon()?;
        Ok(Node::new(tok, NodeKind::Import { names, source }))
    }

    fn import_name(&mut self) -> LintResult<Declarator> {
        let name = self.next;
        self.advance()?;
        if self.id(name) == "_" {
            self.ctx.warn(Code::UnexpectedA, name, &[]);
        }
        let binding = self.enroll(name, Role::Variable, true);
        Ok(Declarator {
            tok: name,
            binding,
            init: None,
            ellipsis: false,
        })
    }

    fn parse_export_statement(&mut self) -> LintResult<Node> {
        let tok = self.token;
        let mut items = Vec::new();
        match self.next_id() {
            "default" => {
                if self.ctx.exports.contains_key("default") {
                    self.ctx.warn(Code::DuplicateA, self.next, &[]);
                }
                self.expect("default")?;
                let thing = self.parse_expression(0, false)?;
                if self.is_frozen(&thing) {
                    self.semicolon()?;
                } else {
                    self.ctx.warn(Code::FreezeExports, thing.tok, &[]);
                    if self.next_id() == ";" {
                        self.semicolon()?;
                    }
                }
                self.ctx.exports.insert("default".to_string(), thing.tok);
                items.push(thing);
            }
            "function" => {
                self.ctx.warn(Code::FreezeExports, self.next, &[]);
                let mut thing = self.parse_statement()?;
                if let NodeKind::Function(function) = &mut thing.kind {
                    function.statement = false;
                    if let Some(name) = function.name {
                        let id = self.id(name).to_string();
                        if let Some(b) = self.binding_mut(function.binding) {
                            b.used += 1;
                        }
                        if self.ctx.exports.contains_key(&id) {
                            self.ctx.warn(Code::DuplicateA, name, &[]);
                        }
                        self.ctx.exports.insert(id, thing.tok);
                    }
                }
                self.set_arity(thing.tok, Arity::Unary);
                items.push(thing);
            }
            "let" | "const" => {
                self.ctx.warn(Code::UnexpectedA, self.next, &[]);
                self.parse_statement()?;
            }
            "{" => {
                self.expect("{")?;
                loop {
                    self.export_id()?;
                    if self.next_id() != "," {
                        break;
                    }
                    self.expect(",")?;
                }
                self.expect("}")?;
                self.semicolon()?;
            }
            _ => return Err(self.stop(Code::UnexpectedA, self.next, &[])),
        }
        self.ctx.module_mode = ModuleMode::Module;
        Ok(Node::new(tok, NodeKind::Export { items }))
    }

    fn export_id(&mut self) -> LintResult<()> {
        if !self.is_identifier(self.next) {
            return Err(self.stop(Code::ExpectedIdentifierA, self.next, &[]));
        }
        let id = self.next_id().to_string();
        match self.ctx.scopes.get(GLOBAL, &id) {
            None => {
                self.ctx.warn(Code::UnexpectedA, self.next, &[]);
            }
            Some(binding) => {
                self.ctx.scopes.binding_mut(binding).used += 1;
                if self.ctx.exports.contains_key(&id) {
                    self.ctx.warn(Code::DuplicateA, self.next, &[]);
                }
                let target = self.ctx.scopes.binding(binding).token.unwrap_or(self.next);
                self.ctx.exports.insert(id, target);
            }
        }
        self.advance()
    }

    /// True for `Object.freeze(...)`
    fn is_frozen(&self, thing: &Node) -> bool {
        match &thing.kind {
            NodeKind::Call { callee, .. } => self.is_member_of(callee, "Object", "freeze"),
            _ => false,
        }
    }

    /// True for `object.name` with a plain object token
    pub(crate) fn is_member_of(&self, node: &Node, object: &str, name: &str) -> bool {
        match &node.kind {
            NodeKind::Member {
                object: target,
                name: property,
            } => {
                self.node_id(node) == "."
                    && self.node_id(target) == object
                    && self.id(*property) == name
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use core_types::{Options, Source};
    use std::collections::BTreeSet;

    fn calls_of(ctx: &Context, name: &str) -> Option<BTreeSet<String>> {
        ctx.scopes
            .bindings
            .iter()
            .find(|b| b.name == name)
            .and_then(|b| b.calls.clone())
    }

    fn parsed(text: &str, options: Options) -> (Context, Option<Tree>, LintResult<()>) {
        let mut ctx = Context::new(options, &[]);
        ctx.lines = Source::from(text).into_lines();
        tokenize(&mut ctx).unwrap();
        let (tree, outcome) = parse(&mut ctx);
        (ctx, tree, outcome)
    }

    fn program(text: &str) -> (Context, Vec<Node>) {
        let (ctx, tree, outcome) = parsed(text, Options::default());
        assert!(outcome.is_ok(), "{:?}", ctx.warnings);
        match tree {
            Some(Tree::Program(body)) => (ctx, body),
            other => panic!("expected a program, got {other:?}"),
        }
    }

    fn codes(ctx: &Context) -> Vec<Code> {
        ctx.warnings.iter().map(|w| w.code).collect()
    }

    #[test]
    fn test_var_is_rejected() {
        let (ctx, _, outcome) = parsed("var x = 1;", Options::default());
        assert!(outcome.unwrap_err().is_stop());
        assert_eq!(codes(&ctx), vec![Code::UnexpectedVar]);
    }

    #[test]
    fn test_missing_semicolon_is_reported_after_token() {
        let (ctx, _) = program("let a = 1\nlet b = a;\n");
        assert_eq!(ctx.warnings[0].code, Code::ExpectedAB);
        assert_eq!((ctx.warnings[0].line, ctx.warnings[0].column), (0, 9));
    }

    #[test]
    fn test_let_declares_in_global_scope() {
        let (ctx, body) = program("let a = 1;\nconst b = a;\n");
        assert_eq!(body.len(), 2);
        let a = ctx.scopes.get(GLOBAL, "a").unwrap();
        let b = ctx.scopes.get(GLOBAL, "b").unwrap();
        assert!(ctx.scopes.binding(a).writable);
        assert!(!ctx.scopes.binding(b).writable);
        assert!(ctx.scopes.binding(b).init);
    }

    #[test]
    fn test_redefinition_in_same_scope() {
        let (ctx, _) = program("let a = 1;\nlet a = 2;\n");
        assert_eq!(codes(&ctx), vec![Code::RedefinitionAB]);
        assert_eq!(ctx.warnings[0].b.as_deref(), Some("0"));
    }

    #[test]
    fn test_reserved_name_is_not_enrolled() {
        let (ctx, _) = program("let yield = 1;\n");
        assert_eq!(codes(&ctx), vec![Code::ReservedA]);
        assert!(ctx.scopes.get(GLOBAL, "yield").is_none());
    }

    #[test]
    fn test_unreachable_after_return() {
        let (ctx, _) = program("function f() {\n    return;\n    f();\n}\n");
        assert_eq!(codes(&ctx), vec![Code::UnreachableA]);
    }

    #[test]
    fn test_break_outside_loop() {
        let (ctx, _) = program("function f() {\n    break;\n}\n");
        assert_eq!(codes(&ctx), vec![Code::UnexpectedA]);
    }

    #[test]
    fn test_labelled_loop_break() {
        let (ctx, body) = program(
            "function f() {\n    outer: while (f()) {\n        if (f()) {\n            break outer;\n        }\n    }\n}\n",
        );
        assert!(ctx.warnings.is_empty(), "{:?}", ctx.warnings);
        let label = ctx.scopes.bindings.iter().find(|b| b.role == Role::Label).unwrap();
        assert_eq!(label.used, 1);
        assert!(label.dead);
        let NodeKind::Function(function) = &body[0].kind else {
            panic!("expected a function");
        };
        assert!(matches!(
            function.body.body[0].kind,
            NodeKind::While { label: Some(_), .. }
        ));
    }

    #[test]
    fn test_label_on_other_statement() {
        let (ctx, _) = program("function f() {\n    here: f();\n}\n");
        assert_eq!(codes(&ctx), vec![Code::UnexpectedLabelA]);
    }

    #[test]
    fn test_required_after_optional_parameter() {
        let (ctx, _) = program("function f(a = 1, b) {\n    return a + b;\n}\n");
        assert_eq!(codes(&ctx), vec![Code::RequiredAOptionalB]);
        assert_eq!(ctx.warnings[0].a.as_deref(), Some("b"));
    }

    #[test]
    fn test_function_in_loop() {
        let (ctx, _) = program(
            "function f(g) {\n    while (g) {\n        g = function () {\n            return;\n        };\n    }\n}\n",
        );
        assert!(codes(&ctx).contains(&Code::FunctionInLoop));
    }

    #[test]
    fn test_weird_loop() {
        let (ctx, _) = program("function f() {\n    while (f()) {\n        return;\n    }\n}\n");
        assert_eq!(codes(&ctx), vec![Code::WeirdLoop]);
    }

    #[test]
    fn test_bad_assignment_target() {
        let (ctx, _) = program("function f() {\n    f() = 1;\n}\n");
        assert_eq!(codes(&ctx), vec![Code::BadAssignmentA]);
    }

    #[test]
    fn test_delete_requires_member() {
        let (ctx, _, outcome) = parsed("delete x;", Options::default());
        assert!(outcome.is_err());
        assert_eq!(codes(&ctx), vec![Code::ExpectedAB]);
    }

    #[test]
    fn test_if_else_disrupts_when_both_branches_do() {
        let (_, body) = program(
            "function f(a) {\n    if (a) {\n        return 1;\n    } else {\n        return 2;\n    }\n}\n",
        );
        let NodeKind::Function(function) = &body[0].kind else {
            panic!("expected a function");
        };
        assert!(function.body.body[0].disrupt);
        assert!(function.body.disrupt);
    }

    #[test]
    fn test_else_after_disrupting_then() {
        let (ctx, _) = program(
            "function f(a) {\n    if (a) {\n        return 1;\n    } else {\n        f(a);\n    }\n}\n",
        );
        assert_eq!(codes(&ctx), vec![Code::UnexpectedA]);
        assert_eq!(ctx.warnings[0].a.as_deref(), Some("else"));
    }

    #[test]
    fn test_try_without_catch() {
        let (ctx, _) = program("function f() {\n    try {\n        f();\n    } finally {\n        f();\n    }\n}\n");
        assert_eq!(codes(&ctx), vec![Code::ExpectedABeforeB]);
    }

    #[test]
    fn test_catch_binding_lives_in_catch_block() {
        let (ctx, body) = program(
            "function f() {\n    try {\n        f();\n    } catch (err) {\n        f(err);\n    }\n}\n",
        );
        assert!(ctx.warnings.is_empty(), "{:?}", ctx.warnings);
        let NodeKind::Function(function) = &body[0].kind else {
            panic!("expected a function");
        };
        let NodeKind::Try { catch: Some(catch), .. } = &function.body.body[0].kind else {
            panic!("expected a try");
        };
        let binding = ctx.scopes.binding(catch.binding.unwrap());
        assert_eq!(binding.role, Role::Exception);
        assert_eq!(binding.scope, catch.block.scope);
    }

    #[test]
    fn test_ignored_catch_may_be_empty() {
        let (ctx, _) = program("function f() {\n    try {\n        f();\n    } catch {}\n}\n");
        assert!(ctx.warnings.is_empty(), "{:?}", ctx.warnings);
    }

    #[test]
    fn test_statement_function_records_calls() {
        let (ctx, _) = program("function f() {\n    return g();\n}\nfunction g() {\n    return f();\n}\n");
        assert_eq!(
            calls_of(&ctx, "f"),
            Some(BTreeSet::from(["g".to_string()]))
        );
    }

    #[test]
    fn test_use_strict_pragma() {
        let (ctx, body) = program("\"use strict\";\nlet a = 1;\n");
        assert!(ctx.warnings.is_empty());
        assert_eq!(body.len(), 1);
    }

    #[test]
    fn test_import_and_export() {
        let (ctx, _) = program(
            "import fs from \"fs\";\nimport {a, b} from \"./lib.js\";\nexport default Object.freeze(fs(a, b));\n",
        );
        assert!(ctx.warnings.is_empty(), "{:?}", ctx.warnings);
        assert_eq!(ctx.froms, vec!["fs", "./lib.js"]);
        assert_eq!(ctx.module_mode, ModuleMode::Module);
        assert!(ctx.exports.contains_key("default"));
    }

    #[test]
    fn test_export_default_must_be_frozen() {
        let (ctx, _) = program("export default 1;\n");
        assert_eq!(codes(&ctx), vec![Code::FreezeExports]);
    }

    #[test]
    fn test_import_after_global_directive() {
        let (ctx, _) = program("/*global window*/\nimport a from \"a\";\n");
        assert_eq!(codes(&ctx), vec![Code::UnexpectedDirectiveA]);
        assert_eq!(ctx.warnings[0].a.as_deref(), Some("global"));
    }

    #[test]
    fn test_statement_tokens_are_marked() {
        let (ctx, _) = program("let a = 1;\na = 2;\n");
        assert!(ctx.meta[0].statement);
        assert!(ctx.meta[0].is(Arity::Statement));
        assert!(ctx.meta[2].arity.is_none());
        assert!(ctx.meta[5].statement);
        assert!(ctx.meta[5].is(Arity::Variable));
        assert!(ctx.meta[6].is(Arity::Assignment));
    }
}
