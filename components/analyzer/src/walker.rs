//! Semantic walker
//!
//! Re-descends the finished tree with the same block discipline the parser
//! used. Bindings are activated in program order as their declarations are
//! passed, so a read before a `let` is seen as out of scope, and a read
//! before the first assignment as uninitialized.
//!
//! Every node is visited in three steps: [`Walker::enter`] runs the
//! pre-order rules, the children are walked, and [`Walker::leave`] runs the
//! post-order rules once the operands are known to be constant or not.

use crate::rules::{self, Constants, IMPORT_META_NAMES, PRIMITIVE_WRAPPERS, TYPEOF_RESULTS};
use core_types::{Code, LintResult};
use parser::ast::{Accessor, ArrowBody, Block, Declarator, Param};
use parser::{
    Arity, Binding, BindingId, Context, Node, NodeKind, Pattern, Role, ScopeId, ScopeKind, GLOBAL,
};
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// Walk a program's statements, recording warnings in `ctx`
pub fn walk(ctx: &mut Context, statements: &[Node]) -> LintResult<()> {
    let mut walker = Walker::new(ctx);
    walker.walk_statements(statements)
}

/// Tree walker state
pub struct Walker<'c> {
    ctx: &'c mut Context,
    /// Open blocks, innermost last
    blocks: Vec<ScopeId>,
    /// Open functions, innermost last
    functions: Vec<ScopeId>,
    constants: Constants,
    /// Expressions that sit alone inside brackets or a template hole
    snug: HashSet<usize>,
    /// Binding each variable reference resolved to, by token
    resolved: HashMap<usize, BindingId>,
}

/// What a function node contributes to the walk
struct FunctionShape<'n> {
    scope: ScopeId,
    params: &'n [Param],
    accessor: Option<Accessor>,
    statement: bool,
}

impl<'c> Walker<'c> {
    /// Create a walker positioned in the global scope
    pub fn new(ctx: &'c mut Context) -> Self {
        Self {
            ctx,
            blocks: vec![GLOBAL],
            functions: vec![GLOBAL],
            constants: Constants::new(),
            snug: HashSet::new(),
            resolved: HashMap::new(),
        }
    }

    fn id(&self, node: &Node) -> &str {
        node.id(&self.ctx.tokens)
    }

    fn token_id(&self, nr: usize) -> &str {
        self.ctx.tokens.get(nr).map_or("", |t| t.id.as_str())
    }

    fn is_constant(&self, node: &Node) -> bool {
        self.constants.contains(node, &self.ctx.tokens)
    }

    fn similar(&self, a: &Node, b: &Node) -> bool {
        self.constants.are_similar(a, b, &self.ctx.tokens)
    }

    fn warn(&mut self, code: Code, node: &Node, exhibits: &[&str]) {
        self.ctx.warn(code, node.tok, exhibits);
    }

    fn current_block(&self) -> ScopeId {
        self.blocks.last().copied().unwrap_or(GLOBAL)
    }

    fn current_function(&self) -> ScopeId {
        self.functions.last().copied().unwrap_or(GLOBAL)
    }

    // Blocks and liveness

    fn walk_block(&mut self, block: &Block) -> LintResult<()> {
        self.blocks.push(block.scope);
        self.ctx.scopes.scope_mut(block.scope).live.clear();
        self.walk_statements(&block.body)?;
        self.pop_block();
        Ok(())
    }

    /// Close the innermost block; its live bindings die
    fn pop_block(&mut self) {
        if let Some(scope) = self.blocks.pop() {
            let live = std::mem::take(&mut self.ctx.scopes.scope_mut(scope).live);
            for binding in live {
                self.ctx.scopes.binding_mut(binding).dead = true;
            }
        }
    }

    /// Bring a binding into its lifetime in the current block
    fn make_live(&mut self, binding: BindingId) {
        let b = self.ctx.scopes.binding_mut(binding);
        b.dead = false;
        b.init = true;
        let current = self.current_block();
        self.ctx.scopes.scope_mut(current).live.push(binding);
    }

    // Statements

    /// Walk a statement list in order
    pub fn walk_statements(&mut self, list: &[Node]) -> LintResult<()> {
        for statement in list {
            self.walk_statement(statement)?;
        }
        Ok(())
    }

    fn walk_statement(&mut self, node: &Node) -> LintResult<()> {
        match &node.kind {
            NodeKind::Let { names, init } => self.walk_let(names, init.as_deref()),
            NodeKind::If {
                test,
                consequent,
                alternate,
            } => {
                self.walk_expression(test)?;
                self.walk_block(consequent)?;
                if let Some(alternate) = alternate {
                    self.walk_statement(alternate)?;
                }
                Ok(())
            }
            NodeKind::Block(block) => self.walk_block(block),
            NodeKind::While { test, body, .. } => {
                self.walk_expression(test)?;
                self.walk_block(body)
            }
            NodeKind::DoWhile { body, test, .. } => {
                self.walk_block(body)?;
                self.walk_expression(test)
            }
            NodeKind::Return { value } => match value {
                Some(value) => self.walk_expression(value),
                None => Ok(()),
            },
            NodeKind::Throw { value } => self.walk_expression(value),
            NodeKind::Delete { target } => self.walk_expression(target),
            NodeKind::Break { .. } | NodeKind::Continue | NodeKind::Debugger | NodeKind::Empty => {
                Ok(())
            }
            NodeKind::Try {
                block,
                catch,
                finally,
            } => {
                self.walk_block(block)?;
                if let Some(catch) = catch {
                    if let Some(binding) = catch.binding {
                        let b = self.ctx.scopes.binding_mut(binding);
                        b.dead = false;
                        b.init = true;
                    }
                    self.walk_block(&catch.block)?;
                    if let Some(binding) = catch.binding {
                        self.ctx.scopes.binding_mut(binding).dead = true;
                    }
                }
                if let Some(finally) = finally {
                    self.walk_block(finally)?;
                }
                Ok(())
            }
            NodeKind::Import { names, .. } => {
                for binding in names.iter().filter_map(|d| d.binding) {
                    self.make_live(binding);
                }
                self.top_level_only(node);
                Ok(())
            }
            NodeKind::Export { items } => {
                for item in items {
                    self.walk_expression(item)?;
                }
                self.top_level_only(node);
                Ok(())
            }
            _ => self.walk_expression_statement(node),
        }
    }

    /// `let` and `const`: each name comes alive as it is passed
    fn walk_let(&mut self, names: &[Declarator], source: Option<&Node>) -> LintResult<()> {
        if let Some(source) = source {
            self.walk_expression(source)?;
        }
        for declarator in names {
            if let Some(binding) = declarator.binding {
                self.ctx.scopes.binding_mut(binding).dead = false;
            }
            if let Some(init) = &declarator.init {
                self.walk_expression(init)?;
            }
            if let Some(binding) = declarator.binding {
                let initialized = declarator.init.is_some() || source.is_some();
                let b = self.ctx.scopes.binding_mut(binding);
                b.init = b.init || initialized;
                let current = self.current_block();
                self.ctx.scopes.scope_mut(current).live.push(binding);
            }
        }
        Ok(())
    }

    fn top_level_only(&mut self, node: &Node) {
        if self.current_block() != GLOBAL {
            self.warn(Code::MisplacedA, node, &[]);
        }
    }

    fn walk_expression_statement(&mut self, node: &Node) -> LintResult<()> {
        self.enter(node)?;
        self.walk_children(node)?;
        match node.arity() {
            Some(Arity::Binary) => {
                if self.id(node) != "(" {
                    self.warn(Code::UnexpectedExpressionA, node, &[]);
                }
            }
            Some(Arity::Statement | Arity::Assignment) => {}
            _ => {
                if self.id(node) != "import" {
                    self.warn(Code::UnexpectedExpressionA, node, &[]);
                }
            }
        }
        self.leave(node)
    }

    // Expressions

    fn walk_expression(&mut self, node: &Node) -> LintResult<()> {
        self.enter(node)?;
        self.walk_children(node)?;
        match node.arity() {
            Some(Arity::Pre | Arity::Post) => self.warn(Code::UnexpectedA, node, &[]),
            Some(Arity::Statement | Arity::Assignment) => {
                self.warn(Code::UnexpectedStatementA, node, &[])
            }
            _ => {}
        }
        self.leave(node)
    }

    fn walk_all(&mut self, nodes: &[Node]) -> LintResult<()> {
        for node in nodes {
            self.walk_expression(node)?;
        }
        Ok(())
    }

    fn walk_children(&mut self, node: &Node) -> LintResult<()> {
        match &node.kind {
            NodeKind::Unary { operand } | NodeKind::Pre { operand } | NodeKind::Post { operand } => {
                self.walk_expression(operand)
            }
            NodeKind::Array { elements } => self.walk_all(elements),
            NodeKind::Object { properties } => {
                for property in properties {
                    self.walk_expression(&property.value)?;
                }
                Ok(())
            }
            NodeKind::Template { exprs, .. } => self.walk_all(exprs),
            NodeKind::TaggedTemplate { tag, exprs, .. } => {
                self.walk_expression(tag)?;
                self.walk_all(exprs)
            }
            NodeKind::Function(function) => self.walk_block(&function.body),
            NodeKind::Arrow(arrow) => match &arrow.body {
                ArrowBody::Expression(body) => self.walk_expression(body),
                ArrowBody::Block(block) => self.walk_block(block),
            },
            NodeKind::Binary { left, right } => {
                self.walk_expression(left)?;
                self.walk_expression(right)
            }
            NodeKind::Call { callee, args } => {
                self.walk_expression(callee)?;
                self.walk_all(args)
            }
            NodeKind::Member { object, .. } => self.walk_expression(object),
            NodeKind::Index { object, index } => {
                self.walk_expression(object)?;
                self.walk_expression(index)
            }
            NodeKind::Assign { target, value } => {
                let plain = self.id(node) == "=" && matches!(target.kind, NodeKind::Variable);
                if !plain {
                    self.walk_expression(target)?;
                }
                self.walk_expression(value)
            }
            NodeKind::Ternary {
                test,
                consequent,
                alternate,
            } => {
                self.walk_expression(test)?;
                self.walk_expression(consequent)?;
                self.walk_expression(alternate)
            }
            _ => Ok(()),
        }
    }

    // Pre-order rules

    fn enter(&mut self, node: &Node) -> LintResult<()> {
        match &node.kind {
            NodeKind::Variable => self.reference(node),
            NodeKind::Unary { .. } => self.bitwise_check(node, None),
            NodeKind::Array { elements } if elements.len() == 1 => {
                self.snug.insert(elements[0].tok);
            }
            NodeKind::Template { exprs, .. } => {
                self.snug.extend(exprs.iter().map(|e| e.tok));
            }
            NodeKind::Index { object, index } => {
                self.bitwise_check(node, Some((object, index)));
                self.snug.insert(index.tok);
            }
            NodeKind::Assign { target, value } => self.bitwise_check(node, Some((target, value))),
            NodeKind::Binary { left, right } => {
                self.bitwise_check(node, Some((left, right)));
                self.enter_binary(node, left, right);
            }
            NodeKind::Function(function) => {
                let shape = FunctionShape {
                    scope: function.scope,
                    params: &function.params,
                    accessor: function.accessor,
                    statement: function.statement,
                };
                self.enter_function(node, shape)?;
            }
            NodeKind::Arrow(arrow) => {
                let shape = FunctionShape {
                    scope: arrow.scope,
                    params: &arrow.params,
                    accessor: None,
                    statement: false,
                };
                self.enter_function(node, shape)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn bitwise_check(&mut self, node: &Node, operands: Option<(&Node, &Node)>) {
        let id = self.id(node).to_string();
        if !self.ctx.options.bitwise && rules::is_bitwise(&id) {
            self.warn(Code::UnexpectedA, node, &[]);
        }
        if let Some((left, right)) = operands {
            if !matches!(id.as_str(), "(" | "&&" | "||" | "=")
                && (rules::is_relation(self.id(left)) || rules::is_relation(self.id(right)))
            {
                self.warn(Code::UnexpectedA, node, &[]);
            }
        }
    }

    fn enter_binary(&mut self, node: &Node, left: &Node, right: &Node) {
        let id = self.id(node).to_string();
        if rules::is_relation(&id) {
            if self.id(left) == "NaN" || self.id(right) == "NaN" {
                self.warn(Code::NumberIsNaN, node, &[]);
            } else if self.id(left) == "typeof" {
                match right.string_value(&self.ctx.tokens).map(str::to_string) {
                    None => {
                        if !matches!(right.kind, NodeKind::String) && self.id(right) != "typeof" {
                            self.warn(Code::ExpectedStringA, right, &[]);
                        }
                    }
                    Some(value) if value == "null" || value == "undefined" => {
                        self.warn(Code::UnexpectedTypeofA, right, &[&value]);
                    }
                    Some(value) if !TYPEOF_RESULTS.contains(&value.as_str()) => {
                        self.warn(Code::ExpectedTypeStringA, right, &[&value]);
                    }
                    Some(_) => {}
                }
            }
        }
        match id.as_str() {
            "==" => self.warn(Code::ExpectedAB, node, &["===", "=="]),
            "!=" => self.warn(Code::ExpectedAB, node, &["!==", "!="]),
            "||" => {
                for side in [left, right] {
                    if self.id(side) == "&&" && !side.wrapped {
                        self.warn(Code::And, side, &[]);
                    }
                }
            }
            "in" => self.warn(Code::InfixIn, node, &[]),
            "instanceof" => self.warn(Code::UnexpectedA, node, &[]),
            _ => {}
        }
    }

    fn enter_function(&mut self, node: &Node, shape: FunctionShape<'_>) -> LintResult<()> {
        if shape.statement && !self.ctx.scopes.scope(self.current_block()).body {
            self.warn(Code::UnexpectedA, node, &[]);
        }
        self.blocks.push(shape.scope);
        self.functions.push(shape.scope);
        self.ctx.scopes.scope_mut(shape.scope).live.clear();
        if let Some(name) = self.ctx.scopes.scope(shape.scope).name {
            let b = self.ctx.scopes.binding_mut(name);
            b.dead = false;
            b.init = true;
        }
        match shape.accessor {
            Some(Accessor::Get) if !shape.params.is_empty() => {
                self.warn(Code::BadGet, node, &[]);
            }
            Some(Accessor::Set) if shape.params.len() != 1 => {
                self.warn(Code::BadSet, node, &[]);
            }
            _ => {}
        }
        for param in shape.params {
            match param {
                Param::Name(declarator) => {
                    if let Some(default) = &declarator.init {
                        self.walk_expression(default)?;
                    }
                    if let Some(binding) = declarator.binding {
                        let b = self.ctx.scopes.binding_mut(binding);
                        b.dead = false;
                        b.init = true;
                    }
                }
                Param::Destructure { names, .. } => {
                    for declarator in names {
                        if let Some(default) = &declarator.init {
                            self.walk_expression(default)?;
                        }
                        if let Some(binding) = declarator.binding {
                            self.make_live(binding);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Resolve a variable reference and count the read
    fn reference(&mut self, node: &Node) {
        let Some(binding) = self.lookup(node) else {
            return;
        };
        self.resolved.insert(node.tok, binding);
        let b = self.ctx.scopes.binding(binding);
        if !b.dead && !b.init && b.role == Role::Variable && b.function == self.current_function() {
            self.warn(Code::UninitializedA, node, &[]);
        }
        let outer_function = self
            .functions
            .iter()
            .any(|&f| self.ctx.scopes.scope(f).name == Some(binding));
        if !outer_function {
            self.ctx.scopes.binding_mut(binding).used += 1;
        }
    }

    /// Find the binding a name refers to
    ///
    /// The current block is searched first, then the enclosing blocks from
    /// the inside out, skipping labels. Crossing a function marks the
    /// binding as a closure. A name whose block is no longer open still
    /// resolves, to a dead binding. An unknown name that is a declared global gets
    /// a read-only global binding; any other unknown name is undeclared.
    /// The result is aliased into the current block.
    fn lookup(&mut self, node: &Node) -> Option<BindingId> {
        let name = self.id(node).to_string();
        let current = self.current_block();
        let binding = match self.ctx.scopes.get(current, &name) {
            Some(binding) => {
                if self.ctx.scopes.binding(binding).role == Role::Label {
                    self.warn(Code::LabelA, node, &[]);
                }
                binding
            }
            None => {
                let mut closure = false;
                let mut found = None;
                for &scope in self.blocks[..self.blocks.len().saturating_sub(1)].iter().rev() {
                    if let Some(candidate) = self.ctx.scopes.get(scope, &name) {
                        if self.ctx.scopes.binding(candidate).role != Role::Label {
                            found = Some(candidate);
                            break;
                        }
                    }
                    if matches!(
                        self.ctx.scopes.scope(scope).kind,
                        ScopeKind::Function | ScopeKind::Arrow
                    ) {
                        closure = true;
                    }
                }
                if found.is_none() {
                    if let Some((candidate, crossed)) = self.closed_binding(&name) {
                        found = Some(candidate);
                        closure = crossed;
                    }
                }
                let binding = match found {
                    Some(binding) => binding,
                    None if self.ctx.declared_globals.contains(&name) => {
                        trace!(name = %name, "implied global");
                        self.ctx.scopes.add_binding(Binding {
                            name: name.clone(),
                            token: None,
                            line: 0,
                            column: 0,
                            role: Role::Variable,
                            scope: GLOBAL,
                            function: GLOBAL,
                            writable: false,
                            used: 0,
                            init: true,
                            dead: false,
                            closure: false,
                            calls: None,
                        })
                    }
                    None => {
                        self.warn(Code::UndeclaredA, node, &[]);
                        return None;
                    }
                };
                if closure {
                    self.ctx.scopes.binding_mut(binding).closure = true;
                }
                self.ctx
                    .scopes
                    .scope_mut(current)
                    .context
                    .insert(name, binding);
                binding
            }
        };
        if self.ctx.scopes.binding(binding).dead && !self.is_recursive_call(binding) {
            self.warn(Code::OutOfScopeA, node, &[]);
        }
        Some(binding)
    }

    /// A name declared in a block that is not open, in the current function
    /// or an enclosing one, and whether a function boundary was crossed
    fn closed_binding(&self, name: &str) -> Option<(BindingId, bool)> {
        let current = self.current_function();
        self.functions.iter().rev().find_map(|&function| {
            self.ctx
                .scopes
                .bindings
                .iter()
                .position(|b| {
                    b.name == name
                        && b.function == function
                        && b.dead
                        && b.role != Role::Label
                        && self.ctx.scopes.scope(b.scope).kind == ScopeKind::Block
                })
                .map(|id| (id, function != current))
        })
    }

    /// True if a dead function name is called from a function it calls
    fn is_recursive_call(&self, binding: BindingId) -> bool {
        let b = self.ctx.scopes.binding(binding);
        let Some(calls) = &b.calls else {
            return false;
        };
        self.functions.iter().any(|&f| {
            self.ctx.scopes.scope(f).name.is_some_and(|name| {
                let caller = self.ctx.scopes.binding(name);
                calls.contains(&caller.name) && caller.function == b.function
            })
        })
    }

    // Post-order rules

    fn leave(&mut self, node: &Node) -> LintResult<()> {
        match &node.kind {
            NodeKind::Unary { operand } => self.leave_unary(node, operand),
            NodeKind::Template { exprs, .. } => {
                if exprs.iter().all(|e| self.is_constant(e)) {
                    self.constants.mark(node);
                }
            }
            NodeKind::Function(_) | NodeKind::Arrow(_) => {
                self.functions.pop();
                if node.wrapped {
                    self.warn(Code::UnexpectedParens, node, &[]);
                }
                self.pop_block();
            }
            NodeKind::Binary { left, right } => self.leave_binary(node, left, right),
            NodeKind::Member { object, name } => self.leave_member(node, object, *name),
            NodeKind::Index { object, index } => self.leave_index(node, object, index),
            NodeKind::Call { callee, args } => self.leave_call(node, callee, args)?,
            NodeKind::Assign { target, value } => self.leave_assign(node, target, value),
            NodeKind::Ternary {
                test,
                consequent,
                alternate,
            } => self.leave_ternary(node, test, consequent, alternate),
            _ => {}
        }
        Ok(())
    }

    fn leave_unary(&mut self, node: &Node, operand: &Node) {
        let constant = self.is_constant(operand);
        match self.id(node) {
            "!" => {
                if constant {
                    self.warn(Code::UnexpectedA, node, &[]);
                }
            }
            "!!" => self.warn(Code::ExpectedAB, node, &["Boolean(...)", "!!"]),
            "new" => {}
            "+" => {
                if constant {
                    self.constants.mark(node);
                }
                self.warn(Code::ExpectedAB, node, &["Number(...)", "+"]);
            }
            _ => {
                if constant {
                    self.constants.mark(node);
                }
            }
        }
    }

    fn leave_binary(&mut self, node: &Node, left: &Node, right: &Node) {
        let id = self.id(node).to_string();
        let left_constant = self.is_constant(left);
        let right_constant = self.is_constant(right);
        if rules::is_relation(&id)
            && (rules::is_weird(left)
                || rules::is_weird(right)
                || self.similar(left, right)
                || (left_constant && right_constant)
                || (left_constant && self.id(right) == "!")
                || (self.id(left) == "!" && right_constant))
        {
            self.warn(Code::WeirdRelationA, node, &[]);
        }
        let left_empty = left.string_value(&self.ctx.tokens) == Some("");
        let right_empty = right.string_value(&self.ctx.tokens) == Some("");
        if id == "+" && left_empty {
            self.warn(Code::ExpectedAB, node, &["String(...)", "\"\" +"]);
        } else if id == "+" && right_empty {
            self.warn(Code::ExpectedAB, node, &["String(...)", "+ \"\""]);
        } else if id != "=>" && id != "(" {
            if matches!(id.as_str(), "+" | "-")
                && self.id(right) == id
                && matches!(right.kind, NodeKind::Unary { .. })
                && !right.wrapped
            {
                self.warn(Code::WrapUnary, right, &[]);
            } else if left_constant && right_constant {
                self.constants.mark(node);
            }
        }
        match id.as_str() {
            "&&" => {
                if rules::is_weird(left)
                    || self.similar(left, right)
                    || left_constant
                    || right_constant
                {
                    self.warn(Code::WeirdConditionA, node, &[]);
                }
            }
            "||" => {
                if rules::is_weird(left) || self.similar(left, right) || left_constant {
                    self.warn(Code::WeirdConditionA, node, &[]);
                }
            }
            _ => {}
        }
    }

    fn leave_member(&mut self, node: &Node, object: &Node, name: usize) {
        let name_id = self.token_id(name).to_string();
        let object_id = self.id(object).to_string();
        if object_id == "RegExp" {
            self.warn(Code::WeirdExpressionA, node, &[]);
        } else if object_id == "import" && name_id != "meta" {
            self.ctx.warn(Code::UnexpectedA, name, &[]);
        }
        if self.is_import_meta(object) && !IMPORT_META_NAMES.contains(&name_id.as_str()) {
            self.ctx.warn(Code::BadImportMetaA, name, &[]);
        }
    }

    /// True for `import.meta`
    fn is_import_meta(&self, node: &Node) -> bool {
        match &node.kind {
            NodeKind::Member { object, name } => {
                matches!(self.id(node), "." | "?.")
                    && self.token_id(*name) == "meta"
                    && self.id(object) == "import"
            }
            _ => false,
        }
    }

    fn leave_index(&mut self, node: &Node, object: &Node, index: &Node) {
        if self.id(object) == "globalThis" {
            self.warn(Code::WeirdExpressionA, node, &["globalThis[...]"]);
        }
        if self.is_import_meta(object) {
            self.warn(Code::WeirdExpressionA, node, &["import.meta[...]"]);
        }
        if self.id(object) == "RegExp" {
            self.warn(Code::WeirdExpressionA, node, &[]);
        }
        if rules::is_weird(index) {
            self.warn(Code::WeirdExpressionA, index, &[]);
        }
    }

    fn leave_call(&mut self, node: &Node, callee: &Node, args: &[Node]) -> LintResult<()> {
        let (the_new, left) = match &callee.kind {
            NodeKind::Unary { operand } if self.id(callee) == "new" => (Some(callee), &**operand),
            _ => (None, callee),
        };
        let dynamic_import = self.id(left) == "import"
            || match &left.kind {
                NodeKind::Member { object, name } => {
                    self.id(left) == "."
                        && self.token_id(*name) == "resolve"
                        && self.is_import_meta(object)
                        && self.id(object) == "."
                }
                _ => false,
            };
        if dynamic_import {
            self.check_module_argument(node, args)?;
        }
        let left_id = self.id(left).to_string();
        if matches!(left.kind, NodeKind::Function(_)) {
            if !node.wrapped {
                self.warn(Code::WrapImmediate, node, &[]);
            }
        } else if left.is_identifier(&self.ctx.tokens) {
            let first = left_id.chars().next().unwrap_or('_');
            let wrapper = PRIMITIVE_WRAPPERS.contains(&left_id.as_str());
            match the_new {
                Some(the_new) => {
                    if first > 'Z' || wrapper {
                        self.warn(Code::UnexpectedA, the_new, &[]);
                    } else if left_id == "Function" {
                        if !self.ctx.options.eval {
                            self.warn(Code::UnexpectedA, left, &["new Function"]);
                        }
                    } else if left_id == "Array" {
                        if args.len() != 1 || matches!(args[0].kind, NodeKind::String) {
                            self.warn(Code::ExpectedAB, left, &["[]", "new Array"]);
                        }
                    } else if left_id == "Object" {
                        self.warn(
                            Code::ExpectedAB,
                            left,
                            &["Object.create(null)", "new Object"],
                        );
                    }
                }
                None => {
                    if first.is_ascii_uppercase() && !wrapper {
                        let saw = self.ctx.artifact(left.tok);
                        self.warn(Code::ExpectedABeforeB, left, &["new", &saw]);
                    }
                }
            }
        } else if let NodeKind::Member { object, name } = &left.kind {
            if left_id == "." {
                self.check_method_call(the_new, object, *name)?;
            }
        }
        Ok(())
    }

    /// `import("m")` and `import.meta.resolve("m")` take one module name
    fn check_module_argument(&mut self, node: &Node, args: &[Node]) -> LintResult<()> {
        let Some(first) = args.first() else {
            let (line, thru) = self
                .ctx
                .tokens
                .get(node.tok)
                .map_or((0, 0), |t| (t.line, t.thru));
            self.ctx.warn_at(Code::ExpectedStringA, line, thru, &[""]);
            return Ok(());
        };
        if let Some(extra) = args.get(1) {
            self.warn(Code::UnexpectedA, extra, &[]);
        } else if !matches!(first.kind, NodeKind::String) {
            self.warn(Code::ExpectedTypeStringA, first, &[]);
        } else {
            let name = first.string_value(&self.ctx.tokens).unwrap_or_default();
            if !Pattern::ModuleName.is_match(name)? {
                self.warn(Code::BadModuleNameA, first, &[]);
            }
        }
        if let Some(value) = self.ctx.tokens.get(first.tok).and_then(|t| t.value.clone()) {
            self.ctx.froms.push(value);
        }
        Ok(())
    }

    /// Capitalised methods are constructors; `Date.UTC` is the exception
    fn check_method_call(
        &mut self,
        the_new: Option<&Node>,
        object: &Node,
        name: usize,
    ) -> LintResult<()> {
        let name_id = self.token_id(name).to_string();
        let mut expects_new = the_new.is_some();
        if self.id(object) == "Date" && name_id == "UTC" {
            expects_new = !expects_new;
        }
        if Pattern::InitialCap.is_match(&name_id)? != expects_new {
            match the_new {
                Some(the_new) => self.warn(Code::UnexpectedA, the_new, &[]),
                None => self.warn(Code::ExpectedABeforeB, object, &["new", &name_id]),
            }
        }
        if name_id == "getTime" {
            if let NodeKind::Call { callee, args } = &object.kind {
                if args.is_empty() && self.id(callee) == "new" {
                    if let NodeKind::Unary { operand } = &callee.kind {
                        if self.id(operand) == "Date" {
                            self.warn(
                                Code::ExpectedAB,
                                callee,
                                &["Date.now()", "new Date().getTime()"],
                            );
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn leave_assign(&mut self, node: &Node, target: &Node, value: &Node) {
        let id = self.id(node).to_string();
        if id == "+=" && self.is_constant(value) {
            let tokens = &self.ctx.tokens;
            let no_op = value.string_value(tokens) == Some("")
                || (matches!(value.kind, NodeKind::Number)
                    && tokens.get(value.tok).and_then(|t| t.value.as_deref()) == Some("0"))
                || matches!(value.id(tokens), "null" | "undefined" | "NaN");
            if no_op {
                self.warn(Code::UnexpectedA, value, &[]);
            }
        }
        if id == "=" {
            match &target.kind {
                NodeKind::Variable => self.init_variable(target),
                NodeKind::Array { elements } => self.init_elements(elements),
                NodeKind::Object { properties } => {
                    let values: Vec<usize> = properties.iter().map(|p| p.value.tok).collect();
                    for tok in values {
                        if let Some(&binding) = self.resolved.get(&tok) {
                            self.ctx.scopes.binding_mut(binding).init = true;
                        }
                    }
                }
                NodeKind::Member { object, .. } => {
                    if self.id(target) == "." && self.id(value) == "undefined" {
                        self.warn(Code::ExpectedAB, object, &["delete", "undefined"]);
                    }
                }
                _ => {}
            }
            return;
        }
        if matches!(target.kind, NodeKind::Variable) {
            let writable = self
                .resolved
                .get(&target.tok)
                .is_some_and(|&b| self.ctx.scopes.binding(b).writable);
            if !writable {
                self.warn(Code::BadAssignmentA, target, &[]);
            }
        }
        let value_id = self.id(value);
        let odd = matches!(value.kind, NodeKind::Function(_) | NodeKind::Arrow(_))
            || (value.is_literal_constant(&self.ctx.tokens)
                || (matches!(value.kind, NodeKind::Constant) && value_id == "null"))
                && !matches!(value.kind, NodeKind::Number)
                && (!matches!(value.kind, NodeKind::String) || id != "+=");
        if odd {
            self.warn(Code::UnexpectedA, value, &[]);
        }
    }

    fn init_elements(&mut self, elements: &[Node]) {
        for element in elements {
            if let Some(&binding) = self.resolved.get(&element.tok) {
                self.ctx.scopes.binding_mut(binding).init = true;
            }
        }
    }

    /// Plain assignment: the target must be writable and becomes initialized
    fn init_variable(&mut self, target: &Node) {
        match self.lookup(target) {
            Some(binding) if self.ctx.scopes.binding(binding).writable => {
                self.resolved.insert(target.tok, binding);
                self.ctx.scopes.binding_mut(binding).init = true;
            }
            _ => self.warn(Code::BadAssignmentA, target, &[]),
        }
    }

    fn leave_ternary(&mut self, node: &Node, test: &Node, consequent: &Node, alternate: &Node) {
        let consequent_id = self.id(consequent);
        let alternate_id = self.id(alternate);
        let boolean_branches = (consequent_id == "true" && alternate_id == "false")
            || (consequent_id == "false" && alternate_id == "true");
        let negated = consequent_id == "false";
        if !node.wrapped && !self.snug.contains(&node.tok) {
            self.warn(Code::UseOpen, node, &[]);
        } else if rules::is_weird(test)
            || self.is_constant(test)
            || self.similar(consequent, alternate)
        {
            self.warn(Code::UnexpectedA, node, &[]);
        } else if self.similar(test, consequent) {
            self.warn(Code::ExpectedAB, node, &["||", "?"]);
        } else if self.similar(test, alternate) {
            self.warn(Code::ExpectedAB, node, &["&&", "?"]);
        } else if boolean_branches && !negated {
            self.warn(Code::ExpectedAB, node, &["Boolean(...)", "?"]);
        } else if boolean_branches {
            self.warn(Code::ExpectedAB, node, &["!", "?"]);
        } else if !test.wrapped && matches!(self.id(test), "||" | "&&") {
            self.warn(Code::WrapCondition, test, &[]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{Options, Source};
    use parser::{parse, tokenize, Tree};

    fn walked(text: &str, options: Options) -> Context {
        let mut ctx = Context::new(options, &[]);
        ctx.lines = Source::from(text).into_lines();
        tokenize(&mut ctx).unwrap();
        let (tree, outcome) = parse(&mut ctx);
        outcome.unwrap();
        let Some(Tree::Program(statements)) = tree else {
            panic!("expected a program");
        };
        walk(&mut ctx, &statements).unwrap();
        ctx
    }

    fn codes(text: &str) -> Vec<Code> {
        walked(text, Options::default())
            .warnings
            .iter()
            .map(|w| w.code)
            .collect()
    }

    #[test]
    fn test_loose_equality() {
        let found = walked("let a = 1;\nlet b = 2;\nlet c = a == b;\n", Options::default());
        assert_eq!(found.warnings.len(), 1);
        assert_eq!(found.warnings[0].code, Code::ExpectedAB);
        assert_eq!(found.warnings[0].a.as_deref(), Some("==="));
    }

    #[test]
    fn test_undeclared_name() {
        assert_eq!(codes("let a = b;\n"), vec![Code::UndeclaredA]);
    }

    #[test]
    fn test_declared_global_is_implied() {
        let ctx = walked("let a = Math.PI;\n", Options::default());
        assert!(ctx.warnings.is_empty(), "{:?}", ctx.warnings);
        let math = ctx.scopes.get(GLOBAL, "Math").unwrap();
        let math = ctx.scopes.binding(math);
        assert_eq!(math.used, 1);
        assert!(!math.writable);
    }

    #[test]
    fn test_read_before_let_is_out_of_scope() {
        assert_eq!(
            codes("function f() {\n    let b = a;\n    let a = 1;\n    return b;\n}\n"),
            vec![Code::OutOfScopeA]
        );
    }

    #[test]
    fn test_call_to_later_function_is_out_of_scope() {
        let ctx = walked(
            "function a() {\n    return b();\n}\nfunction b() {\n    return 1;\n}\n",
            Options::default(),
        );
        let found: Vec<_> = ctx
            .warnings
            .iter()
            .map(|w| (w.code, w.line, w.column))
            .collect();
        assert_eq!(found, vec![(Code::OutOfScopeA, 1, 11)]);
    }

    #[test]
    fn test_mutual_recursion_is_not_out_of_scope() {
        assert!(codes(
            "function a(n) {\n    return b(n);\n}\nfunction b(n) {\n    return a(n);\n}\n"
        )
        .is_empty());
    }

    #[test]
    fn test_name_from_closed_block_is_out_of_scope() {
        let ctx = walked(
            "function f(c) {\n    if (c) {\n        let a = 1;\n        c = a;\n    }\n    return a;\n}\n",
            Options::default(),
        );
        assert_eq!(ctx.warnings.len(), 1, "{:?}", ctx.warnings);
        let warning = &ctx.warnings[0];
        assert_eq!(warning.code, Code::OutOfScopeA);
        assert_eq!((warning.line, warning.column), (5, 11));
        assert_eq!(warning.a.as_deref(), Some("a"));
    }

    #[test]
    fn test_read_before_assignment_is_uninitialized() {
        let ctx = walked("let x;\nif (x) {\n    x = 1;\n}\n", Options::default());
        assert_eq!(ctx.warnings.len(), 1);
        assert_eq!(ctx.warnings[0].code, Code::UninitializedA);
        assert_eq!(ctx.warnings[0].a.as_deref(), Some("x"));
    }

    #[test]
    fn test_closure_reference_is_marked() {
        let ctx = walked(
            "let a = 1;\nfunction f() {\n    return a;\n}\nf();\n",
            Options::default(),
        );
        assert!(ctx.warnings.is_empty(), "{:?}", ctx.warnings);
        let a = ctx.scopes.binding(ctx.scopes.get(GLOBAL, "a").unwrap());
        assert!(a.closure);
        assert_eq!(a.used, 1);
    }

    #[test]
    fn test_assignment_to_const() {
        assert_eq!(codes("const a = 1;\na = 2;\n"), vec![Code::BadAssignmentA]);
    }

    #[test]
    fn test_compound_assignment_with_empty_string() {
        assert_eq!(codes("let a = \"x\";\na += \"\";\n"), vec![Code::UnexpectedA]);
    }

    #[test]
    fn test_typeof_comparisons() {
        assert_eq!(
            codes("let a = 1;\nlet b = typeof a === \"undefined\";\n"),
            vec![Code::UnexpectedTypeofA]
        );
        assert_eq!(
            codes("let a = 1;\nlet b = typeof a === \"integer\";\n"),
            vec![Code::ExpectedTypeStringA]
        );
    }

    #[test]
    fn test_nan_comparison() {
        assert_eq!(codes("let a = 1;\nlet b = a === NaN;\n"), vec![Code::NumberIsNaN]);
    }

    #[test]
    fn test_similar_operands_are_weird() {
        assert_eq!(codes("let a = 1;\nlet b = a === a;\n"), vec![Code::WeirdRelationA]);
    }

    #[test]
    fn test_unwrapped_ternary() {
        assert_eq!(
            codes("let a = 1;\nlet b = a ? 1 : 2;\n"),
            vec![Code::UseOpen]
        );
        assert!(codes("let a = 1;\nlet b = (a ? 1 : 2);\n").is_empty());
    }

    #[test]
    fn test_ternary_returning_booleans() {
        assert_eq!(
            codes("let a = 1;\nlet b = (a ? true : false);\n"),
            vec![Code::ExpectedAB]
        );
    }

    #[test]
    fn test_capitalised_call_needs_new() {
        assert_eq!(codes("let Thing = 1;\nThing();\n"), vec![Code::ExpectedABeforeB]);
    }

    #[test]
    fn test_new_date_get_time() {
        let ctx = walked("let t = new Date().getTime();\n", Options::default());
        assert_eq!(ctx.warnings.len(), 1);
        assert_eq!(ctx.warnings[0].a.as_deref(), Some("Date.now()"));
    }

    #[test]
    fn test_bitwise_needs_option() {
        assert_eq!(codes("let a = 1;\nlet b = a | 2;\n"), vec![Code::UnexpectedA]);
        let ctx = walked(
            "let a = 1;\nlet b = a | 2;\n",
            Options::from_map([("bitwise", true)]),
        );
        assert!(ctx.warnings.is_empty());
    }

    #[test]
    fn test_bare_expression_statement() {
        assert_eq!(codes("let a = 1;\na;\n"), vec![Code::UnexpectedExpressionA]);
    }

    #[test]
    fn test_dynamic_import_collects_module() {
        let ctx = walked("let m = import(\"./m.js\");\n", Options::default());
        assert!(ctx.froms.contains(&"./m.js".to_string()));
    }

    #[test]
    fn test_getter_parameters() {
        let ctx = walked(
            "let o = {\n    get a(b) {\n        return b;\n    }\n};\n",
            Options::from_map([("getset", true)]),
        );
        let codes: Vec<Code> = ctx.warnings.iter().map(|w| w.code).collect();
        assert_eq!(codes, vec![Code::BadGet]);
    }

    #[test]
    fn test_recursive_function_is_not_counted_as_use() {
        let ctx = walked(
            "function f(n) {\n    return f(n);\n}\n",
            Options::default(),
        );
        let f = ctx.scopes.binding(ctx.scopes.get(GLOBAL, "f").unwrap());
        assert_eq!(f.used, 0);
    }
}
