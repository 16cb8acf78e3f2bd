//! Scope and binding arenas
//!
//! Scopes and bindings are stored in flat vectors and referred to by index.
//! A scope's parent is never stored: the parser and walker keep an explicit
//! stack while they descend. A binding does keep back-references to its
//! owning scope and function, for lookups only.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Index into [`Scopes::scopes`]
pub type ScopeId = usize;

/// Index into [`Scopes::bindings`]
pub type BindingId = usize;

/// The outermost scope is always scope 0
pub const GLOBAL: ScopeId = 0;

/// What kind of construct owns a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    /// The file
    Global,
    /// A `function` statement, expression or method
    Function,
    /// An arrow function
    Arrow,
    /// A braced block
    Block,
}

/// Role a binding was declared with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// `let`, `const`, `import`, function statement name, or implied global
    Variable,
    /// Function parameter
    Parameter,
    /// Name of a function expression, visible inside it
    Function,
    /// `catch` parameter
    Exception,
    /// Statement label
    Label,
}

/// A name entry in a scope's context
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Binding {
    /// The declared name
    pub name: String,
    /// Declaring token, or `None` for implied globals
    pub token: Option<usize>,
    /// Line of the declaration
    pub line: usize,
    /// Column of the declaration
    pub column: usize,
    /// Declared role
    pub role: Role,
    /// Owning scope
    pub scope: ScopeId,
    /// Owning function scope (or the global scope)
    pub function: ScopeId,
    /// False for `const`, imports, and other read-only names
    pub writable: bool,
    /// Number of reads
    pub used: u32,
    /// True once a value has been assigned
    pub init: bool,
    /// True while the name is outside its lexical lifetime
    pub dead: bool,
    /// True if referenced from a nested function
    pub closure: bool,
    /// For function statement names: names of functions this one calls
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calls: Option<BTreeSet<String>>,
}

/// A block, function body, or the global scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scope {
    /// Owning construct
    pub kind: ScopeKind,
    /// Token that opened the scope, if any
    pub token: Option<usize>,
    /// True for function bodies and the global scope
    pub body: bool,
    /// True for function expressions and methods
    pub expression: bool,
    /// Names visible here; may contain aliases to outer bindings
    pub context: BTreeMap<String, BindingId>,
    /// Bindings made live while walking this scope
    #[serde(skip)]
    pub live: Vec<BindingId>,
    /// The function's own name binding
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<BindingId>,
    /// Function nesting level, 0 for the global scope
    pub level: usize,
    /// Loops currently open in this function while parsing
    #[serde(skip)]
    pub loop_depth: u32,
    /// `try` blocks currently open in this function while parsing
    #[serde(skip)]
    pub try_depth: u32,
    /// `finally` blocks currently open in this function while parsing
    #[serde(skip)]
    pub finally_depth: u32,
}

impl Scope {
    fn new(kind: ScopeKind, token: Option<usize>) -> Self {
        Self {
            kind,
            token,
            body: false,
            expression: false,
            context: BTreeMap::new(),
            live: Vec::new(),
            name: None,
            level: 0,
            loop_depth: 0,
            try_depth: 0,
            finally_depth: 0,
        }
    }
}

/// Arena holding every scope and binding of one analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scopes {
    /// All scopes; index 0 is global
    pub scopes: Vec<Scope>,
    /// All bindings
    pub bindings: Vec<Binding>,
}

impl Default for Scopes {
    fn default() -> Self {
        Self::new()
    }
}

impl Scopes {
    /// Create an arena holding only the global scope
    pub fn new() -> Self {
        let mut global = Scope::new(ScopeKind::Global, None);
        global.body = true;
        Self {
            scopes: vec![global],
            bindings: Vec::new(),
        }
    }

    /// Open a new scope and return its id
    pub fn push_scope(&mut self, kind: ScopeKind, token: Option<usize>) -> ScopeId {
        self.scopes.push(Scope::new(kind, token));
        self.scopes.len() - 1
    }

    /// Add a binding and register it in its scope's context
    pub fn add_binding(&mut self, binding: Binding) -> BindingId {
        let id = self.bindings.len();
        let scope = binding.scope;
        let name = binding.name.clone();
        self.bindings.push(binding);
        self.scopes[scope].context.insert(name, id);
        id
    }

    /// Shared access to a scope
    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id]
    }

    /// Mutable access to a scope
    pub fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id]
    }

    /// Shared access to a binding
    pub fn binding(&self, id: BindingId) -> &Binding {
        &self.bindings[id]
    }

    /// Mutable access to a binding
    pub fn binding_mut(&mut self, id: BindingId) -> &mut Binding {
        &mut self.bindings[id]
    }

    /// Look a name up in one scope's context only
    pub fn get(&self, scope: ScopeId, name: &str) -> Option<BindingId> {
        self.scopes[scope].context.get(name).copied()
    }

    /// Names declared in the global scope, sorted
    pub fn global_names(&self) -> Vec<String> {
        self.scopes[GLOBAL].context.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding(name: &str, scope: ScopeId) -> Binding {
        Binding {
            name: name.into(),
            token: None,
            line: 0,
            column: 0,
            role: Role::Variable,
            scope,
            function: GLOBAL,
            writable: true,
            used: 0,
            init: false,
            dead: true,
            closure: false,
            calls: None,
        }
    }

    #[test]
    fn test_new_arena_has_global() {
        let scopes = Scopes::new();
        assert_eq!(scopes.scopes.len(), 1);
        assert_eq!(scopes.scope(GLOBAL).kind, ScopeKind::Global);
        assert!(scopes.scope(GLOBAL).body);
    }

    #[test]
    fn test_add_binding_registers_in_context() {
        let mut scopes = Scopes::new();
        let block = scopes.push_scope(ScopeKind::Block, Some(3));
        let id = scopes.add_binding(binding("a", block));
        assert_eq!(scopes.get(block, "a"), Some(id));
        assert_eq!(scopes.get(GLOBAL, "a"), None);
    }

    #[test]
    fn test_global_names_sorted() {
        let mut scopes = Scopes::new();
        scopes.add_binding(binding("zed", GLOBAL));
        scopes.add_binding(binding("alpha", GLOBAL));
        assert_eq!(scopes.global_names(), vec!["alpha", "zed"]);
    }
}
