//! Unused and uninitialized bindings
//!
//! Runs after a clean walk. Every scope is visited and each binding it
//! declared is checked once; aliases copied into inner blocks by lookup
//! are skipped because they belong to another scope.

use core_types::Code;
use parser::{Context, Role};

/// Report bindings that were never read or never given a value
pub fn sweep(ctx: &mut Context) {
    let mut findings = Vec::new();
    for (id, scope) in ctx.scopes.scopes.iter().enumerate() {
        for (name, &binding) in &scope.context {
            let b = ctx.scopes.binding(binding);
            if b.scope != id || name == "_" {
                continue;
            }
            let Some(token) = b.token else {
                continue;
            };
            let named_expression = b.role == Role::Function && scope.expression;
            if b.used == 0 && !named_expression {
                findings.push((Code::UnusedA, token));
            } else if !b.init {
                findings.push((Code::UninitializedA, token));
            }
        }
    }
    for (code, token) in findings {
        ctx.warn(code, token, &[]);
    }
}
