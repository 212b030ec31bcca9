use std::collections::HashMap;

use tracing::trace;

use crate::eval::error::{RuntimeError, RuntimeErrorType};
use crate::lexer::prelude::Token;

use super::prelude::Value;

/// Index of a scope inside an [`Environment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId(usize);

impl ScopeId {
    pub const GLOBAL: ScopeId = ScopeId(0);
}

#[derive(Default, Debug, Clone, PartialEq)]
struct Scope {
    store: HashMap<String, Value>,
    enclosing: Option<ScopeId>,
}

/// Chain of lexical scopes, innermost last.
///
/// Scopes live in an arena and refer to their parent by index. A child scope
/// is always popped before its parent, so the chain never dangles.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    scopes: Vec<Scope>,
    current: ScopeId,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
            current: ScopeId::GLOBAL,
        }
    }

    pub fn current(&self) -> ScopeId {
        self.current
    }

    /// Number of scopes in the chain, the global scope included.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Opens a child of the current scope and makes it current.
    pub fn push_scope(&mut self) -> ScopeId {
        let id = ScopeId(self.scopes.len());

        self.scopes.push(Scope {
            store: HashMap::new(),
            enclosing: Some(self.current),
        });
        self.current = id;

        trace!(depth = self.depth(), "entered scope");

        id
    }

    /// Drops the innermost scope and restores its parent. The global scope
    /// is never popped.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() == 1 {
            return;
        }

        if let Some(scope) = self.scopes.pop() {
            self.current = scope.enclosing.unwrap_or(ScopeId::GLOBAL);
        }

        trace!(depth = self.depth(), "left scope");
    }

    /// Binds `name` in the current scope, shadowing outer bindings and
    /// overwriting a binding of the same scope.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.scopes[self.current.0].store.insert(name.into(), value);
    }

    pub fn get(&self, name: &Token) -> Result<Value, RuntimeError> {
        let mut scope = Some(self.current);

        while let Some(ScopeId(idx)) = scope {
            if let Some(value) = self.scopes[idx].store.get(&name.lexeme) {
                return Ok(value.clone());
            }
            scope = self.scopes[idx].enclosing;
        }

        Err(undefined(name))
    }

    /// Mutates the nearest existing binding of `name`. Never creates one.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        let mut scope = Some(self.current);

        while let Some(ScopeId(idx)) = scope {
            if let Some(var) = self.scopes[idx].store.get_mut(&name.lexeme) {
                *var = value;
                return Ok(());
            }
            scope = self.scopes[idx].enclosing;
        }

        Err(undefined(name))
    }

    pub fn is_defined(&self, name: &str) -> bool {
        let mut scope = Some(self.current);

        while let Some(ScopeId(idx)) = scope {
            if self.scopes[idx].store.contains_key(name) {
                return true;
            }
            scope = self.scopes[idx].enclosing;
        }

        false
    }
}

fn undefined(name: &Token) -> RuntimeError {
    RuntimeError {
        error: RuntimeErrorType::UndefinedVariable { name: name.lexeme.clone() },
        token: name.clone(),
    }
}
