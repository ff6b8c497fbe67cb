//! Lexical scope tree. Scopes live in an arena with parent indices; exited
//! scopes stay in the arena, so the structure remains a tree rooted at the
//! global scope while the cursor follows the walk.

use crate::ast::Type;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeErrorKind {
    UndeclaredVariableAccessed,
    UndefinedFunctionCalled,
    VariableRedefinition,
    FunctionPrototypeRedefinition,
}

impl ScopeErrorKind {
    fn message(self) -> &'static str {
        match self {
            ScopeErrorKind::UndeclaredVariableAccessed => "Undeclared variable accessed",
            ScopeErrorKind::UndefinedFunctionCalled => "Undefined function called",
            ScopeErrorKind::VariableRedefinition => "Variable redefinition in same scope",
            ScopeErrorKind::FunctionPrototypeRedefinition => "Function redefinition",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeError {
    pub kind: ScopeErrorKind,
    pub symbol: String,
}

impl ScopeError {
    pub fn new(kind: ScopeErrorKind, symbol: impl Into<String>) -> Self {
        Self {
            kind,
            symbol: symbol.into(),
        }
    }
}

impl fmt::Display for ScopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: '{}'", self.kind.message(), self.symbol)
    }
}

impl std::error::Error for ScopeError {}

/// A declared name. Variables use only `ty`; functions keep their return
/// type in `ty` and positional parameter types in `param_types`.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub ty: Type,
    pub is_function: bool,
    pub scope_level: usize,
    pub param_types: Vec<Type>,
}

#[derive(Debug, Clone)]
struct Scope {
    parent: Option<usize>,
    symbols: HashMap<String, Symbol>,
}

#[derive(Debug, Clone)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
    current: usize,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope {
                parent: None,
                symbols: HashMap::new(),
            }],
            current: 0,
        }
    }

    pub fn enter_scope(&mut self) {
        let id = self.scopes.len();
        self.scopes.push(Scope {
            parent: Some(self.current),
            symbols: HashMap::new(),
        });
        self.current = id;
    }

    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.scopes[self.current].parent {
            self.current = parent;
        }
    }

    /// Checked insertion into the current scope. Shadowing an outer name is
    /// fine; a duplicate in the same scope is not.
    pub fn declare_variable(&mut self, name: &str, ty: Type) -> Result<(), ScopeError> {
        if self.scopes[self.current].symbols.contains_key(name) {
            return Err(ScopeError::new(ScopeErrorKind::VariableRedefinition, name));
        }
        self.insert_variable(name, ty);
        Ok(())
    }

    /// Checked insertion into the global scope, used while hoisting.
    pub fn declare_function(
        &mut self,
        name: &str,
        ret_type: Type,
        param_types: Vec<Type>,
    ) -> Result<(), ScopeError> {
        if self.scopes[0].symbols.contains_key(name) {
            return Err(ScopeError::new(
                ScopeErrorKind::FunctionPrototypeRedefinition,
                name,
            ));
        }
        self.insert_function(name, ret_type, param_types);
        Ok(())
    }

    /// Unchecked insertion, for passes that rebuild scoping the analyzer
    /// already validated.
    pub fn insert_variable(&mut self, name: &str, ty: Type) {
        let symbol = Symbol {
            name: name.to_string(),
            ty,
            is_function: false,
            scope_level: self.current,
            param_types: Vec::new(),
        };
        self.scopes[self.current].symbols.insert(name.to_string(), symbol);
    }

    pub fn insert_function(&mut self, name: &str, ret_type: Type, param_types: Vec<Type>) {
        let symbol = Symbol {
            name: name.to_string(),
            ty: ret_type,
            is_function: true,
            scope_level: 0,
            param_types,
        };
        self.scopes[0].symbols.insert(name.to_string(), symbol);
    }

    /// Searches outward from the current scope. A hit of the wrong kind
    /// (variable vs function) is skipped and the search continues in the
    /// enclosing scope, so a local may shadow a function name without
    /// hiding it from calls.
    pub fn lookup(&self, name: &str, function_lookup: bool) -> Option<&Symbol> {
        let mut scope = Some(self.current);
        while let Some(idx) = scope {
            if let Some(symbol) = self.scopes[idx].symbols.get(name) {
                if symbol.is_function == function_lookup {
                    return Some(symbol);
                }
            }
            scope = self.scopes[idx].parent;
        }
        None
    }

    pub fn require_symbol(&self, name: &str) -> Result<&Symbol, ScopeError> {
        self.lookup(name, false)
            .ok_or_else(|| ScopeError::new(ScopeErrorKind::UndeclaredVariableAccessed, name))
    }

    pub fn require_function(&self, name: &str) -> Result<&Symbol, ScopeError> {
        self.lookup(name, true)
            .ok_or_else(|| ScopeError::new(ScopeErrorKind::UndefinedFunctionCalled, name))
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shadowing_across_scopes() {
        let mut scopes = ScopeStack::new();
        scopes.declare_variable("x", Type::Int).unwrap();
        scopes.enter_scope();
        scopes.declare_variable("x", Type::Float).unwrap();
        assert_eq!(scopes.require_symbol("x").unwrap().ty, Type::Float);
        scopes.exit_scope();
        assert_eq!(scopes.require_symbol("x").unwrap().ty, Type::Int);
    }

    #[test]
    fn redefinition_in_same_scope() {
        let mut scopes = ScopeStack::new();
        scopes.declare_variable("x", Type::Int).unwrap();
        let err = scopes.declare_variable("x", Type::Int).unwrap_err();
        assert_eq!(err.kind, ScopeErrorKind::VariableRedefinition);
    }

    #[test]
    fn variable_does_not_hide_function_from_calls() {
        let mut scopes = ScopeStack::new();
        scopes.declare_function("f", Type::Int, vec![]).unwrap();
        scopes.enter_scope();
        scopes.declare_variable("f", Type::Int).unwrap();
        assert!(scopes.require_function("f").unwrap().is_function);
        assert!(!scopes.require_symbol("f").unwrap().is_function);
    }
}
