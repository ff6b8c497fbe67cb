//! Scope analysis: hoist top-level functions, then resolve every identifier
//! use against the scope tree built during the walk.

use crate::ast::{Block, Expr, Function, Item, Program, Stmt};
use crate::sema::scope::{ScopeError, ScopeStack};

pub struct ScopeAnalyzer {
    scopes: ScopeStack,
}

impl ScopeAnalyzer {
    pub fn new() -> Self {
        Self {
            scopes: ScopeStack::new(),
        }
    }

    /// Runs both passes. On success the scope stack (its global scope still
    /// holding the hoisted function symbols) is handed back as the seed
    /// state for type checking.
    pub fn analyze(mut self, program: &Program) -> Result<ScopeStack, ScopeError> {
        for item in &program.items {
            if let Item::Function(func) = item {
                let param_types = func.params.iter().map(|p| p.ty).collect();
                self.scopes
                    .declare_function(&func.name, func.ret_type, param_types)?;
            }
        }
        for item in &program.items {
            match item {
                Item::Function(func) => self.analyze_function(func)?,
                Item::Stmt(stmt) => self.analyze_stmt(stmt)?,
            }
        }
        Ok(self.scopes)
    }

    /// Parameters and body statements share one scope; only nested blocks
    /// open further scopes.
    fn analyze_function(&mut self, func: &Function) -> Result<(), ScopeError> {
        self.scopes.enter_scope();
        for param in &func.params {
            self.scopes.declare_variable(&param.name, param.ty)?;
        }
        for stmt in &func.body.stmts {
            self.analyze_stmt(stmt)?;
        }
        self.scopes.exit_scope();
        Ok(())
    }

    fn analyze_block(&mut self, block: &Block) -> Result<(), ScopeError> {
        self.scopes.enter_scope();
        for stmt in &block.stmts {
            self.analyze_stmt(stmt)?;
        }
        self.scopes.exit_scope();
        Ok(())
    }

    fn analyze_stmt(&mut self, stmt: &Stmt) -> Result<(), ScopeError> {
        match stmt {
            Stmt::VarDecl { ty, name, init } => {
                // The initializer is resolved before the name exists, so
                // `int x = x;` is an undeclared access.
                if let Some(init) = init {
                    self.analyze_expr(init)?;
                }
                self.scopes.declare_variable(name, *ty)
            }
            Stmt::Return(expr) => {
                if let Some(expr) = expr {
                    self.analyze_expr(expr)?;
                }
                Ok(())
            }
            Stmt::If {
                cond,
                then_block,
                else_block,
            } => {
                self.analyze_expr(cond)?;
                self.analyze_block(then_block)?;
                if let Some(else_block) = else_block {
                    self.analyze_block(else_block)?;
                }
                Ok(())
            }
            Stmt::While { cond, body } => {
                self.analyze_expr(cond)?;
                self.analyze_block(body)
            }
            Stmt::Block(block) => self.analyze_block(block),
            Stmt::Expr(expr) => self.analyze_expr(expr),
        }
    }

    fn analyze_expr(&mut self, expr: &Expr) -> Result<(), ScopeError> {
        match expr {
            Expr::Binary { lhs, rhs, .. } => {
                self.analyze_expr(lhs)?;
                self.analyze_expr(rhs)
            }
            Expr::Unary { operand, .. } => self.analyze_expr(operand),
            Expr::Literal { .. } => Ok(()),
            Expr::Identifier(name) => self.scopes.require_symbol(name).map(|_| ()),
            Expr::Call { callee, args } => {
                self.scopes.require_function(callee)?;
                for arg in args {
                    self.analyze_expr(arg)?;
                }
                Ok(())
            }
            Expr::Assign { target, value, .. } => {
                self.scopes.require_symbol(target)?;
                self.analyze_expr(value)
            }
        }
    }
}

impl Default for ScopeAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
