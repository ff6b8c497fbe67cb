//! Type checking. Walks the AST once more, computing a type for every
//! expression and enforcing operator, call, and return rules. Scoping is
//! rebuilt from the analyzer's seed stack; symbol insertion here is
//! unchecked because the scope pass already validated declarations.

use crate::ast::{AssignOp, BinOp, Block, Expr, Function, Item, Program, Stmt, Type};
use crate::sema::scope::ScopeStack;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCheckErrorKind {
    ErroneousVarDecl,
    FnCallParamCount,
    FnCallParamType,
    ErroneousReturnType,
    ExpressionTypeMismatch,
    NonBooleanCondStmt,
    EmptyExpression,
    AttemptedBoolOpOnNonBools,
    AttemptedAddOpOnNonNumeric,
    ReturnStmtNotFound,
}

impl TypeCheckErrorKind {
    fn message(self) -> &'static str {
        match self {
            TypeCheckErrorKind::ErroneousVarDecl => "Erroneous variable declaration",
            TypeCheckErrorKind::FnCallParamCount => "Function call parameter count mismatch",
            TypeCheckErrorKind::FnCallParamType => "Function call parameter type mismatch",
            TypeCheckErrorKind::ErroneousReturnType => "Return type mismatch",
            TypeCheckErrorKind::ExpressionTypeMismatch => "Expression type mismatch",
            TypeCheckErrorKind::NonBooleanCondStmt => {
                "Non-boolean condition in control statement"
            }
            TypeCheckErrorKind::EmptyExpression => "Empty expression",
            TypeCheckErrorKind::AttemptedBoolOpOnNonBools => {
                "Boolean operation on non-boolean operands"
            }
            TypeCheckErrorKind::AttemptedAddOpOnNonNumeric => {
                "Arithmetic operation on non-numeric operands"
            }
            TypeCheckErrorKind::ReturnStmtNotFound => {
                "Missing return statement in non-void function"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCheckError {
    pub kind: TypeCheckErrorKind,
    pub detail: String,
}

impl TypeCheckError {
    pub fn new(kind: TypeCheckErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for TypeCheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.message())?;
        if !self.detail.is_empty() {
            write!(f, ": {}", self.detail)?;
        }
        Ok(())
    }
}

impl std::error::Error for TypeCheckError {}

fn compatible(a: Type, b: Type) -> bool {
    a == b || (a.is_numeric() && b.is_numeric())
}

/// Mixed `int`/`float` arithmetic promotes to `float`.
fn promote(a: Type, b: Type) -> Type {
    if a == b {
        a
    } else if a.is_numeric() && b.is_numeric() {
        Type::Float
    } else {
        a
    }
}

pub struct TypeChecker {
    scopes: ScopeStack,
    current_ret_type: Type,
    has_return: bool,
}

impl TypeChecker {
    pub fn new(scopes: ScopeStack) -> Self {
        Self {
            scopes,
            current_ret_type: Type::Void,
            has_return: false,
        }
    }

    pub fn check(mut self, program: &Program) -> Result<(), TypeCheckError> {
        for item in &program.items {
            match item {
                Item::Function(func) => self.check_function(func)?,
                Item::Stmt(stmt) => self.check_stmt(stmt)?,
            }
        }
        Ok(())
    }

    fn check_function(&mut self, func: &Function) -> Result<(), TypeCheckError> {
        self.current_ret_type = func.ret_type;
        self.has_return = false;
        self.scopes.enter_scope();
        for param in &func.params {
            self.scopes.insert_variable(&param.name, param.ty);
        }
        for stmt in &func.body.stmts {
            self.check_stmt(stmt)?;
        }
        self.scopes.exit_scope();
        // Syntactic presence only: a return inside a dead branch satisfies
        // this check.
        if func.ret_type != Type::Void && !self.has_return {
            return Err(TypeCheckError::new(
                TypeCheckErrorKind::ReturnStmtNotFound,
                format!(
                    "Function '{}' must return a value of type '{}'",
                    func.name, func.ret_type
                ),
            ));
        }
        Ok(())
    }

    fn check_block(&mut self, block: &Block) -> Result<(), TypeCheckError> {
        self.scopes.enter_scope();
        for stmt in &block.stmts {
            self.check_stmt(stmt)?;
        }
        self.scopes.exit_scope();
        Ok(())
    }

    fn check_stmt(&mut self, stmt: &Stmt) -> Result<(), TypeCheckError> {
        match stmt {
            Stmt::VarDecl { ty, name, init } => {
                if let Some(init) = init {
                    let init_ty = self.check_expr(init)?;
                    if !compatible(*ty, init_ty) {
                        return Err(TypeCheckError::new(
                            TypeCheckErrorKind::ErroneousVarDecl,
                            format!(
                                "Cannot initialize variable '{name}' of type '{ty}' \
                                 with expression of type '{init_ty}'"
                            ),
                        ));
                    }
                }
                self.scopes.insert_variable(name, *ty);
                Ok(())
            }
            Stmt::Return(expr) => self.check_return(expr.as_ref()),
            Stmt::If {
                cond,
                then_block,
                else_block,
            } => {
                let cond_ty = self.check_expr(cond)?;
                if cond_ty != Type::Bool {
                    return Err(TypeCheckError::new(
                        TypeCheckErrorKind::NonBooleanCondStmt,
                        format!("If condition must be boolean, got '{cond_ty}'"),
                    ));
                }
                self.check_block(then_block)?;
                if let Some(else_block) = else_block {
                    self.check_block(else_block)?;
                }
                Ok(())
            }
            Stmt::While { cond, body } => {
                let cond_ty = self.check_expr(cond)?;
                if cond_ty != Type::Bool {
                    return Err(TypeCheckError::new(
                        TypeCheckErrorKind::NonBooleanCondStmt,
                        format!("While condition must be boolean, got '{cond_ty}'"),
                    ));
                }
                self.check_block(body)
            }
            Stmt::Block(block) => self.check_block(block),
            Stmt::Expr(expr) => self.check_expr(expr).map(|_| ()),
        }
    }

    fn check_return(&mut self, expr: Option<&Expr>) -> Result<(), TypeCheckError> {
        self.has_return = true;
        match expr {
            Some(expr) => {
                let expr_ty = self.check_expr(expr)?;
                if self.current_ret_type == Type::Void {
                    return Err(TypeCheckError::new(
                        TypeCheckErrorKind::ErroneousReturnType,
                        "Cannot return a value from void function",
                    ));
                }
                if !compatible(self.current_ret_type, expr_ty) {
                    return Err(TypeCheckError::new(
                        TypeCheckErrorKind::ErroneousReturnType,
                        format!(
                            "Expected return type '{}' but got '{expr_ty}'",
                            self.current_ret_type
                        ),
                    ));
                }
                Ok(())
            }
            None => {
                if self.current_ret_type != Type::Void {
                    return Err(TypeCheckError::new(
                        TypeCheckErrorKind::ErroneousReturnType,
                        format!(
                            "Function must return value of type '{}'",
                            self.current_ret_type
                        ),
                    ));
                }
                Ok(())
            }
        }
    }

    fn check_expr(&mut self, expr: &Expr) -> Result<Type, TypeCheckError> {
        match expr {
            Expr::Binary { op, lhs, rhs } => {
                let lhs_ty = self.check_expr(lhs)?;
                let rhs_ty = self.check_expr(rhs)?;
                match op {
                    BinOp::And | BinOp::Or => {
                        if lhs_ty != Type::Bool || rhs_ty != Type::Bool {
                            return Err(TypeCheckError::new(
                                TypeCheckErrorKind::AttemptedBoolOpOnNonBools,
                                format!(
                                    "Operator '{op}' requires boolean operands, \
                                     got '{lhs_ty}' and '{rhs_ty}'"
                                ),
                            ));
                        }
                        Ok(Type::Bool)
                    }
                    BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
                        if !compatible(lhs_ty, rhs_ty) {
                            return Err(TypeCheckError::new(
                                TypeCheckErrorKind::ExpressionTypeMismatch,
                                format!("Cannot compare '{lhs_ty}' with '{rhs_ty}'"),
                            ));
                        }
                        Ok(Type::Bool)
                    }
                    BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div => {
                        if !lhs_ty.is_numeric() || !rhs_ty.is_numeric() {
                            return Err(TypeCheckError::new(
                                TypeCheckErrorKind::AttemptedAddOpOnNonNumeric,
                                format!(
                                    "Operator '{op}' requires numeric operands, \
                                     got '{lhs_ty}' and '{rhs_ty}'"
                                ),
                            ));
                        }
                        Ok(promote(lhs_ty, rhs_ty))
                    }
                }
            }
            Expr::Unary { op, operand, .. } => {
                let operand_ty = self.check_expr(operand)?;
                if !operand_ty.is_numeric() {
                    return Err(TypeCheckError::new(
                        TypeCheckErrorKind::AttemptedAddOpOnNonNumeric,
                        format!("Operator '{op}' requires numeric operand, got '{operand_ty}'"),
                    ));
                }
                Ok(operand_ty)
            }
            Expr::Literal { kind, .. } => Ok(*kind),
            Expr::Identifier(name) => self.identifier_type(name),
            Expr::Call { callee, args } => {
                let (ret_type, param_types) = match self.scopes.lookup(callee, true) {
                    Some(symbol) => (symbol.ty, symbol.param_types.clone()),
                    None => {
                        return Err(TypeCheckError::new(
                            TypeCheckErrorKind::ExpressionTypeMismatch,
                            format!("Undefined function '{callee}'"),
                        ))
                    }
                };
                if args.len() != param_types.len() {
                    return Err(TypeCheckError::new(
                        TypeCheckErrorKind::FnCallParamCount,
                        format!(
                            "Function '{callee}' expects {} parameters but got {}",
                            param_types.len(),
                            args.len()
                        ),
                    ));
                }
                for (i, (arg, expected)) in args.iter().zip(&param_types).enumerate() {
                    let arg_ty = self.check_expr(arg)?;
                    if !compatible(*expected, arg_ty) {
                        return Err(TypeCheckError::new(
                            TypeCheckErrorKind::FnCallParamType,
                            format!(
                                "Parameter {} of function '{callee}' expects type \
                                 '{expected}' but got '{arg_ty}'",
                                i + 1
                            ),
                        ));
                    }
                }
                Ok(ret_type)
            }
            Expr::Assign { target, op, value } => {
                let target_ty = self.identifier_type(target)?;
                let value_ty = self.check_expr(value)?;
                if *op != AssignOp::Assign {
                    if !target_ty.is_numeric() || !value_ty.is_numeric() {
                        return Err(TypeCheckError::new(
                            TypeCheckErrorKind::AttemptedAddOpOnNonNumeric,
                            format!("Compound assignment '{op}' requires numeric operands"),
                        ));
                    }
                } else if !compatible(target_ty, value_ty) {
                    return Err(TypeCheckError::new(
                        TypeCheckErrorKind::ExpressionTypeMismatch,
                        format!(
                            "Cannot assign value of type '{value_ty}' to variable \
                             of type '{target_ty}'"
                        ),
                    ));
                }
                Ok(target_ty)
            }
        }
    }

    fn identifier_type(&self, name: &str) -> Result<Type, TypeCheckError> {
        match self.scopes.lookup(name, false) {
            Some(symbol) => Ok(symbol.ty),
            None => Err(TypeCheckError::new(
                TypeCheckErrorKind::ExpressionTypeMismatch,
                format!("Undefined variable '{name}'"),
            )),
        }
    }
}
