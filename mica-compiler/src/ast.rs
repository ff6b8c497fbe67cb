//! Syntax tree produced by the parser and shared read-only by the three
//! analysis passes. Nodes are plain sum types; every pass dispatches with a
//! `match` per variant.

use std::fmt;

/// Primitive types of the language. `Void` has no surface syntax: functions
/// must declare one of the four value types, and statements type to `Void`
/// inside the checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Int,
    Float,
    Bool,
    Str,
    Void,
}

impl Type {
    pub fn is_numeric(self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Type::Int => "int",
            Type::Float => "float",
            Type::Bool => "bool",
            Type::Str => "string",
            Type::Void => "void",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        };
        write!(f, "{op}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnOp {
    Plus,
    Minus,
    Incr,
    Decr,
}

impl fmt::Display for UnOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            UnOp::Plus => "+",
            UnOp::Minus => "-",
            UnOp::Incr => "++",
            UnOp::Decr => "--",
        };
        write!(f, "{op}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
}

impl fmt::Display for AssignOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            AssignOp::Assign => "=",
            AssignOp::AddAssign => "+=",
            AssignOp::SubAssign => "-=",
            AssignOp::MulAssign => "*=",
            AssignOp::DivAssign => "/=",
        };
        write!(f, "{op}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub items: Vec<Item>,
}

/// A top-level item. The grammar admits any statement at top level; the IR
/// generator only lowers functions and variable declarations.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Function(Function),
    Stmt(Stmt),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub ret_type: Type,
    pub name: String,
    pub params: Vec<Param>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub ty: Type,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    VarDecl {
        ty: Type,
        name: String,
        init: Option<Expr>,
    },
    Return(Option<Expr>),
    If {
        cond: Expr,
        then_block: Block,
        /// Always a block; a bare-statement `else` arm is wrapped by the
        /// parser.
        else_block: Option<Block>,
    },
    While {
        cond: Expr,
        body: Block,
    },
    Block(Block),
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Unary {
        op: UnOp,
        operand: Box<Expr>,
        postfix: bool,
    },
    /// Literals keep their source lexeme; the IR emits it verbatim.
    Literal {
        kind: Type,
        value: String,
    },
    Identifier(String),
    /// The callee is an identifier name: no first-class functions.
    Call {
        callee: String,
        args: Vec<Expr>,
    },
    /// The target is an identifier name: no other lvalues exist.
    Assign {
        target: String,
        op: AssignOp,
        value: Box<Expr>,
    },
}

impl Expr {
    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }
}

impl Program {
    /// Indented structural dump, two spaces per level. Debug output only.
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        out.push_str("Program\n");
        for item in &self.items {
            match item {
                Item::Function(func) => pretty_function(&mut out, func, 1),
                Item::Stmt(stmt) => pretty_stmt(&mut out, stmt, 1),
            }
        }
        out
    }
}

fn push_indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push_str("  ");
    }
}

fn pretty_function(out: &mut String, func: &Function, level: usize) {
    push_indent(out, level);
    out.push_str(&format!("Function {} : {}\n", func.name, func.ret_type));
    push_indent(out, level + 1);
    out.push_str("Params\n");
    for param in &func.params {
        push_indent(out, level + 2);
        out.push_str(&format!("{} {}\n", param.ty, param.name));
    }
    pretty_block(out, &func.body, level + 1);
}

fn pretty_block(out: &mut String, block: &Block, level: usize) {
    push_indent(out, level);
    out.push_str("Block\n");
    for stmt in &block.stmts {
        pretty_stmt(out, stmt, level + 1);
    }
}

fn pretty_stmt(out: &mut String, stmt: &Stmt, level: usize) {
    match stmt {
        Stmt::VarDecl { ty, name, init } => {
            push_indent(out, level);
            out.push_str(&format!("VarDecl {ty} {name}"));
            match init {
                Some(init) => {
                    out.push_str(" =\n");
                    pretty_expr(out, init, level + 1);
                }
                None => out.push('\n'),
            }
        }
        Stmt::Return(expr) => {
            push_indent(out, level);
            out.push_str("Return\n");
            if let Some(expr) = expr {
                pretty_expr(out, expr, level + 1);
            }
        }
        Stmt::If {
            cond,
            then_block,
            else_block,
        } => {
            push_indent(out, level);
            out.push_str("If\n");
            push_indent(out, level + 1);
            out.push_str("Cond\n");
            pretty_expr(out, cond, level + 2);
            push_indent(out, level + 1);
            out.push_str("Then\n");
            pretty_block(out, then_block, level + 2);
            if let Some(else_block) = else_block {
                push_indent(out, level + 1);
                out.push_str("Else\n");
                pretty_block(out, else_block, level + 2);
            }
        }
        Stmt::While { cond, body } => {
            push_indent(out, level);
            out.push_str("While\n");
            push_indent(out, level + 1);
            out.push_str("Cond\n");
            pretty_expr(out, cond, level + 2);
            push_indent(out, level + 1);
            out.push_str("Body\n");
            pretty_block(out, body, level + 2);
        }
        Stmt::Block(block) => pretty_block(out, block, level),
        Stmt::Expr(expr) => {
            push_indent(out, level);
            out.push_str("ExprStmt\n");
            pretty_expr(out, expr, level + 1);
        }
    }
}

fn pretty_expr(out: &mut String, expr: &Expr, level: usize) {
    match expr {
        Expr::Binary { op, lhs, rhs } => {
            push_indent(out, level);
            out.push_str(&format!("BinaryOp({op})\n"));
            pretty_expr(out, lhs, level + 1);
            pretty_expr(out, rhs, level + 1);
        }
        Expr::Unary {
            op,
            operand,
            postfix,
        } => {
            push_indent(out, level);
            let label = if *postfix { "PostfixOp" } else { "UnaryOp" };
            out.push_str(&format!("{label}({op})\n"));
            pretty_expr(out, operand, level + 1);
        }
        Expr::Literal { kind, value } => {
            push_indent(out, level);
            out.push_str(&format!("Literal {kind}({value})\n"));
        }
        Expr::Identifier(name) => {
            push_indent(out, level);
            out.push_str(&format!("Ident {name}\n"));
        }
        Expr::Call { callee, args } => {
            push_indent(out, level);
            out.push_str("Call\n");
            push_indent(out, level + 1);
            out.push_str(&format!("Ident {callee}\n"));
            push_indent(out, level + 1);
            out.push_str("Args\n");
            for arg in args {
                pretty_expr(out, arg, level + 2);
            }
        }
        Expr::Assign { target, op, value } => {
            push_indent(out, level);
            out.push_str(&format!("Assign({op})\n"));
            push_indent(out, level + 1);
            out.push_str(&format!("Ident {target}\n"));
            pretty_expr(out, value, level + 1);
        }
    }
}
