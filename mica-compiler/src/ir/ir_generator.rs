//! Lowers the validated AST to three-address code. Temporaries (`t0, t1,
//! ...`) and labels (`L0, L1, ...`) come from per-generator counters, so a
//! fixed AST always produces byte-identical IR. Variable names are emitted
//! verbatim; scoping is tracked only so hoisted functions mirror the earlier
//! passes.

use crate::ast::{AssignOp, BinOp, Block, Expr, Function, Item, Program, Stmt, Type, UnOp};
use crate::ir::ir::{Instr, Opcode, ProgramIr};
use crate::sema::scope::ScopeStack;

pub struct IrGenerator {
    out: ProgramIr,
    scopes: ScopeStack,
    temp_count: usize,
    label_count: usize,
}

impl IrGenerator {
    pub fn new() -> Self {
        Self {
            out: ProgramIr::new(),
            scopes: ScopeStack::new(),
            temp_count: 0,
            label_count: 0,
        }
    }

    /// Hoists all function symbols, then lowers functions and top-level
    /// variable declarations in source order. Other top-level statements
    /// have no runtime home and are not emitted.
    pub fn generate(mut self, program: &Program) -> ProgramIr {
        for item in &program.items {
            if let Item::Function(func) = item {
                let param_types = func.params.iter().map(|p| p.ty).collect();
                self.scopes
                    .insert_function(&func.name, func.ret_type, param_types);
            }
        }
        for item in &program.items {
            match item {
                Item::Function(func) => self.gen_function(func),
                Item::Stmt(Stmt::VarDecl { ty, name, init }) => {
                    self.gen_var_decl(*ty, name, init.as_ref())
                }
                Item::Stmt(_) => {}
            }
        }
        self.out
    }

    fn new_temp(&mut self) -> String {
        let temp = format!("t{}", self.temp_count);
        self.temp_count += 1;
        temp
    }

    fn new_label(&mut self) -> String {
        let label = format!("L{}", self.label_count);
        self.label_count += 1;
        label
    }

    fn emit(
        &mut self,
        op: Opcode,
        result: impl Into<String>,
        arg1: impl Into<String>,
        arg2: impl Into<String>,
    ) {
        self.out.instrs.push(Instr::new(op, result, arg1, arg2));
    }

    fn gen_function(&mut self, func: &Function) {
        self.emit(Opcode::FuncBegin, func.name.as_str(), "", "");
        self.scopes.enter_scope();
        for param in &func.params {
            self.scopes.insert_variable(&param.name, param.ty);
        }
        // The body shares the parameter scope.
        for stmt in &func.body.stmts {
            self.gen_stmt(stmt);
        }
        self.scopes.exit_scope();
        self.emit(Opcode::FuncEnd, func.name.as_str(), "", "");
    }

    fn gen_block(&mut self, block: &Block) {
        self.scopes.enter_scope();
        for stmt in &block.stmts {
            self.gen_stmt(stmt);
        }
        self.scopes.exit_scope();
    }

    fn gen_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VarDecl { ty, name, init } => self.gen_var_decl(*ty, name, init.as_ref()),
            Stmt::Return(expr) => match expr {
                Some(expr) => {
                    let value = self.gen_expr(expr);
                    self.emit(Opcode::Return, "", value, "");
                }
                None => self.emit(Opcode::Return, "", "", ""),
            },
            Stmt::If {
                cond,
                then_block,
                else_block,
            } => self.gen_if(cond, then_block, else_block.as_ref()),
            Stmt::While { cond, body } => self.gen_while(cond, body),
            Stmt::Block(block) => self.gen_block(block),
            Stmt::Expr(expr) => {
                self.gen_expr(expr);
            }
        }
    }

    fn gen_var_decl(&mut self, ty: Type, name: &str, init: Option<&Expr>) {
        if let Some(init) = init {
            let value = self.gen_expr(init);
            self.emit(Opcode::Copy, name, value, "");
        }
        self.scopes.insert_variable(name, ty);
    }

    fn gen_if(&mut self, cond: &Expr, then_block: &Block, else_block: Option<&Block>) {
        let cond_value = self.gen_expr(cond);
        match else_block {
            Some(else_block) => {
                let else_label = self.new_label();
                let end_label = self.new_label();
                self.emit(Opcode::IfFalse, else_label.as_str(), cond_value, "");
                self.gen_block(then_block);
                self.emit(Opcode::Goto, end_label.as_str(), "", "");
                self.emit(Opcode::Label, else_label, "", "");
                self.gen_block(else_block);
                self.emit(Opcode::Label, end_label, "", "");
            }
            None => {
                let end_label = self.new_label();
                self.emit(Opcode::IfFalse, end_label.as_str(), cond_value, "");
                self.gen_block(then_block);
                self.emit(Opcode::Label, end_label, "", "");
            }
        }
    }

    fn gen_while(&mut self, cond: &Expr, body: &Block) {
        let start_label = self.new_label();
        let end_label = self.new_label();
        self.emit(Opcode::Label, start_label.as_str(), "", "");
        let cond_value = self.gen_expr(cond);
        self.emit(Opcode::IfFalse, end_label.as_str(), cond_value, "");
        self.gen_block(body);
        self.emit(Opcode::Goto, start_label, "", "");
        self.emit(Opcode::Label, end_label, "", "");
    }

    /// Lowers an expression and returns the value it denotes: a literal
    /// lexeme, a variable name, or a temporary.
    fn gen_expr(&mut self, expr: &Expr) -> String {
        match expr {
            Expr::Binary { op, lhs, rhs } => {
                let lhs_value = self.gen_expr(lhs);
                let rhs_value = self.gen_expr(rhs);
                let result = self.new_temp();
                self.emit(binop_opcode(*op), result.as_str(), lhs_value, rhs_value);
                result
            }
            Expr::Unary {
                op,
                operand,
                postfix,
            } => self.gen_unary(*op, operand, *postfix),
            Expr::Literal { value, .. } => value.clone(),
            Expr::Identifier(name) => name.clone(),
            Expr::Call { callee, args } => {
                // All arguments are evaluated first so the PARAM run is
                // contiguous and sits immediately before the CALL.
                let values: Vec<String> = args.iter().map(|arg| self.gen_expr(arg)).collect();
                for value in values {
                    self.emit(Opcode::Param, "", value, "");
                }
                let result = self.new_temp();
                self.emit(
                    Opcode::Call,
                    result.as_str(),
                    callee.as_str(),
                    args.len().to_string(),
                );
                result
            }
            Expr::Assign { target, op, value } => {
                let rhs_value = self.gen_expr(value);
                match op {
                    AssignOp::Assign => {
                        self.emit(Opcode::Copy, target.as_str(), rhs_value, "");
                    }
                    _ => {
                        let result = self.new_temp();
                        self.emit(
                            compound_assign_opcode(*op),
                            result.as_str(),
                            target.as_str(),
                            rhs_value,
                        );
                        self.emit(Opcode::Copy, target.as_str(), result, "");
                    }
                }
                target.clone()
            }
        }
    }

    fn gen_unary(&mut self, op: UnOp, operand: &Expr, postfix: bool) -> String {
        let operand_value = self.gen_expr(operand);
        match op {
            UnOp::Incr | UnOp::Decr => {
                let step_op = if op == UnOp::Incr {
                    Opcode::Add
                } else {
                    Opcode::Sub
                };
                if postfix {
                    // The pre-step value is the expression's value.
                    let saved = self.new_temp();
                    self.emit(Opcode::Copy, saved.as_str(), operand_value.as_str(), "");
                    let stepped = self.new_temp();
                    self.emit(step_op, stepped.as_str(), operand_value.as_str(), "1");
                    self.emit(Opcode::Copy, operand_value, stepped, "");
                    saved
                } else {
                    let stepped = self.new_temp();
                    self.emit(step_op, stepped.as_str(), operand_value.as_str(), "1");
                    self.emit(Opcode::Copy, operand_value, stepped.as_str(), "");
                    stepped
                }
            }
            UnOp::Minus => {
                let result = self.new_temp();
                self.emit(Opcode::Neg, result.as_str(), operand_value, "");
                result
            }
            // Unary plus is a no-op; the operand passes through.
            UnOp::Plus => operand_value,
        }
    }
}

impl Default for IrGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn binop_opcode(op: BinOp) -> Opcode {
    match op {
        BinOp::Add => Opcode::Add,
        BinOp::Sub => Opcode::Sub,
        BinOp::Mul => Opcode::Mul,
        BinOp::Div => Opcode::Div,
        BinOp::Eq => Opcode::Eq,
        BinOp::Ne => Opcode::Ne,
        BinOp::Lt => Opcode::Lt,
        BinOp::Le => Opcode::Le,
        BinOp::Gt => Opcode::Gt,
        BinOp::Ge => Opcode::Ge,
        BinOp::And => Opcode::And,
        BinOp::Or => Opcode::Or,
    }
}

fn compound_assign_opcode(op: AssignOp) -> Opcode {
    match op {
        AssignOp::AddAssign => Opcode::Add,
        AssignOp::SubAssign => Opcode::Sub,
        AssignOp::MulAssign => Opcode::Mul,
        AssignOp::DivAssign => Opcode::Div,
        AssignOp::Assign => unreachable!("plain assignment lowers to COPY"),
    }
}
