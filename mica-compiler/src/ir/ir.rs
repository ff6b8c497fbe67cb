// A tiny, linear three-address IR: labels, jumps, and simple assignments
// over string operands.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // arithmetic
    Add,
    Sub,
    Mul,
    Div,
    // unary
    Neg,
    Not,
    // relational
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // boolean
    And,
    Or,
    // movement
    Assign,
    Copy,
    // control
    Label,
    Goto,
    IfFalse,
    IfTrue,
    // calls
    Param,
    Call,
    Return,
    // function scoping
    FuncBegin,
    FuncEnd,
}

impl Opcode {
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Neg => "NEG",
            Opcode::Not => "NOT",
            Opcode::Eq => "EQ",
            Opcode::Ne => "NE",
            Opcode::Lt => "LT",
            Opcode::Le => "LE",
            Opcode::Gt => "GT",
            Opcode::Ge => "GE",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Assign => "ASSIGN",
            Opcode::Copy => "COPY",
            Opcode::Label => "LABEL",
            Opcode::Goto => "GOTO",
            Opcode::IfFalse => "IF_FALSE",
            Opcode::IfTrue => "IF_TRUE",
            Opcode::Param => "PARAM",
            Opcode::Call => "CALL",
            Opcode::Return => "RETURN",
            Opcode::FuncBegin => "FUNC_BEGIN",
            Opcode::FuncEnd => "FUNC_END",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

/// One three-address instruction. Operand fields are plain strings (names,
/// temporaries, labels, or literal lexemes); unused fields stay empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instr {
    pub op: Opcode,
    pub result: String,
    pub arg1: String,
    pub arg2: String,
}

impl Instr {
    pub fn new(
        op: Opcode,
        result: impl Into<String>,
        arg1: impl Into<String>,
        arg2: impl Into<String>,
    ) -> Self {
        Self {
            op,
            result: result.into(),
            arg1: arg1.into(),
            arg2: arg2.into(),
        }
    }
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.op {
            Opcode::Label => write!(f, "{}:", self.result),
            Opcode::Goto => write!(f, "  GOTO {}", self.result),
            Opcode::IfFalse => write!(f, "  IF_FALSE {} GOTO {}", self.arg1, self.result),
            Opcode::IfTrue => write!(f, "  IF_TRUE {} GOTO {}", self.arg1, self.result),
            Opcode::FuncBegin => write!(f, "FUNCTION {}:", self.result),
            Opcode::FuncEnd => write!(f, "END_FUNCTION {}", self.result),
            Opcode::Param => write!(f, "  PARAM {}", self.arg1),
            Opcode::Call => {
                if self.result.is_empty() {
                    write!(f, "  CALL {}, {}", self.arg1, self.arg2)
                } else {
                    write!(f, "  {} = CALL {}, {}", self.result, self.arg1, self.arg2)
                }
            }
            Opcode::Return => {
                if self.arg1.is_empty() {
                    write!(f, "  RETURN")
                } else {
                    write!(f, "  RETURN {}", self.arg1)
                }
            }
            Opcode::Neg | Opcode::Not => {
                write!(f, "  {} = {} {}", self.result, self.op, self.arg1)
            }
            Opcode::Copy => write!(f, "  {} = {}", self.result, self.arg1),
            _ => {
                if self.arg2.is_empty() {
                    write!(f, "  {} = {} {}", self.result, self.op, self.arg1)
                } else {
                    write!(
                        f,
                        "  {} = {} {} {}",
                        self.result, self.arg1, self.op, self.arg2
                    )
                }
            }
        }
    }
}

/// The whole program in linear form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramIr {
    pub instrs: Vec<Instr>,
}

impl ProgramIr {
    pub fn new() -> Self {
        Self { instrs: Vec::new() }
    }

    /// One string per output line. `FUNC_BEGIN` contributes a blank line
    /// before its `FUNCTION name:` header.
    pub fn to_lines(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.instrs.len());
        for instr in &self.instrs {
            if instr.op == Opcode::FuncBegin {
                out.push(String::new());
            }
            out.push(instr.to_string());
        }
        out
    }
}

impl Default for ProgramIr {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProgramIr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.to_lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
