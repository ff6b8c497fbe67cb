pub mod ast;
pub mod frontend;
pub mod ir;
pub mod sema;

use thiserror::Error;

pub use ast::Program;
pub use frontend::lexer::LexError;
pub use frontend::parser::{ParseError, ParseErrorKind};
pub use ir::{Instr, Opcode, ProgramIr};
pub use sema::{ScopeError, ScopeErrorKind, TypeCheckError, TypeCheckErrorKind};

/// One variant per phase; the pipeline aborts on the first error and the
/// display arms carry the phase tag the harness prints.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Lexer error: {0}")]
    Lex(#[from] LexError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Scope Error: {0}")]
    Scope(#[from] ScopeError),

    #[error("Type Check Error: {0}")]
    TypeCheck(#[from] TypeCheckError),
}

/// Runs the full pipeline: parse, scope analysis, type checking, IR
/// generation. The scope analyzer's stack seeds the type checker; IR
/// generation cannot fail on a validated AST.
pub fn compile_to_ir(source: &str) -> Result<ProgramIr, CompileError> {
    let program = frontend::parser::parse(source)?;
    let scopes = sema::ScopeAnalyzer::new().analyze(&program)?;
    sema::TypeChecker::new(scopes).check(&program)?;
    Ok(ir::IrGenerator::new().generate(&program))
}

/// Compiles and renders the IR, one instruction per line, unframed.
pub fn compile_to_tac(source: &str) -> Result<String, CompileError> {
    let ir = compile_to_ir(source)?;
    Ok(ir.to_lines().join("\n"))
}
