use clap::Parser;
use mica_compiler::{compile_to_ir, frontend, CompileError};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mica")]
#[command(about = "Compiler front-end for the Mica language, emitting three-address code")]
struct Args {
    /// Path to the source file to compile
    #[arg(default_value = "text.txt")]
    file: PathBuf,

    /// Print the token stream before compiling
    #[arg(long)]
    tokens: bool,

    /// Print the parsed AST before compiling
    #[arg(long)]
    ast: bool,
}

fn main() {
    let args = Args::parse();

    let src = fs::read_to_string(&args.file).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", args.file.display(), e);
        std::process::exit(1);
    });

    if args.tokens {
        match frontend::lexer::tokenize(&src) {
            Ok(tokens) => {
                for token in tokens {
                    println!("{token:?}");
                }
            }
            Err(e) => fail(CompileError::from(e)),
        }
    }

    if args.ast {
        match frontend::parser::parse(&src) {
            Ok(program) => print!("{}", program.pretty()),
            Err(e) => fail(e),
        }
    }

    let ir = compile_to_ir(&src).unwrap_or_else(|e| fail(e));

    println!();
    println!("=== THREE ADDRESS CODE (TAC) ===");
    for line in ir.to_lines() {
        println!("{line}");
    }
    println!("================================");
}

fn fail(err: CompileError) -> ! {
    eprintln!("{err}");
    std::process::exit(1);
}
