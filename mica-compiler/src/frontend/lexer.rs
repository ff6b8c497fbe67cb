use logos::{FilterResult, Logos};
use std::fmt;
use thiserror::Error;

/// Lexical errors. Invalid numeric-prefixed identifiers and unterminated
/// string/comment forms get their own variants; any other byte surfaces as
/// `UnknownToken` with up to ten characters of source context.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("Invalid identifier: '{0}'")]
    InvalidIdentifier(String),
    #[error("Unterminated string literal")]
    UnterminatedString,
    #[error("Unterminated block comment")]
    UnterminatedComment,
    #[error("Unknown token starting at: {0}")]
    UnknownToken(String),
}

// Logos produces `LexError::default()` for unmatched input; `Lexer` fills in
// the context afterwards, since only the wrapper holds the full source.
impl Default for LexError {
    fn default() -> Self {
        LexError::UnknownToken(String::new())
    }
}

fn lex_invalid_ident(lex: &mut logos::Lexer<Token>) -> Result<String, LexError> {
    Err(LexError::InvalidIdentifier(lex.slice().to_string()))
}

// The lexeme keeps escape sequences verbatim; only the quotes are stripped.
fn lex_string(lex: &mut logos::Lexer<Token>) -> String {
    let slice = lex.slice();
    slice[1..slice.len() - 1].to_string()
}

fn lex_unterminated_string(_lex: &mut logos::Lexer<Token>) -> Result<String, LexError> {
    Err(LexError::UnterminatedString)
}

// Block comments do not nest; scanning for the first `*/` is the whole rule.
fn block_comment(lex: &mut logos::Lexer<Token>) -> FilterResult<(), LexError> {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            FilterResult::Skip
        }
        None => {
            lex.bump(lex.remainder().len());
            FilterResult::Error(LexError::UnterminatedComment)
        }
    }
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = LexError)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
pub enum Token {
    // --- Keywords ---
    #[token("fn")]
    Fn,
    #[token("int")]
    Int,
    #[token("float")]
    Float,
    #[token("bool")]
    Bool,
    #[token("string")]
    Str,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    // Reserved without a grammar production.
    #[token("for")]
    For,
    #[token("return")]
    Return,

    // --- Identifiers and literals ---
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    #[regex(r"[0-9]+", |lex| lex.slice().to_string(), priority = 4)]
    #[regex(r"[0-9]+(\.[0-9]+)?[A-Za-z_][A-Za-z0-9_]*", lex_invalid_ident, priority = 5)]
    IntLit(String),

    #[regex(r"[0-9]+\.[0-9]+", |lex| lex.slice().to_string(), priority = 6)]
    FloatLit(String),

    #[regex(r#""([^"\\]|\\[\s\S])*""#, lex_string, priority = 6)]
    #[regex(r#""([^"\\]|\\[\s\S])*\\?"#, lex_unterminated_string, priority = 5)]
    StringLit(String),

    #[token("true", |_lex| true)]
    #[token("false", |_lex| false)]
    BoolLit(bool),

    // --- Operators ---
    #[token("=")]
    Assign,
    #[token("==")]
    Eq,
    #[token("!=")]
    Ne,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    Le,
    #[token(">=")]
    Ge,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    #[regex(r"/\*", block_comment)]
    Slash,
    #[token("+=")]
    PlusAssign,
    #[token("-=")]
    MinusAssign,
    #[token("*=")]
    StarAssign,
    #[token("/=")]
    SlashAssign,
    #[token("++")]
    Incr,
    #[token("--")]
    Decr,

    // --- Punctuation ---
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    // Lexed but accepted by no production.
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,

    /// Synthesized by [`Lexer`] once the input is exhausted; never produced
    /// by a pattern.
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Fn => write!(f, "fn"),
            Token::Int => write!(f, "int"),
            Token::Float => write!(f, "float"),
            Token::Bool => write!(f, "bool"),
            Token::Str => write!(f, "string"),
            Token::If => write!(f, "if"),
            Token::Else => write!(f, "else"),
            Token::While => write!(f, "while"),
            Token::For => write!(f, "for"),
            Token::Return => write!(f, "return"),
            Token::Ident(name) => write!(f, "'{name}'"),
            Token::IntLit(value) => write!(f, "{value}"),
            Token::FloatLit(value) => write!(f, "{value}"),
            Token::StringLit(value) => write!(f, "\"{value}\""),
            Token::BoolLit(value) => write!(f, "{value}"),
            Token::Assign => write!(f, "="),
            Token::Eq => write!(f, "=="),
            Token::Ne => write!(f, "!="),
            Token::Lt => write!(f, "<"),
            Token::Gt => write!(f, ">"),
            Token::Le => write!(f, "<="),
            Token::Ge => write!(f, ">="),
            Token::AndAnd => write!(f, "&&"),
            Token::OrOr => write!(f, "||"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::PlusAssign => write!(f, "+="),
            Token::MinusAssign => write!(f, "-="),
            Token::StarAssign => write!(f, "*="),
            Token::SlashAssign => write!(f, "/="),
            Token::Incr => write!(f, "++"),
            Token::Decr => write!(f, "--"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::Comma => write!(f, ","),
            Token::Semicolon => write!(f, ";"),
            Token::Eof => write!(f, "<eof>"),
        }
    }
}

/// Streaming lexer handed to the parser one token at a time. Whitespace and
/// comments are skipped internally; at end of input it returns [`Token::Eof`]
/// indefinitely.
pub struct Lexer<'src> {
    source: &'src str,
    inner: logos::Lexer<'src, Token>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            inner: Token::lexer(source),
        }
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        match self.inner.next() {
            None => Ok(Token::Eof),
            Some(Ok(token)) => Ok(token),
            Some(Err(err)) => Err(self.with_context(err)),
        }
    }

    fn with_context(&self, err: LexError) -> LexError {
        match err {
            LexError::UnknownToken(ctx) if ctx.is_empty() => {
                let start = self.inner.span().start;
                let ctx: String = self.source[start..].chars().take(10).collect();
                LexError::UnknownToken(ctx)
            }
            other => other,
        }
    }
}

/// Collects the whole token stream, `Eof` included. Used by tests and the
/// CLI token dump; the parser streams instead.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let at_eof = token == Token::Eof;
        tokens.push(token);
        if at_eof {
            return Ok(tokens);
        }
    }
}
