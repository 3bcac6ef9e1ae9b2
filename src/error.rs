use thiserror::Error;

use crate::token::{Token, TokenKind};

/// Lexical diagnostics. Recorded while scanning continues; the lexer never
/// aborts mid-file.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("[line {line}:{column}] unexpected character '{ch}'")]
    UnexpectedCharacter { ch: char, line: usize, column: usize },
    #[error("[line {line}] unterminated string")]
    UnterminatedString { line: usize },
    #[error("[line {line}] unterminated block comment")]
    UnterminatedBlockComment { line: usize },
}

/// Grammar violations. The parser synchronizes to a statement boundary after
/// each one, so a single pass can report several.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("[line {line}] error at '{lexeme}': {message}")]
    UnexpectedToken {
        line: usize,
        lexeme: String,
        message: &'static str,
    },
    #[error("[line {line}] error at end: {message}")]
    UnexpectedEof { line: usize, message: &'static str },
    #[error("[line {line}] invalid assignment target")]
    InvalidAssignmentTarget { line: usize },
    #[error("[line {line}] only named functions can be called")]
    InvalidCallTarget { line: usize },
}

impl ParseError {
    /// Builds the right variant for an unexpected token, folding the
    /// end-of-file case into its own message shape.
    pub fn at(token: &Token, message: &'static str) -> Self {
        if token.kind == TokenKind::Eof {
            ParseError::UnexpectedEof {
                line: token.line,
                message,
            }
        } else {
            ParseError::UnexpectedToken {
                line: token.line,
                lexeme: token.lexeme.clone(),
                message,
            }
        }
    }
}

/// Evaluation failures. Fatal to the current interpreter run; output already
/// printed stays printed.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("[line {line}] undefined variable '{name}'")]
    UndefinedVariable { name: String, line: usize },
    #[error("[line {line}] undefined function '{name}'")]
    UndefinedFunction { name: String, line: usize },
    #[error("[line {line}] '{name}' expected {expected} arguments but got {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
        line: usize,
    },
    #[error("[line {line}] {message}")]
    TypeMismatch { message: &'static str, line: usize },
    #[error("[line {line}] division by zero")]
    DivisionByZero { line: usize },
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}
