pub mod ast_display;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod stmt;
pub mod token;
pub mod value;

use std::io::Write;

use error::{LexError, ParseError, RuntimeError};
use interpreter::Interpreter;
use lexer::Lexer;

/// Diagnostics gathered from one run of a source string.
pub struct RunReport {
    pub lex_errors: Vec<LexError>,
    pub parse_errors: Vec<ParseError>,
    pub runtime_error: Option<RuntimeError>,
}

impl RunReport {
    pub fn had_static_error(&self) -> bool {
        !self.lex_errors.is_empty() || !self.parse_errors.is_empty()
    }
}

/// Lexes, parses, and interprets `source`, writing program output to `out`.
/// Lexical and syntax errors are collected, not fatal: every statement that
/// parsed cleanly still runs, so one bad line does not mute the rest.
pub fn run<W: Write>(source: &str, out: &mut W) -> RunReport {
    let (tokens, lex_errors) = Lexer::new(source).scan();
    let (program, parse_errors) = parser::parse(&tokens);

    let runtime_error = Interpreter::new(out).interpret(&program).err();

    RunReport {
        lex_errors,
        parse_errors,
        runtime_error,
    }
}
