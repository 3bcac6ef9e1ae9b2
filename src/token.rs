#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    Number,
    StringToken,
    Identifier,

    // Single-character operators and delimiters
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Assign,
    Not,
    Less,
    Greater,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Comma,
    Semicolon,
    Dot,

    // Two-character operators (and their keyword spellings)
    EqualEqual,
    NotEqual,
    LessEqual,
    GreaterEqual,
    And,
    Or,

    // Keywords
    If,
    Else,
    While,
    For,
    Function,
    Return,
    Var,
    Const,
    True,
    False,
    Nil,
    Print,
    Input,

    // Special
    Newline,
    Eof,
    Invalid,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Str(String),
    Bool(bool),
    None,
}

/// A classified, positioned unit of lexical input. Immutable once scanned.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub literal: Literal,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn eof(line: usize, column: usize) -> Self {
        Token {
            kind: TokenKind::Eof,
            lexeme: String::new(),
            literal: Literal::None,
            line,
            column,
        }
    }
}
