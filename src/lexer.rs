use lazy_static::lazy_static;
use std::collections::HashMap;
use std::iter::Peekable;
use std::mem;
use std::str::Chars;

use crate::error::LexError;
use crate::token::{Literal, Token, TokenKind};

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenKind> = HashMap::from([
        ("and", TokenKind::And),
        ("or", TokenKind::Or),
        ("not", TokenKind::Not),
        ("if", TokenKind::If),
        ("else", TokenKind::Else),
        ("while", TokenKind::While),
        ("for", TokenKind::For),
        ("function", TokenKind::Function),
        ("return", TokenKind::Return),
        ("var", TokenKind::Var),
        ("const", TokenKind::Const),
        ("true", TokenKind::True),
        ("false", TokenKind::False),
        ("nil", TokenKind::Nil),
        ("print", TokenKind::Print),
        ("input", TokenKind::Input),
    ]);
}

/// Single left-to-right pass over the source with one character of
/// lookahead. Errors are recorded and scanning continues; the token stream
/// always ends with exactly one end-of-file token.
pub struct Lexer<'a> {
    source: Peekable<Chars<'a>>,
    tokens: Vec<Token>,
    errors: Vec<LexError>,
    text: String,
    line: usize,
    column: usize,
    start_column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            source: source.chars().peekable(),
            tokens: Vec::new(),
            errors: Vec::new(),
            text: String::new(),
            line: 1,
            column: 0,
            start_column: 1,
        }
    }

    pub fn scan(mut self) -> (Vec<Token>, Vec<LexError>) {
        while let Some(c) = self.advance() {
            self.start_column = self.column;
            self.text.push(c);
            self.scan_token(c);
        }

        self.tokens.push(Token::eof(self.line, self.column + 1));
        (self.tokens, self.errors)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.source.next();
        if c.is_some() {
            self.column += 1;
        }
        c
    }

    fn scan_token(&mut self, c: char) {
        use TokenKind::*;

        match c {
            '(' => self.add_token(LeftParen),
            ')' => self.add_token(RightParen),
            '{' => self.add_token(LeftBrace),
            '}' => self.add_token(RightBrace),
            '[' => self.add_token(LeftBracket),
            ']' => self.add_token(RightBracket),
            ',' => self.add_token(Comma),
            '.' => self.add_token(Dot),
            '-' => self.add_token(Minus),
            '+' => self.add_token(Plus),
            ';' => self.add_token(Semicolon),
            '*' => self.add_token(Star),
            '%' => self.add_token(Percent),
            '!' => {
                let matched = self.match_next('=');
                self.add_token(if matched { NotEqual } else { Not })
            }
            '=' => {
                let matched = self.match_next('=');
                self.add_token(if matched { EqualEqual } else { Assign })
            }
            '<' => {
                let matched = self.match_next('=');
                self.add_token(if matched { LessEqual } else { Less })
            }
            '>' => {
                let matched = self.match_next('=');
                self.add_token(if matched { GreaterEqual } else { Greater })
            }
            '&' => {
                if self.match_next('&') {
                    self.add_token(And);
                } else {
                    self.invalid_character('&');
                }
            }
            '|' => {
                if self.match_next('|') {
                    self.add_token(Or);
                } else {
                    self.invalid_character('|');
                }
            }
            '/' => {
                if self.match_next('/') {
                    self.line_comment();
                } else if self.match_next('*') {
                    self.block_comment();
                } else {
                    self.add_token(Slash);
                }
            }
            ' ' | '\r' | '\t' => {
                self.text.pop();
            }
            '\n' => {
                self.add_token(Newline);
                self.line += 1;
                self.column = 0;
            }
            '"' => self.scan_string(),
            _ => {
                if is_digit(c) {
                    self.scan_number();
                } else if is_alpha(c) {
                    self.scan_identifier();
                } else {
                    self.invalid_character(c);
                }
            }
        };
    }

    fn invalid_character(&mut self, c: char) {
        self.errors.push(LexError::UnexpectedCharacter {
            ch: c,
            line: self.line,
            column: self.start_column,
        });
        self.add_token(TokenKind::Invalid);
    }

    fn line_comment(&mut self) {
        while let Some(&c) = self.source.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
        self.text.clear();
    }

    fn block_comment(&mut self) {
        loop {
            match self.source.peek() {
                None => {
                    self.errors
                        .push(LexError::UnterminatedBlockComment { line: self.line });
                    break;
                }
                Some('*') => {
                    self.advance();
                    if self.match_next('/') {
                        break;
                    }
                }
                Some('\n') => {
                    self.advance();
                    self.line += 1;
                    self.column = 0;
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
        self.text.clear();
    }

    fn scan_string(&mut self) {
        while let Some(&c) = self.source.peek() {
            if c == '"' {
                break;
            }
            if c == '\n' {
                self.line += 1;
                self.column = 0;
            }
            self.text.push(c);
            self.advance();
        }

        if self.source.peek().is_none() {
            self.errors
                .push(LexError::UnterminatedString { line: self.line });
            self.text.clear();
            return;
        }

        // closing "
        self.advance();

        // no escape processing: the raw run between the quotes is the value
        self.text.remove(0);
        self.add_token(TokenKind::StringToken);
    }

    fn scan_number(&mut self) {
        self.advance_digits();

        // check for a fractional part, which needs two characters of
        // lookahead so the dot is not stolen from a following token
        if let Some(&c) = self.source.peek() {
            if c == '.' {
                let mut cloned = self.source.clone();
                cloned.next();
                if let Some(&next_c) = cloned.peek() {
                    if is_digit(next_c) {
                        self.text.push(c);
                        self.advance();
                        self.advance_digits();
                    }
                }
            }
        }

        self.add_token(TokenKind::Number);
    }

    fn advance_digits(&mut self) {
        while let Some(&c) = self.source.peek() {
            if !is_digit(c) {
                break;
            }
            self.text.push(c);
            self.advance();
        }
    }

    fn scan_identifier(&mut self) {
        while let Some(&c) = self.source.peek() {
            if !is_alpha_num(c) {
                break;
            }
            self.text.push(c);
            self.advance();
        }

        let kind = *KEYWORDS.get(&self.text as &str).unwrap_or(&TokenKind::Identifier);

        self.add_token(kind);
    }

    fn match_next(&mut self, expected: char) -> bool {
        match self.source.peek() {
            Some(&c) if c == expected => {
                self.advance();
                self.text.push(c);
                true
            }
            _ => false,
        }
    }

    fn add_token(&mut self, kind: TokenKind) {
        let mut lexeme = String::new();
        mem::swap(&mut self.text, &mut lexeme);

        let literal: Literal = match kind {
            TokenKind::StringToken => Literal::Str(lexeme.clone()),
            TokenKind::Number => Literal::Number(lexeme.parse().unwrap_or_default()),
            TokenKind::True => Literal::Bool(true),
            TokenKind::False => Literal::Bool(false),
            _ => Literal::None,
        };

        self.tokens.push(Token {
            kind,
            lexeme,
            literal,
            line: self.line,
            column: self.start_column,
        });
    }
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_alpha_num(c: char) -> bool {
    is_alpha(c) || is_digit(c)
}
