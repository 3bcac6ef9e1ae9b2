use std::iter::Peekable;
use std::rc::Rc;
use std::slice::Iter;

use crate::error::ParseError;
use crate::expr::Expr;
use crate::stmt::{Program, Stmt};
use crate::token::{Literal, Token, TokenKind, TokenKind::*};

type TokenStream<'a> = Peekable<Iter<'a, Token>>;

// parameters: token iterator, and a series of TokenKind variants separated
// by |; consumes and returns the next token when it matches
macro_rules! match_kinds {
    ($tokens:ident, $( $variant:pat_param )|* ) => {
        match $tokens.peek() {
            Some(token) => {
                match token.kind {
                    $(
                        $variant
                    )|* => $tokens.next(),
                    _ => None,
                }
            },
            None => None,
        }
    };
}

/// Parses the token stream into a program, collecting syntax errors along
/// the way. The program always comes back with every statement that parsed
/// cleanly; after an error the parser synchronizes to the next statement
/// boundary and keeps going.
pub fn parse(tokens: &[Token]) -> (Program, Vec<ParseError>) {
    let tokens = &mut tokens.iter().peekable();

    let mut statements = Vec::new();
    let mut errors = Vec::new();
    loop {
        skip_newlines(tokens);
        if at_end(tokens) {
            break;
        }
        match statement(tokens) {
            Ok(stmt) => statements.push(stmt),
            Err(error) => {
                errors.push(error);
                synchronize(tokens);
            }
        }
    }

    (Program { statements }, errors)
}

fn at_end(tokens: &mut TokenStream) -> bool {
    match tokens.peek() {
        Some(token) => token.kind == Eof,
        None => true,
    }
}

// Newline tokens only matter at statement boundaries; everywhere else the
// grammar ignores them.
fn skip_newlines(tokens: &mut TokenStream) {
    while match_kinds!(tokens, Newline).is_some() {}
}

fn check(tokens: &mut TokenStream, kind: TokenKind) -> bool {
    matches!(tokens.peek(), Some(token) if token.kind == kind)
}

fn consume<'a>(
    tokens: &mut TokenStream<'a>,
    kind: TokenKind,
    message: &'static str,
) -> Result<&'a Token, ParseError> {
    if let Some(token) = tokens.next_if(|token| token.kind == kind) {
        return Ok(token);
    }
    Err(error_at(tokens, message))
}

fn error_at(tokens: &mut TokenStream, message: &'static str) -> ParseError {
    match tokens.peek() {
        Some(token) => ParseError::at(token, message),
        None => ParseError::UnexpectedEof { line: 0, message },
    }
}

fn statement(tokens: &mut TokenStream) -> Result<Stmt, ParseError> {
    skip_newlines(tokens);

    if match_kinds!(tokens, Var).is_some() {
        return var_declaration(tokens, false);
    }
    if match_kinds!(tokens, Const).is_some() {
        return var_declaration(tokens, true);
    }
    if match_kinds!(tokens, Function).is_some() {
        return function_declaration(tokens);
    }
    if match_kinds!(tokens, If).is_some() {
        return if_statement(tokens);
    }
    if match_kinds!(tokens, While).is_some() {
        return while_statement(tokens);
    }
    if match_kinds!(tokens, Print).is_some() {
        return print_statement(tokens);
    }
    if let Some(keyword) = match_kinds!(tokens, Return) {
        return return_statement(tokens, keyword.clone());
    }
    if match_kinds!(tokens, LeftBrace).is_some() {
        return Ok(Stmt::Block {
            statements: block(tokens)?,
        });
    }

    expression_statement(tokens)
}

fn var_declaration(tokens: &mut TokenStream, constant: bool) -> Result<Stmt, ParseError> {
    let name = consume(tokens, Identifier, "expected variable name")?.clone();

    let initializer = if match_kinds!(tokens, Assign).is_some() {
        Some(Box::new(expression(tokens)?))
    } else {
        None
    };

    consume(tokens, Semicolon, "expected ';' after variable declaration")?;
    Ok(Stmt::Var {
        name,
        initializer,
        constant,
    })
}

fn function_declaration(tokens: &mut TokenStream) -> Result<Stmt, ParseError> {
    let name = consume(tokens, Identifier, "expected function name")?.clone();

    consume(tokens, LeftParen, "expected '(' after function name")?;
    let mut params = Vec::new();
    if !check(tokens, RightParen) {
        loop {
            params.push(consume(tokens, Identifier, "expected parameter name")?.clone());
            if match_kinds!(tokens, Comma).is_none() {
                break;
            }
        }
    }
    consume(tokens, RightParen, "expected ')' after parameters")?;

    skip_newlines(tokens);
    consume(tokens, LeftBrace, "expected '{' before function body")?;
    let body = Rc::new(block(tokens)?);

    Ok(Stmt::Function { name, params, body })
}

fn if_statement(tokens: &mut TokenStream) -> Result<Stmt, ParseError> {
    consume(tokens, LeftParen, "expected '(' after 'if'")?;
    let condition = Box::new(expression(tokens)?);
    consume(tokens, RightParen, "expected ')' after if condition")?;

    let then_branch = Box::new(statement(tokens)?);

    skip_newlines(tokens);
    let else_branch = if match_kinds!(tokens, Else).is_some() {
        Some(Box::new(statement(tokens)?))
    } else {
        None
    };

    Ok(Stmt::If {
        condition,
        then_branch,
        else_branch,
    })
}

fn while_statement(tokens: &mut TokenStream) -> Result<Stmt, ParseError> {
    consume(tokens, LeftParen, "expected '(' after 'while'")?;
    let condition = Box::new(expression(tokens)?);
    consume(tokens, RightParen, "expected ')' after while condition")?;

    let body = Box::new(statement(tokens)?);

    Ok(Stmt::While { condition, body })
}

fn print_statement(tokens: &mut TokenStream) -> Result<Stmt, ParseError> {
    let value = expression(tokens)?;
    consume(tokens, Semicolon, "expected ';' after print expression")?;
    Ok(Stmt::Print {
        expression: Box::new(value),
    })
}

fn return_statement(tokens: &mut TokenStream, keyword: Token) -> Result<Stmt, ParseError> {
    let value = if check(tokens, Semicolon) {
        None
    } else {
        Some(Box::new(expression(tokens)?))
    };

    consume(tokens, Semicolon, "expected ';' after return statement")?;
    Ok(Stmt::Return { keyword, value })
}

fn block(tokens: &mut TokenStream) -> Result<Vec<Stmt>, ParseError> {
    let mut statements = Vec::new();

    loop {
        skip_newlines(tokens);
        if match_kinds!(tokens, RightBrace).is_some() {
            return Ok(statements);
        }
        if at_end(tokens) {
            return Err(error_at(tokens, "expected '}' after block"));
        }
        statements.push(statement(tokens)?);
    }
}

fn expression_statement(tokens: &mut TokenStream) -> Result<Stmt, ParseError> {
    let expression = expression(tokens)?;
    consume(tokens, Semicolon, "expected ';' after expression")?;
    Ok(Stmt::Expression {
        expression: Box::new(expression),
    })
}

fn expression(tokens: &mut TokenStream) -> Result<Expr, ParseError> {
    assignment(tokens)
}

fn assignment(tokens: &mut TokenStream) -> Result<Expr, ParseError> {
    let expr = logical_or(tokens)?;

    if let Some(equals) = match_kinds!(tokens, Assign) {
        let value = assignment(tokens)?;

        return match expr {
            Expr::Variable { name } => Ok(Expr::Assign {
                name,
                value: Box::new(value),
            }),
            _ => Err(ParseError::InvalidAssignmentTarget { line: equals.line }),
        };
    }

    Ok(expr)
}

fn logical_or(tokens: &mut TokenStream) -> Result<Expr, ParseError> {
    let mut expr = logical_and(tokens)?;

    while let Some(operator) = match_kinds!(tokens, Or) {
        let operator = operator.to_owned();
        let right = logical_and(tokens)?;
        expr = Expr::Binary {
            left: Box::new(expr),
            operator,
            right: Box::new(right),
        };
    }

    Ok(expr)
}

fn logical_and(tokens: &mut TokenStream) -> Result<Expr, ParseError> {
    let mut expr = equality(tokens)?;

    while let Some(operator) = match_kinds!(tokens, And) {
        let operator = operator.to_owned();
        let right = equality(tokens)?;
        expr = Expr::Binary {
            left: Box::new(expr),
            operator,
            right: Box::new(right),
        };
    }

    Ok(expr)
}

fn equality(tokens: &mut TokenStream) -> Result<Expr, ParseError> {
    let mut expr = comparison(tokens)?;

    while let Some(operator) = match_kinds!(tokens, NotEqual | EqualEqual) {
        let operator = operator.to_owned();
        let right = comparison(tokens)?;
        expr = Expr::Binary {
            left: Box::new(expr),
            operator,
            right: Box::new(right),
        };
    }

    Ok(expr)
}

fn comparison(tokens: &mut TokenStream) -> Result<Expr, ParseError> {
    let mut expr = term(tokens)?;

    while let Some(operator) = match_kinds!(tokens, Greater | GreaterEqual | Less | LessEqual) {
        let operator = operator.to_owned();
        let right = term(tokens)?;
        expr = Expr::Binary {
            left: Box::new(expr),
            operator,
            right: Box::new(right),
        };
    }

    Ok(expr)
}

fn term(tokens: &mut TokenStream) -> Result<Expr, ParseError> {
    let mut expr = factor(tokens)?;

    while let Some(operator) = match_kinds!(tokens, Minus | Plus) {
        let operator = operator.to_owned();
        let right = factor(tokens)?;
        expr = Expr::Binary {
            left: Box::new(expr),
            operator,
            right: Box::new(right),
        };
    }

    Ok(expr)
}

fn factor(tokens: &mut TokenStream) -> Result<Expr, ParseError> {
    let mut expr = unary(tokens)?;

    while let Some(operator) = match_kinds!(tokens, Slash | Star | Percent) {
        let operator = operator.to_owned();
        let right = unary(tokens)?;
        expr = Expr::Binary {
            left: Box::new(expr),
            operator,
            right: Box::new(right),
        };
    }

    Ok(expr)
}

fn unary(tokens: &mut TokenStream) -> Result<Expr, ParseError> {
    if let Some(operator) = match_kinds!(tokens, Not | Minus) {
        let operator = operator.to_owned();
        let right = unary(tokens)?;
        return Ok(Expr::Unary {
            operator,
            right: Box::new(right),
        });
    }

    call(tokens)
}

fn call(tokens: &mut TokenStream) -> Result<Expr, ParseError> {
    let mut expr = primary(tokens)?;

    while let Some(paren) = match_kinds!(tokens, LeftParen) {
        expr = finish_call(tokens, expr, paren.line)?;
    }

    Ok(expr)
}

// Callees are bare names looked up in the function table, so anything other
// than a plain identifier to the left of '(' is rejected here.
fn finish_call(tokens: &mut TokenStream, callee: Expr, line: usize) -> Result<Expr, ParseError> {
    let name = match callee {
        Expr::Variable { name } => name,
        _ => return Err(ParseError::InvalidCallTarget { line }),
    };

    let mut arguments = Vec::new();
    if !check(tokens, RightParen) {
        loop {
            arguments.push(expression(tokens)?);
            if match_kinds!(tokens, Comma).is_none() {
                break;
            }
        }
    }

    consume(tokens, RightParen, "expected ')' after arguments")?;
    Ok(Expr::Call { name, arguments })
}

fn primary(tokens: &mut TokenStream) -> Result<Expr, ParseError> {
    let token = match tokens.peek() {
        Some(&token) => token,
        None => return Err(error_at(tokens, "expected expression")),
    };

    match token.kind {
        True | False | Number | StringToken => {
            tokens.next();
            Ok(Expr::LiteralExpr {
                value: token.literal.clone(),
            })
        }
        // nil collapses to the number 0: 'nil == 0' holds and 'print nil;'
        // prints 0
        Nil => {
            tokens.next();
            Ok(Expr::LiteralExpr {
                value: Literal::Number(0.0),
            })
        }
        Identifier => {
            tokens.next();
            Ok(Expr::Variable {
                name: token.clone(),
            })
        }
        LeftParen => {
            tokens.next();
            let expr = expression(tokens)?;
            consume(tokens, RightParen, "expected ')' after expression")?;
            Ok(expr)
        }
        _ => Err(ParseError::at(token, "expected expression")),
    }
}

// Discards tokens up to a semicolon or down to a token that starts a new
// statement, so one pass can surface several independent syntax errors.
fn synchronize(tokens: &mut TokenStream) {
    while let Some(token) = tokens.next_if(|token| token.kind != Eof) {
        if token.kind == Semicolon {
            return;
        }
        if let Some(next) = tokens.peek() {
            match next.kind {
                Function | Var | For | If | While | Print | Return | Eof => return,
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use pretty_assertions::assert_eq;

    fn parse_source(source: &str) -> (Program, Vec<ParseError>) {
        let (tokens, lex_errors) = Lexer::new(source).scan();
        assert!(lex_errors.is_empty(), "unexpected lex errors: {lex_errors:?}");
        parse(&tokens)
    }

    fn first_expression(source: &str) -> String {
        let (program, errors) = parse_source(source);
        assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");
        match &program.statements[0] {
            Stmt::Expression { expression } => expression.to_string(),
            _ => panic!("expected an expression statement"),
        }
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        assert_eq!(first_expression("2 + 3 * 4;"), "(+ 2 (* 3 4))");
    }

    #[test]
    fn comparison_binds_tighter_than_equality() {
        assert_eq!(first_expression("1 < 2 == true;"), "(== (< 1 2) true)");
    }

    #[test]
    fn logical_or_is_the_loosest_operator() {
        assert_eq!(
            first_expression("a || b && c == d;"),
            "(|| a (&& b (== c d)))"
        );
    }

    #[test]
    fn binary_operators_associate_left() {
        assert_eq!(first_expression("10 - 4 - 3;"), "(- (- 10 4) 3)");
    }

    #[test]
    fn unary_nests_inside_multiplication() {
        assert_eq!(first_expression("-a * !b;"), "(* (- a) (! b))");
    }

    #[test]
    fn parentheses_override_precedence() {
        assert_eq!(first_expression("(2 + 3) * 4;"), "(* (+ 2 3) 4)");
    }

    #[test]
    fn nil_parses_to_the_number_zero() {
        assert_eq!(first_expression("nil;"), "0");
    }

    #[test]
    fn call_arguments_parse_in_order() {
        assert_eq!(first_expression("add(1, 2 * 3, x);"), "add(1,(* 2 3),x)");
    }

    #[test]
    fn assignment_requires_an_identifier_target() {
        let (_, errors) = parse_source("f() = 3;");
        assert_eq!(
            errors,
            vec![ParseError::InvalidAssignmentTarget { line: 1 }]
        );
    }

    #[test]
    fn call_target_must_be_a_name() {
        let (_, errors) = parse_source("(1 + 2)(3);");
        assert_eq!(errors, vec![ParseError::InvalidCallTarget { line: 1 }]);
    }

    #[test]
    fn missing_semicolon_reports_the_offending_token() {
        // the newline token carries the line the statement ended on
        let (_, errors) = parse_source("var x = 1\nprint x;");
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0],
            ParseError::UnexpectedToken { line: 1, .. }
        ));
    }

    #[test]
    fn recovers_at_statement_boundary_after_an_error() {
        let (program, errors) = parse_source("var = 5; print 1;");
        assert_eq!(errors.len(), 1);
        assert_eq!(program.statements.len(), 1);
        assert!(matches!(program.statements[0], Stmt::Print { .. }));
    }

    #[test]
    fn reports_multiple_independent_errors_in_one_pass() {
        let (_, errors) = parse_source("var = 1; const = 2; var ok = 3;");
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn const_declaration_sets_the_constant_flag() {
        let (program, errors) = parse_source("const PI = 3.14;");
        assert!(errors.is_empty());
        assert!(matches!(
            program.statements[0],
            Stmt::Var { constant: true, .. }
        ));
    }

    #[test]
    fn function_declaration_collects_parameters() {
        let (program, errors) = parse_source("function add(a, b) { return a + b; }");
        assert!(errors.is_empty());
        match &program.statements[0] {
            Stmt::Function { name, params, body } => {
                assert_eq!(name.lexeme, "add");
                let names: Vec<_> = params.iter().map(|p| p.lexeme.as_str()).collect();
                assert_eq!(names, vec!["a", "b"]);
                assert_eq!(body.len(), 1);
            }
            _ => panic!("expected a function declaration"),
        }
    }

    #[test]
    fn unterminated_block_is_a_single_error() {
        let (_, errors) = parse_source("{ print 1;");
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ParseError::UnexpectedEof { .. }));
    }

    #[test]
    fn newlines_are_invisible_between_statements() {
        let (program, errors) = parse_source("var x = 1;\n\nprint x;\n");
        assert!(errors.is_empty());
        assert_eq!(program.statements.len(), 2);
    }

    #[test]
    fn else_attaches_across_a_newline() {
        let (program, errors) = parse_source("if (1) { print 1; }\nelse { print 2; }");
        assert!(errors.is_empty());
        assert!(matches!(
            program.statements[0],
            Stmt::If {
                else_branch: Some(_),
                ..
            }
        ));
    }
}
