use std::fmt;

use crate::{
    expr::Expr,
    token::{Literal, Token},
};

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(n) => {
                write!(f, "{}", n)
            }
            Literal::Str(s) => {
                write!(f, "{}", s)
            }
            Literal::Bool(b) => {
                write!(f, "{}", b)
            }
            Literal::None => {
                write!(f, "nil")
            }
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lexeme)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::LiteralExpr { value } => {
                write!(f, "{value}")
            }
            Expr::Variable { name } => {
                write!(f, "{name}")
            }
            Expr::Assign { name, value } => {
                write!(f, "{name} = {value}")
            }
            Expr::Binary {
                left,
                operator,
                right,
            } => {
                write!(f, "({operator} {left} {right})")
            }
            Expr::Unary { operator, right } => {
                write!(f, "({operator} {right})")
            }
            Expr::Call { name, arguments } => {
                write!(f, "{name}(")?;
                match arguments.first() {
                    Some(expr) => write!(f, "{expr}")?,
                    _ => {}
                }
                arguments.iter().skip(1).fold(Ok(()), |result, expr| {
                    result.and_then(|_| write!(f, ",{expr}"))
                })?;
                write!(f, ")")
            }
        }
    }
}
