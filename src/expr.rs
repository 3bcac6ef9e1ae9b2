use crate::token::{Literal, Token};

pub enum Expr {
    LiteralExpr {
        value: Literal,
    },
    Variable {
        name: Token,
    },
    Assign {
        name: Token,
        value: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    Unary {
        operator: Token,
        right: Box<Expr>,
    },
    Call {
        name: Token,
        arguments: Vec<Expr>,
    },
}
