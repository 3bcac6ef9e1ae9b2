use std::rc::Rc;

use crate::{environment::EnvRef, stmt::Stmt};

/// A user-defined function as stored in the interpreter's global function
/// table. Functions are not values: they cannot be bound to variables or
/// passed as arguments, only declared and called by name.
#[derive(Clone)]
pub struct Function {
    pub name: String,
    pub params: Vec<String>,
    pub body: Rc<Vec<Stmt>>,
    /// The environment active where the function was declared. Each call
    /// nests its parameter scope under this, giving lexical scoping.
    pub closure: EnvRef,
}

impl Function {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}
