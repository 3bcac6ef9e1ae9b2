use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::{error::RuntimeError, token::Token, value::Value};

pub type EnvRef = Rc<RefCell<Environment>>;

/// One lexical scope: name bindings plus a link toward the global scope.
/// Links only ever point outward, so the chain cannot cycle.
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<EnvRef>,
}

impl Environment {
    /// The global scope.
    pub fn global() -> EnvRef {
        Rc::new(RefCell::new(Environment {
            values: HashMap::new(),
            enclosing: None,
        }))
    }

    /// A child scope, entered for a block or a function call body.
    pub fn nested(enclosing: EnvRef) -> EnvRef {
        Rc::new(RefCell::new(Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }))
    }

    /// Inserts or overwrites a binding in this scope only; shadowing an outer
    /// binding is legal.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &Token) -> Result<Value, RuntimeError> {
        if let Some(value) = self.values.get(&name.lexeme) {
            return Ok(value.clone());
        }

        match &self.enclosing {
            Some(parent) => parent.borrow().get(name),
            None => Err(RuntimeError::UndefinedVariable {
                name: name.lexeme.clone(),
                line: name.line,
            }),
        }
    }

    /// Rebinds an existing name, walking outward. Never creates a binding:
    /// assignment to a name undefined in the whole chain is an error.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        if self.values.contains_key(&name.lexeme) {
            self.values.insert(name.lexeme.clone(), value);
            return Ok(());
        }

        match &self.enclosing {
            Some(parent) => parent.borrow_mut().assign(name, value),
            None => Err(RuntimeError::UndefinedVariable {
                name: name.lexeme.clone(),
                line: name.line,
            }),
        }
    }
}
