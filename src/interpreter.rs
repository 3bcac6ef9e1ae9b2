use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

use crate::environment::{EnvRef, Environment};
use crate::error::RuntimeError;
use crate::expr::Expr;
use crate::function::Function;
use crate::stmt::{Program, Stmt};
use crate::token::{Literal, Token, TokenKind};
use crate::value::Value;

/// How a statement finished: fell through normally, or hit a `return`
/// carrying a value back toward the nearest call site. Returning is not a
/// failure, so it is threaded here instead of through the error channel.
pub enum Flow {
    Normal,
    Return(Value),
}

/// Depth-first, single-threaded evaluator. Owns the scope chain and the
/// global function table; both are built fresh per interpreter.
pub struct Interpreter<W: Write> {
    environment: EnvRef,
    functions: HashMap<String, Function>,
    out: W,
}

impl<W: Write> Interpreter<W> {
    pub fn new(out: W) -> Self {
        Interpreter {
            environment: Environment::global(),
            functions: HashMap::new(),
            out,
        }
    }

    /// Runs the program top to bottom. The first runtime error stops
    /// execution; output printed before it stays printed. A top-level
    /// `return` stops the run without error.
    pub fn interpret(&mut self, program: &Program) -> Result<(), RuntimeError> {
        for statement in &program.statements {
            if let Flow::Return(_) = self.execute(statement)? {
                break;
            }
        }
        Ok(())
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<Flow, RuntimeError> {
        match stmt {
            Stmt::Expression { expression } => {
                self.evaluate(expression)?;
                Ok(Flow::Normal)
            }
            Stmt::Print { expression } => {
                let value = self.evaluate(expression)?;
                writeln!(self.out, "{value}")?;
                Ok(Flow::Normal)
            }
            Stmt::Var {
                name, initializer, ..
            } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Number(0.0),
                };
                self.environment.borrow_mut().define(&name.lexeme, value);
                Ok(Flow::Normal)
            }
            Stmt::Function { name, params, body } => {
                let function = Function {
                    name: name.lexeme.clone(),
                    params: params.iter().map(|param| param.lexeme.clone()).collect(),
                    body: Rc::clone(body),
                    // capture the scope active at the declaration, not the
                    // one active at the eventual call
                    closure: Rc::clone(&self.environment),
                };
                self.functions.insert(name.lexeme.clone(), function);
                Ok(Flow::Normal)
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(Flow::Normal)
                }
            }
            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    if let Flow::Return(value) = self.execute(body)? {
                        return Ok(Flow::Return(value));
                    }
                }
                Ok(Flow::Normal)
            }
            Stmt::Block { statements } => {
                let scope = Environment::nested(Rc::clone(&self.environment));
                self.execute_block(statements, scope)
            }
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Number(0.0),
                };
                Ok(Flow::Return(value))
            }
        }
    }

    /// Runs statements in the given scope, restoring the previous scope on
    /// every exit path; bindings made inside are invisible afterwards.
    fn execute_block(&mut self, statements: &[Stmt], scope: EnvRef) -> Result<Flow, RuntimeError> {
        let previous = Rc::clone(&self.environment);
        self.environment = scope;

        let mut flow = Ok(Flow::Normal);
        for statement in statements {
            match self.execute(statement) {
                Ok(Flow::Normal) => {}
                other => {
                    flow = other;
                    break;
                }
            }
        }

        self.environment = previous;
        flow
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::LiteralExpr { value } => Ok(literal_value(value)),
            Expr::Variable { name } => self.environment.borrow().get(name),
            Expr::Assign { name, value } => {
                let value = self.evaluate(value)?;
                self.environment.borrow_mut().assign(name, value.clone())?;
                Ok(value)
            }
            Expr::Binary {
                left,
                operator,
                right,
            } => self.binary(left, operator, right),
            Expr::Unary { operator, right } => {
                let value = self.evaluate(right)?;
                match operator.kind {
                    TokenKind::Not => Ok(Value::Bool(!value.is_truthy())),
                    TokenKind::Minus => match value {
                        Value::Number(n) => Ok(Value::Number(-n)),
                        _ => Err(RuntimeError::TypeMismatch {
                            message: "operand to '-' must be a number",
                            line: operator.line,
                        }),
                    },
                    _ => Err(RuntimeError::TypeMismatch {
                        message: "expected a unary operator",
                        line: operator.line,
                    }),
                }
            }
            Expr::Call { name, arguments } => self.call(name, arguments),
        }
    }

    fn binary(
        &mut self,
        left: &Expr,
        operator: &Token,
        right: &Expr,
    ) -> Result<Value, RuntimeError> {
        // && and || decide before the right operand is touched, and hand
        // back the operand value itself, not a coerced boolean
        match operator.kind {
            TokenKind::And => {
                let left = self.evaluate(left)?;
                return if left.is_truthy() {
                    self.evaluate(right)
                } else {
                    Ok(left)
                };
            }
            TokenKind::Or => {
                let left = self.evaluate(left)?;
                return if left.is_truthy() {
                    Ok(left)
                } else {
                    self.evaluate(right)
                };
            }
            _ => {}
        }

        let left = self.evaluate(left)?;
        let right = self.evaluate(right)?;

        match operator.kind {
            TokenKind::Plus => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::Str(_), _) | (_, Value::Str(_)) => {
                    Ok(Value::Str(format!("{left}{right}")))
                }
                _ => Err(RuntimeError::TypeMismatch {
                    message: "operands to '+' must be numbers or strings",
                    line: operator.line,
                }),
            },
            TokenKind::Minus => {
                let (a, b) = numeric_operands(operator, left, right)?;
                Ok(Value::Number(a - b))
            }
            TokenKind::Star => {
                let (a, b) = numeric_operands(operator, left, right)?;
                Ok(Value::Number(a * b))
            }
            TokenKind::Slash => {
                let (a, b) = numeric_operands(operator, left, right)?;
                if b == 0.0 {
                    return Err(RuntimeError::DivisionByZero {
                        line: operator.line,
                    });
                }
                Ok(Value::Number(a / b))
            }
            TokenKind::Percent => {
                let (a, b) = numeric_operands(operator, left, right)?;
                if b == 0.0 {
                    return Err(RuntimeError::DivisionByZero {
                        line: operator.line,
                    });
                }
                Ok(Value::Number(a % b))
            }
            TokenKind::Greater => {
                let (a, b) = numeric_operands(operator, left, right)?;
                Ok(Value::Bool(a > b))
            }
            TokenKind::GreaterEqual => {
                let (a, b) = numeric_operands(operator, left, right)?;
                Ok(Value::Bool(a >= b))
            }
            TokenKind::Less => {
                let (a, b) = numeric_operands(operator, left, right)?;
                Ok(Value::Bool(a < b))
            }
            TokenKind::LessEqual => {
                let (a, b) = numeric_operands(operator, left, right)?;
                Ok(Value::Bool(a <= b))
            }
            TokenKind::EqualEqual => Ok(Value::Bool(left == right)),
            TokenKind::NotEqual => Ok(Value::Bool(left != right)),
            _ => Err(RuntimeError::TypeMismatch {
                message: "expected a binary operator",
                line: operator.line,
            }),
        }
    }

    fn call(&mut self, name: &Token, arguments: &[Expr]) -> Result<Value, RuntimeError> {
        // the callee lives in the function table, not in any scope
        let function = match self.functions.get(&name.lexeme) {
            Some(function) => function.clone(),
            None => {
                return Err(RuntimeError::UndefinedFunction {
                    name: name.lexeme.clone(),
                    line: name.line,
                })
            }
        };

        let expected = function.arity();
        if arguments.len() != expected {
            return Err(RuntimeError::ArityMismatch {
                name: function.name,
                expected,
                found: arguments.len(),
                line: name.line,
            });
        }

        // arguments evaluate in the caller's environment; the call body runs
        // in a fresh scope under the closure, never under the caller
        let mut values = Vec::with_capacity(arguments.len());
        for argument in arguments {
            values.push(self.evaluate(argument)?);
        }

        let scope = Environment::nested(Rc::clone(&function.closure));
        for (param, value) in function.params.iter().zip(values) {
            scope.borrow_mut().define(param, value);
        }

        match self.execute_block(&function.body, scope)? {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(Value::Number(0.0)),
        }
    }
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Number(n) => Value::Number(*n),
        Literal::Str(s) => Value::Str(s.clone()),
        Literal::Bool(b) => Value::Bool(*b),
        Literal::None => Value::Number(0.0),
    }
}

fn numeric_operands(
    operator: &Token,
    left: Value,
    right: Value,
) -> Result<(f64, f64), RuntimeError> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok((a, b)),
        _ => Err(RuntimeError::TypeMismatch {
            message: "operands must be numbers",
            line: operator.line,
        }),
    }
}
