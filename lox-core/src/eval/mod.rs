pub mod error;


use std::io::Write;

use tracing::{debug, trace};

use crate::{
    environment::prelude::{Environment, Value, NIL},
    lexer::prelude::{Token, TokenKind},
    parser::prelude::{Expr, Stmt},
};
use error::{Result, RuntimeError, RuntimeErrorType};

/// Tree-walking evaluator. `print` output goes to `out`.
///
/// Globals survive between `interpret` calls, so one interpreter can serve a
/// whole interactive session.
pub struct Interpreter<W: Write> {
    environment: Environment,
    out: W,
}

impl<W: Write> Interpreter<W> {
    pub fn new(out: W) -> Self {
        Self {
            environment: Environment::new(),
            out,
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Executes `statements` in order, stopping at the first runtime error.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<()> {
        for statement in statements {
            if let Err(err) = self.execute(statement) {
                debug!(line = err.token.line, error = %err.error, "runtime error");
                return Err(err);
            }
        }

        Ok(())
    }

    fn execute(&mut self, statement: &Stmt) -> Result<()> {
        match statement {
            Stmt::Expression { expression } => {
                let _ = self.evaluate(expression)?;
            },
            Stmt::Print { expression } => {
                let value = self.evaluate(expression)?;
                writeln!(self.out, "{value}")
                    .map_err(|err| RuntimeError::new(
                        RuntimeErrorType::StdIo { err: err.kind() },
                        &print_token(expression),
                    ))?;
            },
            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(initializer) => self.evaluate(initializer)?,
                    None => NIL,
                };
                self.environment.define(name.lexeme.clone(), value);
            },
            Stmt::Block { statements } => self.execute_block(statements)?,
            Stmt::If { condition, then_branch, else_branch } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)?;
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)?;
                }
            },
            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    self.execute(body)?;
                }
            },
        }

        Ok(())
    }

    /// Runs `statements` in a fresh child scope. The scope is popped on every
    /// exit path, errors included.
    fn execute_block(&mut self, statements: &[Stmt]) -> Result<()> {
        self.environment.push_scope();
        trace!(len = statements.len(), "executing block");

        let result = statements.iter()
            .try_for_each(|statement| self.execute(statement));

        self.environment.pop_scope();

        result
    }

    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal { value, .. } => Ok(value.clone()),
            Expr::Grouping { expression } => self.evaluate(expression),
            Expr::Variable { name } => self.environment.get(name),
            Expr::Assign { name, value } => {
                let value = self.evaluate(value)?;
                self.environment.assign(name, value.clone())?;
                Ok(value)
            },
            Expr::Unary { operator, right } => {
                let right = self.evaluate(right)?;
                eval_unary(operator, right)
            },
            Expr::Logical { left, operator, right } => {
                let left = self.evaluate(left)?;

                let short_circuits = match operator.kind {
                    TokenKind::Or => left.is_truthy(),
                    _ => !left.is_truthy(),
                };

                match short_circuits {
                    true => Ok(left),
                    false => self.evaluate(right),
                }
            },
            Expr::Binary { left, operator, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                eval_binary(operator, left, right)
            },
        }
    }
}

fn eval_unary(operator: &Token, right: Value) -> Result<Value> {
    match (operator.kind, right) {
        (TokenKind::Bang, right) => Ok(Value::boolean(!right.is_truthy())),
        (TokenKind::Minus, Value::Number { value }) => Ok(Value::number(-value)),
        (_, right) => Err(RuntimeError::new(
            RuntimeErrorType::OperandMustBeNumber { got: right._type() },
            operator,
        )),
    }
}

fn eval_binary(operator: &Token, left: Value, right: Value) -> Result<Value> {
    match operator.kind {
        TokenKind::EqualEqual => return Ok(Value::boolean(left == right)),
        TokenKind::BangEqual => return Ok(Value::boolean(left != right)),
        TokenKind::Plus => return eval_addition(operator, left, right),
        _ => {}
    }

    let (l, r) = match (&left, &right) {
        (Value::Number { value: l }, Value::Number { value: r }) => (*l, *r),
        _ => return Err(RuntimeError::new(
            RuntimeErrorType::OperandsMustBeNumbers { left: left._type(), right: right._type() },
            operator,
        )),
    };

    let value = match operator.kind {
        TokenKind::Greater => Value::boolean(l > r),
        TokenKind::GreaterEqual => Value::boolean(l >= r),
        TokenKind::Less => Value::boolean(l < r),
        TokenKind::LessEqual => Value::boolean(l <= r),
        TokenKind::Minus => Value::number(l - r),
        TokenKind::Star => Value::number(l * r),
        TokenKind::Slash if r == 0.0 => {
            return Err(RuntimeError::new(RuntimeErrorType::DivisionByZero, operator))
        },
        TokenKind::Slash => Value::number(l / r),
        _ => unreachable!("parser never builds a binary `{}`", operator.lexeme),
    };

    Ok(value)
}

/// Numbers add, strings concatenate, and a string mixed with a number
/// concatenates their printed forms.
fn eval_addition(operator: &Token, left: Value, right: Value) -> Result<Value> {
    match (left, right) {
        (Value::Number { value: l }, Value::Number { value: r }) => Ok(Value::number(l + r)),
        (Value::String { value: l }, Value::String { value: r }) => Ok(Value::string(l + &r)),
        (left @ Value::String { .. }, right @ Value::Number { .. })
        | (left @ Value::Number { .. }, right @ Value::String { .. }) => {
            Ok(Value::string(format!("{left}{right}")))
        },
        (left, right) => Err(RuntimeError::new(
            RuntimeErrorType::InvalidAddition { left: left._type(), right: right._type() },
            operator,
        )),
    }
}

/// Token a failed `print` is attributed to.
fn print_token(expression: &Expr) -> Token {
    match expression {
        Expr::Variable { name } | Expr::Assign { name, .. } => name.clone(),
        Expr::Unary { operator, .. }
        | Expr::Binary { operator, .. }
        | Expr::Logical { operator, .. } => operator.clone(),
        Expr::Grouping { expression } => print_token(expression),
        Expr::Literal { span, .. } => Token::new(TokenKind::Print, "print", 0, *span),
    }
}
