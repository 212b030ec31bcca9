use std::fmt::Display;

use thiserror::Error;

use crate::{environment::prelude::ValueType, lexer::prelude::Token};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeErrorType {
    #[error("Operand must be a number.")]
    OperandMustBeNumber { got: ValueType },
    #[error("Operands must be numbers.")]
    OperandsMustBeNumbers { left: ValueType, right: ValueType },
    #[error("Operands must be two numbers or two strings.")]
    InvalidAddition { left: ValueType, right: ValueType },
    #[error("Cannot divide by zero.")]
    DivisionByZero,
    #[error("Undefined variable '{name}'.")]
    UndefinedVariable { name: String },
    #[error("Output failed: {err}.")]
    StdIo { err: std::io::ErrorKind },
}

/// Failure raised while evaluating, tied to the token that triggered it.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub error: RuntimeErrorType,
    pub token: Token,
}

impl Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n[line {}]", self.error, self.token.line)
    }
}

impl std::error::Error for RuntimeError {}

impl RuntimeError {
    pub fn new(error: RuntimeErrorType, token: &Token) -> Self {
        Self { error, token: token.clone() }
    }

    /// Short label for the offending span plus extra note lines.
    pub fn details(&self) -> (String, Vec<String>) {
        let label = match &self.error {
            RuntimeErrorType::UndefinedVariable { .. } => "not defined in any enclosing scope".to_string(),
            RuntimeErrorType::DivisionByZero => "right operand is zero".to_string(),
            RuntimeErrorType::StdIo { .. } => "while printing this".to_string(),
            _ => format!("`{}` applied here", self.token.lexeme),
        };

        let notes = match &self.error {
            RuntimeErrorType::OperandMustBeNumber { got } => {
                vec![format!("Found `{got:?}`")]
            },
            RuntimeErrorType::OperandsMustBeNumbers { left, right }
            | RuntimeErrorType::InvalidAddition { left, right } => {
                vec![format!("Found `{left:?}` and `{right:?}`")]
            },
            _ => vec![],
        };

        (label, notes)
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
