use std::fmt::Display;

use crate::lexer::prelude::Literal;

pub const TRUE: Value = Value::Boolean { value: true };
pub const FALSE: Value = Value::Boolean { value: false };
pub const NIL: Value = Value::Nil;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number {
        value: f64,
    },
    String {
        value: String,
    },
    Boolean {
        value: bool
    },
    Nil,
}

impl Value {
    pub fn _type(&self) -> ValueType {
        match self {
            Self::Number { .. } => ValueType::Number,
            Self::String { .. } => ValueType::String,
            Self::Boolean { .. } => ValueType::Boolean,
            Self::Nil => ValueType::Nil,
        }
    }

    /// `nil` and `false` are falsy, everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Boolean { value: false })
    }

    pub fn number(value: f64) -> Self {
        Self::Number { value }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::String { value: value.into() }
    }

    pub fn boolean(value: bool) -> Self {
        Self::Boolean { value }
    }
}

impl From<Literal> for Value {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::Number { value } => Value::Number { value },
            Literal::String { value } => Value::String { value },
        }
    }
}

/// Integral numbers print without a fractional part: `3.0` prints as `3`.
impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number { value } => {
                let text = format!("{value:?}");
                match text.strip_suffix(".0") {
                    Some(integral) => write!(f, "{integral}"),
                    None => write!(f, "{text}"),
                }
            },
            Value::String { value } => write!(f, "{value}"),
            Value::Boolean { value } => write!(f, "{value}"),
            Value::Nil => write!(f, "nil"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Number,
    String,
    Boolean,
    Nil,
}
