use std::fmt::Display;

use thiserror::Error;

use crate::lexer::prelude::{Token, TokenKind};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseErrorType {
    #[error("Expect expression.")]
    ExpectedExpression,
    #[error("Expect variable name.")]
    ExpectedVariableName,
    #[error("Invalid assignment target.")]
    InvalidAssignmentTarget,
    /// `context` completes the sentence, e.g. "after value".
    #[error("Expect '{expected}' {context}.")]
    UnexpectedToken {
        expected: TokenKind,
        context: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub error: ParseErrorType,
    pub token: Token,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[line {}] Error{}: {}", self.token.line, self.location(), self.error)
    }
}

impl std::error::Error for ParseError {}

impl ParseError {
    /// Where the error happened, as shown after "Error".
    pub fn location(&self) -> String {
        match self.token.kind {
            TokenKind::Eof => " at end".to_string(),
            _ => format!(" at '{}'", self.token.lexeme),
        }
    }

    pub fn details(&self) -> (String, Vec<String>) {
        let found = match self.token.kind {
            TokenKind::Eof => "end of file".to_string(),
            TokenKind::Number => "a number".to_string(),
            TokenKind::String => "a string".to_string(),
            TokenKind::Identifier => format!("the identifier `{}`", self.token.lexeme),
            kind if kind.is_reserved_word() => format!("the keyword `{}`", kind.as_literal()),
            kind => format!("`{}`", kind.as_literal()),
        };

        match &self.error {
            ParseErrorType::InvalidAssignmentTarget => (
                "cannot assign to this".to_string(),
                vec!["Only variables can be assigned to".to_string()],
            ),
            ParseErrorType::UnexpectedToken { expected, .. } => (
                format!("expected `{}`", expected.as_literal()),
                vec![format!("Found {found}")],
            ),
            _ => (format!("found {found}"), vec![]),
        }
    }
}

pub fn parse_error<T>(error: ParseErrorType, token: &Token) -> Result<T, ParseError> {
    Err(ParseError { error, token: token.clone() })
}
