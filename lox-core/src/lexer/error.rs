use std::fmt::Display;

use crate::utils::prelude::SrcSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexicalErrorType {
    UnrecognizedToken { tok: char },
    UnterminatedString,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexicalError {
    pub error: LexicalErrorType,
    pub location: SrcSpan,
    pub line: u32,
}

impl LexicalError {
    pub fn details(&self) -> (&'static str, Vec<String>) {
        match self.error {
            LexicalErrorType::UnrecognizedToken { tok } => {
                ("Unexpected character.", vec![format!("Found `{tok}`")])
            },
            LexicalErrorType::UnterminatedString => {
                ("Unterminated string.", vec!["Add a closing `\"`".to_string()])
            },
        }
    }
}

impl Display for LexicalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[line {}] Error: {}", self.line, self.details().0)
    }
}

impl std::error::Error for LexicalError {}
