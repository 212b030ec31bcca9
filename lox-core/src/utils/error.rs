use std::path::PathBuf;

use termcolor::Buffer;
use thiserror::Error;

use crate::{
    eval::error::RuntimeError,
    lexer::prelude::LexicalError,
    parser::prelude::ParseError,
};
use super::diagnostic::{Diagnostic, Label, Location};

/// Everything the pipeline reports to its driver. `Display` gives the
/// classic one-line form; `pretty` renders an annotated snippet.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("{error}")]
    Lex {
        path: PathBuf,
        src: String,
        error: LexicalError
    },
    #[error("{error}")]
    Syntax {
        path: PathBuf,
        src: String,
        error: ParseError
    },
    #[error("{error}")]
    Runtime {
        path: PathBuf,
        src: String,
        error: RuntimeError
    },
    #[error("IO operation failed: {err}")]
    StdIo {
        path: PathBuf,
        err: std::io::ErrorKind
    }
}

impl Error {
    pub fn is_runtime(&self) -> bool {
        matches!(self, Error::Runtime { .. })
    }

    pub fn pretty_string(&self) -> String {
        let mut nocolor = Buffer::no_color();
        self.pretty(&mut nocolor);
        String::from_utf8(nocolor.into_inner()).expect("Error printing produced invalid utf8")
    }

    pub fn pretty(&self, buf: &mut Buffer) {
        use std::io::Write;

        self.to_diagnostic().write(buf);
        writeln!(buf).expect("write new line diagnostic");
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Error::Lex { path, src, error } => {
                let (title, notes) = error.details();

                Diagnostic {
                    title: format!("Lexical error: {title}"),
                    text: notes.join("\n"),
                    location: Some(Location {
                        src,
                        path: path.clone(),
                        label: Label {
                            text: None,
                            span: error.location,
                        },
                    }),
                }
            },
            Error::Syntax { path, src, error } => {
                let (label, notes) = error.details();

                Diagnostic {
                    title: format!("Syntax error: {}", error.error),
                    text: notes.join("\n"),
                    location: Some(Location {
                        src,
                        path: path.clone(),
                        label: Label {
                            text: Some(label),
                            span: error.token.span,
                        },
                    }),
                }
            },
            Error::Runtime { path, src, error } => {
                let (label, notes) = error.details();

                Diagnostic {
                    title: format!("Runtime error: {}", error.error),
                    text: notes.join("\n"),
                    location: Some(Location {
                        src,
                        path: path.clone(),
                        label: Label {
                            text: Some(label),
                            span: error.token.span,
                        },
                    }),
                }
            },
            Error::StdIo { path, err } => {
                Diagnostic {
                    title: "Standard IO error".into(),
                    text: format!("{}: {err}", path.display()),
                    location: None,
                }
            }
        }
    }
}
