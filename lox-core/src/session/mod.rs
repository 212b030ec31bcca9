#[cfg(test)]
mod tests;

use std::{fs::File, io::{BufReader, Write}, path::PathBuf};

use tracing::{debug, info_span};
use utf8_chars::BufReadCharsExt;

use crate::{
    eval::Interpreter,
    lexer::prelude::scan_tokens,
    parser::prelude::{Outcome, Parser},
    utils::prelude::{Error, ErrorEmitter},
};

/// What went wrong during one `run`, if anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Status {
    pub had_error: bool,
    pub had_runtime_error: bool,
}

impl Status {
    pub const EXIT_DATA_ERROR: i32 = 65;
    pub const EXIT_SOFTWARE: i32 = 70;

    pub fn is_ok(&self) -> bool {
        !self.had_error && !self.had_runtime_error
    }

    pub fn exit_code(&self) -> i32 {
        if self.had_error {
            Self::EXIT_DATA_ERROR
        } else if self.had_runtime_error {
            Self::EXIT_SOFTWARE
        } else {
            0
        }
    }
}

/// Scan, parse and interpret pipeline. One session keeps one interpreter,
/// so globals carry over from one `run` to the next.
pub struct Session<W: Write> {
    interpreter: Interpreter<W>,
    emitter: ErrorEmitter,
    path: PathBuf,
}

impl<W: Write> Session<W> {
    pub fn new(emitter: ErrorEmitter, out: W) -> Self {
        Self {
            interpreter: Interpreter::new(out),
            emitter,
            path: PathBuf::from("<stdin>"),
        }
    }

    pub fn into_output(self) -> W {
        self.interpreter.into_output()
    }

    /// Runs one chunk of source. Nothing is executed when it has lexical or
    /// syntax errors; every such error is emitted once.
    pub fn run(&mut self, src: &str) -> Status {
        let _span = info_span!("run", path = %self.path.display()).entered();
        let mut status = Status::default();

        let (tokens, lex_errors) = scan_tokens(src);
        debug!(tokens = tokens.len(), errors = lex_errors.len(), "scanned");

        for error in lex_errors {
            status.had_error = true;
            self.emitter.emit(Error::Lex {
                path: self.path.clone(),
                src: src.to_string(),
                error,
            });
        }

        let statements = match Parser::new(tokens).parse() {
            Outcome::Ok(statements) => statements,
            Outcome::PartialFailure(_, errors) => {
                debug!(errors = errors.len(), "parse failed");

                for error in errors {
                    self.emitter.emit(Error::Syntax {
                        path: self.path.clone(),
                        src: src.to_string(),
                        error,
                    });
                }

                status.had_error = true;
                return status;
            }
        };

        if status.had_error {
            return status;
        }

        debug!(statements = statements.len(), "parsed");

        if let Err(error) = self.interpreter.interpret(&statements) {
            status.had_runtime_error = true;
            self.emitter.emit(Error::Runtime {
                path: self.path.clone(),
                src: src.to_string(),
                error,
            });
        }

        status
    }

    /// Reads `path` as a UTF-8 char stream and runs it.
    pub fn run_file(&mut self, path: PathBuf) -> Result<Status, Error> {
        let io_error = |err: std::io::Error| Error::StdIo { path: path.clone(), err: err.kind() };

        let file = File::open(&path).map_err(io_error)?;
        let file_size = file.metadata().map_err(io_error)?.len() as usize;

        let mut src = String::with_capacity(file_size);
        let mut reader = BufReader::new(file);

        for c in reader.chars() {
            src.push(c.map_err(io_error)?);
        }

        self.path = path;

        Ok(self.run(&src))
    }
}
