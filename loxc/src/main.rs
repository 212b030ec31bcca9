mod cli;
mod repl;
mod rlpl;
mod rppl;

use std::{path::PathBuf, rc::Rc};

use clap::{Parser, Subcommand};
use cli::{print_failed, print_finished, print_running};
use lox_core::{
    session::Session,
    utils::prelude::{Error, ErrorEmitter, ErrorEmitterIO},
};

/// Exit code for an unreadable script.
const EXIT_NO_INPUT: i32 = 66;
/// Exit code when the prompt cannot read stdin or write stdout.
const EXIT_IO_ERROR: i32 = 74;

#[derive(Parser)]
#[command(name = "loxc", version, about = "Tree-walking interpreter for Lox scripts")]
struct Cli {
    /// Do not print progress lines to stderr
    #[arg(short, long, global = true, default_value_t = false)]
    quiet: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Runs a script file
    Run {
        /// Path of source file
        path: PathBuf,
    },
    /// Runs an interactive prompt
    Repl,
    /// Runs Read Lex Print Loop
    Rlpl,
    /// Runs Read Parse Print Loop
    Rppl
}

fn main() {
    cli::init_tracing();

    let args = Cli::parse();

    let result = match args.command {
        Command::Run { path } => {
            let code = run_file(path, args.quiet);
            std::process::exit(code);
        },
        Command::Repl => repl::start(),
        Command::Rlpl => rlpl::start(),
        Command::Rppl => rppl::start(),
    };

    if let Err(err) = result {
        tracing::error!(%err, "prompt terminated");
        print_failed(&err.to_string());
        std::process::exit(EXIT_IO_ERROR);
    }
}

fn run_file(path: PathBuf, quiet: bool) -> i32 {
    let emitter = ErrorEmitter::new(Rc::new(ConsoleErrorEmitter));
    let mut session = Session::new(emitter.clone(), std::io::stdout());

    if !quiet {
        print_running(&path.display().to_string());
    }
    let start = std::time::Instant::now();

    match session.run_file(path) {
        Ok(status) => {
            if !quiet {
                match status.is_ok() {
                    true => print_finished(start.elapsed()),
                    false => print_failed(&format!("with {} error(s)", emitter.count())),
                }
            }

            status.exit_code()
        },
        Err(err) => {
            emitter.emit(err);
            EXIT_NO_INPUT
        }
    }
}

/// Renders errors as annotated snippets on stderr.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleErrorEmitter;

impl ErrorEmitterIO for ConsoleErrorEmitter {
    fn emit_error(&self, error: Error) {
        let buffer_writer = crate::cli::stderr_buffer_writer();
        let mut buffer = buffer_writer.buffer();
        error.pretty(&mut buffer);
        buffer_writer
            .print(&buffer)
            .expect("Writing error to stderr");
    }
}
