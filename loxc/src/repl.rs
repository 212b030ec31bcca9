use std::{io::Write, rc::Rc};

use lox_core::{session::Session, utils::prelude::ErrorEmitter};

use crate::ConsoleErrorEmitter;

const PROMPT: &str = "> ";

/// Interactive prompt. Every line runs in the same session, so variables
/// defined on one line are visible on the next.
pub fn start() -> std::io::Result<()> {
	if let Err(err) = ctrlc::set_handler(|| {
		println!();
		std::process::exit(0);
	}) {
		tracing::warn!(%err, "could not install Ctrl-C handler");
	}

	let stdin = std::io::stdin();
	let mut session = Session::new(ErrorEmitter::new(Rc::new(ConsoleErrorEmitter)), std::io::stdout());

	loop {
		let mut input = String::from("");

		print!("{}", PROMPT);
		std::io::stdout().flush()?;

		if stdin.read_line(&mut input)? == 0 {
			println!();
			return Ok(());
		}

		if let Some('\n') = input.chars().next_back() {
			input.pop();
		}
		if let Some('\r') = input.chars().next_back() {
			input.pop();
		}

		match input.as_str() {
			"" => {},
			".exit" => return Ok(()),
			line => {
				let status = session.run(line);
				tracing::debug!(?status, "line finished");
			}
		}
	}
}
