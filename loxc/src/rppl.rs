use std::io::Write;

use lox_core::parser::prelude::{parse_source, Outcome};

const PROMPT: &str = ">> ";

pub fn start() -> std::io::Result<()> {
	let stdin = std::io::stdin();

	loop {
		let mut input = String::from("");

		print!("{}", PROMPT);
		std::io::stdout().flush()?;

		if stdin.read_line(&mut input)? == 0 {
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
			_ => {
				let (outcome, lex_errors) = parse_source(&input);

				for err in lex_errors {
					println!("{err}");
				}

				match outcome {
					Outcome::Ok(statements) => {
						statements.iter().for_each(|statement| println!("{statement}"));
					},
					Outcome::PartialFailure(statements, errors) => {
						statements.iter().for_each(|statement| println!("{statement}"));
						errors.iter().for_each(|err| println!("Parse error: {err}"));
					}
				}
			}
		}
	}
}
