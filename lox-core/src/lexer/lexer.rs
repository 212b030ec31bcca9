use std::fmt::Display;

use tracing::trace;

use super::error::{LexicalError, LexicalErrorType};
use super::token::{Literal, Token, TokenKind};
use crate::utils::prelude::SrcSpan;

pub type LexResult = std::result::Result<Token, LexicalError>;

pub fn str_to_keyword(word: &str) -> Option<TokenKind> {
	Some(match word {
		"and" => TokenKind::And,
		"class" => TokenKind::Class,
		"else" => TokenKind::Else,
		"false" => TokenKind::False,
		"for" => TokenKind::For,
		"fun" => TokenKind::Fun,
		"if" => TokenKind::If,
		"nil" => TokenKind::Nil,
		"or" => TokenKind::Or,
		"print" => TokenKind::Print,
		"return" => TokenKind::Return,
		"super" => TokenKind::Super,
		"this" => TokenKind::This,
		"true" => TokenKind::True,
		"var" => TokenKind::Var,
		"while" => TokenKind::While,
		_ => return None
	})
}

#[derive(Debug)]
pub struct Lexer<T: Iterator<Item = (u32, char)>> {
	position: u32,
	next_position: u32,
	ch: Option<char>,
	next_ch: Option<char>,
	line: u32,
	finished: bool,
	input: T,
}

impl<T: Iterator<Item = (u32, char)>> Display for Lexer<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f,
			"Lexer {{\n\tposition: {},\n\tnext_position: {},\n\tline: {},\n\tch: {:?}, next_ch: {:?}\n}}",
			self.position, self.next_position, self.line, self.ch, self.next_ch
		)
	}
}

impl<T: Iterator<Item = (u32, char)>> Lexer<T> {
	pub fn new(input: T) -> Self {
		let mut lexer = Self {
			position: 0,
			next_position: 0,
			ch: None,
			next_ch: None,
			line: 1,
			finished: false,
			input,
		};

		lexer.next_char();
		lexer.next_char();

		lexer
	}

	pub fn next_token(&mut self) -> LexResult {
		loop {
			let ch = match self.ch {
				Some(ch) => ch,
				None => return Ok(Token::eof(self.line, self.position)),
			};

			let token = match ch {
				'(' => self.eat_one_char(TokenKind::LeftParen),
				')' => self.eat_one_char(TokenKind::RightParen),
				'{' => self.eat_one_char(TokenKind::LeftBrace),
				'}' => self.eat_one_char(TokenKind::RightBrace),
				',' => self.eat_one_char(TokenKind::Comma),
				'.' => self.eat_one_char(TokenKind::Dot),
				'-' => self.eat_one_char(TokenKind::Minus),
				'+' => self.eat_one_char(TokenKind::Plus),
				';' => self.eat_one_char(TokenKind::Semicolon),
				'*' => self.eat_one_char(TokenKind::Star),
				'!' => self.eat_either('=', TokenKind::BangEqual, TokenKind::Bang),
				'=' => self.eat_either('=', TokenKind::EqualEqual, TokenKind::Equal),
				'<' => self.eat_either('=', TokenKind::LessEqual, TokenKind::Less),
				'>' => self.eat_either('=', TokenKind::GreaterEqual, TokenKind::Greater),
				'/' if self.next_ch == Some('/') => {
					self.skip_comment();
					continue;
				},
				'/' => self.eat_one_char(TokenKind::Slash),
				'"' => return self.lex_string(),
				'0'..='9' => self.lex_number(),
				c if c.is_ascii_alphabetic() || c == '_' => self.lex_ident(),
				' ' | '\r' | '\t' | '\n' => {
					let _ = self.next_char();
					continue;
				},
				c => {
					let start = self.position;
					let line = self.line;
					let _ = self.next_char();

					return Err(LexicalError {
						error: LexicalErrorType::UnrecognizedToken { tok: c },
						location: SrcSpan::from(start, self.position),
						line,
					});
				}
			};

			trace!(kind = ?token.kind, line = token.line, "lexed token");

			return Ok(token);
		}
	}

	fn next_char(&mut self) -> Option<char> {
		let ch = self.ch;
		let end_of_next = self.next_position + self.next_ch.map_or(0, |c| c.len_utf8() as u32);

		self.position = self.next_position;
		self.ch = self.next_ch;

		match self.input.next() {
			Some((pos, next)) => {
				self.next_position = pos;
				self.next_ch = Some(next);
			},
			None => {
				self.next_position = end_of_next;
				self.next_ch = None;
			}
		}

		if ch == Some('\n') {
			self.line += 1;
		}

		ch
	}

	fn eat_one_char(&mut self, kind: TokenKind) -> Token {
		let start = self.position;
		let line = self.line;
		let lexeme = self.next_char().map(String::from).unwrap_or_default();

		Token::new(kind, lexeme, line, SrcSpan::from(start, self.position))
	}

	fn eat_either(&mut self, second: char, double: TokenKind, single: TokenKind) -> Token {
		if self.next_ch != Some(second) {
			return self.eat_one_char(single);
		}

		let start = self.position;
		let line = self.line;
		let mut lexeme = String::with_capacity(2);
		lexeme.extend(self.next_char());
		lexeme.extend(self.next_char());

		Token::new(double, lexeme, line, SrcSpan::from(start, self.position))
	}

	fn skip_comment(&mut self) {
		while !matches!(self.ch, Some('\n') | None) {
			let _ = self.next_char();
		}
	}

	fn lex_ident(&mut self) -> Token {
		let start = self.position;
		let line = self.line;
		let mut ident = String::new();

		while let Some(ch) = self.ch {
			if !(ch.is_ascii_alphanumeric() || ch == '_') {
				break;
			}
			ident.extend(self.next_char());
		}

		let kind = str_to_keyword(&ident).unwrap_or(TokenKind::Identifier);

		Token::new(kind, ident, line, SrcSpan::from(start, self.position))
	}

	fn lex_number(&mut self) -> Token {
		let start = self.position;
		let line = self.line;
		let mut value = String::new();

		self.eat_digits(&mut value);

		// A trailing `.` only belongs to the number when a digit follows it.
		if self.ch == Some('.') && self.next_ch.is_some_and(|c| c.is_ascii_digit()) {
			value.extend(self.next_char());
			self.eat_digits(&mut value);
		}

		let number = value.parse::<f64>().unwrap_or_default();

		Token::new(TokenKind::Number, value, line, SrcSpan::from(start, self.position))
			.with_literal(Literal::Number { value: number })
	}

	fn eat_digits(&mut self, value: &mut String) {
		while self.ch.is_some_and(|c| c.is_ascii_digit()) {
			value.extend(self.next_char());
		}
	}

	fn lex_string(&mut self) -> LexResult {
		let start = self.position;
		let line = self.line;
		let mut lexeme = String::new();

		lexeme.extend(self.next_char()); // opening quote

		loop {
			match self.ch {
				Some('"') => break,
				Some(_) => lexeme.extend(self.next_char()),
				None => return Err(LexicalError {
					error: LexicalErrorType::UnterminatedString,
					location: SrcSpan::from(start, self.position),
					line: self.line,
				}),
			}
		}

		lexeme.extend(self.next_char()); // closing quote

		let value = lexeme[1..lexeme.len() - 1].to_string();

		Ok(Token::new(TokenKind::String, lexeme, line, SrcSpan::from(start, self.position))
			.with_literal(Literal::String { value }))
	}
}

impl<T: Iterator<Item = (u32, char)>> Iterator for Lexer<T> {
	type Item = LexResult;

	fn next(&mut self) -> Option<Self::Item> {
		if self.finished {
			return None;
		}

		let token = self.next_token();

		if matches!(&token, Ok(token) if token.is(TokenKind::Eof)) {
			self.finished = true;
		}

		Some(token)
	}
}

/// Scans a whole char stream, collecting every token and every lexical
/// error. The token sequence always ends with a single `Eof`.
pub fn scan_stream(stream: impl Iterator<Item = (u32, char)>) -> (Vec<Token>, Vec<LexicalError>) {
	let mut tokens = vec![];
	let mut errors = vec![];

	for result in Lexer::new(stream) {
		match result {
			Ok(token) => tokens.push(token),
			Err(error) => errors.push(error),
		}
	}

	(tokens, errors)
}

pub fn scan_tokens(src: &str) -> (Vec<Token>, Vec<LexicalError>) {
	scan_stream(src.char_indices().map(|(i, c)| (i as u32, c)))
}
