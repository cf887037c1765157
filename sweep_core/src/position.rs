use std::fmt::Display;

use crate::tokens::Token;

/// A location in the source a token buffer was lexed from. Lines are
/// 1-indexed and columns are 0-indexed, counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
	pub line: usize,
	pub column: usize,
}

impl Default for Position {
	fn default() -> Self {
		Self { line: 1, column: 0 }
	}
}

impl Position {
	pub fn new(line: usize, column: usize) -> Self {
		Self { line, column }
	}

	/// Replay `tokens` from the start and return the position of the token at
	/// `index`. An index past the end yields the position after the last
	/// token.
	///
	/// Linebreak tokens are not the only thing that advances the line: the
	/// lexer keeps a multi-line block comment as one `CommentBody`, so every
	/// `\n` inside a token's text counts as well. For buffers whose line
	/// endings are all `Linebreak` tokens the two rules agree.
	pub fn of(tokens: &[Token], index: usize) -> Self {
		let mut position = Self::default();

		for token in tokens.iter().take(index) {
			position.advance(token);
		}

		position
	}

	/// Move past `token`. Block comments can span lines.
	pub fn advance(&mut self, token: &Token) {
		if token.is_linebreak() {
			self.line += 1;
			self.column = 0;
			return;
		}

		let text = token.text();
		match text.rfind('\n') {
			Some(last) => {
				self.line += text.matches('\n').count();
				self.column = text[last + 1..].chars().count();
			}
			None => self.column += text.chars().count(),
		}
	}
}

impl Display for Position {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}:{}", self.line, self.column)
	}
}
