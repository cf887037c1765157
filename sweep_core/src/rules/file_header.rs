use crate::Engine;
use crate::Options;
use crate::lexer::tokenize;
use crate::tokens::Token;

pub(super) fn apply(engine: &mut Engine, options: &Options) {
	let Some(header) = &options.file_header else {
		return;
	};

	let end = header_end(engine.tokens());
	let mut replacement = tokenize(header.trim_end());

	if !replacement.is_empty() {
		let linebreak = engine.linebreak_token(end);
		replacement.push(linebreak.clone());
		replacement.push(linebreak);
	}

	if engine.tokens_in(..end) == replacement.as_slice() {
		return;
	}

	engine.replace_tokens(..end, replacement);
}

/// The existing header is every comment above the last blank line that comes
/// before the first line of code. A comment directly attached to the code is
/// documentation, not a header.
fn header_end(tokens: &[Token]) -> usize {
	let first_code = tokens
		.iter()
		.position(|token| !token.is_space_or_comment_or_linebreak())
		.unwrap_or(tokens.len());

	(0..first_code)
		.rev()
		.find(|&index| is_blank_line_end(tokens, index))
		.map_or(0, |index| index + 1)
}

/// `index` is a linebreak with nothing but spaces since the previous one.
fn is_blank_line_end(tokens: &[Token], index: usize) -> bool {
	if !tokens[index].is_linebreak() {
		return false;
	}

	tokens[..index]
		.iter()
		.rev()
		.find(|token| !token.is_space())
		.is_some_and(Token::is_linebreak)
}
