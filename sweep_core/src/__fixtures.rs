use crate::Engine;
use crate::FnRule;
use crate::NumberKind;
use crate::Options;
use crate::tokens::Fixity;
use crate::tokens::ScopeKind;
use crate::tokens::Token;

pub fn ident(text: &str) -> Token {
	Token::Identifier(text.to_string())
}

pub fn keyword(text: &str) -> Token {
	Token::Keyword(text.to_string())
}

pub fn infix(text: &str) -> Token {
	Token::Operator(text.to_string(), Fixity::Infix)
}

pub fn prefix(text: &str) -> Token {
	Token::Operator(text.to_string(), Fixity::Prefix)
}

pub fn postfix(text: &str) -> Token {
	Token::Operator(text.to_string(), Fixity::Postfix)
}

pub fn operator(text: &str) -> Token {
	Token::Operator(text.to_string(), Fixity::None)
}

pub fn delimiter(text: &str) -> Token {
	Token::Delimiter(text.to_string())
}

pub fn space() -> Token {
	Token::Space(" ".to_string())
}

pub fn comment(text: &str) -> Token {
	Token::CommentBody(text.to_string())
}

pub fn linebreak(line: usize) -> Token {
	Token::Linebreak("\n".to_string(), line)
}

pub fn integer(text: &str) -> Token {
	Token::Number(text.to_string(), NumberKind::Integer)
}

pub fn open(kind: ScopeKind) -> Token {
	Token::scope_open(kind)
}

pub fn close(kind: ScopeKind) -> Token {
	Token::scope_close(kind)
}

pub fn error(text: &str) -> Token {
	Token::Error(text.to_string())
}

/// `a ( b ( c ) d ) e`
///
/// ```text
/// 0 a  1 (  2 b  3 (  4 c  5 )  6 d  7 )  8 e
/// ```
pub fn nested_parens() -> Vec<Token> {
	vec![
		ident("a"),
		open(ScopeKind::Paren),
		ident("b"),
		open(ScopeKind::Paren),
		ident("c"),
		close(ScopeKind::Paren),
		ident("d"),
		close(ScopeKind::Paren),
		ident("e"),
	]
}

/// Toggles the first identifier between `on` and `off`, so it changes the
/// buffer on every pass.
pub const FLIP: FnRule = FnRule::new("flip", "Toggle `on` and `off`.", flip);

fn flip(engine: &mut Engine, _options: &Options) {
	let Some(index) = engine.first_index(|token| token.is_identifier("on") || token.is_identifier("off"))
	else {
		return;
	};

	let next = if engine.tokens()[index].is_identifier("on") {
		"off"
	} else {
		"on"
	};

	engine.replace_token(index, ident(next));
}

/// Counts the first integer up to nine, one step per pass.
pub const COUNT_TO_NINE: FnRule = FnRule::new("countToNine", "Count up to 9.", count_to_nine);

/// Counts the first integer up to ten, one step per pass.
pub const COUNT_TO_TEN: FnRule = FnRule::new("countToTen", "Count up to 10.", count_to_ten);

fn count_to_nine(engine: &mut Engine, _options: &Options) {
	count_to(engine, 9);
}

fn count_to_ten(engine: &mut Engine, _options: &Options) {
	count_to(engine, 10);
}

fn count_to(engine: &mut Engine, limit: usize) {
	let Some(index) = engine.first_index(|token| matches!(token, Token::Number(..))) else {
		return;
	};

	let Ok(value) = engine.tokens()[index].text().parse::<usize>() else {
		return;
	};

	if value < limit {
		engine.replace_token(index, integer(&(value + 1).to_string()));
	}
}

/// Appends `;` to the buffer on every pass where `file_header` is set. Used to
/// observe one-shot options being cleared.
pub const MARK_HEADER: FnRule = FnRule::new("markHeader", "Append `;` while a header is set.", mark_header);

fn mark_header(engine: &mut Engine, options: &Options) {
	if options.file_header.is_some() {
		let end = engine.len();
		engine.insert_token(end, delimiter(";"));
	}
}

/// Does nothing. Used to count observer calls.
pub const NOOP: FnRule = FnRule::new("noop", "Do nothing.", noop);

fn noop(_engine: &mut Engine, _options: &Options) {}
