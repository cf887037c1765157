//! Source text to [`Token`]s.
//!
//! Lexing never fails. Anything that cannot be classified becomes an
//! [`Token::Error`] carrying the offending text, and a scope still open at the
//! end of input produces a trailing `Error("")`. Concatenating the text of
//! the returned tokens always reproduces the input exactly.

use std::ops::Range;

use logos::Logos;

use crate::tokens::Fixity;
use crate::tokens::NumberKind;
use crate::tokens::ScopeKind;
use crate::tokens::Token;

/// Identifiers the lexer reports as [`Token::Keyword`]. `self` and `Self` are
/// not listed: they behave like ordinary names.
const KEYWORDS: &[&str] = &[
	"any",
	"as",
	"associatedtype",
	"async",
	"await",
	"break",
	"case",
	"catch",
	"class",
	"continue",
	"default",
	"defer",
	"deinit",
	"do",
	"else",
	"enum",
	"extension",
	"fallthrough",
	"false",
	"fileprivate",
	"final",
	"for",
	"func",
	"guard",
	"if",
	"import",
	"in",
	"init",
	"inout",
	"internal",
	"is",
	"let",
	"mutating",
	"nil",
	"open",
	"override",
	"private",
	"protocol",
	"public",
	"repeat",
	"rethrows",
	"return",
	"some",
	"static",
	"struct",
	"subscript",
	"switch",
	"throw",
	"throws",
	"true",
	"try",
	"typealias",
	"var",
	"where",
	"while",
];

/// Raw tokens produced by logos. String literals are not matched here since
/// their bodies and interpolations need a scope stack, see
/// [`TokenWalker::string_segment`]. Comments are not matched either: `/` is an
/// operator character, so a comment opener always arrives inside an
/// [`RawToken::Operator`] run and is split out by
/// [`TokenWalker::operator_run`].
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum RawToken {
	#[regex(r"\r\n|\n|\r")]
	Linebreak,
	#[regex(r"[ \t]+")]
	Space,
	#[token("\"")]
	Quote,
	#[token("(")]
	ParenOpen,
	#[token(")")]
	ParenClose,
	#[token("[")]
	BracketOpen,
	#[token("]")]
	BracketClose,
	#[token("{")]
	BraceOpen,
	#[token("}")]
	BraceClose,
	#[regex(r"[,;:]")]
	Delimiter,
	#[token("\\")]
	Backslash,
	#[regex(r"\.+|\.\.<")]
	Dots,
	#[regex(r"[-+*/=<>!&|^~?%]+")]
	Operator,
	#[regex(r"0b[01_]+")]
	Binary,
	#[regex(r"0o[0-7_]+")]
	Octal,
	#[regex(r"0x[0-9a-fA-F_]+")]
	Hex,
	#[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?|[0-9][0-9_]*[eE][+-]?[0-9_]+")]
	Decimal,
	#[regex(r"[0-9][0-9_]*")]
	Integer,
	#[regex(r"\$?[a-zA-Z_][a-zA-Z0-9_]*|\$[0-9]+|`[^`\r\n]+`")]
	Identifier,
	#[regex(r"[@#][a-zA-Z_][a-zA-Z0-9_]*")]
	Attribute,
}

/// How the body of a string literal ended.
enum StringEnd {
	/// The closing `"`.
	Quote,
	/// `\(`
	Interpolation,
	/// A raw line ending before the closing quote.
	Linebreak,
	EndOfInput,
}

/// Walks the logos token stream, tracking open scopes so that closing
/// brackets can be paired and string bodies lexed in context.
struct TokenWalker<'a> {
	lexer: logos::Lexer<'a, RawToken>,
	/// Collected tokens.
	tokens: Vec<Token>,
	/// Kinds of the scopes currently open, innermost last.
	scopes: Vec<ScopeKind>,
	/// 1-based line of the original source the walker is on.
	line: usize,
	/// Span of consecutive unrecognised bytes not yet emitted.
	pending_error: Option<Range<usize>>,
}

impl<'a> TokenWalker<'a> {
	fn new(source: &'a str) -> Self {
		Self {
			lexer: RawToken::lexer(source),
			tokens: vec![],
			scopes: vec![],
			line: 1,
			pending_error: None,
		}
	}

	/// Main processing loop.
	fn process(&mut self) {
		loop {
			if self.scopes.last() == Some(&ScopeKind::Quote) {
				if !self.string_segment() {
					break;
				}
				continue;
			}

			let Some(result) = self.lexer.next() else {
				break;
			};

			let Ok(raw) = result else {
				// Adjacent unrecognised bytes become a single error token.
				let span = self.lexer.span();
				self.pending_error = Some(match self.pending_error.take() {
					Some(pending) => pending.start..span.end,
					None => span,
				});
				continue;
			};

			self.flush_error();

			if raw == RawToken::Operator {
				self.operator_run();
			} else {
				let token = self.classify(raw);
				self.tokens.push(token);
			}
		}

		self.flush_error();

		if !self.scopes.is_empty() {
			self.tokens.push(Token::Error(String::new()));
		}
	}

	fn classify(&mut self, raw: RawToken) -> Token {
		let text = self.lexer.slice().to_string();

		match raw {
			RawToken::Linebreak => {
				let token = Token::Linebreak(text, self.line);
				self.line += 1;
				token
			}
			RawToken::Space => Token::Space(text),
			RawToken::Quote => self.open(ScopeKind::Quote, text),
			RawToken::ParenOpen => self.open(ScopeKind::Paren, text),
			RawToken::BracketOpen => self.open(ScopeKind::Bracket, text),
			RawToken::BraceOpen => self.open(ScopeKind::Brace, text),
			RawToken::ParenClose | RawToken::BracketClose | RawToken::BraceClose => self.close(text),
			RawToken::Delimiter => Token::Delimiter(text),
			RawToken::Backslash | RawToken::Dots | RawToken::Operator => {
				Token::Operator(text, Fixity::None)
			}
			RawToken::Binary => Token::Number(text, NumberKind::Binary),
			RawToken::Octal => Token::Number(text, NumberKind::Octal),
			RawToken::Hex => Token::Number(text, NumberKind::Hex),
			RawToken::Decimal => Token::Number(text, NumberKind::Decimal),
			RawToken::Integer => Token::Number(text, NumberKind::Integer),
			RawToken::Identifier if KEYWORDS.contains(&text.as_str()) => Token::Keyword(text),
			RawToken::Identifier => Token::Identifier(text),
			RawToken::Attribute => Token::Keyword(text),
		}
	}

	/// Emit the operator run just matched, splitting out every comment that
	/// starts inside it. A comment may run past the end of the match, in which
	/// case the lexer is bumped to the end of the comment.
	fn operator_run(&mut self) {
		let source = self.lexer.source();
		let span = self.lexer.span();
		let mut start = span.start;

		while start < span.end {
			let run = &source[start..span.end];
			let Some(offset) = comment_opener(run) else {
				self.tokens.push(Token::Operator(run.to_string(), Fixity::None));
				return;
			};

			if offset > 0 {
				self.tokens.push(Token::Operator(run[..offset].to_string(), Fixity::None));
			}

			let comment_start = start + offset;
			let (length, terminated) = comment_length(&source[comment_start..]);
			let text = source[comment_start..comment_start + length].to_string();
			self.line += line_count(&text);
			self.tokens.push(if terminated {
				Token::CommentBody(text)
			} else {
				Token::Error(text)
			});

			start = comment_start + length;
		}

		self.lexer.bump(start - span.end);
	}

	fn open(&mut self, kind: ScopeKind, text: String) -> Token {
		self.scopes.push(kind);
		Token::StartOfScope(text, kind)
	}

	/// A closing bracket that does not match the innermost open scope is an
	/// error and leaves the scope stack untouched.
	fn close(&mut self, text: String) -> Token {
		match self.scopes.last() {
			Some(&kind) if kind.close_text() == text => {
				self.scopes.pop();
				Token::EndOfScope(text, kind)
			}
			_ => Token::Error(text),
		}
	}

	/// Lex string content up to the next closing quote, interpolation or line
	/// ending. Returns false once the input is exhausted.
	fn string_segment(&mut self) -> bool {
		let remainder = self.lexer.remainder();
		let (end, string_end) = scan_string(remainder);
		let body = &remainder[..end];

		match string_end {
			StringEnd::Quote => {
				self.push_string_body(body);
				self.scopes.pop();
				self.tokens.push(Token::scope_close(ScopeKind::Quote));
				self.lexer.bump(end + 1);
			}
			StringEnd::Interpolation => {
				self.push_string_body(body);
				self.scopes.push(ScopeKind::Interpolation);
				self.tokens.push(Token::scope_open(ScopeKind::Interpolation));
				self.lexer.bump(end + 2);
			}
			StringEnd::Linebreak => {
				self.scopes.pop();
				self.push_unterminated(body);
				self.lexer.bump(end);
			}
			StringEnd::EndOfInput => {
				self.push_string_body(body);
				self.lexer.bump(end);
				return false;
			}
		}

		true
	}

	fn push_string_body(&mut self, body: &str) {
		if !body.is_empty() {
			self.tokens.push(Token::StringBody(body.to_string()));
		}
	}

	/// The body of a string that runs into a line ending is an error. An empty
	/// body turns the quote that opened the string into the error instead.
	fn push_unterminated(&mut self, body: &str) {
		if !body.is_empty() {
			self.tokens.push(Token::Error(body.to_string()));
			return;
		}

		if let Some(index) = self.innermost_open_scope() {
			let text = self.tokens[index].text().to_string();
			self.tokens[index] = Token::Error(text);
		}
	}

	/// Position of the last `StartOfScope` collected so far that has not been
	/// closed.
	fn innermost_open_scope(&self) -> Option<usize> {
		let mut depth = 0_usize;

		for (index, token) in self.tokens.iter().enumerate().rev() {
			match token {
				Token::EndOfScope(..) => depth += 1,
				Token::StartOfScope(..) if depth == 0 => return Some(index),
				Token::StartOfScope(..) => depth -= 1,
				_ => {}
			}
		}

		None
	}

	fn flush_error(&mut self) {
		if let Some(span) = self.pending_error.take() {
			let text = self.lexer.source()[span].to_string();
			self.tokens.push(Token::Error(text));
		}
	}
}

fn line_count(text: &str) -> usize {
	text.matches('\n').count()
}

/// Offset of the first `//` or `/*` in an operator run.
fn comment_opener(run: &str) -> Option<usize> {
	run.as_bytes()
		.windows(2)
		.position(|pair| pair[0] == b'/' && (pair[1] == b'/' || pair[1] == b'*'))
}

/// Byte length of the comment at the start of `text` and whether it is
/// terminated. A line comment runs to the end of the line and is always
/// terminated. A block comment ends at the first `*/`.
fn comment_length(text: &str) -> (usize, bool) {
	if text.starts_with("//") {
		return (text.find(['\r', '\n']).unwrap_or(text.len()), true);
	}

	match text[2..].find("*/") {
		Some(end) => (end + 4, true),
		None => (text.len(), false),
	}
}

/// Find where the string body at the start of `text` ends. Escaped
/// characters never end it.
fn scan_string(text: &str) -> (usize, StringEnd) {
	let mut chars = text.char_indices().peekable();

	while let Some((offset, character)) = chars.next() {
		match character {
			'"' => return (offset, StringEnd::Quote),
			'\r' | '\n' => return (offset, StringEnd::Linebreak),
			'\\' => {
				match chars.peek() {
					Some((_, '(')) => return (offset, StringEnd::Interpolation),
					Some((_, '\r' | '\n')) | None => {}
					Some(_) => {
						chars.next();
					}
				}
			}
			_ => {}
		}
	}

	(text.len(), StringEnd::EndOfInput)
}

/// Decide the fixity of every operator from the tokens around it. Runs left to
/// right so an operator can see the fixity already given to its predecessor.
fn assign_fixity(tokens: &mut [Token]) {
	for index in 0..tokens.len() {
		let Token::Operator(text, _) = &tokens[index] else {
			continue;
		};

		let fixity = if text == "\\" {
			Fixity::Prefix
		} else {
			let left = index
				.checked_sub(1)
				.is_some_and(|previous| binds_left(&tokens[previous]));
			let right = tokens.get(index + 1).is_some_and(binds_right);

			match (left, right) {
				(true, false) => Fixity::Postfix,
				(false, true) => Fixity::Prefix,
				_ => Fixity::Infix,
			}
		};

		if let Token::Operator(_, slot) = &mut tokens[index] {
			*slot = fixity;
		}
	}
}

/// The operator is attached to the token before it.
fn binds_left(previous: &Token) -> bool {
	match previous {
		Token::Operator(_, fixity) => *fixity == Fixity::Postfix,
		Token::Space(_)
		| Token::Linebreak(..)
		| Token::CommentBody(_)
		| Token::StartOfScope(..)
		| Token::Delimiter(_) => false,
		_ => true,
	}
}

/// The operator is attached to the token after it.
fn binds_right(next: &Token) -> bool {
	!matches!(
		next,
		Token::Space(_)
			| Token::Linebreak(..)
			| Token::CommentBody(_)
			| Token::EndOfScope(..)
			| Token::Delimiter(_)
			| Token::Operator(..)
	)
}

/// Tokenize `source`.
pub fn tokenize(source: &str) -> Vec<Token> {
	let mut walker = TokenWalker::new(source);
	walker.process();

	let mut tokens = walker.tokens;
	assign_fixity(&mut tokens);
	tokens
}
