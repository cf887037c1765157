use std::fmt::Display;
use std::ops::Bound;
use std::ops::Range;
use std::ops::RangeBounds;
use std::ops::RangeFrom;
use std::ops::RangeFull;
use std::ops::RangeInclusive;
use std::ops::RangeTo;
use std::ops::RangeToInclusive;

use derive_more::Deref;
use derive_more::DerefMut;

/// The literal forms a [`Token::Number`] can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum NumberKind {
	/// `0b1010`
	#[display("binary")]
	Binary,
	/// `1.5`, `2e10`
	#[display("decimal")]
	Decimal,
	/// `0xFF`
	#[display("hex")]
	Hex,
	/// `42`
	#[display("integer")]
	Integer,
	/// `0o17`
	#[display("octal")]
	Octal,
}

/// How an operator binds to its neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Fixity {
	#[display("prefix")]
	Prefix,
	#[display("infix")]
	Infix,
	#[display("postfix")]
	Postfix,
	/// No fixity has been assigned, e.g. a standalone operator reference.
	#[display("none")]
	None,
}

/// The kind of region a scope token opens or closes. Assigned by the lexer so
/// that nothing downstream has to compare bracket text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ScopeKind {
	/// `(` … `)`
	#[display("paren")]
	Paren,
	/// `[` … `]`
	#[display("bracket")]
	Bracket,
	/// `{` … `}`
	#[display("brace")]
	Brace,
	/// `"` … `"`
	#[display("quote")]
	Quote,
	/// `\(` … `)` inside a string literal.
	#[display("interpolation")]
	Interpolation,
}

impl ScopeKind {
	/// The source text that opens this kind of scope.
	pub fn open_text(self) -> &'static str {
		match self {
			Self::Paren => "(",
			Self::Bracket => "[",
			Self::Brace => "{",
			Self::Quote => "\"",
			Self::Interpolation => "\\(",
		}
	}

	/// The source text that closes this kind of scope.
	pub fn close_text(self) -> &'static str {
		match self {
			Self::Paren | Self::Interpolation => ")",
			Self::Bracket => "]",
			Self::Brace => "}",
			Self::Quote => "\"",
		}
	}
}

/// The field-less discriminant of a [`Token`], used by kind-restricted
/// searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum TokenKind {
	#[display("number")]
	Number,
	#[display("linebreak")]
	Linebreak,
	#[display("startOfScope")]
	StartOfScope,
	#[display("endOfScope")]
	EndOfScope,
	#[display("delimiter")]
	Delimiter,
	#[display("operator")]
	Operator,
	#[display("stringBody")]
	StringBody,
	#[display("keyword")]
	Keyword,
	#[display("identifier")]
	Identifier,
	#[display("space")]
	Space,
	#[display("commentBody")]
	CommentBody,
	#[display("error")]
	Error,
}

/// One lexical unit together with its exact source text. Concatenating the
/// text of every token in a buffer reproduces the source byte for byte.
#[derive(Debug, Clone)]
pub enum Token {
	/// A numeric literal, e.g. `0x1F` or `3.14`.
	Number(String, NumberKind),
	/// A line ending and the 1-based line of the original source it ended.
	Linebreak(String, usize),
	/// `(`, `[`, `{`, `"` or `\(`
	StartOfScope(String, ScopeKind),
	/// `)`, `]`, `}` or `"`
	EndOfScope(String, ScopeKind),
	/// `,` `;` `:`
	Delimiter(String),
	Operator(String, Fixity),
	/// The literal content of a string between its quotes.
	StringBody(String),
	Keyword(String),
	Identifier(String),
	/// Horizontal whitespace.
	Space(String),
	/// A whole `// …` or `/* … */` comment.
	CommentBody(String),
	/// Unexpected input. Empty text marks an unexpected end of input.
	Error(String),
}

// The original line of a linebreak is provenance only. Two buffers that differ
// just in where their linebreaks came from are the same buffer.
impl Eq for Token {}
impl PartialEq for Token {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Token::Number(text, kind), Token::Number(other_text, other_kind)) => {
				text == other_text && kind == other_kind
			}
			(Token::Linebreak(text, _), Token::Linebreak(other_text, _)) => text == other_text,
			(Token::StartOfScope(text, kind), Token::StartOfScope(other_text, other_kind))
			| (Token::EndOfScope(text, kind), Token::EndOfScope(other_text, other_kind)) => {
				text == other_text && kind == other_kind
			}
			(Token::Operator(text, fixity), Token::Operator(other_text, other_fixity)) => {
				text == other_text && fixity == other_fixity
			}
			(Token::Delimiter(text), Token::Delimiter(other_text))
			| (Token::StringBody(text), Token::StringBody(other_text))
			| (Token::Keyword(text), Token::Keyword(other_text))
			| (Token::Identifier(text), Token::Identifier(other_text))
			| (Token::Space(text), Token::Space(other_text))
			| (Token::CommentBody(text), Token::CommentBody(other_text))
			| (Token::Error(text), Token::Error(other_text)) => text == other_text,
			_ => false,
		}
	}
}

impl Token {
	/// Opening token for `kind`.
	pub fn scope_open(kind: ScopeKind) -> Self {
		Token::StartOfScope(kind.open_text().to_string(), kind)
	}

	/// Closing token for `kind`.
	pub fn scope_close(kind: ScopeKind) -> Self {
		Token::EndOfScope(kind.close_text().to_string(), kind)
	}

	/// The exact source text of this token.
	pub fn text(&self) -> &str {
		match self {
			Token::Number(text, _)
			| Token::Linebreak(text, _)
			| Token::StartOfScope(text, _)
			| Token::EndOfScope(text, _)
			| Token::Delimiter(text)
			| Token::Operator(text, _)
			| Token::StringBody(text)
			| Token::Keyword(text)
			| Token::Identifier(text)
			| Token::Space(text)
			| Token::CommentBody(text)
			| Token::Error(text) => text,
		}
	}

	pub fn kind(&self) -> TokenKind {
		match self {
			Token::Number(..) => TokenKind::Number,
			Token::Linebreak(..) => TokenKind::Linebreak,
			Token::StartOfScope(..) => TokenKind::StartOfScope,
			Token::EndOfScope(..) => TokenKind::EndOfScope,
			Token::Delimiter(_) => TokenKind::Delimiter,
			Token::Operator(..) => TokenKind::Operator,
			Token::StringBody(_) => TokenKind::StringBody,
			Token::Keyword(_) => TokenKind::Keyword,
			Token::Identifier(_) => TokenKind::Identifier,
			Token::Space(_) => TokenKind::Space,
			Token::CommentBody(_) => TokenKind::CommentBody,
			Token::Error(_) => TokenKind::Error,
		}
	}

	/// The scope kind of a `StartOfScope` or `EndOfScope` token.
	pub fn scope_kind(&self) -> Option<ScopeKind> {
		match self {
			Token::StartOfScope(_, kind) | Token::EndOfScope(_, kind) => Some(*kind),
			_ => None,
		}
	}

	pub fn is_start_of_scope(&self) -> bool {
		matches!(self, Token::StartOfScope(..))
	}

	pub fn is_end_of_scope(&self) -> bool {
		matches!(self, Token::EndOfScope(..))
	}

	/// Returns true when this token opens a scope of the given kind.
	pub fn is_start_of(&self, kind: ScopeKind) -> bool {
		matches!(self, Token::StartOfScope(_, scope) if *scope == kind)
	}

	/// Returns true when this token closes a scope of the given kind.
	pub fn is_end_of(&self, kind: ScopeKind) -> bool {
		matches!(self, Token::EndOfScope(_, scope) if *scope == kind)
	}

	pub fn is_space(&self) -> bool {
		matches!(self, Token::Space(_))
	}

	pub fn is_linebreak(&self) -> bool {
		matches!(self, Token::Linebreak(..))
	}

	pub fn is_comment(&self) -> bool {
		matches!(self, Token::CommentBody(_))
	}

	pub fn is_error(&self) -> bool {
		matches!(self, Token::Error(_))
	}

	pub fn is_space_or_linebreak(&self) -> bool {
		self.is_space() || self.is_linebreak()
	}

	/// Whitespace and comments: everything that carries no code.
	pub fn is_space_or_comment_or_linebreak(&self) -> bool {
		self.is_space() || self.is_linebreak() || self.is_comment()
	}

	/// An operator with this exact text, whatever its fixity.
	pub fn is_operator(&self, text: &str) -> bool {
		matches!(self, Token::Operator(value, _) if value == text)
	}

	pub fn is_infix_operator(&self, text: &str) -> bool {
		matches!(self, Token::Operator(value, Fixity::Infix) if value == text)
	}

	pub fn is_prefix_operator(&self, text: &str) -> bool {
		matches!(self, Token::Operator(value, Fixity::Prefix) if value == text)
	}

	pub fn is_delimiter(&self, text: &str) -> bool {
		matches!(self, Token::Delimiter(value) if value == text)
	}

	pub fn is_keyword(&self, text: &str) -> bool {
		matches!(self, Token::Keyword(value) if value == text)
	}

	pub fn is_identifier(&self, text: &str) -> bool {
		matches!(self, Token::Identifier(value) if value == text)
	}

	/// A descriptive label for tooling and test output, e.g.
	/// `operator(., infix)` or `linebreak(\n, 3)`.
	pub fn label(&self) -> String {
		let text = self.text().escape_debug();
		match self {
			Token::Number(_, kind) => format!("number({text}, {kind})"),
			Token::Linebreak(_, line) => format!("linebreak({text}, {line})"),
			Token::StartOfScope(_, kind) => format!("startOfScope({text}, {kind})"),
			Token::EndOfScope(_, kind) => format!("endOfScope({text}, {kind})"),
			Token::Operator(_, fixity) => format!("operator({text}, {fixity})"),
			_ => format!("{}({text})", self.kind()),
		}
	}
}

impl Display for Token {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.text())
	}
}

/// Reconstruct source text from a token sequence.
pub fn source_code(tokens: &[Token]) -> String {
	tokens.iter().map(Token::text).collect()
}

/// A token read at a position. The `index` is only meaningful until the next
/// mutation at or before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedToken {
	pub index: usize,
	pub token: Token,
}

/// A wrapper around a `RangeBounds<usize>` that provides uniform access to
/// start and end bounds, normalizing inclusive/exclusive/unbounded variants.
#[derive(Deref, DerefMut)]
pub struct DynamicRange<B>(
	#[deref]
	#[deref_mut]
	B,
)
where
	B: RangeBounds<usize>;

impl<B> From<B> for DynamicRange<B>
where
	B: RangeBounds<usize>,
{
	fn from(range: B) -> Self {
		Self(range)
	}
}

impl<B> DynamicRange<B>
where
	B: RangeBounds<usize>,
{
	pub fn start(&self) -> Option<usize> {
		match self.0.start_bound() {
			Bound::Included(value) => Some(*value),
			Bound::Excluded(value) => Some(value.saturating_add(1)),
			Bound::Unbounded => None,
		}
	}

	pub fn end(&self) -> Option<usize> {
		match self.0.end_bound() {
			Bound::Included(value) => Some(value.saturating_add(1)),
			Bound::Excluded(value) => Some(*value),
			Bound::Unbounded => None,
		}
	}

	/// The half-open range this describes within a buffer of `len` tokens.
	/// Bounds past the end are clamped and an inverted range is empty.
	pub fn resolve(&self, len: usize) -> Range<usize> {
		let start = self.start().unwrap_or(0).min(len);
		let end = self.end().unwrap_or(len).clamp(start, len);
		start..end
	}
}

/// Trait for converting various range types into a [`DynamicRange`].
pub trait GetDynamicRange {
	type Range: RangeBounds<usize>;
	fn get_dynamic_range(&self) -> DynamicRange<Self::Range>;
}

impl GetDynamicRange for usize {
	type Range = RangeInclusive<usize>;

	fn get_dynamic_range(&self) -> DynamicRange<Self::Range> {
		DynamicRange::from((*self)..=(*self))
	}
}

impl GetDynamicRange for (Bound<usize>, Bound<usize>) {
	type Range = Self;

	fn get_dynamic_range(&self) -> DynamicRange<Self::Range> {
		DynamicRange::from(*self)
	}
}

impl GetDynamicRange for Range<usize> {
	type Range = Self;

	fn get_dynamic_range(&self) -> DynamicRange<Self::Range> {
		DynamicRange::from(self.clone())
	}
}

impl GetDynamicRange for RangeFrom<usize> {
	type Range = Self;

	fn get_dynamic_range(&self) -> DynamicRange<Self::Range> {
		DynamicRange::from(self.clone())
	}
}

impl GetDynamicRange for RangeFull {
	type Range = Self;

	fn get_dynamic_range(&self) -> DynamicRange<Self::Range> {
		DynamicRange::from(..)
	}
}

impl GetDynamicRange for RangeInclusive<usize> {
	type Range = Self;

	fn get_dynamic_range(&self) -> DynamicRange<Self::Range> {
		DynamicRange::from(self.clone())
	}
}

impl GetDynamicRange for RangeTo<usize> {
	type Range = Self;

	fn get_dynamic_range(&self) -> DynamicRange<Self::Range> {
		DynamicRange::from(*self)
	}
}

impl GetDynamicRange for RangeToInclusive<usize> {
	type Range = Self;

	fn get_dynamic_range(&self) -> DynamicRange<Self::Range> {
		DynamicRange::from(*self)
	}
}
