use std::ops::Range;

use tracing::trace;

use crate::tokens::GetDynamicRange;
use crate::tokens::IndexedToken;
use crate::tokens::Token;
use crate::tokens::TokenKind;

/// A mutable token buffer together with the scope-aware queries rules use to
/// read and rewrite it.
///
/// Positions are plain indices. Any insertion or removal shifts every position
/// at or after the mutated region, so an index or [`IndexedToken`] read
/// before a mutation must be re-queried afterwards. Positions strictly before
/// the mutated region keep pointing at the same token.
///
/// There are two ways to search:
///
/// - **Same-scope** ([`index_after`](Self::index_after),
///   [`index_before`](Self::index_before) and friends) walks one token at a
///   time and treats every nested scope as a single opaque unit. The search
///   stops with `None` when it would leave the scope it started in.
/// - **Explicit-range** ([`index_in`](Self::index_in) and friends) examines
///   every position of a caller supplied range at any nesting depth.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Engine {
	tokens: Vec<Token>,
	revision: usize,
}

impl Engine {
	pub fn new(tokens: Vec<Token>) -> Self {
		Self {
			tokens,
			revision: 0,
		}
	}

	pub fn tokens(&self) -> &[Token] {
		&self.tokens
	}

	pub fn into_tokens(self) -> Vec<Token> {
		self.tokens
	}

	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}

	/// The number of mutations applied so far. Only ever grows.
	pub fn revision(&self) -> usize {
		self.revision
	}

	/// Bounds checked read.
	pub fn token(&self, index: usize) -> Option<&Token> {
		self.tokens.get(index)
	}

	/// The tokens of `range`, clamped to the buffer.
	pub fn tokens_in(&self, range: impl GetDynamicRange) -> &[Token] {
		let range = range.get_dynamic_range().resolve(self.len());
		&self.tokens[range]
	}

	pub fn indexed_token(&self, index: usize) -> Option<IndexedToken> {
		self.token(index).map(|token| {
			IndexedToken {
				index,
				token: token.clone(),
			}
		})
	}

	/// Same-scope search forward from the token after `index`.
	pub fn index_after(&self, index: usize, matches: impl Fn(&Token) -> bool) -> Option<usize> {
		self.scan_forward(index.checked_add(1)?, matches)
	}

	/// Same-scope search forward starting at, and including, the first token.
	pub fn first_index(&self, matches: impl Fn(&Token) -> bool) -> Option<usize> {
		self.scan_forward(0, matches)
	}

	/// Same-scope search backward from the token before `index`.
	pub fn index_before(&self, index: usize, matches: impl Fn(&Token) -> bool) -> Option<usize> {
		let mut depth = 0_usize;

		for position in (0..index.min(self.len())).rev() {
			let token = &self.tokens[position];

			if depth == 0 && matches(token) {
				return Some(position);
			}

			match token {
				Token::EndOfScope(..) => depth += 1,
				Token::StartOfScope(..) if depth == 0 => return None,
				Token::StartOfScope(..) => depth -= 1,
				_ => {}
			}
		}

		None
	}

	/// Same-scope search forward for a token of `kind`.
	pub fn index_of_after(
		&self,
		kind: TokenKind,
		index: usize,
		matches: impl Fn(&Token) -> bool,
	) -> Option<usize> {
		self.index_after(index, |token| token.kind() == kind && matches(token))
	}

	/// Same-scope search backward for a token of `kind`.
	pub fn index_of_before(
		&self,
		kind: TokenKind,
		index: usize,
		matches: impl Fn(&Token) -> bool,
	) -> Option<usize> {
		self.index_before(index, |token| token.kind() == kind && matches(token))
	}

	/// The next token after `index` in the same scope that is not whitespace
	/// or a comment.
	pub fn next_code_index(&self, index: usize) -> Option<usize> {
		self.index_after(index, |token| !token.is_space_or_comment_or_linebreak())
	}

	/// The previous token before `index` in the same scope that is not
	/// whitespace or a comment.
	pub fn last_code_index(&self, index: usize) -> Option<usize> {
		self.index_before(index, |token| !token.is_space_or_comment_or_linebreak())
	}

	/// Explicit-range search: the first position in `range` whose token
	/// matches, at any nesting depth.
	pub fn index_in(
		&self,
		range: impl GetDynamicRange,
		matches: impl Fn(&Token) -> bool,
	) -> Option<usize> {
		let mut range = range.get_dynamic_range().resolve(self.len());
		range.find(|&index| matches(&self.tokens[index]))
	}

	/// Explicit-range search: the last position in `range` whose token
	/// matches, at any nesting depth.
	pub fn last_index_in(
		&self,
		range: impl GetDynamicRange,
		matches: impl Fn(&Token) -> bool,
	) -> Option<usize> {
		let range = range.get_dynamic_range().resolve(self.len());
		range.rev().find(|&index| matches(&self.tokens[index]))
	}

	/// Explicit-range search restricted to tokens of `kind`.
	pub fn index_of_in(
		&self,
		kind: TokenKind,
		range: impl GetDynamicRange,
		matches: impl Fn(&Token) -> bool,
	) -> Option<usize> {
		self.index_in(range, |token| token.kind() == kind && matches(token))
	}

	/// Explicit-range search from the end of `range`, restricted to tokens of
	/// `kind`.
	pub fn last_index_of_in(
		&self,
		kind: TokenKind,
		range: impl GetDynamicRange,
		matches: impl Fn(&Token) -> bool,
	) -> Option<usize> {
		self.last_index_in(range, |token| token.kind() == kind && matches(token))
	}

	pub fn next_indexed_token(
		&self,
		index: usize,
		matches: impl Fn(&Token) -> bool,
	) -> Option<IndexedToken> {
		self.index_after(index, matches)
			.and_then(|index| self.indexed_token(index))
	}

	pub fn last_indexed_token(
		&self,
		index: usize,
		matches: impl Fn(&Token) -> bool,
	) -> Option<IndexedToken> {
		self.index_before(index, matches)
			.and_then(|index| self.indexed_token(index))
	}

	pub fn indexed_token_of(
		&self,
		kind: TokenKind,
		range: impl GetDynamicRange,
		matches: impl Fn(&Token) -> bool,
	) -> Option<IndexedToken> {
		self.index_of_in(kind, range, matches)
			.and_then(|index| self.indexed_token(index))
	}

	pub fn last_indexed_token_of(
		&self,
		kind: TokenKind,
		range: impl GetDynamicRange,
		matches: impl Fn(&Token) -> bool,
	) -> Option<IndexedToken> {
		self.last_index_of_in(kind, range, matches)
			.and_then(|index| self.indexed_token(index))
	}

	/// Given the position of a `StartOfScope` token, the position of its
	/// matching `EndOfScope`. Scopes are matched by depth alone. Returns `None`
	/// when `index` does not open a scope or the buffer ends before it closes.
	pub fn end_of_scope(&self, index: usize) -> Option<usize> {
		if !self.token(index)?.is_start_of_scope() {
			return None;
		}

		let mut depth = 0_usize;

		for (position, token) in self.tokens.iter().enumerate().skip(index + 1) {
			match token {
				Token::StartOfScope(..) => depth += 1,
				Token::EndOfScope(..) if depth == 0 => return Some(position),
				Token::EndOfScope(..) => depth -= 1,
				_ => {}
			}
		}

		None
	}

	/// Given the position of an `EndOfScope` token, the position of the
	/// `StartOfScope` it closes.
	pub fn start_of_scope(&self, index: usize) -> Option<usize> {
		if !self.token(index)?.is_end_of_scope() {
			return None;
		}

		let mut depth = 0_usize;

		for position in (0..index).rev() {
			match &self.tokens[position] {
				Token::EndOfScope(..) => depth += 1,
				Token::StartOfScope(..) if depth == 0 => return Some(position),
				Token::StartOfScope(..) => depth -= 1,
				_ => {}
			}
		}

		None
	}

	/// A linebreak suitable for inserting at `index`. It reuses the first line
	/// ending found in the buffer (`\n` when there is none) and the original
	/// line number of the line `index` sits on.
	pub fn linebreak_token(&self, index: usize) -> Token {
		let text = self
			.tokens
			.iter()
			.find(|token| token.is_linebreak())
			.map_or("\n", Token::text)
			.to_string();
		let line = self
			.tokens_in(..index)
			.iter()
			.rev()
			.find_map(|token| {
				match token {
					Token::Linebreak(_, line) => Some(line + 1),
					_ => None,
				}
			})
			.unwrap_or(1);

		Token::Linebreak(text, line)
	}

	/// Replace the token at `index` without shifting any position. Returns
	/// false and does nothing when `index` is out of range.
	pub fn replace_token(&mut self, index: usize, token: Token) -> bool {
		let Some(slot) = self.tokens.get_mut(index) else {
			return false;
		};

		trace!(index, from = %slot.label(), to = %token.label(), "replace token");
		*slot = token;
		self.revision += 1;
		true
	}

	/// Replace `range` with `tokens`. Every position at or after the end of the
	/// range shifts by `tokens.len() - range.len()`. Returns the range now
	/// occupied by the new tokens.
	pub fn replace_tokens(
		&mut self,
		range: impl GetDynamicRange,
		tokens: impl IntoIterator<Item = Token>,
	) -> Range<usize> {
		let range = range.get_dynamic_range().resolve(self.len());
		let before = self.len();
		let start = range.start;
		let removed = range.len();
		drop(self.tokens.splice(range, tokens));
		let inserted = self.len() + removed - before;

		trace!(start, removed, inserted, "replace tokens");
		self.revision += 1;
		start..start + inserted
	}

	/// Remove the token at `index`, shifting every later position down by one.
	pub fn remove_token(&mut self, index: usize) -> Option<Token> {
		if index >= self.len() {
			return None;
		}

		let token = self.tokens.remove(index);
		trace!(index, token = %token.label(), "remove token");
		self.revision += 1;
		Some(token)
	}

	/// Remove `range`, returning how many tokens were removed.
	pub fn remove_tokens(&mut self, range: impl GetDynamicRange) -> usize {
		let range = range.get_dynamic_range().resolve(self.len());
		let removed = range.len();
		trace!(start = range.start, removed, "remove tokens");
		drop(self.tokens.drain(range));
		self.revision += 1;
		removed
	}

	/// Insert `tokens` at `index` (clamped to the end of the buffer). Every
	/// position at or after `index` shifts up. Returns the range the new
	/// tokens occupy.
	pub fn insert_tokens(
		&mut self,
		index: usize,
		tokens: impl IntoIterator<Item = Token>,
	) -> Range<usize> {
		let index = index.min(self.len());
		self.replace_tokens(index..index, tokens)
	}

	pub fn insert_token(&mut self, index: usize, token: Token) -> usize {
		self.insert_tokens(index, [token]).start
	}

	fn scan_forward(&self, start: usize, matches: impl Fn(&Token) -> bool) -> Option<usize> {
		let mut depth = 0_usize;

		for (position, token) in self.tokens.iter().enumerate().skip(start) {
			if depth == 0 && matches(token) {
				return Some(position);
			}

			match token {
				Token::StartOfScope(..) => depth += 1,
				Token::EndOfScope(..) if depth == 0 => return None,
				Token::EndOfScope(..) => depth -= 1,
				_ => {}
			}
		}

		None
	}
}
