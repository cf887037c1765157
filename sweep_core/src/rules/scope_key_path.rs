//! `store.scope(state: { $0.child }, action: { .child($0) })` becomes
//! `store.scope(state: \.child, action: \.child)`.

use std::ops::RangeInclusive;

use crate::Engine;
use crate::Options;
use crate::tokens::Fixity;
use crate::tokens::ScopeKind;
use crate::tokens::Token;
use crate::tokens::TokenKind;

const STATE_LABEL: &str = "state";
const ACTION_LABEL: &str = "action";
const IMPLICIT_PARAMETER: &str = "$0";

pub(super) fn apply(engine: &mut Engine, _options: &Options) {
	let mut search_from = 0;

	while let Some(scope) = engine.index_of_in(TokenKind::Identifier, search_from.., |token| {
		token.is_identifier("scope")
	}) {
		search_from = scope + 1;

		if is_member_call(engine, scope) {
			rewrite_arguments(engine, scope + 1);
		}
	}
}

/// `.scope(`
fn is_member_call(engine: &Engine, scope: usize) -> bool {
	let follows_dot = scope
		.checked_sub(1)
		.and_then(|index| engine.token(index))
		.is_some_and(|token| token.is_infix_operator("."));
	let opens_call = engine
		.token(scope + 1)
		.is_some_and(|token| token.is_start_of(ScopeKind::Paren));

	follows_dot && opens_call
}

/// Rewrite the labeled arguments of the call whose `(` is at `open`.
fn rewrite_arguments(engine: &mut Engine, open: usize) {
	let mut cursor = open;

	while let Some(label) = engine.index_of_after(TokenKind::Identifier, cursor, |token| {
		token.is_identifier(STATE_LABEL) || token.is_identifier(ACTION_LABEL)
	}) {
		cursor = label;
		let is_action = engine.tokens()[label].is_identifier(ACTION_LABEL);

		let Some(argument) = labeled_argument(engine, label) else {
			continue;
		};

		let Some(components) =
			key_path_components(engine, *argument.start(), *argument.end(), is_action)
		else {
			cursor = *argument.end();
			continue;
		};

		// Everything from the argument onwards has moved. Continue from the
		// replacement rather than from any position read before it.
		let replaced = engine.replace_tokens(argument, key_path_tokens(&components));
		cursor = replaced.end - 1;
	}
}

/// The code tokens of the value following `label:`.
fn labeled_argument(engine: &Engine, label: usize) -> Option<RangeInclusive<usize>> {
	let previous = engine.token(engine.last_code_index(label)?)?;
	if !(previous.is_start_of(ScopeKind::Paren) || previous.is_delimiter(",")) {
		return None;
	}

	let colon = engine.next_code_index(label)?;
	if !engine.token(colon)?.is_delimiter(":") {
		return None;
	}

	let start = engine.next_code_index(colon)?;
	let boundary = engine.index_after(colon, |token| {
		token.is_delimiter(",") || token.is_end_of_scope()
	})?;
	let last = engine.last_code_index(boundary)?;

	(start < boundary && start <= last).then_some(start..=last)
}

/// Only an action can be an unapplied case: for `state:` a `Type.value`
/// reference is a static value, not a path.
fn key_path_components(
	engine: &Engine,
	start: usize,
	last: usize,
	is_action: bool,
) -> Option<Vec<String>> {
	if engine.token(start)?.is_start_of(ScopeKind::Brace) {
		if engine.end_of_scope(start)? != last {
			return None;
		}

		return closure_components(engine, start, last);
	}

	if !is_action {
		return None;
	}

	unapplied_case(engine, start, last)
}

/// `{ $0 }`, `{ $0.child }`, `{ .child($0) }` or `{ x in f(x) }`.
fn closure_components(engine: &Engine, open: usize, close: usize) -> Option<Vec<String>> {
	let body_start = engine.next_code_index(open)?;
	if body_start >= close {
		return None;
	}

	let body_last = engine.last_code_index(close)?;
	let next = engine.next_code_index(body_start);
	let named = match (engine.token(body_start)?, next.and_then(|index| engine.token(index))) {
		(Token::Identifier(name), Some(token)) if token.is_keyword("in") => Some(name.as_str()),
		_ => None,
	};
	let (placeholder, start) = match (named, next) {
		(Some(name), Some(keyword)) => (name, engine.next_code_index(keyword)?),
		_ => (IMPLICIT_PARAMETER, body_start),
	};

	if start > body_last || !is_used_once(engine, start..=body_last, placeholder) {
		return None;
	}

	expression_components(engine, start, body_last, placeholder)
}

/// The parameter is referenced exactly once in `range`, nested scopes
/// included.
fn is_used_once(engine: &Engine, range: RangeInclusive<usize>, placeholder: &str) -> bool {
	let first = engine.index_of_in(TokenKind::Identifier, range.clone(), |token| {
		token.is_identifier(placeholder)
	});
	let last = engine.last_index_of_in(TokenKind::Identifier, range, |token| {
		token.is_identifier(placeholder)
	});

	first.is_some() && first == last
}

fn expression_components(
	engine: &Engine,
	start: usize,
	last: usize,
	placeholder: &str,
) -> Option<Vec<String>> {
	let first = engine.token(start)?;

	if start == last {
		return first
			.is_identifier(placeholder)
			.then(|| vec!["self".to_string()]);
	}

	if first.is_identifier(placeholder) {
		return member_path(engine, start, last);
	}

	case_path(engine, start, last, placeholder, Vec::new())
}

/// `$0.a.b`: after the parameter, only infix dots each followed by a name.
fn member_path(engine: &Engine, start: usize, last: usize) -> Option<Vec<String>> {
	let mut components = Vec::new();
	let mut index = start;

	while index < last {
		if !engine.token(index + 1)?.is_infix_operator(".") {
			return None;
		}

		let Token::Identifier(name) = engine.token(index + 2)? else {
			return None;
		};

		components.push(name.clone());
		index += 2;
	}

	(index == last).then_some(components)
}

/// Collect the case names of a constructor chain such as
/// `Parent.Action.child(.grandchild($0))`, one component per call, until the
/// innermost argument is the parameter itself.
///
/// `start..=last` is the part of the expression still to be consumed and
/// `components` holds the names contributed by the enclosing calls.
fn case_path(
	engine: &Engine,
	start: usize,
	last: usize,
	placeholder: &str,
	mut components: Vec<String>,
) -> Option<Vec<String>> {
	if start == last && engine.token(start)?.is_identifier(placeholder) {
		return (!components.is_empty()).then_some(components);
	}

	let name = case_name(engine, start)?;
	let open = name + 1;

	if !engine.token(open)?.is_start_of(ScopeKind::Paren) || engine.end_of_scope(open)? != last {
		return None;
	}

	// A constructor with more than one argument is not a case path.
	if engine
		.index_after(open, |token| token.is_delimiter(","))
		.is_some()
	{
		return None;
	}

	let inner_start = engine.next_code_index(open)?;
	let inner_last = engine.last_code_index(last)?;
	if inner_start >= last {
		return None;
	}

	components.push(engine.token(name)?.text().to_string());
	case_path(engine, inner_start, inner_last, placeholder, components)
}

/// `Parent.Action.child`: a case referenced without being called.
fn unapplied_case(engine: &Engine, start: usize, last: usize) -> Option<Vec<String>> {
	if engine.token(start)?.is_prefix_operator(".") {
		return None;
	}

	let name = case_name(engine, start)?;

	(name == last && name > start).then(|| vec![engine.tokens()[name].text().to_string()])
}

/// Skip a leading `.` or a `Type.Sub.` prefix and return the position of the
/// lowercase case name that follows.
fn case_name(engine: &Engine, start: usize) -> Option<usize> {
	let mut index = start;

	if engine.token(index)?.is_prefix_operator(".") {
		index += 1;
	} else {
		while is_type_name(engine.token(index)?) && engine.token(index + 1)?.is_infix_operator(".")
		{
			index += 2;
		}
	}

	is_case_name(engine.token(index)?).then_some(index)
}

fn is_type_name(token: &Token) -> bool {
	matches!(token, Token::Identifier(name) if name.starts_with(|c: char| c.is_ascii_uppercase()))
}

fn is_case_name(token: &Token) -> bool {
	matches!(
		token,
		Token::Identifier(name) if name.starts_with(|c: char| c.is_ascii_lowercase() || c == '_')
	)
}

/// `\.first.second`
fn key_path_tokens(components: &[String]) -> Vec<Token> {
	let mut tokens = vec![
		Token::Operator("\\".to_string(), Fixity::Prefix),
		Token::Operator(".".to_string(), Fixity::Prefix),
	];

	for (position, component) in components.iter().enumerate() {
		if position > 0 {
			tokens.push(Token::Operator(".".to_string(), Fixity::Infix));
		}

		tokens.push(Token::Identifier(component.clone()));
	}

	tokens
}
