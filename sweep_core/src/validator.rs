use crate::Options;
use crate::Position;
use crate::SweepError;
use crate::SweepResult;
use crate::tokens::Token;

/// Conflict markers are matched on the first five characters so that markers
/// of any length are caught.
const CONFLICT_MARKER_PREFIXES: [&str; 3] = ["<<<<<", "=====", ">>>>>"];

/// Reject structurally invalid input before any rule runs.
///
/// The first disqualifying token wins:
///
/// - an `Error` token, except for a trailing `Error("")` in fragment mode;
/// - an operator that starts like a merge conflict marker, unless conflict
///   markers are ignored.
///
/// This only inspects the buffer it is given. Tokens a rule introduces later
/// are never checked.
pub fn validate(tokens: &[Token], options: &Options) -> SweepResult<()> {
	let Some((index, reason)) = first_disqualifying(tokens, options) else {
		return Ok(());
	};

	let position = Position::of(tokens, index);

	Err(SweepError::Parsing {
		reason,
		line: position.line,
		column: position.column,
	})
}

fn first_disqualifying(tokens: &[Token], options: &Options) -> Option<(usize, String)> {
	tokens.iter().enumerate().find_map(|(index, token)| {
		match token {
			Token::Error(text) if text.is_empty() => {
				if options.fragment_mode && is_trailing(tokens, index) {
					None
				} else {
					Some((index, "unexpected end of file".to_string()))
				}
			}
			Token::Error(text) => Some((index, format!("unexpected token {text}"))),
			Token::Operator(text, _)
				if !options.ignore_conflict_markers && is_conflict_marker(text) =>
			{
				Some((index, format!("found conflict marker {text}")))
			}
			_ => None,
		}
	})
}

/// Only whitespace follows `index`.
fn is_trailing(tokens: &[Token], index: usize) -> bool {
	tokens[index + 1..].iter().all(Token::is_space_or_linebreak)
}

fn is_conflict_marker(text: &str) -> bool {
	CONFLICT_MARKER_PREFIXES
		.iter()
		.any(|prefix| text.starts_with(prefix))
}
