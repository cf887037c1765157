use crate::Engine;
use crate::Options;

pub(super) fn apply(engine: &mut Engine, _options: &Options) {
	// Walk backwards so removals never shift a position still to be visited.
	for index in (0..engine.len()).rev() {
		let trailing = engine.token(index).is_some_and(|token| token.is_space())
			&& engine
				.token(index + 1)
				.is_none_or(|next| next.is_linebreak());

		if trailing {
			engine.remove_token(index);
		}
	}
}
