use tracing::debug;
use tracing::trace;
use tracing::warn;

use crate::Engine;
use crate::Options;
use crate::SweepError;
use crate::SweepResult;
use crate::lexer::tokenize;
use crate::rules::RuleRegistry;
use crate::tokens::Token;
use crate::tokens::source_code;
use crate::validator::validate;

/// Called after every rule with the rule's position in the registry and the
/// buffer as that rule left it.
pub type Observer<'a> = &'a mut dyn FnMut(usize, &[Token]);

/// The result of a run that reached a fixed point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOutput {
	pub tokens: Vec<Token>,
	/// The pass that found nothing left to change. A buffer no rule touches
	/// converges on pass 1.
	pub passes: usize,
}

/// Run `rules` over `tokens` until a whole pass leaves the buffer unchanged.
///
/// The input is validated once, before any rule runs, so a rejected buffer
/// never reaches the observer. Each pass builds a fresh [`Engine`] over the
/// previous pass's output and runs every rule once in registration order.
/// After a pass that changed anything, one-shot options are cleared so their
/// effect cannot repeat.
///
/// Fails with [`SweepError::NonTermination`] when `options.max_passes`
/// passes all changed the buffer.
#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len(), rules = rules.len()))]
pub fn apply_rules(
	mut tokens: Vec<Token>,
	rules: &RuleRegistry,
	options: &Options,
	mut observer: Option<Observer<'_>>,
) -> SweepResult<FormatOutput> {
	options.validate()?;
	validate(&tokens, options)?;

	let mut options = options.clone();

	for pass in 1..=options.max_passes {
		debug!(pass, "starting pass");
		let mut engine = Engine::new(tokens.clone());

		for (position, rule) in rules.iter().enumerate() {
			let revision = engine.revision();
			rule.apply(&mut engine, &options);

			if engine.revision() != revision {
				trace!(
					pass,
					rule = rule.name(),
					mutations = engine.revision() - revision,
					"rule changed the buffer"
				);
			}

			if let Some(observer) = observer.as_mut() {
				observer(position, engine.tokens());
			}
		}

		let output = engine.into_tokens();

		if output == tokens {
			debug!(pass, "reached a fixed point");
			return Ok(FormatOutput {
				tokens: output,
				passes: pass,
			});
		}

		debug!(pass, "pass changed the buffer");
		tokens = output;
		options.clear_one_shot();
	}

	warn!(
		passes = options.max_passes,
		"rules did not reach a fixed point"
	);

	Err(SweepError::NonTermination {
		passes: options.max_passes,
	})
}

/// [`apply_rules`] without an observer, returning only the final buffer.
pub fn format(
	tokens: Vec<Token>,
	rules: &RuleRegistry,
	options: &Options,
) -> SweepResult<Vec<Token>> {
	apply_rules(tokens, rules, options, None).map(|output| output.tokens)
}

/// Tokenize `source`, format it and render the result back to text.
pub fn format_source(source: &str, rules: &RuleRegistry, options: &Options) -> SweepResult<String> {
	let tokens = format(tokenize(source), rules, options)?;
	Ok(source_code(&tokens))
}
