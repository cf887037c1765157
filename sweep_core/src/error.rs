use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum SweepError {
	#[error(transparent)]
	#[diagnostic(code(sweep::io_error))]
	Io(#[from] std::io::Error),

	/// The input failed the parse gate. No rule ran.
	#[error("{reason} at {line}:{column}")]
	#[diagnostic(
		code(sweep::parsing),
		help(
			"fix the source, or use fragment mode / ignore conflict markers when the input is \
			 expected to look like this"
		)
	)]
	Parsing {
		reason: String,
		/// 1-indexed line.
		line: usize,
		/// 0-indexed column.
		column: usize,
	},

	/// The rules never reached a fixed point. This is a defect in the rule set,
	/// not in the input.
	#[error("failed to terminate after {passes} passes")]
	#[diagnostic(
		code(sweep::non_termination),
		help("two or more rules keep undoing each other; disable rules one at a time to find them")
	)]
	NonTermination { passes: usize },

	#[error("invalid value for option `{name}`: {reason}")]
	#[diagnostic(code(sweep::invalid_option))]
	InvalidOption { name: String, reason: String },

	#[error("unknown rule: `{0}`")]
	#[diagnostic(
		code(sweep::unknown_rule),
		help("run `sweep --rules` to list the available rules")
	)]
	UnknownRule(String),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(sweep::config_parse),
		help("check that sweep.toml is valid TOML with [options] and/or [rules] sections")
	)]
	ConfigParse(String),
}

impl SweepError {
	pub fn is_parsing(&self) -> bool {
		matches!(self, Self::Parsing { .. })
	}

	pub fn is_non_termination(&self) -> bool {
		matches!(self, Self::NonTermination { .. })
	}

	/// Invalid options, unknown rules and unreadable config files.
	pub fn is_configuration(&self) -> bool {
		matches!(
			self,
			Self::InvalidOption { .. } | Self::UnknownRule(_) | Self::ConfigParse(_)
		)
	}
}

pub type SweepResult<T> = Result<T, SweepError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
