//! Rules and the ordered registry the orchestrator runs.
//!
//! A rule is a named transformation over an [`Engine`]. Rules keep no state
//! between invocations; everything they know comes from the buffer and the
//! [`Options`] they are handed. A rule that cannot safely act on the tokens in
//! front of it leaves them alone.

use std::fmt::Debug;

use crate::Engine;
use crate::Options;
use crate::SweepError;
use crate::SweepResult;

mod file_header;
mod scope_key_path;
mod trailing_space;

/// A named, documented transformation.
pub trait Rule: Send + Sync {
	/// Stable identifier used in configuration and diagnostics.
	fn name(&self) -> &str;
	/// Documentation shown by `sweep --rules`.
	fn help(&self) -> &str;
	fn apply(&self, engine: &mut Engine, options: &Options);
}

pub type RuleFn = fn(&mut Engine, &Options);

/// A [`Rule`] backed by a plain function.
#[derive(Debug, Clone, Copy)]
pub struct FnRule {
	name: &'static str,
	help: &'static str,
	apply: RuleFn,
}

impl FnRule {
	pub const fn new(name: &'static str, help: &'static str, apply: RuleFn) -> Self {
		Self { name, help, apply }
	}
}

impl Rule for FnRule {
	fn name(&self) -> &str {
		self.name
	}

	fn help(&self) -> &str {
		self.help
	}

	fn apply(&self, engine: &mut Engine, options: &Options) {
		(self.apply)(engine, options);
	}
}

pub const SCOPE_KEY_PATH: FnRule = FnRule::new(
	"scopeKeyPath",
	"Rewrite the `state:` and `action:` closures passed to `.scope(…)` as key paths, e.g. `{ \
	 $0.child }` and `{ .child($0) }` both become `\\.child`.",
	scope_key_path::apply,
);

pub const TRAILING_SPACE: FnRule = FnRule::new(
	"trailingSpace",
	"Remove whitespace at the end of a line.",
	trailing_space::apply,
);

pub const FILE_HEADER: FnRule = FnRule::new(
	"fileHeader",
	"Replace the comment block at the top of the file with the configured `file_header`. An \
	 empty header removes it.",
	file_header::apply,
);

/// The built-in rules in the order they run.
pub const BUILTIN_RULES: [FnRule; 3] = [SCOPE_KEY_PATH, TRAILING_SPACE, FILE_HEADER];

/// An explicit, ordered list of rules. Every pass runs each rule once, in
/// registration order.
pub struct RuleRegistry {
	rules: Vec<Box<dyn Rule>>,
}

impl Default for RuleRegistry {
	fn default() -> Self {
		Self::with_builtin_rules()
	}
}

impl Debug for RuleRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(self.names()).finish()
	}
}

impl RuleRegistry {
	pub fn empty() -> Self {
		Self { rules: Vec::new() }
	}

	pub fn with_builtin_rules() -> Self {
		let mut registry = Self::empty();
		for rule in BUILTIN_RULES {
			registry.register(rule);
		}
		registry
	}

	/// Append a rule. It runs after every rule registered before it.
	pub fn register(&mut self, rule: impl Rule + 'static) -> &mut Self {
		self.rules.push(Box::new(rule));
		self
	}

	/// Builder form of [`register`](Self::register).
	#[must_use]
	pub fn with(mut self, rule: impl Rule + 'static) -> Self {
		self.register(rule);
		self
	}

	/// Remove the named rules. Fails without removing anything when a name is
	/// not registered.
	pub fn disable<S: AsRef<str>>(&mut self, names: &[S]) -> SweepResult<()> {
		for name in names {
			let name = name.as_ref();
			if self.get(name).is_none() {
				return Err(SweepError::UnknownRule(name.to_string()));
			}
		}

		self.rules
			.retain(|rule| !names.iter().any(|name| name.as_ref() == rule.name()));

		Ok(())
	}

	pub fn get(&self, name: &str) -> Option<&dyn Rule> {
		self.iter().find(|rule| rule.name() == name)
	}

	pub fn names(&self) -> Vec<&str> {
		self.iter().map(|rule| rule.name()).collect()
	}

	pub fn iter(&self) -> impl Iterator<Item = &(dyn Rule + 'static)> {
		self.rules.iter().map(|rule| &**rule)
	}

	pub fn len(&self) -> usize {
		self.rules.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}
}
