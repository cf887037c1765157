use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::Position;
use crate::SweepError;
use crate::SweepResult;
use crate::lexer::tokenize;
use crate::rules::RuleRegistry;

/// Default bound on the number of passes the orchestrator runs before giving
/// up on reaching a fixed point.
pub const DEFAULT_MAX_PASSES: usize = 10;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["sweep.toml", ".sweep.toml", ".config/sweep.toml"];

/// Options read by the orchestrator and by rules.
///
/// ```toml
/// [options]
/// fragment_mode = false
/// ignore_conflict_markers = false
/// max_passes = 10
/// file_header = "// Copyright (c) sweep contributors"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
	/// Tolerate a trailing end-of-input marker. Used when formatting a
	/// sub-expression rather than a whole file.
	pub fragment_mode: bool,
	/// Do not reject input containing version control conflict markers.
	pub ignore_conflict_markers: bool,
	/// Upper bound on orchestrator passes.
	pub max_passes: usize,
	/// Header comment to place at the top of the file. `Some("")` removes the
	/// existing header. This is a one-shot option: it is cleared once the
	/// first pass has changed the buffer.
	pub file_header: Option<String>,
}

impl Default for Options {
	fn default() -> Self {
		Self {
			fragment_mode: false,
			ignore_conflict_markers: false,
			max_passes: DEFAULT_MAX_PASSES,
			file_header: None,
		}
	}
}

impl Options {
	/// Reject option values no rule can act on sensibly.
	pub fn validate(&self) -> SweepResult<()> {
		if self.max_passes == 0 {
			return Err(SweepError::InvalidOption {
				name: "max_passes".to_string(),
				reason: "must be at least 1".to_string(),
			});
		}

		if let Some(line) = self.file_header.as_deref().and_then(first_code_line) {
			return Err(SweepError::InvalidOption {
				name: "file_header".to_string(),
				reason: format!("`{}` is not a comment", line.trim()),
			});
		}

		Ok(())
	}

	/// Clear every option whose effect must happen at most once.
	pub fn clear_one_shot(&mut self) {
		self.file_header = None;
	}
}

/// The first line of `header` holding anything other than complete comments.
fn first_code_line(header: &str) -> Option<&str> {
	let tokens = tokenize(header);
	let index = tokens
		.iter()
		.position(|token| !token.is_space_or_comment_or_linebreak())?;
	let line = Position::of(&tokens, index).line;

	header.lines().nth(line - 1).or(Some(header))
}

/// Rule selection.
///
/// ```toml
/// [rules]
/// disable = ["trailingSpace"]
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RulesConfig {
	/// Names of built-in rules that should not run.
	pub disable: Vec<String>,
}

/// Configuration loaded from a `sweep.toml` file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
	pub options: Options,
	pub rules: RulesConfig,
}

impl SweepConfig {
	/// Resolve the first config file found in `root`, following
	/// [`CONFIG_FILE_CANDIDATES`].
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from `root`. Returns `Ok(None)` when no config file
	/// exists.
	pub fn load(root: &Path) -> SweepResult<Option<SweepConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		Self::load_file(&config_path).map(Some)
	}

	pub fn load_file(path: &Path) -> SweepResult<SweepConfig> {
		let content = std::fs::read_to_string(path)?;
		Self::from_toml_str(&content)
	}

	pub fn from_toml_str(content: &str) -> SweepResult<SweepConfig> {
		let config: SweepConfig =
			toml::from_str(content).map_err(|e| SweepError::ConfigParse(e.to_string()))?;
		config.options.validate()?;

		Ok(config)
	}

	/// The built-in rules minus those disabled here.
	pub fn registry(&self) -> SweepResult<RuleRegistry> {
		let mut registry = RuleRegistry::with_builtin_rules();
		registry.disable(&self.rules.disable)?;

		Ok(registry)
	}
}
