use std::path::Path;
use std::path::PathBuf;

use clap::Parser;
use sweep_core::SweepConfig;
use sweep_core::SweepResult;

#[derive(Parser, Debug)]
#[command(
	author,
	version,
	about = "Rewrite source files with a fixed set of token-level rules.",
	long_about = "sweep tokenizes each file, rejects input that does not lex cleanly or still \
	              contains merge conflict markers, and then runs its rules until a pass changes \
	              nothing.\n\nWith no paths, sweep reads standard input and writes the result to \
	              standard output.\n\nExamples:\n  sweep Sources/App.swift        Print the \
	              formatted file\n  sweep --write Sources/*.swift  Rewrite files in place\n  \
	              sweep --check Sources/*.swift  Exit with 1 if anything would change\n  sweep \
	              --rules                  List the available rules"
)]
#[allow(clippy::struct_excessive_bools)]
pub struct SweepCli {
	/// Files to format.
	pub paths: Vec<PathBuf>,

	/// Report files that would change instead of printing them. Exits with 1
	/// when any file would change.
	#[arg(long, default_value_t = false, conflicts_with = "write")]
	pub check: bool,

	/// Rewrite files in place.
	#[arg(long, short, default_value_t = false)]
	pub write: bool,

	/// Print a line diff of every change.
	#[arg(long, default_value_t = false)]
	pub diff: bool,

	/// Treat the input as a fragment: an unfinished trailing expression is
	/// not an error.
	#[arg(long, default_value_t = false)]
	pub fragment: bool,

	/// Accept input containing merge conflict markers.
	#[arg(long, default_value_t = false)]
	pub ignore_conflict_markers: bool,

	/// Give up after this many passes without reaching a fixed point.
	#[arg(long, value_name = "N")]
	pub max_passes: Option<usize>,

	/// Disable a rule by name. Can be repeated.
	#[arg(long, value_name = "RULE")]
	pub disable: Vec<String>,

	/// Replace the header comment at the top of each file. An empty string
	/// removes it.
	#[arg(long, value_name = "TEXT")]
	pub header: Option<String>,

	/// Path to a config file. Defaults to the first of `sweep.toml`,
	/// `.sweep.toml` and `.config/sweep.toml` in the current directory.
	#[arg(long, value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// List the available rules and exit.
	#[arg(long, default_value_t = false)]
	pub rules: bool,

	/// Enable verbose output.
	#[arg(long, short, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, default_value_t = false)]
	pub no_color: bool,
}

impl SweepCli {
	/// Load the config file and apply the command line on top of it. Flags
	/// always win over file values.
	pub fn resolve_config(&self, root: &Path) -> SweepResult<SweepConfig> {
		let mut config = match &self.config {
			Some(path) => SweepConfig::load_file(path)?,
			None => SweepConfig::load(root)?.unwrap_or_default(),
		};

		if self.fragment {
			config.options.fragment_mode = true;
		}

		if self.ignore_conflict_markers {
			config.options.ignore_conflict_markers = true;
		}

		if let Some(max_passes) = self.max_passes {
			config.options.max_passes = max_passes;
		}

		if let Some(header) = &self.header {
			config.options.file_header = Some(header.clone());
		}

		config.rules.disable.extend(self.disable.iter().cloned());
		config.options.validate()?;

		Ok(config)
	}

	/// Whether formatted output goes to standard output.
	pub fn prints_output(&self) -> bool {
		!self.check && !self.write && !self.diff
	}
}
