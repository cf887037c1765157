use std::io::Read;
use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use sweep_cli::SweepCli;
use sweep_core::AnyResult;
use sweep_core::Options;
use sweep_core::RuleRegistry;
use sweep_core::SweepError;
use sweep_core::format_source;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

/// Label used for standard input in messages.
const STDIN_LABEL: &str = "<stdin>";

fn main() {
	let args = SweepCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose, use_color);

	match run(&args) {
		Ok(Outcome::Unchanged) => {}
		Ok(Outcome::WouldChange) => process::exit(1),
		Ok(Outcome::Failed) => process::exit(2),
		Err(e) => {
			report_error(e);
			process::exit(2);
		}
	}
}

/// Log to stderr. `RUST_LOG` takes precedence over `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_level = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.without_time()
		.try_init()
		.ok();
}

/// Render through miette when the error came from the core so the code and
/// help text are shown.
fn report_error(e: Box<dyn std::error::Error>) {
	match e.downcast::<SweepError>() {
		Ok(sweep_err) => {
			let report: miette::Report = (*sweep_err).into();
			eprintln!("{report:?}");
		}
		Err(e) => {
			eprintln!("{} {e}", colored!("error:", red));
		}
	}
}

enum Outcome {
	/// Everything succeeded and, in check mode, nothing would change.
	Unchanged,
	/// Check mode found input that would be reformatted.
	WouldChange,
	/// At least one file could not be formatted. Its error was already
	/// reported.
	Failed,
}

fn run(args: &SweepCli) -> AnyResult<Outcome> {
	if args.rules {
		print_rules();
		return Ok(Outcome::Unchanged);
	}

	let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
	let config = args.resolve_config(&root)?;
	let registry = config.registry()?;

	if args.verbose {
		eprintln!("Rules: {}", registry.names().join(", "));
	}

	if args.paths.is_empty() {
		return run_stdin(args, &registry, &config.options);
	}

	let mut would_change = false;
	let mut failed = false;

	for path in &args.paths {
		match format_file(args, path, &registry, &config.options) {
			Ok(changed) => would_change |= changed,
			Err(e) => {
				eprintln!("{} {}", colored!("failed:", red), path.display());
				report_error(e);
				failed = true;
			}
		}
	}

	Ok(if failed {
		Outcome::Failed
	} else if args.check && would_change {
		Outcome::WouldChange
	} else {
		Outcome::Unchanged
	})
}

fn run_stdin(args: &SweepCli, registry: &RuleRegistry, options: &Options) -> AnyResult<Outcome> {
	let mut source = String::new();
	std::io::stdin().read_to_string(&mut source)?;

	let formatted = format_source(&source, registry, options)?;
	let changed = formatted != source;

	if args.diff && changed {
		print_diff(STDIN_LABEL, &source, &formatted);
	}

	if args.check {
		if changed {
			println!("would reformat {STDIN_LABEL}");
			return Ok(Outcome::WouldChange);
		}
	} else if !args.diff {
		print!("{formatted}");
	}

	Ok(Outcome::Unchanged)
}

/// Format one file. Returns whether its content changed.
fn format_file(
	args: &SweepCli,
	path: &Path,
	registry: &RuleRegistry,
	options: &Options,
) -> AnyResult<bool> {
	let source = std::fs::read_to_string(path)?;
	let formatted = format_source(&source, registry, options)?;
	let changed = formatted != source;
	let label = path.display().to_string();

	if args.diff && changed {
		print_diff(&label, &source, &formatted);
	}

	if args.check {
		if changed {
			println!("would reformat {label}");
		}
	} else if args.write {
		if changed {
			std::fs::write(path, &formatted)?;
			println!("{} {label}", colored!("formatted", green));
		} else if args.verbose {
			println!("unchanged {label}");
		}
	} else if args.prints_output() {
		print!("{formatted}");
	}

	Ok(changed)
}

fn print_rules() {
	let registry = RuleRegistry::default();
	let width = registry
		.names()
		.iter()
		.map(|name| name.len())
		.max()
		.unwrap_or(0);

	for rule in registry.iter() {
		let name = format!("{:<width$}", rule.name());
		println!("{}  {}", colored!(name, bold), rule.help());
	}
}

/// Print a unified diff between two strings, colorized.
fn print_diff(label: &str, current: &str, expected: &str) {
	println!("{}", colored!(format!("--- {label}"), bold));
	println!("{}", colored!(format!("+++ {label}"), bold));

	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				print!("{}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				print!("{}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				print!(" {change}");
			}
		}
	}
}
