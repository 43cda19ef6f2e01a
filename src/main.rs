//! CLI entry point: wires the `ingest` → `resolve` → `lower` → `emit` pipeline together (§6).
//!
//! This crate owns exactly the ambient concerns named out of scope for the core in §1 and §2.1:
//! argument parsing, JSON configuration loading, logging setup, and mapping pipeline failures
//! onto the process exit codes the CLI surface promises. None of it touches the class model.

mod config;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use duke::tree::class::ClassName;

use config::Config;
use error::TranslateError;

/// Transpiles a closed set of class files into C++ translation units against the `jruntime` ABI.
#[derive(Debug, Parser)]
#[command(name = "jtranspile", version, about)]
struct Cli {
	/// Directory or archive (`.jar`/`.zip`) root to read class files from.
	input: PathBuf,

	/// Directory the emitted `.h`/`.cpp` translation units are written to.
	output: PathBuf,

	/// Entry class reachability is computed from (internal slashed form, e.g. `com/example/Main`).
	/// May be given more than once; merged with any `entry_classes` in `--config`.
	#[arg(short = 'e', long = "entry")]
	entry: Vec<String>,

	/// Class names the runtime provides without the input program declaring them (§9).
	#[arg(long = "provided-by-runtime")]
	provided_by_runtime: Vec<String>,

	/// Load a JSON configuration file; CLI flags given alongside it override its fields.
	#[arg(long = "config")]
	config: Option<PathBuf>,

	/// Raise log verbosity; `-v` for debug, `-vv` for trace.
	#[arg(short = 'v', action = clap::ArgAction::Count)]
	verbose: u8,

	/// Keep entities unreachable from the entry set instead of eliding them.
	#[arg(long = "preserve-unreachable")]
	preserve_unreachable: bool,

	/// Runtime ABI version to target (§6).
	#[arg(long = "runtime-abi-version")]
	runtime_abi_version: Option<u32>,

	/// Disable elision of dead (never-read, side-effect-free) local assignments.
	#[arg(long = "no-elide-dead-code")]
	no_elide_dead_code: bool,

	/// Disable runtime assertions (checked casts/instance-of) in emitted code.
	#[arg(long = "no-assertions")]
	no_assertions: bool,
}

fn setup_logging(verbosity: u8) -> Result<()> {
	let level = match verbosity {
		0 => log::LevelFilter::Info,
		1 => log::LevelFilter::Debug,
		_ => log::LevelFilter::Trace,
	};
	fern::Dispatch::new()
		.format(|out, message, record| {
			out.finish(format_args!("[{} {}] {}", record.target(), record.level(), message))
		})
		.level(level)
		.chain(std::io::stderr())
		.apply()
		.context("failed to install logger")
}

fn parse_class_name(name: &str) -> Result<ClassName> {
	ClassName::try_from(java_string::JavaStr::from_str(name).to_owned())
		.with_context(|| anyhow!("invalid class name on the command line: {name:?}"))
}

fn run(cli: Cli) -> Result<(), TranslateError> {
	let mut config = match &cli.config {
		Some(path) => Config::load(path).map_err(TranslateError::io("reading configuration file", path.clone()))?,
		None => Config::default(),
	};
	config.merge_cli(&cli);

	if !cli.input.exists() {
		return Err(TranslateError::UserError {
			detail: format!("input root {} does not exist", cli.input.display()),
		});
	}

	let entry_points = config.entry_classes.iter()
		.map(|name| parse_class_name(name))
		.collect::<Result<Vec<_>>>()
		.map_err(|e| TranslateError::UserError { detail: format!("{e:#}") })?;
	let provided_by_runtime = config.provided_by_runtime.iter()
		.map(|name| parse_class_name(name))
		.collect::<Result<std::collections::HashSet<_>>>()
		.map_err(|e| TranslateError::UserError { detail: format!("{e:#}") })?;

	let resolve_config = resolve::ResolveConfig {
		provided_by_runtime,
		entry_points,
		preserve_unreachable: config.preserve_unreachable,
	};
	let lower_config = lower::LowerConfig {
		elide_dead_assignments: config.elide_dead_assignments,
	};
	let emit_config = emit::EmitConfig {
		runtime_abi_version: config.runtime_abi_version,
		emit_assertions: config.emit_assertions,
	};

	let pipeline_start = std::time::Instant::now();

	let program = ingest::ingest(&cli.input)
		.map_err(TranslateError::malformed_input(None))?;

	let linked = resolve::resolve(program, &resolve_config)
		.map_err(TranslateError::link_error)?;

	let lowered = lower::lower_program(&linked, &lower_config)
		.map_err(TranslateError::verify_error)?;

	emit::emit_program(&linked, &lowered, &cli.output, &emit_config)
		.map_err(TranslateError::internal_error)?;

	log::info!("translation finished in {:?}", pipeline_start.elapsed());
	Ok(())
}

fn main() -> ExitCode {
	let cli = Cli::parse();

	if let Err(err) = setup_logging(cli.verbose) {
		eprintln!("error: {err:#}");
		return ExitCode::from(1);
	}

	match run(cli) {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			log::error!("{err}");
			ExitCode::from(err.exit_code())
		}
	}
}
