//! The `serde`-derived configuration format named in §2.1/§6: a JSON file giving the parts of a
//! translation run that are policy rather than structure, overridable by the matching CLI flags.

use std::path::Path;
use anyhow::{Context, Result};
use serde::Deserialize;

use crate::Cli;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
	/// Entry classes reachability is computed from (§4.2 step 6).
	pub entry_classes: Vec<String>,
	/// Classes the runtime provides without the input program declaring them (§9).
	pub provided_by_runtime: Vec<String>,
	/// When set, every ingested class stays reachable and dead-code elision is skipped.
	pub preserve_unreachable: bool,
	/// Runtime ABI version the emitter targets (§6).
	pub runtime_abi_version: u32,
	/// Elide dead (never-read, side-effect-free) local assignments during Lower's clean-up pass.
	pub elide_dead_assignments: bool,
	/// Emit checked (vs. unchecked) casts and instance-of helpers.
	pub emit_assertions: bool,
}

impl Default for Config {
	fn default() -> Self {
		Config {
			entry_classes: Vec::new(),
			provided_by_runtime: Vec::new(),
			preserve_unreachable: true,
			runtime_abi_version: 1,
			elide_dead_assignments: true,
			emit_assertions: true,
		}
	}
}

impl Config {
	pub fn load(path: &Path) -> Result<Config> {
		let text = std::fs::read_to_string(path)
			.with_context(|| format!("failed to read configuration file {}", path.display()))?;
		serde_json::from_str(&text)
			.with_context(|| format!("failed to parse configuration file {} as JSON", path.display()))
	}

	/// Layers CLI flags over a loaded (or default) configuration. Vec-valued fields (entry
	/// classes, provided-by-runtime classes) are unioned rather than replaced, since `--entry`
	/// and `--config` are meant to be combinable, not mutually exclusive.
	pub fn merge_cli(&mut self, cli: &Cli) {
		self.entry_classes.extend(cli.entry.iter().cloned());
		self.provided_by_runtime.extend(cli.provided_by_runtime.iter().cloned());
		if cli.preserve_unreachable {
			self.preserve_unreachable = true;
		}
		if let Some(version) = cli.runtime_abi_version {
			self.runtime_abi_version = version;
		}
		if cli.no_elide_dead_code {
			self.elide_dead_assignments = false;
		}
		if cli.no_assertions {
			self.emit_assertions = false;
		}
	}
}
