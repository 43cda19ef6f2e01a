//! Renders a resolved, lowered program to a directory of C++ translation units (§4.4, §6).
//!
//! Every class is emitted independently into a staging directory; only once every class and the
//! program-wide table have succeeded is the staging directory renamed into place, so a failure
//! partway through never leaves a half-written output tree where a previous successful run used
//! to be.

mod class_unit;
mod mangle;
mod program_table;
mod render;

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use rayon::prelude::*;
use resolve::LinkedProgram;
use lower::LoweredProgram;

pub use class_unit::ClassUnit;
pub use program_table::ProgramTable;

pub struct EmitConfig {
	pub runtime_abi_version: u32,
	/// When true, `checkcast`/`instanceof` lower to the runtime's checked helpers (which throw on
	/// a failed cast); when false, to unchecked helpers that trust the verifier already ran. The
	/// CLI's `--no-assertions` flag turns this off for release-mode emitted code.
	pub emit_assertions: bool,
}

impl Default for EmitConfig {
	fn default() -> Self {
		EmitConfig { runtime_abi_version: 1, emit_assertions: true }
	}
}

/// Emits the whole program under `out_root`, replacing any previous contents of `out_root` only
/// after every unit has rendered successfully.
pub fn emit_program(linked: &LinkedProgram, lowered: &LoweredProgram, out_root: &Path, config: &EmitConfig) -> Result<()> {
	let _ = config.runtime_abi_version; // carried for the runtime-ABI version check emitted into jruntime.h once that file is templated

	let names: Vec<_> = linked.linked.iter().filter(|(_, info)| info.reachable && !info.is_stub).map(|(name, _)| name.clone()).collect();
	log::info!("emit: {} reachable classes to render", names.len());

	let staging = staging_dir(out_root)?;
	fs::create_dir_all(&staging).with_context(|| format!("failed to create staging directory {}", staging.display()))?;

	let units: Vec<Result<(duke::tree::class::ClassName, ClassUnit)>> = names.into_par_iter()
		.map(|name| {
			let unit = class_unit::build_class_unit(linked, lowered, &name, config)
				.with_context(|| format!("failed to emit class {name}"))?;
			Ok((name, unit))
		})
		.collect();

	for result in units {
		let (name, unit) = result?;
		let mangled = mangle::mangle_class(&name);
		fs::write(staging.join(format!("{mangled}.h")), unit.header)
			.with_context(|| format!("failed to write header for {name}"))?;
		fs::write(staging.join(format!("{mangled}.cpp")), unit.source)
			.with_context(|| format!("failed to write source for {name}"))?;
	}

	let table = program_table::build_program_table(linked)?;
	fs::write(staging.join("program_table.h"), table.header).context("failed to write program_table.h")?;
	fs::write(staging.join("program_table.cpp"), table.source).context("failed to write program_table.cpp")?;
	fs::write(staging.join("manifest.txt"), table.manifest).context("failed to write manifest.txt")?;

	commit(&staging, out_root)?;
	log::info!("emit: wrote output tree to {}", out_root.display());
	Ok(())
}

fn staging_dir(out_root: &Path) -> Result<PathBuf> {
	let parent = out_root.parent().unwrap_or_else(|| Path::new("."));
	let stem = out_root.file_name().and_then(|n| n.to_str()).unwrap_or("out");
	let staging = parent.join(format!(".{stem}.staging"));
	if staging.exists() {
		fs::remove_dir_all(&staging).with_context(|| format!("failed to clear stale staging directory {}", staging.display()))?;
	}
	Ok(staging)
}

/// Atomically swaps `staging` into `out_root`: if `out_root` already exists, it's moved aside
/// first so the final `rename` into place is a same-filesystem, non-merging replace rather than a
/// rename-into-existing-directory, which `std::fs::rename` doesn't define as a clean overwrite.
fn commit(staging: &Path, out_root: &Path) -> Result<()> {
	if out_root.exists() {
		let displaced = staging.with_extension("previous");
		if displaced.exists() {
			fs::remove_dir_all(&displaced)?;
		}
		fs::rename(out_root, &displaced)
			.with_context(|| format!("failed to move aside existing output directory {}", out_root.display()))?;
		fs::rename(staging, out_root)
			.with_context(|| format!("failed to move staged output into place at {}", out_root.display()))?;
		fs::remove_dir_all(&displaced).ok();
	} else {
		if let Some(parent) = out_root.parent() {
			fs::create_dir_all(parent)?;
		}
		fs::rename(staging, out_root)
			.with_context(|| format!("failed to move staged output into place at {}", out_root.display()))?;
	}
	Ok(())
}
