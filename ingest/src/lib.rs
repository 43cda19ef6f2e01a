//! Walks an input root (a directory of `.class` files and/or `.jar`/`.zip` archives) and turns
//! every class file found into a [`duke::tree::class::ClassFile`], keyed by name into a
//! [`ProgramModel`].
//!
//! This is the first of the pipeline's two concurrency barriers: every class gets ingested
//! independently of every other, and nothing downstream may start until the whole program is
//! loaded, because resolving a supertype or a member reference can need any other class.

mod convert;
mod decode;
mod pool;

use std::fs::File;
use std::io::Read as _;
use std::path::Path;
use anyhow::{anyhow, Context, Result};
use indexmap::IndexMap;
use duke::tree::class::{ClassFile, ClassName};
use rayon::prelude::*;
use walkdir::WalkDir;

/// Every class reachable from an input root, keyed by its binary name.
///
/// Lookups elsewhere in the pipeline always go through this map by name; nothing downstream
/// holds a direct reference into another class's data, since ingestion runs classes through in
/// whatever order the filesystem/archive walk finds them.
pub type ProgramModel = IndexMap<ClassName, ClassFile>;

/// Reads every `.class` file directly in `root` and inside any `.jar`/`.zip` archive under it,
/// converting each into a `duke` tree and collecting them into a [`ProgramModel`].
///
/// Fails if two entries produce the same class name: a class file occurring twice on the
/// classpath is a malformed-input condition the rest of the pipeline should never have to
/// reason about.
pub fn ingest(root: &Path) -> Result<ProgramModel> {
	let sources = enumerate(root)?;
	log::info!("ingest: {} class files found under {}", sources.len(), root.display());

	let classes: Vec<ClassFile> = sources.into_par_iter()
		.map(|source| {
			let bytes = source.read()?;
			let raw = raw_class_file::ClassFile::read(&mut &bytes[..])
				.with_context(|| anyhow!("malformed class file: {}", source.describe()))?;
			convert::convert_class(raw).with_context(|| anyhow!("failed to ingest {}", source.describe()))
		})
		.collect::<Result<_>>()?;

	let mut program = ProgramModel::with_capacity(classes.len());
	for class in classes {
		if let Some(previous) = program.insert(class.name.clone(), class) {
			anyhow::bail!("duplicate class {} found on the input path (previously seen with version {:?})", previous.name, previous.version);
		}
	}
	program.sort_keys();
	Ok(program)
}

enum Source {
	File(std::path::PathBuf),
	ZipEntry { archive: std::path::PathBuf, entry_name: String },
}

impl Source {
	fn describe(&self) -> String {
		match self {
			Source::File(path) => path.display().to_string(),
			Source::ZipEntry { archive, entry_name } => format!("{}!{entry_name}", archive.display()),
		}
	}

	fn read(&self) -> Result<Vec<u8>> {
		match self {
			Source::File(path) => {
				let mut bytes = Vec::new();
				File::open(path).with_context(|| anyhow!("failed to open {}", path.display()))?
					.read_to_end(&mut bytes)?;
				Ok(bytes)
			}
			Source::ZipEntry { archive, entry_name } => {
				let file = File::open(archive).with_context(|| anyhow!("failed to open {}", archive.display()))?;
				let mut zip = zip::ZipArchive::new(file).with_context(|| anyhow!("failed to open zip archive {}", archive.display()))?;
				let mut entry = zip.by_name(entry_name).with_context(|| anyhow!("missing zip entry {entry_name} in {}", archive.display()))?;
				let mut bytes = Vec::with_capacity(entry.size() as usize);
				entry.read_to_end(&mut bytes)?;
				Ok(bytes)
			}
		}
	}
}

fn enumerate(root: &Path) -> Result<Vec<Source>> {
	let mut sources = Vec::new();
	for entry in WalkDir::new(root).sort_by_file_name() {
		let entry = entry?;
		if !entry.file_type().is_file() {
			continue;
		}
		let path = entry.path();
		match path.extension().and_then(|ext| ext.to_str()) {
			Some("class") => sources.push(Source::File(path.to_path_buf())),
			Some("jar") | Some("zip") => sources.extend(enumerate_archive(path)?),
			_ => {}
		}
	}
	Ok(sources)
}

fn enumerate_archive(path: &Path) -> Result<Vec<Source>> {
	let file = File::open(path).with_context(|| anyhow!("failed to open {}", path.display()))?;
	let mut zip = zip::ZipArchive::new(file).with_context(|| anyhow!("failed to open zip archive {}", path.display()))?;
	let mut names: Vec<String> = zip.file_names().map(str::to_owned).collect();
	names.sort();
	Ok(names.into_iter()
		.filter(|name| name.ends_with(".class"))
		.map(|entry_name| Source::ZipEntry { archive: path.to_path_buf(), entry_name })
		.collect())
}
