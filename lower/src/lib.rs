//! Turns every concrete method body in a resolved program from a raw `duke` instruction stream
//! into a [`tir::TIRBody`]: the symbolic-stack-to-expression simulation described in the top-level
//! design, plus the subroutine-inlining and constant-folding passes that run immediately before
//! and after it.
//!
//! This is the second concurrency barrier in the pipeline: every method lowers independently of
//! every other, once Resolve has finished (lowering a `checkcast`/`instanceof`/field access needs
//! nothing Resolve didn't already settle, but needs Resolve to have settled it for every class).

mod depth;
mod fold;
mod subroutine;
mod stack;
pub mod tir;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use duke::tree::class::ClassName;
use duke::tree::method::MethodNameAndDesc;
use rayon::prelude::*;
use resolve::LinkedProgram;
use tir::TIRBody;

pub type MethodKey = (ClassName, MethodNameAndDesc);

/// Configuration for the parts of Lower that are policy rather than structure.
pub struct LowerConfig {
	/// When true (the default), `fold::clean_up` removes assignments to locals nothing ever reads
	/// whose value expression is side-effect-free. The CLI's `--no-elide-dead-code` flag turns
	/// this off.
	pub elide_dead_assignments: bool,
}

impl Default for LowerConfig {
	fn default() -> Self {
		LowerConfig { elide_dead_assignments: true }
	}
}

/// Every method body in the program, lowered to TIR and keyed by owner class + signature.
/// Abstract and native methods have no entry: there's no instruction stream to lower.
pub struct LoweredProgram {
	pub bodies: IndexMap<MethodKey, TIRBody>,
}

pub fn lower_program(linked: &LinkedProgram, config: &LowerConfig) -> Result<LoweredProgram> {
	let start = std::time::Instant::now();

	let work: Vec<(ClassName, &duke::tree::method::Method)> = linked.program.iter()
		.flat_map(|(name, class)| class.methods.iter().map(move |method| (name.clone(), method)))
		.filter(|(_, method)| method.code.is_some())
		.collect();
	log::info!("lower: {} method bodies to lower", work.len());

	let lowered: Vec<Result<(MethodKey, TIRBody)>> = work.into_par_iter()
		.map(|(owner, method)| {
			let body = lower_method(&owner, method, config)
				.with_context(|| format!("lowering {owner}#{}{}", method.name, method.descriptor))?;
			let key = (owner, MethodNameAndDesc { name: method.name.clone(), desc: method.descriptor.clone() });
			Ok((key, body))
		})
		.collect();

	let mut bodies = IndexMap::with_capacity(lowered.len());
	for entry in lowered {
		let (key, body) = entry?;
		bodies.insert(key, body);
	}

	log::info!("lower: {} method bodies lowered in {:?}", bodies.len(), start.elapsed());
	Ok(LoweredProgram { bodies })
}

fn lower_method(owner: &ClassName, method: &duke::tree::method::Method, config: &LowerConfig) -> Result<TIRBody> {
	let code = method.code.as_ref().expect("caller filters to methods with code");
	let inlined = subroutine::inline_subroutines(code)?;
	let mut body = stack::lower_method_body(owner, method, &inlined)?;
	fold::clean_up(&mut body, config.elide_dead_assignments);
	Ok(body)
}
