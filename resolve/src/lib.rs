//! Closes the ingested program into a linked graph: supertype chains, flattened field layout,
//! virtual-dispatch tables, interface-dispatch tables, merged annotations, and a reachability
//! marking.
//!
//! A [`LinkedClass`] never owns another `LinkedClass`; every cross-class reference is a by-name
//! lookup back through the [`ingest::ProgramModel`]/[`LinkedProgram::linked`] maps, so the link
//! graph stays acyclic in ownership terms even though the classes it describes form cycles
//! (`A extends B`, `B` mentions `A` in a method signature).

mod annotations;
mod dispatch;
mod hierarchy;
mod reachability;

use std::collections::HashMap;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use duke::tree::class::ClassName;
use duke::tree::method::MethodNameAndDesc;
use ingest::ProgramModel;

pub use dispatch::DispatchTarget;

/// Configuration for the parts of Resolve that are policy rather than structure.
pub struct ResolveConfig {
	/// Classes the runtime provides (e.g. `java/lang/Object`), allowed to be absent from the
	/// input program without failing supertype resolution.
	pub provided_by_runtime: std::collections::HashSet<ClassName>,
	/// Root classes reachability is computed from; ignored when `preserve_unreachable` is set.
	pub entry_points: Vec<ClassName>,
	/// When true (the default), every ingested class is treated as reachable and the closure in
	/// step 6 of Resolve is skipped entirely.
	pub preserve_unreachable: bool,
}

impl Default for ResolveConfig {
	fn default() -> Self {
		ResolveConfig {
			provided_by_runtime: std::collections::HashSet::new(),
			entry_points: Vec::new(),
			preserve_unreachable: true,
		}
	}
}

/// One entry of a virtual-dispatch table: which class's method body currently occupies the
/// slot. Slot indices are stable once assigned; an override changes `declaring_class`/
/// `method_index` in place rather than appending.
#[derive(Debug, Clone)]
pub struct VSlot {
	pub declaring_class: ClassName,
	pub method_index: usize,
}

pub struct LinkedClass {
	pub super_class: Option<ClassName>,
	pub interfaces: Vec<ClassName>,

	/// True for stub classes synthesized for a name in `provided_by_runtime` that the input
	/// program never declared.
	pub is_stub: bool,

	/// Instance fields in flattened layout order: the superclass's flattened list followed by
	/// this class's own instance fields. Field names here always resolve through `owner`.
	pub flattened_instance_fields: Vec<(ClassName, usize)>,

	pub vtable: Vec<VSlot>,
	/// `-1` for static/private/constructor/non-overridable methods, else an index into `vtable`.
	pub method_vslots: HashMap<MethodNameAndDesc, i32>,

	pub interface_dispatch: IndexMap<(ClassName, MethodNameAndDesc), DispatchTarget>,

	/// Per-member merged annotations (declaring class's defaults filled in for any element not
	/// explicitly given), indexed the same way as the owning `ClassFile`'s own vecs.
	pub merged_class_annotations: Vec<duke::tree::annotation::Annotation>,
	pub merged_field_annotations: Vec<Vec<duke::tree::annotation::Annotation>>,
	pub merged_method_annotations: Vec<Vec<duke::tree::annotation::Annotation>>,

	pub reachable: bool,
}

pub struct LinkedProgram {
	pub program: ProgramModel,
	pub linked: IndexMap<ClassName, LinkedClass>,
}

impl LinkedProgram {
	pub fn class(&self, name: &ClassName) -> Option<(&duke::tree::class::ClassFile, &LinkedClass)> {
		self.program.get(name).zip(self.linked.get(name))
	}
}

pub fn resolve(program: ProgramModel, config: &ResolveConfig) -> Result<LinkedProgram> {
	let start = std::time::Instant::now();
	let input_count = program.len();

	let hierarchy::Hierarchy { super_class, interfaces, stubs, order } = hierarchy::build(&program, config)?;

	let mut linked: IndexMap<ClassName, LinkedClass> = IndexMap::with_capacity(program.len() + stubs.len());
	for name in &order {
		let is_stub = stubs.contains(name);
		let flattened_instance_fields = if is_stub {
			Vec::new()
		} else {
			let mut fields = super_class.get(name)
				.and_then(|s| s.as_ref())
				.and_then(|s| linked.get(s))
				.map(|super_linked| super_linked.flattened_instance_fields.clone())
				.unwrap_or_default();
			if let Some(class) = program.get(name) {
				for (index, field) in class.fields.iter().enumerate() {
					if !field.access.is_static {
						fields.push((name.clone(), index));
					}
				}
			}
			fields
		};

		let (vtable, method_vslots) = if is_stub {
			(Vec::new(), HashMap::new())
		} else {
			dispatch::build_vtable(&program, name, super_class.get(name).and_then(|s| s.as_ref()), &linked)
				.with_context(|| format!("failed to build v-table for {name}"))?
		};

		let interface_dispatch = if is_stub {
			IndexMap::new()
		} else {
			dispatch::build_interface_dispatch(&program, &interfaces[name], &vtable)
		};

		let (merged_class_annotations, merged_field_annotations, merged_method_annotations) = if is_stub {
			(Vec::new(), Vec::new(), Vec::new())
		} else {
			annotations::merge_all(&program, name)
		};

		linked.insert(name.clone(), LinkedClass {
			super_class: super_class.get(name).and_then(|s| s.clone()),
			interfaces: interfaces.get(name).cloned().unwrap_or_default(),
			is_stub,
			flattened_instance_fields,
			vtable,
			method_vslots,
			interface_dispatch,
			merged_class_annotations,
			merged_field_annotations,
			merged_method_annotations,
			reachable: true,
		});
	}

	let mut program = program;
	for name in stubs {
		program.insert(name.clone(), hierarchy::stub_class_file(&name));
	}

	let mut linked_program = LinkedProgram { program, linked };
	reachability::mark(&mut linked_program, config);

	let reachable_count = linked_program.linked.values().filter(|info| info.reachable).count();
	log::info!(
		"resolve: linked {input_count} input classes ({} synthesized stubs, {reachable_count} reachable) in {:?}",
		linked_program.linked.len() - input_count,
		start.elapsed(),
	);
	Ok(linked_program)
}
