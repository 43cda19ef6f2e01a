//! Program-wide tables: the interface-dispatch module and the plain-text class manifest (§6).
//!
//! Both are built once over the whole linked program, after every per-class unit has a stable
//! mangled name, so the ordering here is what other tooling can rely on being deterministic.

use std::fmt::Write as _;
use anyhow::Result;
use resolve::{DispatchTarget, LinkedProgram};
use crate::mangle::{mangle_class, mangle_slot};

pub struct ProgramTable {
	pub header: String,
	pub source: String,
	pub manifest: String,
}

/// Classes are visited in lexicographic binary-name order so two runs over the same program
/// produce byte-identical output regardless of ingest order.
fn ordered_class_names(linked: &LinkedProgram) -> Vec<duke::tree::class::ClassName> {
	let mut names: Vec<_> = linked.linked.keys().cloned().collect();
	names.sort_by(|a, b| a.to_string().cmp(&b.to_string()));
	names
}

pub fn build_program_table(linked: &LinkedProgram) -> Result<ProgramTable> {
	let names = ordered_class_names(linked);

	let mut header = String::new();
	header.push_str("#ifndef JTRANSPILE_PROGRAM_TABLE_H\n#define JTRANSPILE_PROGRAM_TABLE_H\n\n#include \"jruntime.h\"\n\n");
	header.push_str("void* jtranspile_interface_dispatch(void* receiver, const char* iface, const char* slot_name);\n");
	header.push_str("\n#endif // JTRANSPILE_PROGRAM_TABLE_H\n");

	let mut source = String::new();
	source.push_str("#include \"program_table.h\"\n\n");
	source.push_str("void* jtranspile_interface_dispatch(void* receiver, const char* iface, const char* slot_name) {\n");
	for name in &names {
		let (_, info) = linked.class(name).expect("ordered name came from linked program");
		if info.interface_dispatch.is_empty() {
			continue;
		}
		writeln!(source, "\tif (jruntime::instance_of_named(receiver, \"{name}\")) {{").unwrap();
		for ((iface, sig), target) in &info.interface_dispatch {
			write!(source, "\t\tif (strcmp(iface, \"{iface}\") == 0 && strcmp(slot_name, \"{}\") == 0) ", mangle_slot(sig)).unwrap();
			match target {
				DispatchTarget::Slot(slot_index) => {
					writeln!(source, "return (void*) static_cast<{}*>(receiver)->vtable->{};", mangle_class(name), {
						let slot = &info.vtable[*slot_index as usize];
						mangle_slot(&resolve_method_sig(linked, slot))
					}).unwrap();
				}
				DispatchTarget::Default(owner) => {
					writeln!(source, "return (void*) &{}::{};", mangle_class(owner), mangle_slot(sig)).unwrap();
				}
				DispatchTarget::Conflict => {
					writeln!(source, "jruntime::throw_incompatible_class_change();").unwrap();
				}
			}
		}
		source.push_str("\t}\n");
	}
	source.push_str("\tjruntime::throw_no_such_method();\n\treturn nullptr;\n}\n");

	let mut manifest = String::new();
	for (index, name) in names.iter().enumerate() {
		writeln!(manifest, "{name}\t{}.h\t{index}", mangle_class(name)).unwrap();
	}

	Ok(ProgramTable { header, source, manifest })
}

fn resolve_method_sig(linked: &LinkedProgram, slot: &resolve::VSlot) -> duke::tree::method::MethodNameAndDesc {
	let method = &linked.program[&slot.declaring_class].methods[slot.method_index];
	duke::tree::method::MethodNameAndDesc { name: method.name.clone(), desc: method.descriptor.clone() }
}
