//! Virtual-method table and interface-dispatch table construction (Resolve steps 3 and 4).

use std::collections::{HashMap, HashSet};
use anyhow::{bail, Result};
use indexmap::IndexMap;
use duke::tree::class::ClassName;
use duke::tree::method::MethodNameAndDesc;
use ingest::ProgramModel;
use crate::{LinkedClass, VSlot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchTarget {
	/// Resolves to a concrete method reachable through the class's own v-table.
	Slot(i32),
	/// Resolves to exactly one interface's default method.
	Default(ClassName),
	/// Two or more unrelated interfaces provide conflicting defaults and neither is overridden;
	/// dispatching this method is a link-time-detected error the emitter turns into a throw.
	Conflict,
}

fn signature(program: &ProgramModel, slot: &VSlot) -> MethodNameAndDesc {
	let method = &program[&slot.declaring_class].methods[slot.method_index];
	MethodNameAndDesc { name: method.name.clone(), desc: method.descriptor.clone() }
}

/// Builds `name`'s v-table and method→slot map (§4.2 step 3). A class that redeclares a method
/// already `final` in its superclass is a fatal `LinkError` (§4.2, §7): unlike an interface
/// dispatch conflict (only detected when the method is actually invoked), an illegal override is
/// wrong regardless of whether anything ever calls it, so this fails Resolve outright rather than
/// degrading to an empty v-table.
pub fn build_vtable(
	program: &ProgramModel,
	name: &ClassName,
	super_name: Option<&ClassName>,
	linked: &IndexMap<ClassName, LinkedClass>,
) -> Result<(Vec<VSlot>, HashMap<MethodNameAndDesc, i32>)> {
	let mut vtable: Vec<VSlot> = super_name
		.and_then(|s| linked.get(s))
		.map(|super_linked| super_linked.vtable.clone())
		.unwrap_or_default();

	let mut slot_by_sig: HashMap<MethodNameAndDesc, usize> = vtable.iter().enumerate()
		.map(|(i, slot)| (signature(program, slot), i))
		.collect();
	let mut final_sigs: HashSet<MethodNameAndDesc> = HashSet::new();
	for slot in &vtable {
		let declaring = &program[&slot.declaring_class].methods[slot.method_index];
		if declaring.access.is_final {
			final_sigs.insert(MethodNameAndDesc { name: declaring.name.clone(), desc: declaring.descriptor.clone() });
		}
	}

	let mut method_vslots = HashMap::new();
	let class = &program[name];
	for (index, method) in class.methods.iter().enumerate() {
		let key = MethodNameAndDesc { name: method.name.clone(), desc: method.descriptor.clone() };
		let is_virtual = !method.access.is_static && !method.access.is_private
			&& key.name.as_slice() != duke::tree::method::MethodName::INIT
			&& key.name.as_slice() != duke::tree::method::MethodName::CLINIT;

		if !is_virtual {
			method_vslots.insert(key, -1);
			continue;
		}

		if let Some(&slot_index) = slot_by_sig.get(&key) {
			if final_sigs.contains(&key) {
				bail!("{name} overrides final method {}{} declared in a superclass", key.name, key.desc);
			}
			vtable[slot_index] = VSlot { declaring_class: name.clone(), method_index: index };
			method_vslots.insert(key.clone(), slot_index as i32);
			if method.access.is_final {
				final_sigs.insert(key);
			}
		} else {
			let slot_index = vtable.len();
			vtable.push(VSlot { declaring_class: name.clone(), method_index: index });
			slot_by_sig.insert(key.clone(), slot_index);
			if method.access.is_final {
				final_sigs.insert(key.clone());
			}
			method_vslots.insert(key, slot_index as i32);
		}
	}

	Ok((vtable, method_vslots))
}

pub fn build_interface_dispatch(
	program: &ProgramModel,
	direct_interfaces: &[ClassName],
	vtable: &[VSlot],
) -> IndexMap<(ClassName, MethodNameAndDesc), DispatchTarget> {
	let mut all_interfaces: Vec<ClassName> = Vec::new();
	let mut seen = HashSet::new();
	let mut stack: Vec<ClassName> = direct_interfaces.to_vec();
	while let Some(iface) = stack.pop() {
		if !seen.insert(iface.clone()) {
			continue;
		}
		if let Some(class) = program.get(&iface) {
			stack.extend(class.interfaces.iter().cloned());
		}
		all_interfaces.push(iface);
	}

	let vtable_sigs: HashMap<MethodNameAndDesc, i32> = vtable.iter().enumerate()
		.map(|(i, slot)| (signature(program, slot), i as i32))
		.collect();

	// Every (signature -> candidate default-providing interfaces) across the full transitive set.
	let mut defaults_by_sig: HashMap<MethodNameAndDesc, Vec<ClassName>> = HashMap::new();
	let mut all_sigs: HashSet<MethodNameAndDesc> = HashSet::new();
	for iface in &all_interfaces {
		let Some(class) = program.get(iface) else { continue };
		for method in &class.methods {
			if method.access.is_static {
				continue;
			}
			let key = MethodNameAndDesc { name: method.name.clone(), desc: method.descriptor.clone() };
			all_sigs.insert(key.clone());
			if method.code.is_some() && !method.access.is_abstract {
				defaults_by_sig.entry(key).or_default().push(iface.clone());
			}
		}
	}

	let mut resolved: HashMap<MethodNameAndDesc, DispatchTarget> = HashMap::new();
	for sig in &all_sigs {
		let target = if let Some(&slot) = vtable_sigs.get(sig) {
			DispatchTarget::Slot(slot)
		} else {
			match defaults_by_sig.get(sig).map(Vec::as_slice) {
				Some([single]) => DispatchTarget::Default(single.clone()),
				Some(many) if many.len() > 1 => DispatchTarget::Conflict,
				_ => continue,
			}
		};
		resolved.insert(sig.clone(), target);
	}

	let mut dispatch = IndexMap::new();
	for iface in &all_interfaces {
		let Some(class) = program.get(iface) else { continue };
		for method in &class.methods {
			if method.access.is_static {
				continue;
			}
			let key = MethodNameAndDesc { name: method.name.clone(), desc: method.descriptor.clone() };
			if let Some(target) = resolved.get(&key) {
				dispatch.insert((iface.clone(), key), target.clone());
			}
		}
	}
	dispatch
}
