//! Supertype closure: resolves each class's super/interface names to the classes they name,
//! synthesizes stubs for runtime-provided classes missing from the input, and orders classes so
//! every superclass is linked before its subclasses.
//!
//! Cycle detection uses a `petgraph::Graph` keyed by a `HashMap<ClassName, NodeIndex>`, checked
//! with petgraph's own cycle detection rather than a hand-rolled one.

use std::collections::{HashMap, HashSet};
use anyhow::{anyhow, bail, Result};
use petgraph::Graph;
use petgraph::graph::NodeIndex;
use duke::tree::class::{ClassAccess, ClassFile, ClassName};
use ingest::ProgramModel;
use crate::ResolveConfig;

pub struct Hierarchy {
	pub super_class: HashMap<ClassName, Option<ClassName>>,
	pub interfaces: HashMap<ClassName, Vec<ClassName>>,
	pub stubs: HashSet<ClassName>,
	/// Every class name, superclasses before their subclasses.
	pub order: Vec<ClassName>,
}

pub fn build(program: &ProgramModel, config: &ResolveConfig) -> Result<Hierarchy> {
	let mut super_class = HashMap::with_capacity(program.len());
	let mut interfaces = HashMap::with_capacity(program.len());
	let mut stubs = HashSet::new();

	let mut nodes: HashMap<ClassName, NodeIndex> = HashMap::new();
	let mut graph: Graph<ClassName, ()> = Graph::new();

	let mut node_for = |graph: &mut Graph<ClassName, ()>, nodes: &mut HashMap<ClassName, NodeIndex>, name: &ClassName| -> NodeIndex {
		*nodes.entry(name.clone()).or_insert_with(|| graph.add_node(name.clone()))
	};

	for name in program.keys() {
		node_for(&mut graph, &mut nodes, name);
	}

	for (name, class) in program {
		let resolved_super = match &class.super_class {
			None => None,
			Some(super_name) => {
				if program.contains_key(super_name) {
					Some(super_name.clone())
				} else if config.provided_by_runtime.contains(super_name) {
					if stubs.insert(super_name.clone()) {
						node_for(&mut graph, &mut nodes, super_name);
					}
					Some(super_name.clone())
				} else {
					bail!("class {name} extends {super_name}, which is neither present in the input nor configured as provided by the runtime");
				}
			}
		};

		if let Some(super_name) = &resolved_super {
			let a = node_for(&mut graph, &mut nodes, super_name);
			let b = node_for(&mut graph, &mut nodes, name);
			graph.add_edge(a, b, ());
		}
		super_class.insert(name.clone(), resolved_super);

		let mut resolved_interfaces = Vec::with_capacity(class.interfaces.len());
		for interface_name in &class.interfaces {
			if program.contains_key(interface_name) {
				resolved_interfaces.push(interface_name.clone());
			} else if config.provided_by_runtime.contains(interface_name) {
				if stubs.insert(interface_name.clone()) {
					node_for(&mut graph, &mut nodes, interface_name);
				}
				resolved_interfaces.push(interface_name.clone());
			} else {
				bail!("class {name} implements {interface_name}, which is neither present in the input nor configured as provided by the runtime");
			}

			let a = node_for(&mut graph, &mut nodes, &resolved_interfaces[resolved_interfaces.len() - 1]);
			let b = node_for(&mut graph, &mut nodes, name);
			graph.add_edge(a, b, ());
		}
		interfaces.insert(name.clone(), resolved_interfaces);
	}

	let topo = petgraph::algo::toposort(&graph, None)
		.map_err(|cycle| anyhow!("class hierarchy contains a cycle at {:?}", graph[cycle.node_id()]))?;
	let order = topo.into_iter().map(|index| graph[index].clone()).collect();

	Ok(Hierarchy { super_class, interfaces, stubs, order })
}

/// A minimal, field-and-method-free class used to stand in for a name the input program never
/// declared but that `provided_by_runtime` allows to be absent (e.g. `java/lang/Object`).
pub fn stub_class_file(name: &ClassName) -> ClassFile {
	ClassFile::new(
		duke::tree::version::Version::V21,
		ClassAccess::from(0x0001u16),
		name.clone(),
		None,
		Vec::new(),
	)
}
