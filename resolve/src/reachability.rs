//! Reachability marking (Resolve step 6). Runs over the raw, pre-lowering program: the closure
//! considers supertypes, field types, and method signatures/exception tables, not instruction
//! bodies (those aren't available until Lower runs). `Config::preserve_unreachable` defaults to
//! true, which skips the closure outright and keeps every ingested class reachable.

use std::collections::HashSet;
use duke::tree::class::ClassName;
use duke::tree::descriptor::Type;
use crate::{LinkedProgram, ResolveConfig};

pub fn mark(linked_program: &mut LinkedProgram, config: &ResolveConfig) {
	if config.preserve_unreachable {
		return;
	}

	let mut reachable: HashSet<ClassName> = HashSet::new();
	let mut stack: Vec<ClassName> = config.entry_points.clone();

	while let Some(name) = stack.pop() {
		if !reachable.insert(name.clone()) {
			continue;
		}
		let Some(class) = linked_program.program.get(&name) else { continue };

		if let Some(super_class) = &class.super_class {
			stack.push(super_class.clone());
		}
		stack.extend(class.interfaces.iter().cloned());

		for field in &class.fields {
			if let Ok(parsed) = field.descriptor.parse() {
				push_referent(&mut stack, parsed.0);
			}
		}

		for method in &class.methods {
			if let Ok(parsed) = method.descriptor.parse() {
				for param in parsed.parameter_descriptors {
					push_referent(&mut stack, param);
				}
				if let Some(ret) = parsed.return_descriptor.0 {
					push_referent(&mut stack, ret);
				}
			}
			if let Some(exceptions) = &method.exceptions {
				stack.extend(exceptions.iter().cloned());
			}
		}
	}

	for (name, linked) in &mut linked_program.linked {
		linked.reachable = reachable.contains(name);
	}
}

fn push_referent(stack: &mut Vec<ClassName>, ty: Type) {
	match ty {
		Type::Object(name) => stack.push(name),
		Type::Array(_, duke::tree::descriptor::ArrayType::Object(name)) => stack.push(name),
		_ => {}
	}
}
