//! Builds the declaration (`.h`) and definition (`.cpp`) translation unit for one class (§4.4).

use anyhow::Result;
use duke::tree::class::ClassName;
use duke::tree::method::MethodNameAndDesc;
use resolve::LinkedProgram;
use lower::LoweredProgram;
use crate::mangle::{mangle_class, mangle_field, mangle_method, mangle_slot};
use crate::render::{java_type_name, render_statement};
use crate::EmitConfig;

pub struct ClassUnit {
	pub header: String,
	pub source: String,
}

pub fn build_class_unit(linked: &LinkedProgram, lowered: &LoweredProgram, name: &ClassName, config: &EmitConfig) -> Result<ClassUnit> {
	let (class, info) = linked.class(name).ok_or_else(|| anyhow::anyhow!("class {name} missing from linked program"))?;
	let mangled = mangle_class(name);

	let mut header = String::new();
	header.push_str(&format!("#ifndef {mangled}_H\n#define {mangled}_H\n\n#include \"jruntime.h\"\n\n"));
	if let Some(super_class) = &class.super_class {
		header.push_str(&format!("#include \"{}.h\"\n", mangle_class(super_class)));
	}
	header.push_str(&format!("\nstruct {mangled}_vtable;\n\n"));

	header.push_str(&format!("struct {mangled} {{\n\tjobject_header header;\n\t{mangled}_vtable* vtable;\n"));
	for (owner, field_index) in &info.flattened_instance_fields {
		let field = &linked.program[owner].fields[*field_index];
		let ty = field.descriptor.parse()?.0.into();
		header.push_str(&format!("\t{} {};\n", java_type_name(&ty), mangle_field(owner, &field.name, &field.descriptor.to_string())));
	}
	header.push_str("};\n\n");

	header.push_str(&format!("struct {mangled}_vtable {{\n"));
	for slot in &info.vtable {
		let method = &linked.program[&slot.declaring_class].methods[slot.method_index];
		let sig = MethodNameAndDesc { name: method.name.clone(), desc: method.descriptor.clone() };
		let ret = java_type_name(&method.descriptor.parse()?.return_descriptor.into());
		header.push_str(&format!("\t{ret} (*{})(void*);\n", mangle_slot(&sig)));
	}
	header.push_str("};\n\n");

	for field in &class.fields {
		if field.access.is_static {
			let ty = field.descriptor.parse()?.0.into();
			header.push_str(&format!("extern {} {};\n", java_type_name(&ty), mangle_field(name, &field.name, &field.descriptor.to_string())));
		}
	}
	for method in &class.methods {
		let sig = MethodNameAndDesc { name: method.name.clone(), desc: method.descriptor.clone() };
		let ret = java_type_name(&method.descriptor.parse()?.return_descriptor.into());
		let params = render_params(method)?;
		header.push_str(&format!("{ret} {}({params});\n", mangle_method(name, &sig)));
	}
	header.push_str(&format!("void {mangled}_ensure_init();\n"));
	header.push_str(&format!("\n#endif // {mangled}_H\n"));

	let mut source = String::new();
	source.push_str(&format!("#include \"{mangled}.h\"\n\n"));
	for field in &class.fields {
		if field.access.is_static {
			let ty = java_type_name(&field.descriptor.parse()?.0.into());
			source.push_str(&format!("{ty} {} {{}};\n", mangle_field(name, &field.name, &field.descriptor.to_string())));
		}
	}
	let has_clinit = class.methods.iter().any(|m| m.name.as_slice() == duke::tree::method::MethodName::CLINIT);
	if has_clinit {
		source.push_str(&format!("static bool {mangled}_init_done = false;\nstatic jmonitor {mangled}_init_guard;\n"));
	}

	for method in &class.methods {
		let sig = MethodNameAndDesc { name: method.name.clone(), desc: method.descriptor.clone() };
		let ret = java_type_name(&method.descriptor.parse()?.return_descriptor.into());
		let params = render_params(method)?;
		let is_clinit = method.name.as_slice() == duke::tree::method::MethodName::CLINIT;
		source.push_str(&format!("\n{ret} {}({params}) {{\n", mangle_method(name, &sig)));
		if is_clinit {
			source.push_str(&format!("\tjruntime::monitor_enter(&{mangled}_init_guard);\n\tif ({mangled}_init_done) {{ jruntime::monitor_exit(&{mangled}_init_guard); return; }}\n\t{mangled}_init_done = true;\n"));
		}
		if let Some(body) = lowered.bodies.get(&(name.clone(), sig)) {
			for statement in &body.statements {
				render_statement(&mut source, "\t", statement, config.emit_assertions);
			}
		} else {
			source.push_str("\t// abstract or native: no lowered body\n");
		}
		if is_clinit {
			source.push_str(&format!("\tjruntime::monitor_exit(&{mangled}_init_guard);\n"));
		}
		source.push_str("}\n");
	}
	source.push_str(&format!("\nvoid {mangled}_ensure_init() {{\n"));
	if has_clinit {
		let clinit_desc = class.methods.iter().find(|m| m.name.as_slice() == duke::tree::method::MethodName::CLINIT).unwrap().descriptor.clone();
		let clinit_sig = MethodNameAndDesc { name: duke::tree::method::MethodName::CLINIT.to_owned(), desc: clinit_desc };
		source.push_str(&format!("\tif (!{mangled}_init_done) {{ {}(); }}\n", mangle_method(name, &clinit_sig)));
	}
	if let Some(super_class) = &class.super_class {
		source.push_str(&format!("\t{}_ensure_init();\n", mangle_class(super_class)));
	}
	source.push_str("}\n");

	source.push_str(&format!("\n{mangled}_vtable {mangled}_singleton_vtable = {{\n"));
	for slot in &info.vtable {
		let method = &linked.program[&slot.declaring_class].methods[slot.method_index];
		let sig = MethodNameAndDesc { name: method.name.clone(), desc: method.descriptor.clone() };
		source.push_str(&format!("\t.{} = {},\n", mangle_slot(&sig), mangle_method(&slot.declaring_class, &sig)));
	}
	source.push_str("};\n");

	Ok(ClassUnit { header, source })
}

fn render_params(method: &duke::tree::method::Method) -> Result<String> {
	let parsed = method.descriptor.parse()?;
	let mut params = Vec::with_capacity(parsed.parameter_descriptors.len() + 1);
	if !method.access.is_static {
		params.push("void* self".to_string());
	}
	for (index, ty) in parsed.parameter_descriptors.into_iter().enumerate() {
		params.push(format!("{} p{index}", java_type_name(&ty.into())));
	}
	Ok(params.join(", "))
}
