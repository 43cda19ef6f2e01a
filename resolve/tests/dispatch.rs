//! Exercises the v-table and interface-dispatch construction named in §4.2 step 3/4 and the
//! end-to-end scenarios S1 (override dispatch), S2 (interface default), and S3 (diamond conflict).

use std::collections::HashSet;
use anyhow::Result;
use java_string::JavaStr;
use duke::tree::class::{ClassAccess, ClassFile, ClassName};
use duke::tree::field::{Field, FieldAccess, FieldDescriptor, FieldName};
use duke::tree::method::{Method, MethodAccess, MethodDescriptor, MethodName};
use duke::tree::method::code::Code;
use duke::tree::version::Version;
use ingest::ProgramModel;
use resolve::{resolve, DispatchTarget, ResolveConfig};

fn class_name(name: &str) -> ClassName {
	ClassName::try_from(JavaStr::from_str(name).to_owned()).unwrap()
}

fn method_name(name: &str) -> MethodName {
	MethodName::try_from(JavaStr::from_str(name).to_owned()).unwrap()
}

fn method_desc(desc: &str) -> MethodDescriptor {
	MethodDescriptor::try_from(JavaStr::from_str(desc).to_owned()).unwrap()
}

fn field_name(name: &str) -> FieldName {
	FieldName::try_from(JavaStr::from_str(name).to_owned()).unwrap()
}

fn field_desc(desc: &str) -> FieldDescriptor {
	FieldDescriptor::try_from(JavaStr::from_str(desc).to_owned()).unwrap()
}

fn class(name: &str, super_class: Option<&str>, interfaces: &[&str], is_interface: bool) -> ClassFile {
	let access_bits: u16 = if is_interface { 0x0001 | 0x0200 | 0x0400 } else { 0x0001 };
	ClassFile::new(
		Version::V1_8,
		ClassAccess::from(access_bits),
		class_name(name),
		super_class.map(class_name),
		interfaces.iter().map(|i| class_name(i)).collect(),
	)
}

/// A concrete, non-static, non-private instance method with a body, suitable for occupying a
/// v-table slot or an interface default slot.
fn virtual_method(name: &str, desc: &str, is_final: bool, is_abstract: bool) -> Method {
	let mut access_bits: u16 = 0x0001; // public
	if is_final { access_bits |= 0x0010; }
	if is_abstract { access_bits |= 0x0400; }
	let mut method = Method::new(MethodAccess::from(access_bits), method_name(name), method_desc(desc));
	if !is_abstract {
		method.code = Some(Code::default());
	}
	method
}

fn instance_field(name: &str, desc: &str) -> Field {
	Field::new(FieldAccess::from(0x0001u16), field_name(name), field_desc(desc))
}

#[test]
fn override_shares_the_base_slot() -> Result<()> {
	let mut base = class("Base", None, &[], false);
	base.methods.push(virtual_method("greet", "()V", false, false));

	let mut derived = class("Derived", Some("Base"), &[], false);
	derived.methods.push(virtual_method("greet", "()V", false, false));

	let mut program = ProgramModel::new();
	program.insert(base.name.clone(), base);
	program.insert(derived.name.clone(), derived);

	let linked = resolve(program, &ResolveConfig::default())?;

	let (_, base_linked) = linked.class(&class_name("Base")).unwrap();
	let (_, derived_linked) = linked.class(&class_name("Derived")).unwrap();

	assert_eq!(base_linked.vtable.len(), 1);
	assert_eq!(derived_linked.vtable.len(), 1, "an override must reuse the inherited slot, not append one");
	assert_eq!(derived_linked.vtable[0].declaring_class, class_name("Derived"));

	Ok(())
}

#[test]
fn overriding_a_final_method_is_a_link_error() -> Result<()> {
	let mut base = class("Base", None, &[], false);
	base.methods.push(virtual_method("greet", "()V", true, false));

	let mut derived = class("Derived", Some("Base"), &[], false);
	derived.methods.push(virtual_method("greet", "()V", false, false));

	let mut program = ProgramModel::new();
	program.insert(base.name.clone(), base);
	program.insert(derived.name.clone(), derived);

	assert!(resolve(program, &ResolveConfig::default()).is_err());

	Ok(())
}

#[test]
fn interface_default_dispatches_to_the_declaring_interface() -> Result<()> {
	let mut iface = class("Greeter", None, &[], true);
	iface.methods.push(virtual_method("greet", "()V", false, false));

	let mut impl_class = class("Impl", None, &["Greeter"], false);
	impl_class.super_class = None;

	let mut program = ProgramModel::new();
	program.insert(iface.name.clone(), iface);
	program.insert(impl_class.name.clone(), impl_class);

	let config = ResolveConfig { provided_by_runtime: HashSet::new(), ..ResolveConfig::default() };
	let linked = resolve(program, &config)?;

	let (_, impl_linked) = linked.class(&class_name("Impl")).unwrap();
	let key = (class_name("Greeter"), duke::tree::method::MethodNameAndDesc {
		name: method_name("greet"),
		desc: method_desc("()V"),
	});
	assert_eq!(impl_linked.interface_dispatch.get(&key), Some(&DispatchTarget::Default(class_name("Greeter"))));

	Ok(())
}

#[test]
fn diamond_default_conflict_is_recorded_not_resolved() -> Result<()> {
	let mut left = class("Left", None, &[], true);
	left.methods.push(virtual_method("greet", "()V", false, false));

	let mut right = class("Right", None, &[], true);
	right.methods.push(virtual_method("greet", "()V", false, false));

	let impl_class = class("Impl", None, &["Left", "Right"], false);

	let mut program = ProgramModel::new();
	program.insert(left.name.clone(), left);
	program.insert(right.name.clone(), right);
	program.insert(impl_class.name.clone(), impl_class);

	let linked = resolve(program, &ResolveConfig::default())?;
	let (_, impl_linked) = linked.class(&class_name("Impl")).unwrap();

	let key = (class_name("Left"), duke::tree::method::MethodNameAndDesc {
		name: method_name("greet"),
		desc: method_desc("()V"),
	});
	assert_eq!(impl_linked.interface_dispatch.get(&key), Some(&DispatchTarget::Conflict));

	Ok(())
}

#[test]
fn flattened_fields_put_the_superclass_first() -> Result<()> {
	let mut base = class("Base", None, &[], false);
	base.fields.push(instance_field("x", "I"));

	let mut derived = class("Derived", Some("Base"), &[], false);
	derived.fields.push(instance_field("y", "I"));

	let mut program = ProgramModel::new();
	program.insert(base.name.clone(), base);
	program.insert(derived.name.clone(), derived);

	let linked = resolve(program, &ResolveConfig::default())?;
	let (_, derived_linked) = linked.class(&class_name("Derived")).unwrap();

	assert_eq!(derived_linked.flattened_instance_fields, vec![
		(class_name("Base"), 0),
		(class_name("Derived"), 0),
	]);

	Ok(())
}

#[test]
fn stub_classes_get_an_empty_vtable() -> Result<()> {
	let derived = class("Derived", Some("java/lang/Object"), &[], false);

	let mut program = ProgramModel::new();
	program.insert(derived.name.clone(), derived);

	let mut provided_by_runtime = HashSet::new();
	provided_by_runtime.insert(class_name("java/lang/Object"));
	let config = ResolveConfig { provided_by_runtime, ..ResolveConfig::default() };

	let linked = resolve(program, &config)?;
	let (_, object_linked) = linked.class(&class_name("java/lang/Object")).unwrap();
	assert!(object_linked.is_stub);
	assert!(object_linked.vtable.is_empty());

	Ok(())
}
