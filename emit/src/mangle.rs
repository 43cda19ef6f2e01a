//! Deterministic name mangling (§4.4): every emitted symbol encodes its owner class, its original
//! name, and — for methods — enough of the descriptor to disambiguate overloads, so the mapping
//! from `(owner, name, descriptor)` to emitted symbol is a bijection over the closed program.

use std::fmt::Display;
use duke::tree::class::ClassName;
use duke::tree::field::FieldName;
use duke::tree::method::MethodNameAndDesc;

/// FNV-1a, chosen for being a one-line, dependency-free, bit-stable hash: unlike `DefaultHasher`
/// (which makes no cross-version stability guarantee), the same descriptor bytes always fold to
/// the same 64 bits, which `TESTABLE PROPERTIES` #7 (byte-identical re-emission) depends on.
fn fnv1a(bytes: &[u8]) -> u64 {
	const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
	const PRIME: u64 = 0x100000001b3;
	let mut hash = OFFSET_BASIS;
	for &byte in bytes {
		hash ^= byte as u64;
		hash = hash.wrapping_mul(PRIME);
	}
	hash
}

fn sanitize(name: &str) -> String {
	name.chars().map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' }).collect()
}

/// A class's emitted identifier: its binary name with `/` replaced by `_`, suffixed with a short
/// hash so two classes that sanitize to the same identifier (different packages, same simple name
/// after substitution of unusual characters) never collide.
///
/// Takes anything `Display`-like so it accepts both a method/field's owning `ClassName` and a
/// `FieldRef`'s `ObjClassName` without a separate overload for each.
pub fn mangle_class(class: &impl Display) -> String {
	let raw = class.to_string();
	let hash = fnv1a(raw.as_bytes());
	format!("{}_{:08x}", sanitize(&raw), (hash & 0xffff_ffff) as u32)
}

/// A field's emitted identifier: owner + original name. Fields can't be overloaded, so no
/// descriptor hash is needed for disambiguation, only for the inherited/redeclared-with-different-
/// type collision named in `DESIGN.md`'s open-question resolution.
pub fn mangle_field(owner: &ClassName, name: &FieldName, descriptor_hint: &str) -> String {
	let hash = fnv1a(descriptor_hint.as_bytes());
	format!("{}__{}__{:04x}", mangle_class(owner), sanitize(&name.to_string()), (hash & 0xffff) as u16)
}

/// A method's emitted identifier: owner + original name + a hash of the full descriptor, which is
/// what actually disambiguates overloads (two methods can share a name but never a descriptor).
pub fn mangle_method(owner: &ClassName, sig: &MethodNameAndDesc) -> String {
	let descriptor = sig.desc.to_string();
	let hash = fnv1a(descriptor.as_bytes());
	format!("{}__{}__{:08x}", mangle_class(owner), sanitize(&sig.name.to_string()), (hash & 0xffff_ffff) as u32)
}

/// A virtual-dispatch slot's emitted field name, deliberately owner-less: an override shares its
/// base's `(name, descriptor)`, so two classes that fill the same vtable slot must spell its field
/// identically, or a base-typed pointer couldn't call through an overriding subclass's vtable.
pub fn mangle_slot(sig: &MethodNameAndDesc) -> String {
	let descriptor = sig.desc.to_string();
	let hash = fnv1a(descriptor.as_bytes());
	format!("slot_{}__{:08x}", sanitize(&sig.name.to_string()), (hash & 0xffff_ffff) as u32)
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;
	use java_string::JavaStr;
	use duke::tree::class::ClassName;
	use duke::tree::method::{MethodDescriptor, MethodName, MethodNameAndDesc};
	use super::{mangle_class, mangle_method};

	fn class(name: &str) -> ClassName {
		ClassName::try_from(JavaStr::from_str(name).to_owned()).unwrap()
	}

	fn sig(name: &str, desc: &str) -> MethodNameAndDesc {
		MethodNameAndDesc {
			name: MethodName::try_from(JavaStr::from_str(name).to_owned()).unwrap(),
			desc: MethodDescriptor::try_from(JavaStr::from_str(desc).to_owned()).unwrap(),
		}
	}

	#[test]
	fn distinct_classes_mangle_to_distinct_identifiers() {
		let names = ["com/example/Foo", "com/example/Bar", "com.example.Foo", "com_example_Foo", "Foo"];
		let mangled: HashSet<String> = names.iter().map(|n| mangle_class(&class(n))).collect();
		assert_eq!(mangled.len(), names.len(), "distinct binary names must never share a mangled identifier");
	}

	#[test]
	fn overloads_mangle_to_distinct_identifiers() {
		let owner = class("com/example/Foo");
		let overloads = [
			sig("bar", "()V"),
			sig("bar", "(I)V"),
			sig("bar", "(Ljava/lang/Object;)V"),
			sig("bar", "(I)I"),
		];
		let mangled: HashSet<String> = overloads.iter().map(|s| mangle_method(&owner, s)).collect();
		assert_eq!(mangled.len(), overloads.len(), "overloads differing only by descriptor must mangle distinctly");
	}

	#[test]
	fn mangling_is_deterministic() {
		let owner = class("com/example/Foo");
		let method = sig("bar", "(I)V");
		assert_eq!(mangle_method(&owner, &method), mangle_method(&owner, &method));
		assert_eq!(mangle_class(&owner), mangle_class(&owner));
	}
}
