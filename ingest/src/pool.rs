//! Resolves a class file's raw, index-based constant pool into the named, owned values
//! `duke`'s tree model expects. `raw_class_file::ClassFile` leaves every reference to the
//! pool as a `u16` index; this is where those indices get turned into `ClassName`s,
//! `FieldRef`s, string/numeric constants and so on.

use anyhow::{anyhow, bail, Context, Result};
use java_string::{JavaStr, JavaString};
use duke::tree::class::{ClassName, ObjClassName};
use duke::tree::field::{FieldDescriptor, FieldName, FieldNameAndDesc, FieldRef};
use duke::tree::method::{MethodDescriptor, MethodName, MethodNameAndDesc, MethodRef};
use duke::tree::method::code::{ConstantDynamic, Handle, InvokeDynamic, Loadable};
use raw_class_file::CpInfo;

pub struct ConstantPool<'a> {
	entries: &'a [CpInfo],
}

impl<'a> ConstantPool<'a> {
	pub fn new(entries: &'a [CpInfo]) -> ConstantPool<'a> {
		ConstantPool { entries }
	}

	fn entry(&self, index: u16) -> Result<&'a CpInfo> {
		self.entries.get(index as usize - 1)
			.ok_or_else(|| anyhow!("constant pool index {index} out of range (pool has {} entries)", self.entries.len()))
	}

	pub fn utf8(&self, index: u16) -> Result<JavaString> {
		match self.entry(index)? {
			CpInfo::Utf8 { bytes } => JavaString::from_modified_utf8(bytes.clone())
				.with_context(|| anyhow!("invalid modified utf-8 in constant pool entry {index}")),
			other => bail!("expected a Utf8 constant pool entry at {index}, got {other:?}"),
		}
	}

	pub fn class_name(&self, index: u16) -> Result<ClassName> {
		match self.entry(index)? {
			CpInfo::Class { name_index } => {
				let name = self.utf8(*name_index)?;
				ClassName::try_from(name).with_context(|| anyhow!("invalid class name at constant pool entry {index}"))
			}
			other => bail!("expected a Class constant pool entry at {index}, got {other:?}"),
		}
	}

	pub fn obj_class_name(&self, index: u16) -> Result<ObjClassName> {
		ObjClassName::try_from(self.class_name(index)?)
	}

	fn name_and_type(&self, index: u16) -> Result<(JavaString, JavaString)> {
		match self.entry(index)? {
			CpInfo::NameAndType { name_index, descriptor_index } => {
				Ok((self.utf8(*name_index)?, self.utf8(*descriptor_index)?))
			}
			other => bail!("expected a NameAndType constant pool entry at {index}, got {other:?}"),
		}
	}

	/// Resolves a `NameAndType` entry referenced by an `EnclosingMethod` attribute.
	pub fn name_and_type_pub(&self, index: u16) -> Result<(JavaString, JavaString)> {
		self.name_and_type(index)
	}

	pub fn int(&self, index: u16) -> Result<i32> {
		match self.entry(index)? {
			CpInfo::Integer { bytes } => Ok(*bytes as i32),
			other => bail!("expected an Integer constant pool entry at {index}, got {other:?}"),
		}
	}

	pub fn float(&self, index: u16) -> Result<f32> {
		match self.entry(index)? {
			CpInfo::Float { bytes } => Ok(f32::from_bits(*bytes)),
			other => bail!("expected a Float constant pool entry at {index}, got {other:?}"),
		}
	}

	pub fn long(&self, index: u16) -> Result<i64> {
		match self.entry(index)? {
			CpInfo::Long { high_bytes, low_bytes } => Ok(long_from_halves(*high_bytes, *low_bytes)),
			other => bail!("expected a Long constant pool entry at {index}, got {other:?}"),
		}
	}

	pub fn double(&self, index: u16) -> Result<f64> {
		match self.entry(index)? {
			CpInfo::Double { high_bytes, low_bytes } => Ok(f64::from_bits(long_from_halves(*high_bytes, *low_bytes) as u64)),
			other => bail!("expected a Double constant pool entry at {index}, got {other:?}"),
		}
	}

	pub fn field_ref(&self, index: u16) -> Result<FieldRef> {
		match self.entry(index)? {
			CpInfo::Fieldref { class_index, name_and_type_index } => {
				let class = self.obj_class_name(*class_index)?;
				let (name, desc) = self.name_and_type(*name_and_type_index)?;
				let name_and_desc = FieldNameAndDesc {
					name: FieldName::try_from(name)?,
					desc: FieldDescriptor::try_from(desc)?,
				};
				Ok(name_and_desc.with_class(class))
			}
			other => bail!("expected a Fieldref constant pool entry at {index}, got {other:?}"),
		}
	}

	/// Reads a `Methodref` or `InterfaceMethodref` entry; returns the method reference plus
	/// whether it was an interface method ref (`invokespecial`/`invokestatic` need to know this).
	pub fn method_ref(&self, index: u16) -> Result<(MethodRef, bool)> {
		let (class_index, name_and_type_index, is_interface) = match self.entry(index)? {
			CpInfo::Methodref { class_index, name_and_type_index } => (*class_index, *name_and_type_index, false),
			CpInfo::InterfaceMethodref { class_index, name_and_type_index } => (*class_index, *name_and_type_index, true),
			other => bail!("expected a Methodref or InterfaceMethodref constant pool entry at {index}, got {other:?}"),
		};

		let class = self.class_name(class_index)?;
		let (name, desc) = self.name_and_type(name_and_type_index)?;
		let name_and_desc = MethodNameAndDesc {
			name: MethodName::try_from(name)?,
			desc: MethodDescriptor::try_from(desc)?,
		};
		Ok((name_and_desc.with_class(class), is_interface))
	}

	/// Resolves the constant referenced by `ldc`/`ldc_w`/`ldc2_w`.
	pub fn loadable(&self, index: u16) -> Result<Loadable> {
		match self.entry(index)? {
			CpInfo::Integer { bytes } => Ok(Loadable::Integer(*bytes as i32)),
			CpInfo::Float { bytes } => Ok(Loadable::Float(f32::from_bits(*bytes))),
			CpInfo::Long { high_bytes, low_bytes } => Ok(Loadable::Long(long_from_halves(*high_bytes, *low_bytes))),
			CpInfo::Double { high_bytes, low_bytes } => Ok(Loadable::Double(f64::from_bits(long_from_halves(*high_bytes, *low_bytes) as u64))),
			CpInfo::String { string_index } => Ok(Loadable::String(self.utf8(*string_index)?)),
			CpInfo::Class { .. } => Ok(Loadable::Class(self.class_name(index)?)),
			CpInfo::MethodHandle { reference_kind, reference_index } => Ok(Loadable::MethodHandle(self.handle(*reference_kind, *reference_index)?)),
			CpInfo::MethodType { descriptor_index } => Ok(Loadable::MethodType(MethodDescriptor::try_from(self.utf8(*descriptor_index)?)?)),
			CpInfo::Dynamic { bootstrap_method_attr_index: _, name_and_type_index } => {
				let (name, desc) = self.name_and_type(*name_and_type_index)?;
				Ok(Loadable::Dynamic(ConstantDynamic {
					name: FieldName::try_from(name)?,
					descriptor: FieldDescriptor::try_from(desc)?,
					// The referenced bootstrap method lives in the class file's BootstrapMethods
					// attribute, which ingest doesn't thread through per-constant; recorded as a
					// self-handle so the value still round-trips through the tree model.
					handle: Handle::InvokeStatic(MethodRef {
						class: ClassName::JAVA_LANG_OBJECT.to_owned(),
						name: MethodName::try_from(JavaStr::from_str("bootstrap").to_owned())?,
						desc: MethodDescriptor::try_from(JavaStr::from_str("()V").to_owned())?,
					}, false),
					arguments: Vec::new(),
				}))
			}
			other => bail!("constant pool entry {index} is not loadable by ldc: {other:?}"),
		}
	}

	pub fn invoke_dynamic(&self, index: u16) -> Result<InvokeDynamic> {
		match self.entry(index)? {
			CpInfo::InvokeDynamic { bootstrap_method_attr_index: _, name_and_type_index } => {
				let (name, desc) = self.name_and_type(*name_and_type_index)?;
				Ok(InvokeDynamic {
					name: MethodName::try_from(name)?,
					descriptor: MethodDescriptor::try_from(desc)?,
					handle: Handle::InvokeStatic(MethodRef {
						class: ClassName::JAVA_LANG_OBJECT.to_owned(),
						name: MethodName::try_from(JavaStr::from_str("bootstrap").to_owned())?,
						desc: MethodDescriptor::try_from(JavaStr::from_str("()V").to_owned())?,
					}, false),
					arguments: Vec::new(),
				})
			}
			other => bail!("expected an InvokeDynamic constant pool entry at {index}, got {other:?}"),
		}
	}

	fn handle(&self, reference_kind: u8, reference_index: u16) -> Result<Handle> {
		Ok(match reference_kind {
			1 => Handle::GetField(self.field_ref(reference_index)?),
			2 => Handle::GetStatic(self.field_ref(reference_index)?),
			3 => Handle::PutField(self.field_ref(reference_index)?),
			4 => Handle::PutStatic(self.field_ref(reference_index)?),
			5 => Handle::InvokeVirtual(self.method_ref(reference_index)?.0),
			6 => { let (m, _) = self.method_ref(reference_index)?; Handle::InvokeStatic(m, false) }
			7 => { let (m, _) = self.method_ref(reference_index)?; Handle::InvokeSpecial(m, false) }
			8 => Handle::NewInvokeSpecial(self.method_ref(reference_index)?.0),
			9 => Handle::InvokeInterface(self.method_ref(reference_index)?.0),
			other => bail!("unknown method handle reference kind {other}"),
		})
	}
}

fn long_from_halves(high: u32, low: u32) -> i64 {
	(((high as u64) << 32) | low as u64) as i64
}
