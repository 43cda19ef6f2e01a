//! Turns a fully-parsed `raw_class_file::ClassFile` (still indexing everything through its
//! constant pool) into a `duke::tree::class::ClassFile` (everything resolved and owned).

use anyhow::{Context, Result};
use java_string::JavaString;
use duke::tree::annotation::{Annotation, ElementValue, ElementValuePair, Object};
use duke::tree::class::{ClassAccess, ClassFile, ClassName, ClassSignature, EnclosingMethod, InnerClass, InnerClassFlags};
use duke::tree::descriptor::ReturnDescriptor;
use duke::tree::field::{ConstantValue, Field, FieldAccess, FieldDescriptor, FieldSignature};
use duke::tree::method::{Method, MethodAccess, MethodDescriptor, MethodSignature};
use duke::tree::version::Version;
use raw_class_file as raw;
use crate::decode::decode_code;
use crate::pool::ConstantPool;

pub fn convert_class(raw: raw::ClassFile) -> Result<ClassFile> {
	let pool = ConstantPool::new(&raw.constant_pool);

	let name = pool.class_name(raw.this_class).context("class name")?;
	let super_class = if raw.super_class == 0 { None } else { Some(pool.class_name(raw.super_class)?) };
	let interfaces = raw.interfaces.iter().map(|&i| pool.class_name(i)).collect::<Result<_>>()?;

	let mut class = ClassFile::new(
		Version::new(raw.major_version, raw.minor_version),
		ClassAccess::from(raw.access_flags),
		name,
		super_class,
		interfaces,
	);

	class.fields = raw.fields.into_iter().map(|f| convert_field(f, &pool)).collect::<Result<_>>()?;
	class.methods = raw.methods.into_iter().map(|m| convert_method(m, &pool)).collect::<Result<_>>()?;

	for attribute in raw.attributes {
		apply_class_attribute(&mut class, attribute, &pool)?;
	}

	Ok(class)
}

fn apply_class_attribute(class: &mut ClassFile, attribute: raw::AttributeInfo, pool: &ConstantPool) -> Result<()> {
	match attribute {
		raw::AttributeInfo::Deprecated {} => class.has_deprecated_attribute = true,
		raw::AttributeInfo::Synthetic {} => class.has_synthetic_attribute = true,
		raw::AttributeInfo::Signature { signature_index } => {
			class.signature = Some(ClassSignature::try_from(pool.utf8(signature_index)?)?);
		}
		raw::AttributeInfo::SourceFile { sourcefile_index } => {
			class.source_file = Some(pool.utf8(sourcefile_index)?);
		}
		raw::AttributeInfo::SourceDebugExtension { debug_extension } => {
			class.source_debug_extension = Some(JavaString::from_modified_utf8(debug_extension)?);
		}
		raw::AttributeInfo::RuntimeVisibleAnnotations { annotations } => {
			class.runtime_visible_annotations = annotations.into_iter().map(|a| convert_annotation(a, pool)).collect::<Result<_>>()?;
		}
		raw::AttributeInfo::RuntimeInvisibleAnnotations { annotations } => {
			class.runtime_invisible_annotations = annotations.into_iter().map(|a| convert_annotation(a, pool)).collect::<Result<_>>()?;
		}
		raw::AttributeInfo::InnerClasses { classes, .. } => {
			let mut inner_classes = Vec::with_capacity(classes.len());
			for entry in classes {
				inner_classes.push(InnerClass {
					inner_class: pool.class_name(entry.inner_class_info_index)?,
					outer_class: if entry.outer_class_info_index == 0 { None } else { Some(pool.class_name(entry.outer_class_info_index)?) },
					inner_name: if entry.inner_name_index == 0 { None } else { Some(pool.utf8(entry.inner_name_index)?) },
					flags: InnerClassFlags::from(entry.inner_class_access_flags),
				});
			}
			class.inner_classes = Some(inner_classes);
		}
		raw::AttributeInfo::EnclosingMethod { class_index, method_index } => {
			let enclosing_class = pool.class_name(class_index)?;
			let method = if method_index == 0 {
				None
			} else {
				let (name, desc) = pool.name_and_type_pub(method_index)?;
				Some(duke::tree::method::MethodNameAndDesc {
					name: duke::tree::method::MethodName::try_from(name)?,
					desc: MethodDescriptor::try_from(desc)?,
				})
			};
			class.enclosing_method = Some(EnclosingMethod { class: enclosing_class, method });
		}
		raw::AttributeInfo::NestHost { host_class_index } => {
			class.nest_host_class = Some(pool.class_name(host_class_index)?);
		}
		raw::AttributeInfo::NestMembers { classes } => {
			class.nest_members = Some(classes.into_iter().map(|i| pool.class_name(i)).collect::<Result<_>>()?);
		}
		raw::AttributeInfo::PermittedSubclasses { classes } => {
			class.permitted_subclasses = Some(classes.into_iter().map(|i| pool.class_name(i)).collect::<Result<_>>()?);
		}
		// Module and Record are rare on the class files this pipeline actually translates
		// (application and library classes, not the module-info/record synthesized ones); left
		// unpopulated rather than half-converted.
		raw::AttributeInfo::Module { .. } | raw::AttributeInfo::ModulePackages { .. }
			| raw::AttributeInfo::ModuleMainClass { .. } | raw::AttributeInfo::Record { .. } => {}
		_ => {}
	}
	Ok(())
}

fn convert_field(raw: raw::FieldInfo, pool: &ConstantPool) -> Result<Field> {
	let name = duke::tree::field::FieldName::try_from(pool.utf8(raw.name_index)?)?;
	let descriptor = FieldDescriptor::try_from(pool.utf8(raw.descriptor_index)?)?;
	let mut field = Field::new(FieldAccess::from(raw.access_flags), name, descriptor);

	for attribute in raw.attributes {
		match attribute {
			raw::AttributeInfo::Deprecated {} => field.has_deprecated_attribute = true,
			raw::AttributeInfo::Synthetic {} => field.has_synthetic_attribute = true,
			raw::AttributeInfo::Signature { signature_index } => {
				field.signature = Some(FieldSignature::try_from(pool.utf8(signature_index)?)?);
			}
			raw::AttributeInfo::ConstantValue { constantvalue_index } => {
				field.constant_value = Some(convert_constant_value(pool, constantvalue_index)?);
			}
			raw::AttributeInfo::RuntimeVisibleAnnotations { annotations } => {
				field.runtime_visible_annotations = annotations.into_iter().map(|a| convert_annotation(a, pool)).collect::<Result<_>>()?;
			}
			raw::AttributeInfo::RuntimeInvisibleAnnotations { annotations } => {
				field.runtime_invisible_annotations = annotations.into_iter().map(|a| convert_annotation(a, pool)).collect::<Result<_>>()?;
			}
			_ => {}
		}
	}

	Ok(field)
}

fn convert_method(raw: raw::MethodInfo, pool: &ConstantPool) -> Result<Method> {
	let name = duke::tree::method::MethodName::try_from(pool.utf8(raw.name_index)?)?;
	let descriptor = MethodDescriptor::try_from(pool.utf8(raw.descriptor_index)?)?;
	let mut method = Method::new(MethodAccess::from(raw.access_flags), name, descriptor);

	for attribute in raw.attributes {
		match attribute {
			raw::AttributeInfo::Deprecated {} => method.has_deprecated_attribute = true,
			raw::AttributeInfo::Synthetic {} => method.has_synthetic_attribute = true,
			raw::AttributeInfo::Signature { signature_index } => {
				method.signature = Some(MethodSignature::try_from(pool.utf8(signature_index)?)?);
			}
			raw::AttributeInfo::Exceptions { exception_index_table } => {
				method.exceptions = Some(exception_index_table.into_iter().map(|i| pool.class_name(i)).collect::<Result<_>>()?);
			}
			raw::AttributeInfo::Code { max_stack, max_locals, code, exception_table, .. } => {
				method.code = Some(decode_code(&code, &exception_table, max_stack, max_locals, pool)?);
			}
			raw::AttributeInfo::RuntimeVisibleAnnotations { annotations } => {
				method.runtime_visible_annotations = annotations.into_iter().map(|a| convert_annotation(a, pool)).collect::<Result<_>>()?;
			}
			raw::AttributeInfo::RuntimeInvisibleAnnotations { annotations } => {
				method.runtime_invisible_annotations = annotations.into_iter().map(|a| convert_annotation(a, pool)).collect::<Result<_>>()?;
			}
			raw::AttributeInfo::AnnotationDefault { default_value } => {
				method.annotation_default = Some(convert_element_value(default_value, pool)?);
			}
			_ => {}
		}
	}

	Ok(method)
}

fn convert_constant_value(pool: &ConstantPool, index: u16) -> Result<ConstantValue> {
	use duke::tree::method::code::Loadable;
	Ok(match pool.loadable(index)? {
		Loadable::Integer(v) => ConstantValue::Integer(v),
		Loadable::Float(v) => ConstantValue::Float(v),
		Loadable::Long(v) => ConstantValue::Long(v),
		Loadable::Double(v) => ConstantValue::Double(v),
		Loadable::String(v) => ConstantValue::String(v),
		other => anyhow::bail!("constant value at pool entry {index} is not a primitive or string constant: {other:?}"),
	})
}

fn convert_annotation(raw: raw::Annotation, pool: &ConstantPool) -> Result<Annotation> {
	let annotation_type = FieldDescriptor::try_from(pool.utf8(raw.type_index)?)?;
	let mut annotation = Annotation::new(annotation_type);
	for pair in raw.element_value_pairs {
		annotation.element_value_pairs.push(ElementValuePair {
			name: pool.utf8(pair.element_name_index)?.to_string(),
			value: convert_element_value(pair.value, pool)?,
		});
	}
	Ok(annotation)
}

fn convert_element_value(raw: raw::ElementValue, pool: &ConstantPool) -> Result<ElementValue> {
	Ok(match raw {
		raw::ElementValue::Byte { const_value_index } => ElementValue::Object(Object::Byte(pool.int(const_value_index)? as i8)),
		raw::ElementValue::Char { const_value_index } => ElementValue::Object(Object::Char(pool.int(const_value_index)? as u16)),
		raw::ElementValue::Double { const_value_index } => ElementValue::Object(Object::Double(pool.double(const_value_index)?)),
		raw::ElementValue::Float { const_value_index } => ElementValue::Object(Object::Float(pool.float(const_value_index)?)),
		raw::ElementValue::Integer { const_value_index } => ElementValue::Object(Object::Integer(pool.int(const_value_index)?)),
		raw::ElementValue::Long { const_value_index } => ElementValue::Object(Object::Long(pool.long(const_value_index)?)),
		raw::ElementValue::Short { const_value_index } => ElementValue::Object(Object::Short(pool.int(const_value_index)? as i16)),
		raw::ElementValue::Boolean { const_value_index } => ElementValue::Object(Object::Boolean(pool.int(const_value_index)? != 0)),
		raw::ElementValue::String { const_value_index } => ElementValue::Object(Object::String(pool.utf8(const_value_index)?.to_string())),
		raw::ElementValue::Enum { type_name_index, const_name_index } => ElementValue::Enum {
			type_name: FieldDescriptor::try_from(pool.utf8(type_name_index)?)?,
			const_name: pool.utf8(const_name_index)?.to_string(),
		},
		raw::ElementValue::Class { class_info_index } => ElementValue::Class(ReturnDescriptor::try_from(pool.utf8(class_info_index)?)?),
		raw::ElementValue::Annotation { annotation_value } => ElementValue::AnnotationInterface(convert_annotation(annotation_value, pool)?),
		raw::ElementValue::Array { values } => ElementValue::ArrayType(values.into_iter().map(|v| convert_element_value(v, pool)).collect::<Result<_>>()?),
	})
}
