//! Structural type inference over already-built [`TIRExpression`] trees: every expression carries
//! enough information (field/method descriptors, constant kinds, declared element types) to derive
//! its own `JavaType` without a separate type-checking pass.

use anyhow::Result;
use duke::tree::descriptor::ArrayType;
use crate::tir::{BinaryOp, Constant, ConversionKind, JavaType, TIRExpression};

pub fn expr_type(expr: &TIRExpression, owner: &duke::tree::class::ClassName) -> Result<JavaType> {
	Ok(match expr {
		TIRExpression::LocalRead(slot) => slot.ty.clone(),
		TIRExpression::Constant(c) => constant_type(c),
		TIRExpression::Unary(_, inner) => expr_type(inner, owner)?,
		TIRExpression::Binary(op, left, _) => match op {
			BinaryOp::LCmp | BinaryOp::FCmpL | BinaryOp::FCmpG | BinaryOp::DCmpL | BinaryOp::DCmpG => JavaType::Int,
			_ => expr_type(left, owner)?,
		},
		TIRExpression::Convert(kind, _) => conversion_result_type(*kind),
		TIRExpression::FieldLoad { field, .. } => field.desc.parse()?.0.into(),
		TIRExpression::ArrayLoad { element_type, .. } => element_type.clone(),
		TIRExpression::ArrayLength(_) => JavaType::Int,
		TIRExpression::InstanceOf { .. } => JavaType::Int,
		TIRExpression::CheckCast { target, .. } => JavaType::Object(target.clone()),
		TIRExpression::NewObject(class) => JavaType::Object(class.clone()),
		TIRExpression::NewArray { element_type, rank, .. } => JavaType::Array(*rank, to_array_type(element_type)),
		TIRExpression::Invoke { method, .. } => method.desc.parse()?.return_descriptor.into(),
		TIRExpression::ThisRef => JavaType::Object(owner.clone()),
	})
}

fn constant_type(c: &Constant) -> JavaType {
	match c {
		Constant::Int(_) => JavaType::Int,
		Constant::Long(_) => JavaType::Long,
		Constant::Float(_) => JavaType::Float,
		Constant::Double(_) => JavaType::Double,
		Constant::String(_) => JavaType::Object(well_known_class("java/lang/String")),
		Constant::Class(_) => JavaType::Object(well_known_class("java/lang/Class")),
		Constant::Null => JavaType::Object(well_known_class("java/lang/Object")),
	}
}

fn conversion_result_type(kind: ConversionKind) -> JavaType {
	use ConversionKind::*;
	match kind {
		I2L | F2L | D2L => JavaType::Long,
		I2F | L2F | D2F => JavaType::Float,
		I2D | L2D | F2D => JavaType::Double,
		L2I | F2I | D2I | I2B | I2C | I2S => JavaType::Int,
	}
}

pub fn well_known_class(name: &str) -> duke::tree::class::ClassName {
	duke::tree::class::ClassName::try_from(java_string::JavaStr::from_str(name).to_owned())
		.expect("well-known class name is valid")
}

pub fn to_array_type(element: &JavaType) -> ArrayType {
	match element {
		JavaType::Boolean => ArrayType::Z,
		JavaType::Byte => ArrayType::B,
		JavaType::Char => ArrayType::C,
		JavaType::Short => ArrayType::S,
		JavaType::Int => ArrayType::I,
		JavaType::Long => ArrayType::J,
		JavaType::Float => ArrayType::F,
		JavaType::Double => ArrayType::D,
		JavaType::Object(class) => ArrayType::Object(class.clone()),
		JavaType::Array(_, inner) => inner.clone(),
		JavaType::Void => ArrayType::Object(well_known_class("java/lang/Object")),
	}
}
