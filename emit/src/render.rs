//! Renders a `JavaType` to its C++ spelling and a lowered [`lower::tir`] method body to C++
//! statements. Try-regions map to native `try`/`catch` (the ABI's structured-exception variant);
//! a setjmp-based bridge is the alternative §9 names for runtimes that don't export one, selected
//! by `EmitConfig::runtime_abi` rather than by this renderer.

use duke::tree::class::ClassName;
use duke::tree::field::FieldRef;
use lower::tir::{
	BinaryOp, BranchCond, Constant, ConversionKind, InvokeKind, JavaType, LocalSlot, TIRExpression, TIRStatement,
};
use crate::mangle::{mangle_class, mangle_field, mangle_method, mangle_slot};

fn render_field(field: &FieldRef) -> String {
	let owner: ClassName = field.class.clone().into();
	mangle_field(&owner, &field.name, &field.desc.to_string())
}

pub fn java_type_name(ty: &JavaType) -> String {
	match ty {
		JavaType::Void => "void".to_string(),
		JavaType::Boolean => "jbool".to_string(),
		JavaType::Byte => "jbyte".to_string(),
		JavaType::Char => "jchar".to_string(),
		JavaType::Short => "jshort".to_string(),
		JavaType::Int => "jint".to_string(),
		JavaType::Long => "jlong".to_string(),
		JavaType::Float => "jfloat".to_string(),
		JavaType::Double => "jdouble".to_string(),
		JavaType::Object(class) => format!("{}*", mangle_class(class)),
		JavaType::Array(rank, _) => format!("jarray<{}>*", rank),
	}
}

fn local_name(slot: &LocalSlot) -> String {
	format!("l{}", slot.index)
}

fn label_name(label: duke::tree::method::code::Label) -> String {
	format!("L{}", label.id())
}

pub fn render_expr(expr: &TIRExpression, assertions: bool) -> String {
	match expr {
		TIRExpression::LocalRead(slot) => local_name(slot),
		TIRExpression::Constant(c) => render_constant(c),
		TIRExpression::Unary(_, inner) => format!("(-{})", render_expr(inner, assertions)),
		TIRExpression::Binary(op, left, right) => format!("({} {} {})", render_expr(left, assertions), binary_op_symbol(*op), render_expr(right, assertions)),
		TIRExpression::Convert(kind, inner) => format!("(({}){})", conversion_target(*kind), render_expr(inner, assertions)),
		TIRExpression::FieldLoad { receiver, field } => match receiver {
			Some(r) => format!("{}->{}", render_expr(r, assertions), render_field(field)),
			None => format!("({}_ensure_init(), {})", mangle_class(&field.class), render_field(field)),
		},
		TIRExpression::ArrayLoad { array, index, .. } => format!("{}->at({})", render_expr(array, assertions), render_expr(index, assertions)),
		TIRExpression::ArrayLength(array) => format!("{}->length", render_expr(array, assertions)),
		TIRExpression::InstanceOf { operand, check } => format!("jruntime::instance_of({}, {})", render_expr(operand, assertions), mangle_class(check)),
		TIRExpression::CheckCast { operand, target } => {
			let helper = if assertions { "check_cast" } else { "check_cast_unchecked" };
			format!("jruntime::{helper}<{}>({})", mangle_class(target), render_expr(operand, assertions))
		}
		TIRExpression::NewObject(class) => format!("({}_ensure_init(), jruntime::new_object<{}>())", mangle_class(class), mangle_class(class)),
		TIRExpression::NewArray { dimensions, .. } => format!("jruntime::new_array({})", dimensions.iter().map(|e| render_expr(e, assertions)).collect::<Vec<_>>().join(", ")),
		TIRExpression::Invoke { kind, method, receiver, args } => render_invoke(*kind, method, receiver.as_deref(), args, assertions),
		TIRExpression::ThisRef => "this".to_string(),
	}
}

fn render_invoke(kind: InvokeKind, method: &duke::tree::method::MethodRef, receiver: Option<&TIRExpression>, args: &[TIRExpression], assertions: bool) -> String {
	let sig = duke::tree::method::MethodNameAndDesc { name: method.name.clone(), desc: method.desc.clone() };
	let args_rendered: Vec<String> = args.iter().map(|e| render_expr(e, assertions)).collect();
	match kind {
		InvokeKind::Static => format!("{}({})", mangle_method(&method.class, &sig), args_rendered.join(", ")),
		InvokeKind::Special => {
			let receiver = receiver.map(|e| render_expr(e, assertions)).unwrap_or_default();
			let mut all = vec![receiver];
			all.extend(args_rendered);
			format!("{}({})", mangle_method(&method.class, &sig), all.join(", "))
		}
		// Virtual/interface dispatch spells the receiver twice: once to find the slot, once as the
		// call's `self` argument. Lower's `Simulation::invoke` already hoisted any receiver with a
		// side effect into a local before it reaches here, so re-rendering it twice only repeats a
		// plain local read, never the side effect itself.
		InvokeKind::Virtual => {
			let receiver = receiver.map(|e| render_expr(e, assertions)).unwrap_or_default();
			format!("{}->vtable->{}({}{}{})", receiver, mangle_slot(&sig), receiver, if args.is_empty() { "" } else { ", " }, args_rendered.join(", "))
		}
		InvokeKind::Interface => {
			let receiver = receiver.map(|e| render_expr(e, assertions)).unwrap_or_default();
			format!("jruntime::interface_dispatch({}, {}, {})({}{}{})", receiver, mangle_class(&method.class), mangle_slot(&sig), receiver, if args.is_empty() { "" } else { ", " }, args_rendered.join(", "))
		}
	}
}

fn render_constant(c: &Constant) -> String {
	match c {
		Constant::Int(v) => v.to_string(),
		Constant::Long(v) => format!("{v}LL"),
		Constant::Float(v) => format!("{v}f"),
		Constant::Double(v) => v.to_string(),
		Constant::String(s) => format!("jruntime::intern_string(u8{:?})", s.to_string()),
		Constant::Class(c) => format!("jruntime::class_literal<{}>()", mangle_class(c)),
		Constant::Null => "nullptr".to_string(),
	}
}

fn binary_op_symbol(op: BinaryOp) -> &'static str {
	match op {
		BinaryOp::Add => "+",
		BinaryOp::Sub => "-",
		BinaryOp::Mul => "*",
		BinaryOp::Div => "/",
		BinaryOp::Rem => "%",
		BinaryOp::Shl => "<<",
		BinaryOp::Shr => ">>",
		BinaryOp::UShr => ">>>",
		BinaryOp::And => "&",
		BinaryOp::Or => "|",
		BinaryOp::Xor => "^",
		BinaryOp::LCmp | BinaryOp::FCmpL | BinaryOp::FCmpG | BinaryOp::DCmpL | BinaryOp::DCmpG => "<=>",
	}
}

fn conversion_target(kind: ConversionKind) -> &'static str {
	use ConversionKind::*;
	match kind {
		I2L | F2L | D2L => "jlong",
		I2F | L2F | D2F => "jfloat",
		I2D | L2D | F2D => "jdouble",
		L2I | F2I | D2I => "jint",
		I2B => "jbyte",
		I2C => "jchar",
		I2S => "jshort",
	}
}

fn branch_symbol(cond: BranchCond) -> &'static str {
	match cond {
		BranchCond::Eq => "==",
		BranchCond::Ne => "!=",
		BranchCond::Lt => "<",
		BranchCond::Ge => ">=",
		BranchCond::Gt => ">",
		BranchCond::Le => "<=",
		BranchCond::Null => "==",
		BranchCond::NonNull => "!=",
	}
}

pub fn render_statement(out: &mut String, indent: &str, statement: &TIRStatement, assertions: bool) {
	match statement {
		TIRStatement::Assign { local, value } => out.push_str(&format!("{indent}{} {} = {};\n", java_type_name(&local.ty), local_name(local), render_expr(value, assertions))),
		TIRStatement::FieldStore { receiver, field, value } => match receiver {
			Some(r) => out.push_str(&format!("{indent}{}->{} = {};\n", render_expr(r, assertions), render_field(field), render_expr(value, assertions))),
			None => out.push_str(&format!("{indent}{}_ensure_init();\n{indent}{} = {};\n", mangle_class(&field.class), render_field(field), render_expr(value, assertions))),
		},
		TIRStatement::ArrayStore { array, index, value, .. } => out.push_str(&format!("{indent}{}->at({}) = {};\n", render_expr(array, assertions), render_expr(index, assertions), render_expr(value, assertions))),
		TIRStatement::MonitorEnter(e) => out.push_str(&format!("{indent}jruntime::monitor_enter({});\n", render_expr(e, assertions))),
		TIRStatement::MonitorExit(e) => out.push_str(&format!("{indent}jruntime::monitor_exit({});\n", render_expr(e, assertions))),
		TIRStatement::BranchIf { cond, left, right, target } => {
			let rhs = right.as_ref().map(|e| render_expr(e, assertions)).unwrap_or_else(|| "nullptr".to_string());
			out.push_str(&format!("{indent}if ({} {} {}) goto {};\n", render_expr(left, assertions), branch_symbol(*cond), rhs, label_name(*target)));
		}
		TIRStatement::Goto(target) => out.push_str(&format!("{indent}goto {};\n", label_name(*target))),
		TIRStatement::TableSwitch { value, low, default, targets } => {
			out.push_str(&format!("{indent}switch ({}) {{\n", render_expr(value, assertions)));
			for (offset, target) in targets.iter().enumerate() {
				out.push_str(&format!("{indent}\tcase {}: goto {};\n", *low as i64 + offset as i64, label_name(*target)));
			}
			out.push_str(&format!("{indent}\tdefault: goto {};\n", label_name(*default)));
			out.push_str(&format!("{indent}}}\n"));
		}
		TIRStatement::LookupSwitch { value, default, pairs } => {
			out.push_str(&format!("{indent}switch ({}) {{\n", render_expr(value, assertions)));
			for (key, target) in pairs {
				out.push_str(&format!("{indent}\tcase {key}: goto {};\n", label_name(*target)));
			}
			out.push_str(&format!("{indent}\tdefault: goto {};\n", label_name(*default)));
			out.push_str(&format!("{indent}}}\n"));
		}
		TIRStatement::InvokeStatement(e) => out.push_str(&format!("{indent}{};\n", render_expr(e, assertions))),
		TIRStatement::Throw(e) => out.push_str(&format!("{indent}jruntime::throw_exception({});\n", render_expr(e, assertions))),
		TIRStatement::Return(Some(e)) => out.push_str(&format!("{indent}return {};\n", render_expr(e, assertions))),
		TIRStatement::Return(None) => out.push_str(&format!("{indent}return;\n")),
		TIRStatement::Label(label) => out.push_str(&format!("{}:\n", label_name(*label))),
		TIRStatement::TryBegin { region } => out.push_str(&format!("{indent}// try-region {region} begin\n")),
		TIRStatement::TryEnd { region } => out.push_str(&format!("{indent}// try-region {region} end\n")),
		TIRStatement::CatchBegin { region, caught_type, local } => {
			let ty = caught_type.as_ref().map(mangle_class).unwrap_or_else(|| "jthrowable".to_string());
			out.push_str(&format!("{indent}// catch-region {region}\n{indent}{}* {} = jruntime::current_exception<{}>();\n", ty, local_name(local), ty));
		}
	}
}
