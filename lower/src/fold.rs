//! Constant folding and dead-assignment cleanup (§4.3's "constant folding and cleanup" step),
//! run once over a freshly-simulated [`TIRBody`] before it's handed to Emit.

use std::collections::HashSet;
use crate::tir::{BinaryOp, Constant, TIRExpression, TIRStatement};

pub fn clean_up(body: &mut crate::tir::TIRBody, elide_dead: bool) {
	for statement in &mut body.statements {
		fold_statement(statement);
	}
	if elide_dead {
		elide_dead_assignments(body);
	}
}

fn fold_statement(statement: &mut TIRStatement) {
	match statement {
		TIRStatement::Assign { value, .. } => fold_expr(value),
		TIRStatement::FieldStore { value, receiver, .. } => {
			fold_expr(value);
			if let Some(receiver) = receiver {
				fold_expr(receiver);
			}
		}
		TIRStatement::ArrayStore { array, index, value, .. } => {
			fold_expr(array);
			fold_expr(index);
			fold_expr(value);
		}
		TIRStatement::MonitorEnter(e) | TIRStatement::MonitorExit(e) => fold_expr(e),
		TIRStatement::BranchIf { left, right, .. } => {
			fold_expr(left);
			if let Some(right) = right {
				fold_expr(right);
			}
		}
		TIRStatement::TableSwitch { value, .. } | TIRStatement::LookupSwitch { value, .. } => fold_expr(value),
		TIRStatement::InvokeStatement(e) | TIRStatement::Throw(e) => fold_expr(e),
		TIRStatement::Return(Some(e)) => fold_expr(e),
		_ => {}
	}
}

fn fold_expr(expr: &mut TIRExpression) {
	if let TIRExpression::Binary(op, left, right) = expr {
		fold_expr(left);
		fold_expr(right);
		if let Some(folded) = fold_binary(*op, left, right) {
			*expr = TIRExpression::Constant(folded);
		}
	} else if let TIRExpression::Unary(_, inner) = expr {
		fold_expr(inner);
		if let TIRExpression::Constant(c) = inner.as_ref() {
			if let Some(folded) = negate(c) {
				*expr = TIRExpression::Constant(folded);
			}
		}
	} else if let TIRExpression::Convert(_, inner) = expr {
		fold_expr(inner);
	}
}

fn negate(c: &Constant) -> Option<Constant> {
	Some(match c {
		Constant::Int(v) => Constant::Int(v.wrapping_neg()),
		Constant::Long(v) => Constant::Long(v.wrapping_neg()),
		Constant::Float(v) => Constant::Float(-v),
		Constant::Double(v) => Constant::Double(-v),
		_ => return None,
	})
}

fn fold_binary(op: BinaryOp, left: &TIRExpression, right: &TIRExpression) -> Option<Constant> {
	let (TIRExpression::Constant(left), TIRExpression::Constant(right)) = (left, right) else { return None };
	match (left, right) {
		(Constant::Int(a), Constant::Int(b)) => fold_int(op, *a, *b),
		(Constant::Long(a), Constant::Long(b)) => fold_long(op, *a, *b),
		(Constant::Float(a), Constant::Float(b)) => fold_float(op, *a, *b),
		(Constant::Double(a), Constant::Double(b)) => fold_double(op, *a, *b),
		_ => None,
	}
}

fn fold_int(op: BinaryOp, a: i32, b: i32) -> Option<Constant> {
	Some(Constant::Int(match op {
		BinaryOp::Add => a.wrapping_add(b),
		BinaryOp::Sub => a.wrapping_sub(b),
		BinaryOp::Mul => a.wrapping_mul(b),
		BinaryOp::Div if b != 0 => a.wrapping_div(b),
		BinaryOp::Rem if b != 0 => a.wrapping_rem(b),
		BinaryOp::And => a & b,
		BinaryOp::Or => a | b,
		BinaryOp::Xor => a ^ b,
		BinaryOp::Shl => a.wrapping_shl(b as u32),
		BinaryOp::Shr => a.wrapping_shr(b as u32),
		BinaryOp::UShr => ((a as u32).wrapping_shr(b as u32)) as i32,
		_ => return None,
	}))
}

fn fold_long(op: BinaryOp, a: i64, b: i64) -> Option<Constant> {
	Some(Constant::Long(match op {
		BinaryOp::Add => a.wrapping_add(b),
		BinaryOp::Sub => a.wrapping_sub(b),
		BinaryOp::Mul => a.wrapping_mul(b),
		BinaryOp::Div if b != 0 => a.wrapping_div(b),
		BinaryOp::Rem if b != 0 => a.wrapping_rem(b),
		BinaryOp::And => a & b,
		BinaryOp::Or => a | b,
		BinaryOp::Xor => a ^ b,
		BinaryOp::Shl => a.wrapping_shl(b as u32),
		BinaryOp::Shr => a.wrapping_shr(b as u32),
		BinaryOp::UShr => ((a as u64).wrapping_shr(b as u32)) as i64,
		_ => return None,
	}))
}

fn fold_float(op: BinaryOp, a: f32, b: f32) -> Option<Constant> {
	Some(Constant::Float(match op {
		BinaryOp::Add => a + b,
		BinaryOp::Sub => a - b,
		BinaryOp::Mul => a * b,
		BinaryOp::Div => a / b,
		BinaryOp::Rem => a % b,
		_ => return None,
	}))
}

fn fold_double(op: BinaryOp, a: f64, b: f64) -> Option<Constant> {
	Some(Constant::Double(match op {
		BinaryOp::Add => a + b,
		BinaryOp::Sub => a - b,
		BinaryOp::Mul => a * b,
		BinaryOp::Div => a / b,
		BinaryOp::Rem => a % b,
		_ => return None,
	}))
}

/// Drops `local := expr` statements whose local is never read and whose RHS has no side effect.
/// Side-effecting expressions (invocations) are never folded away even when unread, since an
/// invocation expression is always wrapped in its own `Assign` by the simulation specifically so
/// it keeps running even when the caller discards the result.
fn elide_dead_assignments(body: &mut crate::tir::TIRBody) {
	let mut read: HashSet<u16> = HashSet::new();
	for statement in &body.statements {
		collect_reads(statement, &mut read);
	}

	body.statements.retain(|statement| match statement {
		TIRStatement::Assign { local, value } if !read.contains(&local.index) && is_pure(value) => false,
		_ => true,
	});
}

fn is_pure(expr: &TIRExpression) -> bool {
	!matches!(expr, TIRExpression::Invoke { .. } | TIRExpression::NewObject(_) | TIRExpression::NewArray { .. }
		| TIRExpression::CheckCast { .. } | TIRExpression::ArrayLoad { .. } | TIRExpression::FieldLoad { .. })
}

fn collect_reads(statement: &TIRStatement, read: &mut HashSet<u16>) {
	match statement {
		TIRStatement::Assign { value, .. } => collect_expr_reads(value, read),
		TIRStatement::FieldStore { value, receiver, .. } => {
			collect_expr_reads(value, read);
			if let Some(r) = receiver {
				collect_expr_reads(r, read);
			}
		}
		TIRStatement::ArrayStore { array, index, value, .. } => {
			collect_expr_reads(array, read);
			collect_expr_reads(index, read);
			collect_expr_reads(value, read);
		}
		TIRStatement::MonitorEnter(e) | TIRStatement::MonitorExit(e) => collect_expr_reads(e, read),
		TIRStatement::BranchIf { left, right, .. } => {
			collect_expr_reads(left, read);
			if let Some(r) = right {
				collect_expr_reads(r, read);
			}
		}
		TIRStatement::TableSwitch { value, .. } | TIRStatement::LookupSwitch { value, .. } => collect_expr_reads(value, read),
		TIRStatement::InvokeStatement(e) | TIRStatement::Throw(e) => collect_expr_reads(e, read),
		TIRStatement::Return(Some(e)) => collect_expr_reads(e, read),
		_ => {}
	}
}

fn collect_expr_reads(expr: &TIRExpression, read: &mut HashSet<u16>) {
	match expr {
		TIRExpression::LocalRead(slot) => { read.insert(slot.index); }
		TIRExpression::Unary(_, e) | TIRExpression::Convert(_, e) | TIRExpression::ArrayLength(e)
			| TIRExpression::InstanceOf { operand: e, .. } | TIRExpression::CheckCast { operand: e, .. } => collect_expr_reads(e, read),
		TIRExpression::Binary(_, l, r) => {
			collect_expr_reads(l, read);
			collect_expr_reads(r, read);
		}
		TIRExpression::FieldLoad { receiver, .. } => {
			if let Some(r) = receiver {
				collect_expr_reads(r, read);
			}
		}
		TIRExpression::ArrayLoad { array, index, .. } => {
			collect_expr_reads(array, read);
			collect_expr_reads(index, read);
		}
		TIRExpression::NewArray { dimensions, .. } => {
			for d in dimensions {
				collect_expr_reads(d, read);
			}
		}
		TIRExpression::Invoke { receiver, args, .. } => {
			if let Some(r) = receiver {
				collect_expr_reads(r, read);
			}
			for a in args {
				collect_expr_reads(a, read);
			}
		}
		TIRExpression::Constant(_) | TIRExpression::NewObject(_) | TIRExpression::ThisRef => {}
	}
}
