//! The symbolic operand-stack simulation itself (§4.3's "hard part"): walks a method's
//! instructions in program order, maintaining a stack of [`TIRExpression`]s, and emits a
//! [`TIRStatement`] for everything that isn't a pure value-producing expression.

use std::collections::HashMap;
use anyhow::{anyhow, bail, Result};
use duke::tree::class::ClassName;
use duke::tree::method::code::{Code, Instruction, Label, Loadable};
use duke::tree::method::Method;

use crate::depth::compute_join_depths;
use crate::tir::{
	BinaryOp, BranchCond, Constant, ConversionKind, HandlerRegion, InvokeKind, JavaType, LocalSlot,
	TIRBody, TIRExpression, TIRStatement,
};
use crate::typing::{expr_type, well_known_class};

pub fn lower_method_body(owner: &ClassName, method: &Method, code: &Code) -> Result<TIRBody> {
	let max_locals = code.max_locals.unwrap_or(0);

	let invoke_effect = |instruction: &Instruction| -> Option<(usize, usize)> {
		match instruction {
			Instruction::InvokeVirtual(m) | Instruction::InvokeInterface(m) => {
				Some(invoke_arity(m.desc.parse().ok()?, true))
			}
			Instruction::InvokeSpecial(m, _) => Some(invoke_arity(m.desc.parse().ok()?, true)),
			Instruction::InvokeStatic(m, _) => Some(invoke_arity(m.desc.parse().ok()?, false)),
			Instruction::InvokeDynamic(d) => Some(invoke_arity_dynamic(d)),
			_ => None,
		}
	};
	let join_depths = compute_join_depths(code, invoke_effect)?;

	let mut sim = Simulation {
		owner,
		method,
		join_depths,
		stack: Vec::new(),
		statements: Vec::new(),
		locals: Vec::new(),
		synthetic_slots: HashMap::new(),
		synthetic_types: HashMap::new(),
		next_synthetic: max_locals,
		region_start: HashMap::new(),
		region_end: HashMap::new(),
		region_handler: HashMap::new(),
	};

	for (region, exception) in code.exception_table.iter().enumerate() {
		sim.region_start.entry(exception.start).or_default().push(region);
		sim.region_end.entry(exception.end).or_default().push(region);
		sim.region_handler.entry(exception.handler).or_default().push(region);
	}

	sim.run(code)?;

	Ok(TIRBody {
		statements: sim.statements,
		locals: sim.locals,
		handler_regions: code.exception_table.iter().map(|e| HandlerRegion {
			start: e.start,
			end: e.end,
			handler: e.handler,
			caught_type: e.catch.clone(),
		}).collect(),
	})
}

fn invoke_arity(descriptor: duke::tree::descriptor::ParsedMethodDescriptor, has_receiver: bool) -> (usize, usize) {
	let pops = descriptor.parameter_descriptors.len() + if has_receiver { 1 } else { 0 };
	let pushes = if descriptor.return_descriptor.is_some() { 1 } else { 0 };
	(pops, pushes)
}

fn invoke_arity_dynamic(dynamic: &duke::tree::method::code::InvokeDynamic) -> (usize, usize) {
	let descriptor = dynamic.descriptor.parse();
	match descriptor {
		Ok(d) => (d.parameter_descriptors.len(), if d.return_descriptor.is_some() { 1 } else { 0 }),
		Err(_) => (0, 0),
	}
}

struct Simulation<'a> {
	owner: &'a ClassName,
	method: &'a Method,
	join_depths: HashMap<Label, usize>,

	stack: Vec<TIRExpression>,
	statements: Vec<TIRStatement>,
	locals: Vec<LocalSlot>,

	synthetic_slots: HashMap<Label, Vec<u16>>,
	synthetic_types: HashMap<Label, Vec<JavaType>>,
	next_synthetic: u16,

	region_start: HashMap<Label, Vec<usize>>,
	region_end: HashMap<Label, Vec<usize>>,
	region_handler: HashMap<Label, Vec<usize>>,
}

impl<'a> Simulation<'a> {
	fn record_local(&mut self, slot: &LocalSlot) {
		self.locals.push(slot.clone());
	}

	fn local_slot(&mut self, index: u16, ty: JavaType) -> LocalSlot {
		let slot = LocalSlot { index, ty, version: None };
		self.record_local(&slot);
		slot
	}

	fn expr_ty(&self, expr: &TIRExpression) -> Result<JavaType> {
		expr_type(expr, self.owner)
	}

	/// Allocates (on first use) the synthetic locals a join point reads from / predecessors write
	/// to, sized to the join's known stack depth.
	fn synthetic_for(&mut self, label: Label, types: &[JavaType]) -> Vec<u16> {
		if let Some(existing) = self.synthetic_slots.get(&label) {
			let existing = existing.clone();
			let merged: Vec<JavaType> = self.synthetic_types[&label].iter().zip(types)
				.map(|(a, b)| a.join(b))
				.collect();
			self.synthetic_types.insert(label, merged);
			return existing;
		}
		let slots: Vec<u16> = types.iter().map(|_| {
			let index = self.next_synthetic;
			self.next_synthetic += 1;
			index
		}).collect();
		self.synthetic_slots.insert(label, slots.clone());
		self.synthetic_types.insert(label, types.to_vec());
		slots
	}

	fn flush_to(&mut self, label: Label) -> Result<()> {
		if self.stack.is_empty() {
			return Ok(());
		}
		let types: Vec<JavaType> = self.stack.iter().map(|e| self.expr_ty(e)).collect::<Result<_>>()?;
		let slots = self.synthetic_for(label, &types);
		let values: Vec<TIRExpression> = self.stack.drain(..).collect();
		for (slot_index, value) in slots.into_iter().zip(values) {
			let ty = self.expr_ty(&value)?;
			let local = self.local_slot(slot_index, ty);
			self.statements.push(TIRStatement::Assign { local, value });
		}
		Ok(())
	}

	/// At a join point reached by straight-line fall-through (no explicit branch), replace the
	/// live stack with reads of its synthetic locals so later code observes the same values
	/// regardless of which predecessor edge was taken.
	fn enter_join(&mut self, label: Label) -> Result<()> {
		self.flush_to(label)?;
		if let Some(slots) = self.synthetic_slots.get(&label).cloned() {
			let types = self.synthetic_types[&label].clone();
			self.stack = slots.into_iter().zip(types)
				.map(|(index, ty)| TIRExpression::LocalRead(LocalSlot { index, ty, version: None }))
				.collect();
		}
		Ok(())
	}

	fn run(&mut self, code: &Code) -> Result<()> {
		for index in 0..code.instructions.len() {
			let entry = &code.instructions[index];

			if let Some(label) = entry.label {
				if self.join_depths.contains_key(&label) {
					self.enter_join(label)?;
				}
				if let Some(regions) = self.region_handler.get(&label).cloned() {
					// Several try-ranges can share one handler label; the caught type is only used
					// for the synthetic local's declared type, so the first region is representative.
					if let Some(&region) = regions.first() {
						let caught = code.exception_table[region].catch.clone();
						let ty = caught.clone().map(JavaType::Object).unwrap_or_else(|| JavaType::Object(well_known_class("java/lang/Throwable")));
						let index = self.next_synthetic;
						self.next_synthetic += 1;
						let local = self.local_slot(index, ty.clone());
						self.statements.push(TIRStatement::CatchBegin { region, caught_type: caught, local: local.clone() });
						self.stack = vec![TIRExpression::LocalRead(local)];
					}
				}
				if let Some(regions) = self.region_start.get(&label).cloned() {
					for region in regions {
						self.statements.push(TIRStatement::TryBegin { region });
					}
				}
				if let Some(regions) = self.region_end.get(&label).cloned() {
					for region in regions {
						self.statements.push(TIRStatement::TryEnd { region });
					}
				}
				self.statements.push(TIRStatement::Label(label));
			}

			self.step(&entry.instruction)?;
		}
		Ok(())
	}

	fn pop(&mut self) -> Result<TIRExpression> {
		self.stack.pop().ok_or_else(|| anyhow!("operand stack underflow"))
	}

	fn push_const(&mut self, c: Constant) {
		self.stack.push(TIRExpression::Constant(c));
	}

	fn step(&mut self, instruction: &Instruction) -> Result<()> {
		use Instruction::*;
		match instruction {
			Nop => {}
			AConstNull => self.push_const(Constant::Null),
			IConstM1 => self.push_const(Constant::Int(-1)),
			IConst0 => self.push_const(Constant::Int(0)),
			IConst1 => self.push_const(Constant::Int(1)),
			IConst2 => self.push_const(Constant::Int(2)),
			IConst3 => self.push_const(Constant::Int(3)),
			IConst4 => self.push_const(Constant::Int(4)),
			IConst5 => self.push_const(Constant::Int(5)),
			LConst0 => self.push_const(Constant::Long(0)),
			LConst1 => self.push_const(Constant::Long(1)),
			FConst0 => self.push_const(Constant::Float(0.0)),
			FConst1 => self.push_const(Constant::Float(1.0)),
			FConst2 => self.push_const(Constant::Float(2.0)),
			DConst0 => self.push_const(Constant::Double(0.0)),
			DConst1 => self.push_const(Constant::Double(1.0)),
			BiPush(v) => self.push_const(Constant::Int(*v as i32)),
			SiPush(v) => self.push_const(Constant::Int(*v as i32)),
			Ldc(loadable) => {
				let value = match loadable {
					Loadable::Integer(v) => Constant::Int(*v),
					Loadable::Float(v) => Constant::Float(*v),
					Loadable::Long(v) => Constant::Long(*v),
					Loadable::Double(v) => Constant::Double(*v),
					Loadable::String(s) => Constant::String(s.clone()),
					Loadable::Class(c) => Constant::Class(c.clone()),
					Loadable::MethodHandle(_) | Loadable::MethodType(_) | Loadable::Dynamic(_) =>
						bail!("ldc of a method handle/type/dynamic constant is not supported"),
				};
				self.push_const(value);
			}

			ILoad(i) => self.push_local_read(i.index, JavaType::Int),
			LLoad(i) => self.push_local_read(i.index, JavaType::Long),
			FLoad(i) => self.push_local_read(i.index, JavaType::Float),
			DLoad(i) => self.push_local_read(i.index, JavaType::Double),
			ALoad(i) => {
				if i.index == 0 && !self.method.access.is_static {
					self.stack.push(TIRExpression::ThisRef);
				} else {
					self.push_local_read(i.index, JavaType::Object(well_known_class("java/lang/Object")));
				}
			}

			IStore(i) => self.store_local(i.index, JavaType::Int)?,
			LStore(i) => self.store_local(i.index, JavaType::Long)?,
			FStore(i) => self.store_local(i.index, JavaType::Float)?,
			DStore(i) => self.store_local(i.index, JavaType::Double)?,
			AStore(i) => {
				let value = self.pop()?;
				let ty = self.expr_ty(&value)?;
				let local = self.local_slot(i.index, ty);
				self.statements.push(TIRStatement::Assign { local, value });
			}

			IALoad => self.array_load(JavaType::Int)?,
			LALoad => self.array_load(JavaType::Long)?,
			FALoad => self.array_load(JavaType::Float)?,
			DALoad => self.array_load(JavaType::Double)?,
			AALoad => self.array_load(JavaType::Object(well_known_class("java/lang/Object")))?,
			BALoad => self.array_load(JavaType::Byte)?,
			CALoad => self.array_load(JavaType::Char)?,
			SALoad => self.array_load(JavaType::Short)?,

			IAStore => self.array_store(JavaType::Int)?,
			LAStore => self.array_store(JavaType::Long)?,
			FAStore => self.array_store(JavaType::Float)?,
			DAStore => self.array_store(JavaType::Double)?,
			AAStore => self.array_store(JavaType::Object(well_known_class("java/lang/Object")))?,
			BAStore => self.array_store(JavaType::Byte)?,
			CAStore => self.array_store(JavaType::Char)?,
			SAStore => self.array_store(JavaType::Short)?,

			Pop => { self.pop()?; }
			Pop2 => { self.pop()?; self.pop()?; }

			Dup => {
				let v = self.materialize_if_needed(self.stack.last().cloned().ok_or_else(|| anyhow!("dup on empty stack"))?)?;
				self.stack.pop();
				self.stack.push(v.clone());
				self.stack.push(v);
			}
			DupX1 => {
				let top = self.pop()?;
				let below = self.pop()?;
				let top = self.materialize_if_needed(top)?;
				self.stack.push(top.clone());
				self.stack.push(below);
				self.stack.push(top);
			}
			DupX2 => {
				let a = self.pop()?;
				let b = self.pop()?;
				let c = self.pop()?;
				let a = self.materialize_if_needed(a)?;
				self.stack.push(a.clone());
				self.stack.push(c);
				self.stack.push(b);
				self.stack.push(a);
			}
			Dup2 => {
				let a = self.pop()?;
				let b = self.pop()?;
				let b = self.materialize_if_needed(b)?;
				let a = self.materialize_if_needed(a)?;
				self.stack.push(b.clone());
				self.stack.push(a.clone());
				self.stack.push(b);
				self.stack.push(a);
			}
			Dup2X1 => {
				let a = self.pop()?;
				let b = self.pop()?;
				let c = self.pop()?;
				let b = self.materialize_if_needed(b)?;
				let a = self.materialize_if_needed(a)?;
				self.stack.push(b.clone());
				self.stack.push(a.clone());
				self.stack.push(c);
				self.stack.push(b);
				self.stack.push(a);
			}
			Dup2X2 => {
				let a = self.pop()?;
				let b = self.pop()?;
				let c = self.pop()?;
				let d = self.pop()?;
				let b = self.materialize_if_needed(b)?;
				let a = self.materialize_if_needed(a)?;
				self.stack.push(b.clone());
				self.stack.push(a.clone());
				self.stack.push(d);
				self.stack.push(c);
				self.stack.push(b);
				self.stack.push(a);
			}
			Swap => {
				let a = self.pop()?;
				let b = self.pop()?;
				self.stack.push(a);
				self.stack.push(b);
			}

			IAdd | LAdd | FAdd | DAdd => self.binary(BinaryOp::Add)?,
			ISub | LSub | FSub | DSub => self.binary(BinaryOp::Sub)?,
			IMul | LMul | FMul | DMul => self.binary(BinaryOp::Mul)?,
			IDiv | LDiv | FDiv | DDiv => self.binary(BinaryOp::Div)?,
			IRem | LRem | FRem | DRem => self.binary(BinaryOp::Rem)?,
			IShl | LShl => self.binary(BinaryOp::Shl)?,
			IShr | LShr => self.binary(BinaryOp::Shr)?,
			IUShr | LUShr => self.binary(BinaryOp::UShr)?,
			IAnd | LAnd => self.binary(BinaryOp::And)?,
			IOr | LOr => self.binary(BinaryOp::Or)?,
			IXor | LXor => self.binary(BinaryOp::Xor)?,
			LCmp => self.binary(BinaryOp::LCmp)?,
			FCmpL => self.binary(BinaryOp::FCmpL)?,
			FCmpG => self.binary(BinaryOp::FCmpG)?,
			DCmpL => self.binary(BinaryOp::DCmpL)?,
			DCmpG => self.binary(BinaryOp::DCmpG)?,

			INeg | LNeg | FNeg | DNeg => {
				let v = self.pop()?;
				self.stack.push(TIRExpression::Unary(crate::tir::UnaryOp::Neg, Box::new(v)));
			}

			IInc(i, amount) => {
				let local = self.local_slot(i.index, JavaType::Int);
				let value = TIRExpression::Binary(
					BinaryOp::Add,
					Box::new(TIRExpression::LocalRead(local.clone())),
					Box::new(TIRExpression::Constant(Constant::Int(*amount as i32))),
				);
				self.statements.push(TIRStatement::Assign { local, value });
			}

			I2L => self.convert(ConversionKind::I2L)?,
			I2F => self.convert(ConversionKind::I2F)?,
			I2D => self.convert(ConversionKind::I2D)?,
			L2I => self.convert(ConversionKind::L2I)?,
			L2F => self.convert(ConversionKind::L2F)?,
			L2D => self.convert(ConversionKind::L2D)?,
			F2I => self.convert(ConversionKind::F2I)?,
			F2L => self.convert(ConversionKind::F2L)?,
			F2D => self.convert(ConversionKind::F2D)?,
			D2I => self.convert(ConversionKind::D2I)?,
			D2L => self.convert(ConversionKind::D2L)?,
			D2F => self.convert(ConversionKind::D2F)?,
			I2B => self.convert(ConversionKind::I2B)?,
			I2C => self.convert(ConversionKind::I2C)?,
			I2S => self.convert(ConversionKind::I2S)?,

			IfEq(l) => self.branch_if(BranchCond::Eq, false, *l)?,
			IfNe(l) => self.branch_if(BranchCond::Ne, false, *l)?,
			IfLt(l) => self.branch_if(BranchCond::Lt, false, *l)?,
			IfGe(l) => self.branch_if(BranchCond::Ge, false, *l)?,
			IfGt(l) => self.branch_if(BranchCond::Gt, false, *l)?,
			IfLe(l) => self.branch_if(BranchCond::Le, false, *l)?,
			IfICmpEq(l) => self.branch_if(BranchCond::Eq, true, *l)?,
			IfICmpNe(l) => self.branch_if(BranchCond::Ne, true, *l)?,
			IfICmpLt(l) => self.branch_if(BranchCond::Lt, true, *l)?,
			IfICmpGe(l) => self.branch_if(BranchCond::Ge, true, *l)?,
			IfICmpGt(l) => self.branch_if(BranchCond::Gt, true, *l)?,
			IfICmpLe(l) => self.branch_if(BranchCond::Le, true, *l)?,
			IfACmpEq(l) => self.branch_if(BranchCond::Eq, true, *l)?,
			IfACmpNe(l) => self.branch_if(BranchCond::Ne, true, *l)?,
			IfNull(l) => self.branch_if(BranchCond::Null, false, *l)?,
			IfNonNull(l) => self.branch_if(BranchCond::NonNull, false, *l)?,

			Goto(l) => {
				self.flush_to(*l)?;
				self.statements.push(TIRStatement::Goto(*l));
				self.stack.clear();
			}
			Jsr(_) | Ret(_) => bail!("jsr/ret reached the stack simulation; subroutine inlining should have removed it"),

			TableSwitch { default, low, table, .. } => {
				let value = self.pop()?;
				self.flush_to(*default)?;
				for target in table {
					self.flush_to(*target)?;
				}
				self.statements.push(TIRStatement::TableSwitch { value, low: *low, default: *default, targets: table.clone() });
				self.stack.clear();
			}
			LookupSwitch { default, pairs } => {
				let value = self.pop()?;
				self.flush_to(*default)?;
				for (_, target) in pairs {
					self.flush_to(*target)?;
				}
				self.statements.push(TIRStatement::LookupSwitch { value, default: *default, pairs: pairs.clone() });
				self.stack.clear();
			}

			IReturn | LReturn | FReturn | DReturn | AReturn => {
				let value = self.pop()?;
				self.statements.push(TIRStatement::Return(Some(value)));
				self.stack.clear();
			}
			Return => {
				self.statements.push(TIRStatement::Return(None));
				self.stack.clear();
			}

			GetStatic(field) => self.stack.push(TIRExpression::FieldLoad { receiver: None, field: field.clone() }),
			PutStatic(field) => {
				let value = self.pop()?;
				self.statements.push(TIRStatement::FieldStore { receiver: None, field: field.clone(), value });
			}
			GetField(field) => {
				let receiver = self.pop()?;
				self.stack.push(TIRExpression::FieldLoad { receiver: Some(Box::new(receiver)), field: field.clone() });
			}
			PutField(field) => {
				let value = self.pop()?;
				let receiver = self.pop()?;
				self.statements.push(TIRStatement::FieldStore { receiver: Some(receiver), field: field.clone(), value });
			}

			InvokeVirtual(m) => self.invoke(InvokeKind::Virtual, m.desc.parse()?.parameter_descriptors.len(), true, m.clone())?,
			InvokeSpecial(m, _) => self.invoke(InvokeKind::Special, m.desc.parse()?.parameter_descriptors.len(), true, m.clone())?,
			InvokeStatic(m, _) => self.invoke(InvokeKind::Static, m.desc.parse()?.parameter_descriptors.len(), false, m.clone())?,
			InvokeInterface(m) => self.invoke(InvokeKind::Interface, m.desc.parse()?.parameter_descriptors.len(), true, m.clone())?,
			InvokeDynamic(_) => bail!("invokedynamic is not supported"),

			New(class) => self.stack.push(TIRExpression::NewObject(class.clone())),
			NewArray(array_type) => {
				let length = self.pop()?;
				let element_type: JavaType = match array_type {
					duke::tree::method::code::ArrayType::Boolean => JavaType::Boolean,
					duke::tree::method::code::ArrayType::Char => JavaType::Char,
					duke::tree::method::code::ArrayType::Float => JavaType::Float,
					duke::tree::method::code::ArrayType::Double => JavaType::Double,
					duke::tree::method::code::ArrayType::Byte => JavaType::Byte,
					duke::tree::method::code::ArrayType::Short => JavaType::Short,
					duke::tree::method::code::ArrayType::Int => JavaType::Int,
					duke::tree::method::code::ArrayType::Long => JavaType::Long,
				};
				self.stack.push(TIRExpression::NewArray { element_type, dimensions: vec![length], rank: 1 });
			}
			ANewArray(class) => {
				let length = self.pop()?;
				self.stack.push(TIRExpression::NewArray { element_type: JavaType::Object(class.clone()), dimensions: vec![length], rank: 1 });
			}
			ArrayLength => {
				let array = self.pop()?;
				self.stack.push(TIRExpression::ArrayLength(Box::new(array)));
			}
			AThrow => {
				let value = self.pop()?;
				self.statements.push(TIRStatement::Throw(value));
				self.stack.clear();
			}
			CheckCast(class) => {
				let operand = self.pop()?;
				self.stack.push(TIRExpression::CheckCast { operand: Box::new(operand), target: class.clone() });
			}
			InstanceOf(class) => {
				let operand = self.pop()?;
				self.stack.push(TIRExpression::InstanceOf { operand: Box::new(operand), check: class.clone() });
			}
			MonitorEnter => {
				let v = self.pop()?;
				self.statements.push(TIRStatement::MonitorEnter(v));
			}
			MonitorExit => {
				let v = self.pop()?;
				self.statements.push(TIRStatement::MonitorExit(v));
			}
			MultiANewArray(class, dims) => {
				let mut dimensions = (0..*dims).map(|_| self.pop()).collect::<Result<Vec<_>>>()?;
				dimensions.reverse();
				let element_type = JavaType::Object(class.clone());
				self.stack.push(TIRExpression::NewArray { element_type, dimensions, rank: *dims });
			}
		}
		Ok(())
	}

	fn push_local_read(&mut self, index: u16, ty: JavaType) {
		let local = LocalSlot { index, ty, version: None };
		self.record_local(&local);
		self.stack.push(TIRExpression::LocalRead(local));
	}

	fn store_local(&mut self, index: u16, ty: JavaType) -> Result<()> {
		let value = self.pop()?;
		let local = self.local_slot(index, ty);
		self.statements.push(TIRStatement::Assign { local, value });
		Ok(())
	}

	fn array_load(&mut self, element_type: JavaType) -> Result<()> {
		let array_index = self.pop()?;
		let array = self.pop()?;
		self.stack.push(TIRExpression::ArrayLoad { array: Box::new(array), index: Box::new(array_index), element_type });
		Ok(())
	}

	fn array_store(&mut self, element_type: JavaType) -> Result<()> {
		let value = self.pop()?;
		let array_index = self.pop()?;
		let array = self.pop()?;
		self.statements.push(TIRStatement::ArrayStore { array, index: array_index, value, element_type });
		Ok(())
	}

	fn binary(&mut self, op: BinaryOp) -> Result<()> {
		let right = self.pop()?;
		let left = self.pop()?;
		self.stack.push(TIRExpression::Binary(op, Box::new(left), Box::new(right)));
		Ok(())
	}

	fn convert(&mut self, kind: ConversionKind) -> Result<()> {
		let v = self.pop()?;
		self.stack.push(TIRExpression::Convert(kind, Box::new(v)));
		Ok(())
	}

	fn branch_if(&mut self, cond: BranchCond, binary: bool, target: Label) -> Result<()> {
		let (left, right) = if binary {
			let right = self.pop()?;
			let left = self.pop()?;
			(left, Some(right))
		} else {
			(self.pop()?, None)
		};
		self.flush_to(target)?;
		self.statements.push(TIRStatement::BranchIf { cond, left, right, target });
		Ok(())
	}

	/// Invocations are always materialized into a temporary before falling through to whatever
	/// reads the result, so evaluation order and exception visibility match the bytecode even if
	/// the emitted value isn't consumed immediately (§4.3). A void invocation is its own statement.
	fn invoke(&mut self, kind: InvokeKind, arity: usize, has_receiver: bool, method: duke::tree::method::MethodRef) -> Result<()> {
		let mut args = (0..arity).map(|_| self.pop()).collect::<Result<Vec<_>>>()?;
		args.reverse();
		let receiver = if has_receiver {
			let popped = self.pop()?;
			// Virtual/interface dispatch renders the receiver twice (once to look up the slot,
			// once as the call's `self` argument), so a compound receiver needs hoisting into a
			// temporary here the same way `materialize_if_needed` already does for dup targets —
			// otherwise a `getfield`/`aaload`/`checkcast`/runtime-provided-field receiver would
			// run its side effect twice in the emitted C++.
			let popped = match kind {
				InvokeKind::Virtual | InvokeKind::Interface => self.materialize_if_needed(popped)?,
				InvokeKind::Static | InvokeKind::Special => popped,
			};
			Some(Box::new(popped))
		} else {
			None
		};
		let call = TIRExpression::Invoke { kind, method: method.clone(), receiver, args };

		if method.desc.parse()?.return_descriptor.is_none() {
			self.statements.push(TIRStatement::InvokeStatement(call));
		} else {
			let ty = self.expr_ty(&call)?;
			let index = self.next_synthetic;
			self.next_synthetic += 1;
			let local = self.local_slot(index, ty);
			self.statements.push(TIRStatement::Assign { local: local.clone(), value: call });
			self.stack.push(TIRExpression::LocalRead(local));
		}
		Ok(())
	}

	/// Dup targets with a side effect (anything but a bare local/constant read) get hoisted into a
	/// temporary once, so duplicating them never re-runs the side effect.
	fn materialize_if_needed(&mut self, expr: TIRExpression) -> Result<TIRExpression> {
		if matches!(expr, TIRExpression::LocalRead(_) | TIRExpression::Constant(_) | TIRExpression::ThisRef) {
			return Ok(expr);
		}
		let ty = self.expr_ty(&expr)?;
		let index = self.next_synthetic;
		self.next_synthetic += 1;
		let local = self.local_slot(index, ty);
		self.statements.push(TIRStatement::Assign { local: local.clone(), value: expr });
		Ok(TIRExpression::LocalRead(local))
	}
}
