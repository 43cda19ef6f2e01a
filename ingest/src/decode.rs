//! Decodes a method's raw `Code` attribute bytes (as handed back by `raw_class_file`, which
//! parses the class-file container but leaves method bodies as an opaque `Vec<u8>`) into
//! `duke`'s offset-free, label-based `Instruction` stream.
//!
//! Two passes: the first walks the byte array once to find every instruction's offset and
//! every offset a branch/switch/exception-handler-range actually targets, the second walks it
//! again building the final `Instruction`s, now that every referenced offset has a `Label`.

use std::collections::BTreeMap;
use anyhow::{anyhow, bail, Context, Result};
use duke::tree::method::code::{ArrayType, Code, Exception, Instruction, InstructionListEntry, Label, LvIndex};
use raw_class_file::{insn, ExceptionTableEntry};
use crate::pool::ConstantPool;

/// A decoded instruction whose jump/switch targets are still raw byte offsets; turned into
/// `duke::tree::method::code::Instruction` once every referenced offset has a `Label`.
enum Raw {
	Plain(Instruction),
	Branch(fn(Label) -> Instruction, u32),
	Table { default: u32, low: i32, high: i32, table: Vec<u32> },
	Lookup { default: u32, pairs: Vec<(i32, u32)> },
}

pub fn decode_code(code_bytes: &[u8], raw_exceptions: &[ExceptionTableEntry], max_stack: u16, max_locals: u16, pool: &ConstantPool) -> Result<Code> {
	let mut referenced_offsets: Vec<u32> = vec![code_bytes.len() as u32];
	for exc in raw_exceptions {
		referenced_offsets.push(exc.start_pc as u32);
		referenced_offsets.push(exc.end_pc as u32);
		referenced_offsets.push(exc.handler_pc as u32);
	}

	let mut decoded: Vec<(u32, Raw)> = Vec::new();
	let mut offset = 0usize;
	while offset < code_bytes.len() {
		let start = offset as u32;
		let (raw, next) = decode_one(code_bytes, offset, pool)
			.with_context(|| anyhow!("failed to decode instruction at byte offset {offset}"))?;
		match &raw {
			Raw::Branch(_, target) => referenced_offsets.push(*target),
			Raw::Table { default, table, .. } => {
				referenced_offsets.push(*default);
				referenced_offsets.extend(table.iter().copied());
			}
			Raw::Lookup { default, pairs } => {
				referenced_offsets.push(*default);
				referenced_offsets.extend(pairs.iter().map(|(_, t)| *t));
			}
			Raw::Plain(_) => {}
		}
		decoded.push((start, raw));
		offset = next;
	}

	referenced_offsets.sort_unstable();
	referenced_offsets.dedup();

	let mut labels: BTreeMap<u32, Label> = BTreeMap::new();
	for (id, off) in referenced_offsets.iter().enumerate() {
		let id = u16::try_from(id).context("method has more distinct jump targets than fit in a u16 label id")?;
		labels.insert(*off, Label::new(id));
	}
	let label_at = |off: u32| -> Result<Label> {
		labels.get(&off).copied().ok_or_else(|| anyhow!("byte offset {off} is not a valid instruction boundary"))
	};

	let mut instructions = Vec::with_capacity(decoded.len());
	for (start, raw) in decoded {
		let instruction = match raw {
			Raw::Plain(instruction) => instruction,
			Raw::Branch(build, target) => build(label_at(target)?),
			Raw::Table { default, low, high, table } => Instruction::TableSwitch {
				default: label_at(default)?,
				low,
				high,
				table: table.into_iter().map(label_at).collect::<Result<_>>()?,
			},
			Raw::Lookup { default, pairs } => Instruction::LookupSwitch {
				default: label_at(default)?,
				pairs: pairs.into_iter().map(|(m, t)| Ok((m, label_at(t)?))).collect::<Result<_>>()?,
			},
		};
		instructions.push(InstructionListEntry {
			label: labels.get(&start).copied(),
			frame: None,
			instruction,
		});
	}

	let exception_table = raw_exceptions.iter().map(|exc| Ok(Exception {
		start: label_at(exc.start_pc as u32)?,
		end: label_at(exc.end_pc as u32)?,
		handler: label_at(exc.handler_pc as u32)?,
		catch: if exc.catch_type == 0 { None } else { Some(pool.class_name(exc.catch_type)?) },
	})).collect::<Result<_>>()?;

	Ok(Code {
		max_stack: Some(max_stack),
		max_locals: Some(max_locals),
		instructions,
		exception_table,
		last_label: Some(label_at(code_bytes.len() as u32)?),
		line_numbers: None,
		local_variables: None,
		runtime_visible_type_annotations: Vec::new(),
		runtime_invisible_type_annotations: Vec::new(),
		attributes: Vec::new(),
	})
}

fn u8_at(code: &[u8], offset: usize) -> Result<u8> {
	code.get(offset).copied().ok_or_else(|| anyhow!("unexpected end of code array at byte offset {offset}"))
}

fn i8_at(code: &[u8], offset: usize) -> Result<i8> {
	Ok(u8_at(code, offset)? as i8)
}

fn u16_at(code: &[u8], offset: usize) -> Result<u16> {
	Ok(u16::from_be_bytes([u8_at(code, offset)?, u8_at(code, offset + 1)?]))
}

fn i16_at(code: &[u8], offset: usize) -> Result<i16> {
	Ok(u16_at(code, offset)? as i16)
}

fn i32_at(code: &[u8], offset: usize) -> Result<i32> {
	Ok(i32::from_be_bytes([u8_at(code, offset)?, u8_at(code, offset + 1)?, u8_at(code, offset + 2)?, u8_at(code, offset + 3)?]))
}

/// Decodes the instruction starting at `offset`, returning it plus the offset of the next
/// instruction.
fn decode_one(code: &[u8], offset: usize, pool: &ConstantPool) -> Result<(Raw, usize)> {
	let op = u8_at(code, offset)?;
	let lv = |index: u16| LvIndex { index };

	macro_rules! plain { ($i:expr) => { Ok((Raw::Plain($i), offset + 1)) } }

	match op {
		x if x == insn::nop => plain!(Instruction::Nop),
		x if x == insn::aconst_null => plain!(Instruction::AConstNull),
		x if x == insn::iconst_m1 => plain!(Instruction::IConstM1),
		x if x == insn::iconst_0 => plain!(Instruction::IConst0),
		x if x == insn::iconst_1 => plain!(Instruction::IConst1),
		x if x == insn::iconst_2 => plain!(Instruction::IConst2),
		x if x == insn::iconst_3 => plain!(Instruction::IConst3),
		x if x == insn::iconst_4 => plain!(Instruction::IConst4),
		x if x == insn::iconst_5 => plain!(Instruction::IConst5),
		x if x == insn::lconst_0 => plain!(Instruction::LConst0),
		x if x == insn::lconst_1 => plain!(Instruction::LConst1),
		x if x == insn::fconst_0 => plain!(Instruction::FConst0),
		x if x == insn::fconst_1 => plain!(Instruction::FConst1),
		x if x == insn::fconst_2 => plain!(Instruction::FConst2),
		x if x == insn::dconst_0 => plain!(Instruction::DConst0),
		x if x == insn::dconst_1 => plain!(Instruction::DConst1),
		x if x == insn::bipush => Ok((Raw::Plain(Instruction::BiPush(i8_at(code, offset + 1)?)), offset + 2)),
		x if x == insn::sipush => Ok((Raw::Plain(Instruction::SiPush(i16_at(code, offset + 1)?)), offset + 3)),
		x if x == insn::ldc => Ok((Raw::Plain(Instruction::Ldc(pool.loadable(u8_at(code, offset + 1)? as u16)?)), offset + 2)),
		x if x == insn::ldc_w || x == insn::ldc2_w => Ok((Raw::Plain(Instruction::Ldc(pool.loadable(u16_at(code, offset + 1)?)?)), offset + 3)),
		x if x == insn::iload => Ok((Raw::Plain(Instruction::ILoad(lv(u8_at(code, offset + 1)? as u16))), offset + 2)),
		x if x == insn::lload => Ok((Raw::Plain(Instruction::LLoad(lv(u8_at(code, offset + 1)? as u16))), offset + 2)),
		x if x == insn::fload => Ok((Raw::Plain(Instruction::FLoad(lv(u8_at(code, offset + 1)? as u16))), offset + 2)),
		x if x == insn::dload => Ok((Raw::Plain(Instruction::DLoad(lv(u8_at(code, offset + 1)? as u16))), offset + 2)),
		x if x == insn::aload => Ok((Raw::Plain(Instruction::ALoad(lv(u8_at(code, offset + 1)? as u16))), offset + 2)),
		x if x == insn::iload_0 => plain!(Instruction::ILoad(lv(0))),
		x if x == insn::iload_1 => plain!(Instruction::ILoad(lv(1))),
		x if x == insn::iload_2 => plain!(Instruction::ILoad(lv(2))),
		x if x == insn::iload_3 => plain!(Instruction::ILoad(lv(3))),
		x if x == insn::lload_0 => plain!(Instruction::LLoad(lv(0))),
		x if x == insn::lload_1 => plain!(Instruction::LLoad(lv(1))),
		x if x == insn::lload_2 => plain!(Instruction::LLoad(lv(2))),
		x if x == insn::lload_3 => plain!(Instruction::LLoad(lv(3))),
		x if x == insn::fload_0 => plain!(Instruction::FLoad(lv(0))),
		x if x == insn::fload_1 => plain!(Instruction::FLoad(lv(1))),
		x if x == insn::fload_2 => plain!(Instruction::FLoad(lv(2))),
		x if x == insn::fload_3 => plain!(Instruction::FLoad(lv(3))),
		x if x == insn::dload_0 => plain!(Instruction::DLoad(lv(0))),
		x if x == insn::dload_1 => plain!(Instruction::DLoad(lv(1))),
		x if x == insn::dload_2 => plain!(Instruction::DLoad(lv(2))),
		x if x == insn::dload_3 => plain!(Instruction::DLoad(lv(3))),
		x if x == insn::aload_0 => plain!(Instruction::ALoad(lv(0))),
		x if x == insn::aload_1 => plain!(Instruction::ALoad(lv(1))),
		x if x == insn::aload_2 => plain!(Instruction::ALoad(lv(2))),
		x if x == insn::aload_3 => plain!(Instruction::ALoad(lv(3))),
		x if x == insn::iaload => plain!(Instruction::IALoad),
		x if x == insn::laload => plain!(Instruction::LALoad),
		x if x == insn::faload => plain!(Instruction::FALoad),
		x if x == insn::daload => plain!(Instruction::DALoad),
		x if x == insn::aaload => plain!(Instruction::AALoad),
		x if x == insn::baload => plain!(Instruction::BALoad),
		x if x == insn::caload => plain!(Instruction::CALoad),
		x if x == insn::saload => plain!(Instruction::SALoad),
		x if x == insn::istore => Ok((Raw::Plain(Instruction::IStore(lv(u8_at(code, offset + 1)? as u16))), offset + 2)),
		x if x == insn::lstore => Ok((Raw::Plain(Instruction::LStore(lv(u8_at(code, offset + 1)? as u16))), offset + 2)),
		x if x == insn::fstore => Ok((Raw::Plain(Instruction::FStore(lv(u8_at(code, offset + 1)? as u16))), offset + 2)),
		x if x == insn::dstore => Ok((Raw::Plain(Instruction::DStore(lv(u8_at(code, offset + 1)? as u16))), offset + 2)),
		x if x == insn::astore => Ok((Raw::Plain(Instruction::AStore(lv(u8_at(code, offset + 1)? as u16))), offset + 2)),
		x if x == insn::istore_0 => plain!(Instruction::IStore(lv(0))),
		x if x == insn::istore_1 => plain!(Instruction::IStore(lv(1))),
		x if x == insn::istore_2 => plain!(Instruction::IStore(lv(2))),
		x if x == insn::istore_3 => plain!(Instruction::IStore(lv(3))),
		x if x == insn::lstore_0 => plain!(Instruction::LStore(lv(0))),
		x if x == insn::lstore_1 => plain!(Instruction::LStore(lv(1))),
		x if x == insn::lstore_2 => plain!(Instruction::LStore(lv(2))),
		x if x == insn::lstore_3 => plain!(Instruction::LStore(lv(3))),
		x if x == insn::fstore_0 => plain!(Instruction::FStore(lv(0))),
		x if x == insn::fstore_1 => plain!(Instruction::FStore(lv(1))),
		x if x == insn::fstore_2 => plain!(Instruction::FStore(lv(2))),
		x if x == insn::fstore_3 => plain!(Instruction::FStore(lv(3))),
		x if x == insn::dstore_0 => plain!(Instruction::DStore(lv(0))),
		x if x == insn::dstore_1 => plain!(Instruction::DStore(lv(1))),
		x if x == insn::dstore_2 => plain!(Instruction::DStore(lv(2))),
		x if x == insn::dstore_3 => plain!(Instruction::DStore(lv(3))),
		x if x == insn::astore_0 => plain!(Instruction::AStore(lv(0))),
		x if x == insn::astore_1 => plain!(Instruction::AStore(lv(1))),
		x if x == insn::astore_2 => plain!(Instruction::AStore(lv(2))),
		x if x == insn::astore_3 => plain!(Instruction::AStore(lv(3))),
		x if x == insn::iatore => plain!(Instruction::IAStore),
		x if x == insn::latore => plain!(Instruction::LAStore),
		x if x == insn::fatore => plain!(Instruction::FAStore),
		x if x == insn::datore => plain!(Instruction::DAStore),
		x if x == insn::aatore => plain!(Instruction::AAStore),
		x if x == insn::batore => plain!(Instruction::BAStore),
		x if x == insn::catore => plain!(Instruction::CAStore),
		x if x == insn::satore => plain!(Instruction::SAStore),
		x if x == insn::pop => plain!(Instruction::Pop),
		x if x == insn::pop2 => plain!(Instruction::Pop2),
		x if x == insn::dup => plain!(Instruction::Dup),
		x if x == insn::dup_x1 => plain!(Instruction::DupX1),
		x if x == insn::dup_x2 => plain!(Instruction::DupX2),
		x if x == insn::dup2 => plain!(Instruction::Dup2),
		x if x == insn::dup2_x1 => plain!(Instruction::Dup2X1),
		x if x == insn::dup2_x2 => plain!(Instruction::Dup2X2),
		x if x == insn::swap => plain!(Instruction::Swap),
		x if x == insn::iadd => plain!(Instruction::IAdd),
		x if x == insn::ladd => plain!(Instruction::LAdd),
		x if x == insn::fadd => plain!(Instruction::FAdd),
		x if x == insn::dadd => plain!(Instruction::DAdd),
		x if x == insn::isub => plain!(Instruction::ISub),
		x if x == insn::lsub => plain!(Instruction::LSub),
		x if x == insn::fsub => plain!(Instruction::FSub),
		x if x == insn::dsub => plain!(Instruction::DSub),
		x if x == insn::imut => plain!(Instruction::IMul),
		x if x == insn::lmut => plain!(Instruction::LMul),
		x if x == insn::fmut => plain!(Instruction::FMul),
		x if x == insn::dmut => plain!(Instruction::DMul),
		x if x == insn::idiv => plain!(Instruction::IDiv),
		x if x == insn::ldiv => plain!(Instruction::LDiv),
		x if x == insn::fdiv => plain!(Instruction::FDiv),
		x if x == insn::ddiv => plain!(Instruction::DDiv),
		x if x == insn::irem => plain!(Instruction::IRem),
		x if x == insn::lrem => plain!(Instruction::LRem),
		x if x == insn::frem => plain!(Instruction::FRem),
		x if x == insn::drem => plain!(Instruction::DRem),
		x if x == insn::ineg => plain!(Instruction::INeg),
		x if x == insn::lneg => plain!(Instruction::LNeg),
		x if x == insn::fneg => plain!(Instruction::FNeg),
		x if x == insn::dneg => plain!(Instruction::DNeg),
		x if x == insn::ishl => plain!(Instruction::IShl),
		x if x == insn::lshl => plain!(Instruction::LShl),
		x if x == insn::ishr => plain!(Instruction::IShr),
		x if x == insn::lshr => plain!(Instruction::LShr),
		x if x == insn::iushr => plain!(Instruction::IUShr),
		x if x == insn::lushr => plain!(Instruction::LUShr),
		x if x == insn::iand => plain!(Instruction::IAnd),
		x if x == insn::land => plain!(Instruction::LAnd),
		x if x == insn::ior => plain!(Instruction::IOr),
		x if x == insn::lor => plain!(Instruction::LOr),
		x if x == insn::ixor => plain!(Instruction::IXor),
		x if x == insn::lxor => plain!(Instruction::LXor),
		x if x == insn::iinc => Ok((Raw::Plain(Instruction::IInc(lv(u8_at(code, offset + 1)? as u16), i8_at(code, offset + 2)? as i16)), offset + 3)),
		x if x == insn::i2l => plain!(Instruction::I2L),
		x if x == insn::i2f => plain!(Instruction::I2F),
		x if x == insn::i2d => plain!(Instruction::I2D),
		x if x == insn::l2i => plain!(Instruction::L2I),
		x if x == insn::l2f => plain!(Instruction::L2F),
		x if x == insn::l2d => plain!(Instruction::L2D),
		x if x == insn::f2i => plain!(Instruction::F2I),
		x if x == insn::f2l => plain!(Instruction::F2L),
		x if x == insn::f2d => plain!(Instruction::F2D),
		x if x == insn::d2i => plain!(Instruction::D2I),
		x if x == insn::d2l => plain!(Instruction::D2L),
		x if x == insn::d2f => plain!(Instruction::D2F),
		x if x == insn::i2b => plain!(Instruction::I2B),
		x if x == insn::i2c => plain!(Instruction::I2C),
		x if x == insn::i2s => plain!(Instruction::I2S),
		x if x == insn::lcmp => plain!(Instruction::LCmp),
		x if x == insn::fcmpl => plain!(Instruction::FCmpL),
		x if x == insn::fcmpg => plain!(Instruction::FCmpG),
		x if x == insn::dcmpl => plain!(Instruction::DCmpL),
		x if x == insn::dcmpg => plain!(Instruction::DCmpG),
		x if x == insn::ifeq => branch(code, offset, Instruction::IfEq),
		x if x == insn::ifne => branch(code, offset, Instruction::IfNe),
		x if x == insn::iflt => branch(code, offset, Instruction::IfLt),
		x if x == insn::ifge => branch(code, offset, Instruction::IfGe),
		x if x == insn::ifgt => branch(code, offset, Instruction::IfGt),
		x if x == insn::ifle => branch(code, offset, Instruction::IfLe),
		x if x == insn::if_icmpeq => branch(code, offset, Instruction::IfICmpEq),
		x if x == insn::if_icmpne => branch(code, offset, Instruction::IfICmpNe),
		x if x == insn::if_icmplt => branch(code, offset, Instruction::IfICmpLt),
		x if x == insn::if_icmpge => branch(code, offset, Instruction::IfICmpGe),
		x if x == insn::if_icmpgt => branch(code, offset, Instruction::IfICmpGt),
		x if x == insn::if_icmple => branch(code, offset, Instruction::IfICmpLe),
		x if x == insn::if_acmpeq => branch(code, offset, Instruction::IfACmpEq),
		x if x == insn::if_acmpne => branch(code, offset, Instruction::IfACmpNe),
		x if x == insn::goto => branch(code, offset, Instruction::Goto),
		x if x == insn::jsr => branch(code, offset, Instruction::Jsr),
		x if x == insn::ret => Ok((Raw::Plain(Instruction::Ret(lv(u8_at(code, offset + 1)? as u16))), offset + 2)),
		x if x == insn::tableswitch => decode_tableswitch(code, offset),
		x if x == insn::lookupswitch => decode_lookupswitch(code, offset),
		x if x == insn::ireturn => plain!(Instruction::IReturn),
		x if x == insn::lreturn => plain!(Instruction::LReturn),
		x if x == insn::freturn => plain!(Instruction::FReturn),
		x if x == insn::dreturn => plain!(Instruction::DReturn),
		x if x == insn::areturn => plain!(Instruction::AReturn),
		x if x == insn::r#return => plain!(Instruction::Return),
		x if x == insn::getstatic => Ok((Raw::Plain(Instruction::GetStatic(pool.field_ref(u16_at(code, offset + 1)?)?)), offset + 3)),
		x if x == insn::putstatic => Ok((Raw::Plain(Instruction::PutStatic(pool.field_ref(u16_at(code, offset + 1)?)?)), offset + 3)),
		x if x == insn::getfield => Ok((Raw::Plain(Instruction::GetField(pool.field_ref(u16_at(code, offset + 1)?)?)), offset + 3)),
		x if x == insn::putfield => Ok((Raw::Plain(Instruction::PutField(pool.field_ref(u16_at(code, offset + 1)?)?)), offset + 3)),
		x if x == insn::invokevirtual => Ok((Raw::Plain(Instruction::InvokeVirtual(pool.method_ref(u16_at(code, offset + 1)?)?.0)), offset + 3)),
		x if x == insn::invokespecial => {
			let (m, is_interface) = pool.method_ref(u16_at(code, offset + 1)?)?;
			Ok((Raw::Plain(Instruction::InvokeSpecial(m, is_interface)), offset + 3))
		}
		x if x == insn::invokestatic => {
			let (m, is_interface) = pool.method_ref(u16_at(code, offset + 1)?)?;
			Ok((Raw::Plain(Instruction::InvokeStatic(m, is_interface)), offset + 3))
		}
		x if x == insn::invokeinterface => {
			let (m, _) = pool.method_ref(u16_at(code, offset + 1)?)?;
			// count and the trailing zero byte are redundant with the descriptor; `raw_class_file`
			// hands neither back out, so there's nothing to validate them against here.
			Ok((Raw::Plain(Instruction::InvokeInterface(m)), offset + 5))
		}
		x if x == insn::invokedynamic => Ok((Raw::Plain(Instruction::InvokeDynamic(pool.invoke_dynamic(u16_at(code, offset + 1)?)?)), offset + 5)),
		x if x == insn::new => Ok((Raw::Plain(Instruction::New(pool.class_name(u16_at(code, offset + 1)?)?)), offset + 3)),
		x if x == insn::newarray => Ok((Raw::Plain(Instruction::NewArray(ArrayType::from_atype(u8_at(code, offset + 1)?)?)), offset + 2)),
		x if x == insn::anewarray => Ok((Raw::Plain(Instruction::ANewArray(pool.class_name(u16_at(code, offset + 1)?)?)), offset + 3)),
		x if x == insn::arraylength => plain!(Instruction::ArrayLength),
		x if x == insn::athrow => plain!(Instruction::AThrow),
		x if x == insn::checkcast => Ok((Raw::Plain(Instruction::CheckCast(pool.class_name(u16_at(code, offset + 1)?)?)), offset + 3)),
		x if x == insn::instanceof => Ok((Raw::Plain(Instruction::InstanceOf(pool.class_name(u16_at(code, offset + 1)?)?)), offset + 3)),
		x if x == insn::monitorenter => plain!(Instruction::MonitorEnter),
		x if x == insn::monitorexit => plain!(Instruction::MonitorExit),
		x if x == insn::wide => decode_wide(code, offset),
		x if x == insn::multianewarray => Ok((Raw::Plain(Instruction::MultiANewArray(pool.class_name(u16_at(code, offset + 1)?)?, u8_at(code, offset + 3)?)), offset + 4)),
		x if x == insn::ifnull => branch(code, offset, Instruction::IfNull),
		x if x == insn::ifnonnull => branch(code, offset, Instruction::IfNonNull),
		x if x == insn::goto_w => branch_wide(code, offset, Instruction::Goto),
		x if x == insn::jsw_w => branch_wide(code, offset, Instruction::Jsr),
		other => bail!("unsupported or reserved opcode {other:#04x}"),
	}
}

fn branch(code: &[u8], offset: usize, build: fn(Label) -> Instruction) -> Result<(Raw, usize)> {
	let target = offset as i64 + i16_at(code, offset + 1)? as i64;
	Ok((Raw::Branch(build, target as u32), offset + 3))
}

fn branch_wide(code: &[u8], offset: usize, build: fn(Label) -> Instruction) -> Result<(Raw, usize)> {
	let target = offset as i64 + i32_at(code, offset + 1)? as i64;
	Ok((Raw::Branch(build, target as u32), offset + 5))
}

/// `wide` only ever prefixes a load/store/iinc/ret; every other opcode is invalid after it.
fn decode_wide(code: &[u8], offset: usize) -> Result<(Raw, usize)> {
	let modified = u8_at(code, offset + 1)?;
	let index = u16_at(code, offset + 2)?;
	let lv = LvIndex { index };

	if modified == insn::iinc {
		let constant = i16_at(code, offset + 4)?;
		return Ok((Raw::Plain(Instruction::IInc(lv, constant)), offset + 6));
	}

	let instruction = match modified {
		x if x == insn::iload => Instruction::ILoad(lv),
		x if x == insn::lload => Instruction::LLoad(lv),
		x if x == insn::fload => Instruction::FLoad(lv),
		x if x == insn::dload => Instruction::DLoad(lv),
		x if x == insn::aload => Instruction::ALoad(lv),
		x if x == insn::istore => Instruction::IStore(lv),
		x if x == insn::lstore => Instruction::LStore(lv),
		x if x == insn::fstore => Instruction::FStore(lv),
		x if x == insn::dstore => Instruction::DStore(lv),
		x if x == insn::astore => Instruction::AStore(lv),
		x if x == insn::ret => Instruction::Ret(lv),
		other => bail!("opcode {other:#04x} cannot follow wide"),
	};
	Ok((Raw::Plain(instruction), offset + 4))
}

fn decode_tableswitch(code: &[u8], offset: usize) -> Result<(Raw, usize)> {
	let mut pos = offset + 1;
	pos += (4 - (pos % 4)) % 4;
	let default = offset as i64 + i32_at(code, pos)? as i64;
	let low = i32_at(code, pos + 4)?;
	let high = i32_at(code, pos + 8)?;
	if high < low {
		bail!("tableswitch at {offset} has high ({high}) < low ({low})");
	}
	let count = (high - low + 1) as usize;
	let mut table = Vec::with_capacity(count);
	let mut entry_pos = pos + 12;
	for _ in 0..count {
		table.push((offset as i64 + i32_at(code, entry_pos)? as i64) as u32);
		entry_pos += 4;
	}
	Ok((Raw::Table { default: default as u32, low, high, table }, entry_pos))
}

fn decode_lookupswitch(code: &[u8], offset: usize) -> Result<(Raw, usize)> {
	let mut pos = offset + 1;
	pos += (4 - (pos % 4)) % 4;
	let default = offset as i64 + i32_at(code, pos)? as i64;
	let npairs = i32_at(code, pos + 4)?;
	if npairs < 0 {
		bail!("lookupswitch at {offset} has negative npairs {npairs}");
	}
	let mut pairs = Vec::with_capacity(npairs as usize);
	let mut entry_pos = pos + 8;
	for _ in 0..npairs {
		let m = i32_at(code, entry_pos)?;
		let t = offset as i64 + i32_at(code, entry_pos + 4)? as i64;
		pairs.push((m, t as u32));
		entry_pos += 8;
	}
	Ok((Raw::Lookup { default: default as u32, pairs }, entry_pos))
}
