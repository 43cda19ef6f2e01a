//! Stack-depth prepass: a verifier-lite abstract interpretation that determines, for every label
//! that is a join point, how many operand-stack slots are live on entry. The actual stack
//! simulation in [`crate::stack`] needs this up front so it can materialize synthetic locals for a
//! forward branch before it has walked the instructions that produce those values.

use std::collections::HashMap;
use anyhow::{anyhow, bail, Result};
use duke::tree::method::code::{Code, Instruction, Label};

/// Net operand-stack effect of one instruction: how many slots it pops, how many it pushes.
/// Category-1 values (everything but `long`/`double`) count as one slot each; this pass only needs
/// slot counts, not types, so `long`/`double` also count as one here (the real width is resolved
/// once the simulation in `stack.rs` knows the actual expression types).
fn stack_effect(instruction: &Instruction) -> (usize, usize) {
	use Instruction::*;
	match instruction {
		Nop => (0, 0),
		AConstNull | IConstM1 | IConst0 | IConst1 | IConst2 | IConst3 | IConst4 | IConst5
			| LConst0 | LConst1 | FConst0 | FConst1 | FConst2 | DConst0 | DConst1
			| BiPush(_) | SiPush(_) | Ldc(_) => (0, 1),
		ILoad(_) | LLoad(_) | FLoad(_) | DLoad(_) | ALoad(_) => (0, 1),
		IALoad | LALoad | FALoad | DALoad | AALoad | BALoad | CALoad | SALoad => (2, 1),
		IStore(_) | LStore(_) | FStore(_) | DStore(_) | AStore(_) => (1, 0),
		IAStore | LAStore | FAStore | DAStore | AAStore | BAStore | CAStore | SAStore => (3, 0),
		Pop | MonitorEnter | MonitorExit => (1, 0),
		Pop2 => (2, 0),
		Dup => (1, 2),
		DupX1 => (2, 3),
		DupX2 => (3, 4),
		Dup2 => (2, 4),
		Dup2X1 => (3, 5),
		Dup2X2 => (4, 6),
		Swap => (2, 2),
		IAdd | LAdd | FAdd | DAdd | ISub | LSub | FSub | DSub
			| IMul | LMul | FMul | DMul | IDiv | LDiv | FDiv | DDiv
			| IRem | LRem | FRem | DRem
			| IShl | LShl | IShr | LShr | IUShr | LUShr
			| IAnd | LAnd | IOr | LOr | IXor | LXor
			| LCmp | FCmpL | FCmpG | DCmpL | DCmpG => (2, 1),
		INeg | LNeg | FNeg | DNeg => (1, 1),
		IInc(..) => (0, 0),
		I2L | I2F | I2D | L2I | L2F | L2D | F2I | F2L | F2D | D2I | D2L | D2F | I2B | I2C | I2S => (1, 1),
		IfEq(_) | IfNe(_) | IfLt(_) | IfGe(_) | IfGt(_) | IfLe(_) | IfNull(_) | IfNonNull(_) => (1, 0),
		IfICmpEq(_) | IfICmpNe(_) | IfICmpLt(_) | IfICmpGe(_) | IfICmpGt(_) | IfICmpLe(_)
			| IfACmpEq(_) | IfACmpNe(_) => (2, 0),
		Goto(_) | Jsr(_) => (0, 0),
		Ret(_) => (0, 0),
		TableSwitch { .. } | LookupSwitch { .. } => (1, 0),
		IReturn | LReturn | FReturn | DReturn | AReturn => (1, 0),
		Return => (0, 0),
		GetStatic(_) => (0, 1),
		PutStatic(_) => (1, 0),
		GetField(_) => (1, 1),
		PutField(_) => (2, 0),
		// Real effect depends on the method descriptor's argument count; the caller always
		// supplies an `invoke_effect` override for these, this arm never actually runs.
		InvokeVirtual(_) | InvokeSpecial(..) | InvokeStatic(..) | InvokeInterface(_) | InvokeDynamic(_) => (0, 0),
		New(_) => (0, 1),
		NewArray(_) => (1, 1),
		ANewArray(_) => (1, 1),
		ArrayLength => (1, 1),
		AThrow => (1, 0),
		CheckCast(_) => (1, 1),
		InstanceOf(_) => (1, 1),
		MultiANewArray(_, dims) => (*dims as usize, 1),
	}
}

/// Computes, for every instruction offset that is a branch target or exception-handler start, the
/// operand-stack depth on entry. Invoke instructions are handled by the caller passing in their
/// real pop/push counts (parsed from the method descriptor), since `stack_effect` alone can't see
/// argument counts.
pub fn compute_join_depths(code: &Code, invoke_effect: impl Fn(&Instruction) -> Option<(usize, usize)>) -> Result<HashMap<Label, usize>> {
	let mut depths: HashMap<Label, usize> = HashMap::new();
	for exception in &code.exception_table {
		depths.entry(exception.handler).or_insert(1);
	}

	let mut worklist: Vec<(usize, usize)> = vec![(0, 0)];
	let mut visited_with: HashMap<usize, usize> = HashMap::new();

	let label_index: HashMap<Label, usize> = code.instructions.iter().enumerate()
		.filter_map(|(i, entry)| entry.label.map(|l| (l, i)))
		.collect();

	while let Some((index, depth)) = worklist.pop() {
		if let Some(&seen) = visited_with.get(&index) {
			if seen != depth {
				bail!("inconsistent operand stack depth at instruction {index}: {seen} vs {depth}");
			}
			continue;
		}
		visited_with.insert(index, depth);

		let Some(entry) = code.instructions.get(index) else { continue };
		if let Some(label) = entry.label {
			match depths.get(&label) {
				Some(&expected) if expected != depth => bail!("inconsistent operand stack depth at label {}: {expected} vs {depth}", label.id()),
				_ => { depths.insert(label, depth); }
			}
		}

		let (pop, push) = invoke_effect(&entry.instruction).unwrap_or_else(|| stack_effect(&entry.instruction));
		if pop > depth {
			bail!("operand stack underflow at instruction {index}");
		}
		let after = depth - pop + push;

		let mut push_target = |label: Label, worklist: &mut Vec<(usize, usize)>| -> Result<()> {
			let target = *label_index.get(&label).ok_or_else(|| anyhow!("branch to unknown label {}", label.id()))?;
			worklist.push((target, after));
			Ok(())
		};

		use Instruction::*;
		match &entry.instruction {
			Goto(l) | Jsr(l) => push_target(*l, &mut worklist)?,
			IfEq(l) | IfNe(l) | IfLt(l) | IfGe(l) | IfGt(l) | IfLe(l) | IfNull(l) | IfNonNull(l)
				| IfICmpEq(l) | IfICmpNe(l) | IfICmpLt(l) | IfICmpGe(l) | IfICmpGt(l) | IfICmpLe(l)
				| IfACmpEq(l) | IfACmpNe(l) => {
				push_target(*l, &mut worklist)?;
				worklist.push((index + 1, after));
			}
			TableSwitch { default, table, .. } => {
				push_target(*default, &mut worklist)?;
				for l in table {
					push_target(*l, &mut worklist)?;
				}
			}
			LookupSwitch { default, pairs } => {
				push_target(*default, &mut worklist)?;
				for (_, l) in pairs {
					push_target(*l, &mut worklist)?;
				}
			}
			Return | IReturn | LReturn | FReturn | DReturn | AReturn | AThrow | Ret(_) => {}
			_ => worklist.push((index + 1, after)),
		}
	}

	Ok(depths)
}
