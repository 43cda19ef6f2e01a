//! Inlines legacy `jsr`/`ret` subroutine pairs (pre-Java 6 `finally` compilation) before the stack
//! simulation ever sees them: each call site gets its own clone of the subroutine body, with `ret`
//! replaced by an unconditional jump back to the call site's return address and every label in the
//! clone freshened so two inlined copies never share a label id. Nested `jsr` (a subroutine calling
//! another subroutine) and recursive subroutines are rejected as unsupported rather than inlined.

use std::collections::HashMap;
use anyhow::{bail, Result};
use duke::tree::method::code::{Code, Instruction, InstructionListEntry, Label};

pub fn inline_subroutines(code: &Code) -> Result<Code> {
	if !code.instructions.iter().any(|e| matches!(e.instruction, Instruction::Jsr(_))) {
		return Ok(code.clone());
	}

	let label_index: HashMap<Label, usize> = code.instructions.iter().enumerate()
		.filter_map(|(i, e)| e.label.map(|l| (l, i)))
		.collect();

	let mut next_label_id: u16 = code.instructions.iter()
		.filter_map(|e| e.label.map(|l| l.id()))
		.max()
		.map(|id| id + 1)
		.unwrap_or(0);

	let mut out: Vec<InstructionListEntry> = Vec::with_capacity(code.instructions.len());
	for entry in &code.instructions {
		match &entry.instruction {
			Instruction::Jsr(target) => {
				out.push(InstructionListEntry { label: entry.label, frame: entry.frame.clone(), instruction: Instruction::Nop });
				let return_label = Label::new(next_label_id);
				next_label_id += 1;
				let start = *label_index.get(target).ok_or_else(|| anyhow::anyhow!("jsr to unknown label {}", target.id()))?;
				let body = subroutine_body(&code.instructions, start)?;
				out.extend(clone_with_fresh_labels(&body, return_label, &mut next_label_id)?);
				out.push(InstructionListEntry { label: Some(return_label), frame: None, instruction: Instruction::Nop });
			}
			_ => out.push(entry.clone()),
		}
	}

	Ok(Code { instructions: out, ..code.clone() })
}

/// The straight-line slice from `start` through its matching `ret`, inclusive. Rejects a nested
/// `jsr` inside that range: chained `finally` subroutines are a real but rare javac output shape
/// this pass doesn't attempt to reconstruct.
fn subroutine_body(instructions: &[InstructionListEntry], start: usize) -> Result<&[InstructionListEntry]> {
	let mut index = start;
	loop {
		let Some(entry) = instructions.get(index) else {
			bail!("subroutine starting at instruction {start} runs off the end of the method without a ret");
		};
		match &entry.instruction {
			Instruction::Ret(_) => return Ok(&instructions[start..=index]),
			Instruction::Jsr(_) => bail!("nested jsr/ret subroutines are not supported"),
			_ => index += 1,
		}
	}
}

/// Clones `body`, replacing its trailing `ret` with `Goto(return_to)` and remapping every label
/// the body defines to a fresh id, so branches internal to the subroutine keep working after the
/// clone is spliced into the instruction stream, without colliding with any other inlined copy.
fn clone_with_fresh_labels(body: &[InstructionListEntry], return_to: Label, next_label_id: &mut u16) -> Result<Vec<InstructionListEntry>> {
	let mut remap: HashMap<Label, Label> = HashMap::new();
	for entry in body {
		if let Some(label) = entry.label {
			let fresh = Label::new(*next_label_id);
			*next_label_id += 1;
			remap.insert(label, fresh);
		}
	}

	let rewrite = |label: Label| remap.get(&label).copied().unwrap_or(label);

	let mut cloned = Vec::with_capacity(body.len());
	for entry in body {
		let instruction = match &entry.instruction {
			Instruction::Ret(_) => Instruction::Goto(return_to),
			Instruction::Goto(l) => Instruction::Goto(rewrite(*l)),
			Instruction::IfEq(l) => Instruction::IfEq(rewrite(*l)),
			Instruction::IfNe(l) => Instruction::IfNe(rewrite(*l)),
			Instruction::IfLt(l) => Instruction::IfLt(rewrite(*l)),
			Instruction::IfGe(l) => Instruction::IfGe(rewrite(*l)),
			Instruction::IfGt(l) => Instruction::IfGt(rewrite(*l)),
			Instruction::IfLe(l) => Instruction::IfLe(rewrite(*l)),
			Instruction::IfICmpEq(l) => Instruction::IfICmpEq(rewrite(*l)),
			Instruction::IfICmpNe(l) => Instruction::IfICmpNe(rewrite(*l)),
			Instruction::IfICmpLt(l) => Instruction::IfICmpLt(rewrite(*l)),
			Instruction::IfICmpGe(l) => Instruction::IfICmpGe(rewrite(*l)),
			Instruction::IfICmpGt(l) => Instruction::IfICmpGt(rewrite(*l)),
			Instruction::IfICmpLe(l) => Instruction::IfICmpLe(rewrite(*l)),
			Instruction::IfACmpEq(l) => Instruction::IfACmpEq(rewrite(*l)),
			Instruction::IfACmpNe(l) => Instruction::IfACmpNe(rewrite(*l)),
			Instruction::IfNull(l) => Instruction::IfNull(rewrite(*l)),
			Instruction::IfNonNull(l) => Instruction::IfNonNull(rewrite(*l)),
			Instruction::TableSwitch { default, low, high, table } => Instruction::TableSwitch {
				default: rewrite(*default),
				low: *low,
				high: *high,
				table: table.iter().map(|l| rewrite(*l)).collect(),
			},
			Instruction::LookupSwitch { default, pairs } => Instruction::LookupSwitch {
				default: rewrite(*default),
				pairs: pairs.iter().map(|(v, l)| (*v, rewrite(*l))).collect(),
			},
			other => other.clone(),
		};
		cloned.push(InstructionListEntry {
			label: entry.label.map(rewrite),
			frame: entry.frame.clone(),
			instruction,
		});
	}
	Ok(cloned)
}
