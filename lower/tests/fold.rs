//! End-to-end scenario S6 (constant folding): a method body that only ever pushes and adds
//! constants lowers to a single `return`, not a sequence of dead stack temporaries.

use anyhow::Result;
use java_string::JavaStr;
use duke::tree::class::{ClassAccess, ClassFile, ClassName};
use duke::tree::method::{Method, MethodAccess, MethodDescriptor, MethodName, MethodNameAndDesc};
use duke::tree::method::code::{Code, Instruction, InstructionListEntry};
use duke::tree::version::Version;
use ingest::ProgramModel;
use lower::{lower_program, LowerConfig};
use lower::tir::{Constant, TIRExpression, TIRStatement};
use resolve::{resolve, ResolveConfig};

fn class_name(name: &str) -> ClassName {
	ClassName::try_from(JavaStr::from_str(name).to_owned()).unwrap()
}

fn method_name(name: &str) -> MethodName {
	MethodName::try_from(JavaStr::from_str(name).to_owned()).unwrap()
}

fn method_desc(desc: &str) -> MethodDescriptor {
	MethodDescriptor::try_from(JavaStr::from_str(desc).to_owned()).unwrap()
}

fn entry(instruction: Instruction) -> InstructionListEntry {
	InstructionListEntry { label: None, frame: None, instruction }
}

#[test]
fn constant_addition_folds_to_a_single_return() -> Result<()> {
	let mut method = Method::new(MethodAccess::from(0x0009u16 /* public static */), method_name("five"), method_desc("()I"));
	method.code = Some(Code {
		max_stack: Some(2),
		max_locals: Some(0),
		instructions: vec![
			entry(Instruction::IConst2),
			entry(Instruction::IConst3),
			entry(Instruction::IAdd),
			entry(Instruction::IReturn),
		],
		..Code::default()
	});

	let mut class = ClassFile::new(Version::V1_8, ClassAccess::from(0x0021u16), class_name("Arith"), None, Vec::new());
	class.methods.push(method);

	let mut program = ProgramModel::new();
	program.insert(class.name.clone(), class);

	let linked = resolve(program, &ResolveConfig::default())?;
	let lowered = lower_program(&linked, &LowerConfig::default())?;

	let key = (class_name("Arith"), MethodNameAndDesc { name: method_name("five"), desc: method_desc("()I") });
	let body = lowered.bodies.get(&key).expect("the method has a body to lower");

	assert_eq!(body.statements.len(), 1, "folding should leave exactly the one return statement");
	match &body.statements[0] {
		TIRStatement::Return(Some(TIRExpression::Constant(Constant::Int(value)))) => assert_eq!(*value, 5),
		other => panic!("expected a folded `return 5`, got {other:?}"),
	}

	Ok(())
}
