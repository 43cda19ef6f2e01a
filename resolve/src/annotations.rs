//! Annotation merging (Resolve step 5): fills in default element values from an annotation
//! interface's `AnnotationDefault` attributes for any occurrence missing them explicitly.

use duke::tree::annotation::{Annotation, ElementValuePair};
use duke::tree::class::ClassName;
use ingest::ProgramModel;

pub fn merge_all(program: &ProgramModel, name: &ClassName) -> (Vec<Annotation>, Vec<Vec<Annotation>>, Vec<Vec<Annotation>>) {
	let class = &program[name];

	let merged_class_annotations = class.runtime_visible_annotations.iter()
		.map(|a| merge(program, a))
		.collect();

	let merged_field_annotations = class.fields.iter()
		.map(|field| field.runtime_visible_annotations.iter().map(|a| merge(program, a)).collect())
		.collect();

	let merged_method_annotations = class.methods.iter()
		.map(|method| method.runtime_visible_annotations.iter().map(|a| merge(program, a)).collect())
		.collect();

	(merged_class_annotations, merged_field_annotations, merged_method_annotations)
}

fn merge(program: &ProgramModel, annotation: &Annotation) -> Annotation {
	let Ok(parsed) = annotation.annotation_type.parse() else { return annotation.clone() };
	let duke::tree::descriptor::Type::Object(declaring_class) = parsed.0 else { return annotation.clone() };
	let Some(declaring) = program.get(&declaring_class) else { return annotation.clone() };

	let mut merged = annotation.clone();
	let present: std::collections::HashSet<&String> = merged.element_value_pairs.iter().map(|p| &p.name).collect();

	for method in &declaring.methods {
		let Some(default) = &method.annotation_default else { continue };
		let element_name = method.name.to_string();
		if present.contains(&element_name) {
			continue;
		}
		merged.element_value_pairs.push(ElementValuePair { name: element_name, value: default.clone() });
	}

	merged
}
