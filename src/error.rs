//! The closed error taxonomy from §7, layered over the `anyhow::Error` chains every pipeline
//! crate already returns. Each stage of `run` tags its failure with the §7 kind that stage can
//! produce, so picking a process exit code never has to guess from error text.

use std::fmt;
use std::path::PathBuf;

/// One of the five fatal kinds from §7. Every variant keeps the `anyhow::Error` that caused it so
/// `{err:#}`/`{err:?}` still renders the full `.context()` chain (class/method/offset) attached
/// further down in `ingest`/`resolve`/`lower`/`emit`.
#[derive(Debug)]
pub enum TranslateError {
	/// Bad CLI flags or a missing input path: never reaches the pipeline.
	UserError { detail: String },
	/// Structural class-file damage, caught during Ingest.
	MalformedInput { class: Option<String>, source: anyhow::Error },
	/// Missing class/member, supertype cycle, or illegal final-override, caught during Resolve.
	LinkError { source: anyhow::Error },
	/// Stack underflow, unreconcilable join, or an unsupported bytecode construct, caught during
	/// Lower.
	VerifyError { source: anyhow::Error },
	/// An invariant violated after Lower should have ruled it out: a bug in the translator, not
	/// in the input.
	InternalError { source: anyhow::Error },
	/// I/O failure at a boundary (reading input, writing output).
	IoError { what: String, path: PathBuf, source: anyhow::Error },
}

impl TranslateError {
	/// Exit code per §6/§7: `1` user error, `2` malformed input or link error, `3` internal error.
	pub fn exit_code(&self) -> u8 {
		match self {
			TranslateError::UserError { .. } => 1,
			TranslateError::MalformedInput { .. } | TranslateError::LinkError { .. } => 2,
			TranslateError::VerifyError { .. } | TranslateError::InternalError { .. } => 3,
			// an IOError reading the input root is effectively a malformed/missing input; one
			// writing output after a successful translation would be a caller-environment
			// problem, but §6 doesn't carve out a sixth exit code for it, so it shares code 2.
			TranslateError::IoError { .. } => 2,
		}
	}

	pub fn malformed_input(class: Option<String>) -> impl FnOnce(anyhow::Error) -> TranslateError {
		move |source| TranslateError::MalformedInput { class, source }
	}

	pub fn link_error(source: anyhow::Error) -> TranslateError {
		TranslateError::LinkError { source }
	}

	pub fn verify_error(source: anyhow::Error) -> TranslateError {
		TranslateError::VerifyError { source }
	}

	pub fn internal_error(source: anyhow::Error) -> TranslateError {
		TranslateError::InternalError { source }
	}

	pub fn io(what: &'static str, path: PathBuf) -> impl FnOnce(anyhow::Error) -> TranslateError {
		move |source| TranslateError::IoError { what: what.to_string(), path, source }
	}
}

impl fmt::Display for TranslateError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TranslateError::UserError { detail } => write!(f, "{detail}"),
			TranslateError::MalformedInput { class: Some(class), source } => write!(f, "malformed input in class {class}: {source:#}"),
			TranslateError::MalformedInput { class: None, source } => write!(f, "malformed input: {source:#}"),
			TranslateError::LinkError { source } => write!(f, "link error: {source:#}"),
			TranslateError::VerifyError { source } => write!(f, "verify error: {source:#}"),
			TranslateError::InternalError { source } => write!(f, "internal error: {source:#}"),
			TranslateError::IoError { what, path, source } => write!(f, "I/O error while {what} ({}): {source:#}", path.display()),
		}
	}
}

impl std::error::Error for TranslateError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			TranslateError::UserError { .. } => None,
			TranslateError::MalformedInput { source, .. }
			| TranslateError::LinkError { source }
			| TranslateError::VerifyError { source }
			| TranslateError::InternalError { source }
			| TranslateError::IoError { source, .. } => Some(source),
		}
	}
}
