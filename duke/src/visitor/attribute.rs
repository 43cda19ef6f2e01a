use anyhow::Result;
use java_string::JavaString;
use crate::tree::attribute::Attribute;

/// Placeholder for whatever constant-pool context an unknown attribute's raw bytes might need
/// to be resolved against. The tree model never holds raw pool indices itself, so by the time a
/// [`UnknownAttributeVisitor`] runs there's nothing left to look up here.
pub struct Pool;

pub trait UnknownAttributeVisitor: Sized {
	fn read(name: JavaString, bytes: Vec<u8>, pool: &Pool) -> Result<Self>;

	/// Note that because we don't pass the pool as well, it might be impossible to parse the
	/// attribute. Therefore, you can return `None` to indicate that.
	fn from_attribute(attribute: Attribute) -> Result<Option<Self>>;
}