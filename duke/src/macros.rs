
/// Assuming a `struct Foo(Cow<'static, str>);`, creates implementations for
/// - `From<String> for Foo`, `From<&str> for Foo`, and
/// - `From<Foo> for String`, `From<&'a Foo> for &'a str`, and
/// - `.as_mut_string(&mut self) -> &mut String`, `.as_str(&self) -> &str` and
/// - `AsRef<str> for Foo`.
macro_rules! from_impl_for_string_and_str {
	($name:ident) => {
		impl From<String> for $name {
			fn from(value: String) -> Self {
				$name(value.into())
			}
		}

		impl From<&'static str> for $name {
			fn from(value: &'static str) -> Self {
				$name(value.into())
			}
		}

		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0.into_owned()
			}
		}

		impl<'a> From<&'a $name> for &'a str {
			fn from(value: &'a $name) -> Self {
				&value.0
			}
		}

		impl $name {
			pub fn as_mut_string(&mut self) -> &mut String {
				self.0.to_mut()
			}

			pub fn as_str(&self) -> &str {
				&self.0
			}
		}

		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				self.as_str()
			}
		}
	}
}

/// Assuming a `struct Foo(Cow<'static, str>);`, creates implementations for
/// - `PartialEq<&str> for Foo`, `PartialEq<str> for Foo`, and
/// - `PartialEq<Foo> for &str`, `PartialEq<Foo> for str`.
macro_rules! partial_eq_impl_for_str {
	($name:ident) => {
		impl PartialEq<&str> for $name {
			fn eq(&self, other: &&str) -> bool {
				self.0 == *other
			}
		}

		impl PartialEq<str> for $name {
			fn eq(&self, other: &str) -> bool {
				self.0 == other
			}
		}

		impl PartialEq<$name> for &str {
			fn eq(&self, other: &$name) -> bool {
				*self == other.0
			}
		}

		impl PartialEq<$name> for str {
			fn eq(&self, other: &$name) -> bool {
				self == other.0
			}
		}
	}
}

pub(crate) use from_impl_for_string_and_str;
pub(crate) use partial_eq_impl_for_str;

/// Declares a pair of a sized owned string-like newtype and its unsized borrowed slice
/// counterpart, the way [`String`]/[`str`] or [`std::path::PathBuf`]/[`std::path::Path`] relate.
///
/// `$owned` wraps a [`java_string::JavaString`], `$slice` wraps a [`java_string::JavaStr`].
/// Both enforce the same validity predicate on construction (`check_valid`, optionally supplied
/// inline as `is_valid(s) = ...;`, otherwise looked up as an inherent `fn check_valid(&JavaStr) ->
/// anyhow::Result<()>` defined next to the macro invocation).
macro_rules! make_string_str_like {
	($owned:ident, $slice:ident) => {
		make_string_str_like!(
			pub $owned(java_string::JavaString);
			pub $slice(java_string::JavaStr);
			is_valid(_s) = Ok(());
		);
	};
	(
		$(#[$owned_meta:meta])*
		$owned_vis:vis $owned:ident ($owned_inner:ty);
		$(#[$slice_meta:meta])*
		$slice_vis:vis $slice:ident ($slice_inner:ty);
		$(is_valid($s:ident) = $valid_body:expr;)?
	) => {
		$(#[$owned_meta])*
		#[derive(Debug, Clone, PartialEq, Eq, Hash)]
		$owned_vis struct $owned($owned_inner);

		$(#[$slice_meta])*
		#[derive(Debug, PartialEq, Eq, Hash)]
		#[repr(transparent)]
		$slice_vis struct $slice($slice_inner);

		impl $owned {
			/// # Safety
			/// `inner` must already satisfy this type's validity predicate.
			pub unsafe fn from_inner_unchecked(inner: $owned_inner) -> $owned {
				$owned(inner)
			}

			pub fn as_inner(&self) -> &$slice_inner {
				&self.0
			}

			pub fn as_slice(&self) -> &$slice {
				// Safety: `$slice` is `#[repr(transparent)]` over `$slice_inner`, matching `self.0`'s type.
				unsafe { $slice::from_inner_unchecked(&self.0) }
			}

			$(
				fn check_valid($s: &$slice_inner) -> anyhow::Result<()> {
					$valid_body
				}
			)?

			pub fn is_valid(s: &$slice_inner) -> bool {
				Self::check_valid(s).is_ok()
			}
		}

		impl $slice {
			/// # Safety
			/// `inner` must already satisfy this type's validity predicate.
			pub const unsafe fn from_inner_unchecked(inner: &$slice_inner) -> &$slice {
				// Safety: `$slice` is `#[repr(transparent)]` over `$slice_inner`, so the two share layout,
				// the same way `std::path::Path` is cast from `&OsStr`.
				unsafe { &*(inner as *const $slice_inner as *const $slice) }
			}

			pub fn as_inner(&self) -> &$slice_inner {
				&self.0
			}

			pub fn as_str(&self) -> &$slice_inner {
				&self.0
			}
		}

		impl ToOwned for $slice {
			type Owned = $owned;
			fn to_owned(&self) -> $owned {
				$owned(self.0.to_owned())
			}
		}

		impl std::ops::Deref for $owned {
			type Target = $slice;
			fn deref(&self) -> &$slice {
				self.as_slice()
			}
		}

		impl std::borrow::Borrow<$slice> for $owned {
			fn borrow(&self) -> &$slice {
				self.as_slice()
			}
		}

		impl TryFrom<$owned_inner> for $owned {
			type Error = anyhow::Error;
			fn try_from(value: $owned_inner) -> anyhow::Result<$owned> {
				Self::check_valid(&value)?;
				Ok($owned(value))
			}
		}
	};
}

/// Implements [`Display`][std::fmt::Display] for an owned/slice pair created by
/// [`make_string_str_like`], delegating to the inner [`java_string::JavaStr`]'s `Display` impl.
macro_rules! make_display {
	($owned:ident, $slice:ident) => {
		impl std::fmt::Display for $owned {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				std::fmt::Display::fmt(self.as_slice(), f)
			}
		}
		impl std::fmt::Display for $slice {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				std::fmt::Display::fmt(self.as_inner(), f)
			}
		}
	};
}

pub(crate) use make_string_str_like;
pub(crate) use make_display;