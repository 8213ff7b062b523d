//! Raw provider payloads and the tolerant accessors used to read them.
//!
//! Provider responses vary by granted scope and account completeness, so every read
//! goes through [`Lookup`], a safe-navigation cursor that turns any missing step into an
//! absent value instead of an error.

pub mod localized;
pub mod normalize;

pub use localized::*;
pub use normalize::*;

// crates.io
use serde_json::Value;
// self
use crate::_prelude::*;

/// Parsed JSON body exactly as the provider returned it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawProfile(Value);
impl RawProfile {
	/// Wraps a parsed body.
	pub fn new(value: Value) -> Self {
		Self(value)
	}

	/// Starts a safe-navigation lookup at the document root.
	pub fn at(&self) -> Lookup<'_> {
		Lookup(Some(&self.0))
	}

	/// Borrow the underlying JSON value.
	pub fn as_value(&self) -> &Value {
		&self.0
	}

	/// Unwraps the underlying JSON value.
	pub fn into_value(self) -> Value {
		self.0
	}
}
impl From<Value> for RawProfile {
	fn from(value: Value) -> Self {
		Self(value)
	}
}

/// Cursor into a [`RawProfile`] that remembers whether every step so far existed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lookup<'a>(Option<&'a Value>);
impl<'a> Lookup<'a> {
	/// Descends into an object member.
	pub fn key(self, key: &str) -> Self {
		Self(self.0.and_then(|value| value.as_object()).and_then(|map| map.get(key)))
	}

	/// Descends into an array element.
	pub fn index(self, index: usize) -> Self {
		Self(self.0.and_then(|value| value.as_array()).and_then(|items| items.get(index)))
	}

	/// Current value, treating JSON `null` as absent.
	pub fn value(self) -> Option<&'a Value> {
		self.0.filter(|value| !value.is_null())
	}

	/// Returns true when the cursor points at an existing, non-null value.
	pub fn exists(self) -> bool {
		self.value().is_some()
	}

	/// Borrowed string value.
	pub fn str(self) -> Option<&'a str> {
		self.0.and_then(Value::as_str)
	}

	/// Scalar rendered as a string; numbers are stringified, other shapes are absent.
	pub fn string(self) -> Option<String> {
		match self.0? {
			Value::String(value) => Some(value.clone()),
			Value::Number(value) => Some(value.to_string()),
			_ => None,
		}
	}

	/// Returns true for JSON `true` or a case-insensitive `"true"` string.
	pub fn truthy(self) -> bool {
		match self.0 {
			Some(Value::Bool(value)) => *value,
			Some(Value::String(value)) => value.eq_ignore_ascii_case("true"),
			_ => false,
		}
	}
}
