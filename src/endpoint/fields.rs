//! Logical field requests and the `v2` projection vocabulary.

// std
use std::collections::HashSet;
// self
use crate::_prelude::*;

/// Ordered, de-duplicated list of logical profile field names (`first-name`,
/// `picture-url`, ...).
///
/// Names are kept verbatim; whether a name means anything is decided per revision by
/// the endpoint resolver, which silently drops names it cannot translate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct FieldRequest(Vec<String>);
impl FieldRequest {
	/// Builds a request from any iterator, trimming names and skipping blanks and repeats.
	pub fn new<I, S>(fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut seen = HashSet::new();
		let fields = fields
			.into_iter()
			.filter_map(|field| {
				let field = field.as_ref().trim();

				(!field.is_empty() && seen.insert(field.to_owned())).then(|| field.to_owned())
			})
			.collect();

		Self(fields)
	}

	/// Returns true if the logical name was requested.
	pub fn contains(&self, field: &str) -> bool {
		self.0.iter().any(|candidate| candidate == field)
	}

	/// Iterator over logical names in request order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(String::as_str)
	}

	/// Number of logical names.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if nothing was requested.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl From<Vec<String>> for FieldRequest {
	fn from(value: Vec<String>) -> Self {
		Self::new(value)
	}
}
impl From<FieldRequest> for Vec<String> {
	fn from(value: FieldRequest) -> Self {
		value.0
	}
}
impl<'a> FromIterator<&'a str> for FieldRequest {
	fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
		Self::new(iter)
	}
}

/// Translates a logical field into its `v2/me` projection token.
///
/// `None` means the revision has no equivalent and the field must be dropped.
pub fn rest_v2_projection(field: &str) -> Option<&'static str> {
	match field {
		"id" => Some("id"),
		"first-name" => Some("localizedFirstName"),
		"last-name" => Some("localizedLastName"),
		"picture-url" => Some("profilePicture(displayImage~:playableStreams)"),
		"headline" => Some("headline"),
		"maiden-name" => Some("maidenName"),
		"vanity-name" => Some("vanityName"),
		_ => None,
	}
}
