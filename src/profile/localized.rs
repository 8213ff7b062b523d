//! Localized-field resolution.
//!
//! Newer payloads wrap human-readable fields as
//! `{ "preferredLocale": { "language", "country" }, "localized": { "lang_COUNTRY": value } }`
//! while older ones return the plain scalar.

// self
use crate::profile::Lookup;

/// Resolves a possibly localized value.
///
/// Scalars are returned unchanged. Structures are looked up under
/// `"<language>_<country>"` of their preferred locale; a structure lacking either
/// `preferredLocale` or `localized` resolves to `None`.
pub fn resolve_localized(field: Lookup<'_>) -> Option<String> {
	let value = field.value()?;

	if !value.is_object() {
		return field.string();
	}

	let locale = field.key("preferredLocale");
	let key = format!("{}_{}", locale.key("language").str()?, locale.key("country").str()?);

	field.key("localized").key(&key).string()
}
