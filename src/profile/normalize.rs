//! Normalizer: maps any revision's raw payload onto [`NormalizedIdentity`].
//!
//! Normalization never fails once JSON is in hand. Every missing or oddly shaped field
//! becomes `None`.

// crates.io
use serde_json::{Map, Value, json};
// self
use crate::{
	_prelude::*,
	profile::{Lookup, RawProfile, localized::resolve_localized},
	version::{ApiFamily, ApiVersion},
};

/// Base URL that OIDC vanity names are appended to.
pub const PUBLIC_PROFILE_BASE_URL: &str = "https://www.linkedin.com/in/";

/// Label used for the public profile entry in [`NormalizedIdentity::urls`].
pub const PUBLIC_PROFILE_URL_LABEL: &str = "public_profile";

/// Stable identity record exposed to the host, whatever revision produced it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedIdentity {
	/// Provider-unique member identifier.
	pub uid: Option<String>,
	/// Display name.
	pub name: Option<String>,
	/// Given name.
	pub first_name: Option<String>,
	/// Family name.
	pub last_name: Option<String>,
	/// Nickname (legacy revisions reuse the display name).
	pub nickname: Option<String>,
	/// Primary email address.
	pub email: Option<String>,
	/// Free-form location.
	pub location: Option<String>,
	/// Headline or profile description.
	pub description: Option<String>,
	/// Profile picture URL.
	pub picture_url: Option<String>,
	/// Public profile URL.
	pub public_profile_url: Option<String>,
	/// Maiden name.
	pub maiden_name: Option<String>,
	/// Vanity name (the public profile slug).
	pub vanity_name: Option<String>,
	/// Labelled URLs.
	pub urls: BTreeMap<String, String>,
	/// Untouched profile payload.
	pub raw: RawProfile,
}

/// Extracts only the unique identifier, without needing any companion payload.
pub fn uid(version: ApiVersion, raw: &RawProfile) -> Option<String> {
	match version.family() {
		ApiFamily::Legacy | ApiFamily::Rest => raw.at().key("id").string(),
		ApiFamily::Userinfo => raw.at().key("sub").string(),
	}
}

/// Maps `raw` (plus the `v2` email lookup body, when one was fetched) into the
/// normalized contract for `version`.
pub fn normalize(
	version: ApiVersion,
	raw: &RawProfile,
	email: Option<&RawProfile>,
) -> NormalizedIdentity {
	let mut identity = match version {
		ApiVersion::LegacyV1 | ApiVersion::LegacyV1Query => normalize_legacy(raw.at()),
		ApiVersion::RestV2 => normalize_rest_v2(raw.at(), email),
		ApiVersion::OidcUserinfoLegacyScopes => normalize_userinfo_legacy(raw.at()),
		ApiVersion::OidcUserinfoModernScopes => normalize_userinfo_modern(raw.at()),
	};

	identity.uid = uid(version, raw);
	identity.raw = raw.clone();

	if let Some(url) = &identity.public_profile_url {
		identity.urls.insert(PUBLIC_PROFILE_URL_LABEL.into(), url.clone());
	}

	identity
}

/// Reads the primary address out of a `v2/emailAddress` response.
///
/// Present only when `elements` is a non-empty array whose first element carries a
/// `handle~` object with an `emailAddress`.
pub fn email_from_lookup(response: &RawProfile) -> Option<String> {
	response.at().key("elements").index(0).key("handle~").key("emailAddress").string()
}

/// Builds the host-facing `info` bundle: family-specific keys, always present, `null`
/// when absent.
pub fn info(version: ApiVersion, identity: &NormalizedIdentity) -> Map<String, Value> {
	let bundle = match version.family() {
		ApiFamily::Legacy => json!({
			"name": identity.name,
			"email": identity.email,
			"nickname": identity.nickname,
			"first_name": identity.first_name,
			"last_name": identity.last_name,
			"location": identity.location,
			"description": identity.description,
			"image": identity.picture_url,
			"urls": { "public_profile": identity.public_profile_url },
		}),
		ApiFamily::Rest => json!({
			"email": identity.email,
			"first_name": identity.first_name,
			"last_name": identity.last_name,
			"maiden_name": identity.maiden_name,
			"vanity_name": identity.vanity_name,
			"headline": identity.description,
			"picture_url": identity.picture_url,
		}),
		ApiFamily::Userinfo => {
			let mut bundle = json!({
				"name": identity.name,
				"email": identity.email,
				"first_name": identity.first_name,
				"last_name": identity.last_name,
				"picture_url": identity.picture_url,
			});

			if version == ApiVersion::OidcUserinfoLegacyScopes {
				bundle["public_profile_url"] = json!(identity.public_profile_url);
			}

			bundle
		},
	};

	match bundle {
		Value::Object(map) => map,
		_ => Map::new(),
	}
}

/// Builds the host-facing `extra` bundle holding the untouched payload.
pub fn extra(raw: &RawProfile) -> Map<String, Value> {
	let mut map = Map::new();

	map.insert("raw_info".into(), raw.as_value().clone());

	map
}

fn normalize_legacy(raw: Lookup<'_>) -> NormalizedIdentity {
	let first_name = raw.key("firstName").string();
	let last_name = raw.key("lastName").string();
	let name = join_name(first_name.as_deref(), last_name.as_deref());
	let location = raw.key("location");

	NormalizedIdentity {
		nickname: name.clone(),
		name,
		first_name,
		last_name,
		email: raw.key("emailAddress").string(),
		location: location.key("name").string().or_else(|| location.string()),
		description: raw.key("headline").string(),
		picture_url: raw.key("pictureUrl").string(),
		public_profile_url: raw.key("publicProfileUrl").string(),
		..Default::default()
	}
}

fn normalize_rest_v2(raw: Lookup<'_>, email: Option<&RawProfile>) -> NormalizedIdentity {
	let first_name =
		raw.key("localizedFirstName").string().or_else(|| resolve_localized(raw.key("firstName")));
	let last_name =
		raw.key("localizedLastName").string().or_else(|| resolve_localized(raw.key("lastName")));
	let picture_url = raw
		.key("profilePicture")
		.key("displayImage~")
		.key("elements")
		.index(0)
		.key("identifiers")
		.index(0)
		.key("identifier")
		.string();

	NormalizedIdentity {
		name: join_name(first_name.as_deref(), last_name.as_deref()),
		first_name,
		last_name,
		email: email.and_then(email_from_lookup),
		description: resolve_localized(raw.key("headline"))
			.or_else(|| raw.key("localizedHeadline").string()),
		picture_url,
		maiden_name: resolve_localized(raw.key("maidenName")),
		vanity_name: raw.key("vanityName").string(),
		..Default::default()
	}
}

fn normalize_userinfo_legacy(raw: Lookup<'_>) -> NormalizedIdentity {
	let first_name = raw.key("given_name").string();
	let last_name = raw.key("family_name").string();
	let vanity_name = raw.key("vanityName").string();

	NormalizedIdentity {
		name: raw
			.key("name")
			.string()
			.or_else(|| join_name(first_name.as_deref(), last_name.as_deref())),
		first_name,
		last_name,
		email: raw.key("email").string(),
		picture_url: raw.key("picture").string(),
		public_profile_url: vanity_name.as_ref().map(|slug| format!("{PUBLIC_PROFILE_BASE_URL}{slug}")),
		vanity_name,
		..Default::default()
	}
}

fn normalize_userinfo_modern(raw: Lookup<'_>) -> NormalizedIdentity {
	let first_name = resolve_localized(raw.key("given_name"));
	let last_name = resolve_localized(raw.key("family_name"));
	// Unverified addresses are withheld; a missing `email_verified` counts as unverified.
	let email =
		if raw.key("email_verified").truthy() { raw.key("email").string() } else { None };

	NormalizedIdentity {
		name: resolve_localized(raw.key("name"))
			.or_else(|| join_name(first_name.as_deref(), last_name.as_deref())),
		first_name,
		last_name,
		email,
		picture_url: resolve_localized(raw.key("picture")),
		..Default::default()
	}
}

fn join_name(first: Option<&str>, last: Option<&str>) -> Option<String> {
	let name = format!("{} {}", first.unwrap_or_default(), last.unwrap_or_default());
	let name = name.trim();

	(!name.is_empty()).then(|| name.to_owned())
}
