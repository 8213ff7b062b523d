//! Endpoint resolver: turns an API revision plus a logical field request into the exact
//! profile request path(s).
//!
//! Paths are relative to the provider site and include their query string. Unmapped
//! logical fields are omitted rather than rejected, because later revisions simply have
//! no equivalent for some legacy concepts (`email-address`, `location`, ...).

pub mod fields;

pub use fields::*;

// self
use crate::{_prelude::*, version::ApiVersion};

/// Companion lookup used by `v2` to read the primary email address.
pub const REST_V2_EMAIL_PATH: &str = "/v2/emailAddress?q=members&projection=(elements*(handle~))";
/// Userinfo endpoint shared by both OIDC revisions.
pub const USERINFO_PATH: &str = "/v2/userinfo";

const LEGACY_PICTURE_FIELD: &str = "picture-url";
const EMAIL_FIELD: &str = "email-address";

/// Request-shaping switches that are not field names.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolveOptions {
	/// Ask the legacy API for an HTTPS picture URL.
	pub secure_image_url: bool,
}

/// Endpoint label for the primary request of a revision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EndpointKind {
	/// `v1/people` or `v2/me` profile.
	Profile,
	/// `v2/emailAddress` lookup.
	EmailAddress,
	/// OIDC `v2/userinfo`.
	Userinfo,
	/// OAuth2 token endpoint.
	Token,
}
impl EndpointKind {
	/// Returns a stable label suitable for errors, span fields, or metric labels.
	pub const fn as_str(self) -> &'static str {
		match self {
			EndpointKind::Profile => "profile",
			EndpointKind::EmailAddress => "email_address",
			EndpointKind::Userinfo => "userinfo",
			EndpointKind::Token => "token",
		}
	}
}
impl Display for EndpointKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Site-relative request paths for one attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileRequest {
	/// Label of the primary request.
	pub kind: EndpointKind,
	/// Profile or userinfo path (with query).
	pub profile: String,
	/// Email lookup path, only for `v2` when `email-address` was requested.
	pub email: Option<String>,
}

/// Resolves the request path(s) for `version`.
pub fn resolve(version: ApiVersion, fields: &FieldRequest, options: ResolveOptions) -> ProfileRequest {
	match version {
		ApiVersion::LegacyV1 | ApiVersion::LegacyV1Query => {
			let projection = fields
				.iter()
				.map(|field| {
					if field == LEGACY_PICTURE_FIELD && options.secure_image_url {
						format!("{field};secure=true")
					} else {
						field.to_owned()
					}
				})
				.collect::<Vec<_>>()
				.join(",");

			ProfileRequest {
				kind: EndpointKind::Profile,
				profile: format!("/v1/people/~:({projection})?format=json"),
				email: None,
			}
		},
		ApiVersion::RestV2 => {
			let projection =
				fields.iter().filter_map(rest_v2_projection).collect::<Vec<_>>().join(",");

			ProfileRequest {
				kind: EndpointKind::Profile,
				profile: format!("/v2/me?projection=({projection})"),
				email: fields.contains(EMAIL_FIELD).then(|| REST_V2_EMAIL_PATH.to_owned()),
			}
		},
		ApiVersion::OidcUserinfoLegacyScopes | ApiVersion::OidcUserinfoModernScopes =>
			ProfileRequest { kind: EndpointKind::Userinfo, profile: USERINFO_PATH.into(), email: None },
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn fields(names: &[&str]) -> FieldRequest {
		FieldRequest::new(names.iter().copied())
	}

	#[test]
	fn legacy_passes_fields_verbatim() {
		let request = resolve(
			ApiVersion::LegacyV1,
			&fields(&["id", "first-name", "industry", "made-up"]),
			ResolveOptions::default(),
		);

		assert_eq!(request.profile, "/v1/people/~:(id,first-name,industry,made-up)?format=json");
		assert_eq!(request.email, None);
		assert_eq!(request.kind, EndpointKind::Profile);
	}

	#[test]
	fn legacy_secure_picture_modifier() {
		let secure = ResolveOptions { secure_image_url: true };
		let request = resolve(ApiVersion::LegacyV1Query, &fields(&["picture-url"]), secure);

		assert_eq!(request.profile, "/v1/people/~:(picture-url;secure=true)?format=json");

		let request =
			resolve(ApiVersion::LegacyV1, &fields(&["picture-url"]), ResolveOptions::default());

		assert_eq!(request.profile, "/v1/people/~:(picture-url)?format=json");
	}

	#[test]
	fn rest_v2_translates_and_splits_email() {
		let request = resolve(
			ApiVersion::RestV2,
			&fields(&["first-name", "email-address", "picture-url"]),
			ResolveOptions::default(),
		);

		assert_eq!(
			request.profile,
			"/v2/me?projection=(localizedFirstName,profilePicture(displayImage~:playableStreams))"
		);
		assert!(!request.profile.contains("email"));
		assert_eq!(request.email.as_deref(), Some(REST_V2_EMAIL_PATH));
	}

	#[test]
	fn rest_v2_drops_unmapped_default_fields() {
		let request = resolve(
			ApiVersion::RestV2,
			&FieldRequest::new(ApiVersion::LegacyV1.default_fields().iter().copied()),
			ResolveOptions { secure_image_url: true },
		);

		assert_eq!(
			request.profile,
			"/v2/me?projection=(id,localizedFirstName,localizedLastName,headline,profilePicture(displayImage~:playableStreams))"
		);
		assert!(request.email.is_some());
	}

	#[test]
	fn rest_v2_skips_email_lookup_when_not_requested() {
		let request =
			resolve(ApiVersion::RestV2, &fields(&["id", "last-name"]), ResolveOptions::default());

		assert_eq!(request.profile, "/v2/me?projection=(id,localizedLastName)");
		assert_eq!(request.email, None);
	}

	#[test]
	fn userinfo_ignores_fields() {
		for version in [ApiVersion::OidcUserinfoLegacyScopes, ApiVersion::OidcUserinfoModernScopes] {
			let request = resolve(version, &fields(&["email-address", "id"]), ResolveOptions::default());

			assert_eq!(request.profile, USERINFO_PATH);
			assert_eq!(request.kind, EndpointKind::Userinfo);
			assert_eq!(request.email, None);
		}
	}
}
