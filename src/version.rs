//! Provider API revisions and the static per-revision constants that go with them.

// self
use crate::_prelude::*;

/// LinkedIn API revision targeted by a strategy.
///
/// The revision selects the endpoint shape, the field vocabulary, the token transport,
/// and the normalization rules. It is fixed for the lifetime of an attempt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiVersion {
	/// `v1/people` profile API served from `api.linkedin.com`.
	LegacyV1,
	/// `v1/people` profile API served from `www.linkedin.com` with site-relative OAuth URLs.
	LegacyV1Query,
	/// `v2/me` projection API with a separate email lookup.
	RestV2,
	/// `v2/userinfo` claims requested through the legacy `r_*` scopes.
	OidcUserinfoLegacyScopes,
	/// `v2/userinfo` claims requested through `openid profile email`.
	#[default]
	OidcUserinfoModernScopes,
}
impl ApiVersion {
	/// Every supported revision, oldest first.
	pub const ALL: [ApiVersion; 5] = [
		ApiVersion::LegacyV1,
		ApiVersion::LegacyV1Query,
		ApiVersion::RestV2,
		ApiVersion::OidcUserinfoLegacyScopes,
		ApiVersion::OidcUserinfoModernScopes,
	];

	/// Returns a stable label suitable for configuration files, span fields, and metrics.
	pub const fn as_str(self) -> &'static str {
		match self {
			ApiVersion::LegacyV1 => "legacy_v1",
			ApiVersion::LegacyV1Query => "legacy_v1_query",
			ApiVersion::RestV2 => "rest_v2",
			ApiVersion::OidcUserinfoLegacyScopes => "oidc_userinfo_legacy_scopes",
			ApiVersion::OidcUserinfoModernScopes => "oidc_userinfo_modern_scopes",
		}
	}

	/// Groups revisions that share an `info` bundle shape.
	pub const fn family(self) -> ApiFamily {
		match self {
			ApiVersion::LegacyV1 | ApiVersion::LegacyV1Query => ApiFamily::Legacy,
			ApiVersion::RestV2 => ApiFamily::Rest,
			ApiVersion::OidcUserinfoLegacyScopes | ApiVersion::OidcUserinfoModernScopes =>
				ApiFamily::Userinfo,
		}
	}

	/// Provider site that profile paths are resolved against.
	pub const fn site(self) -> &'static str {
		match self {
			ApiVersion::LegacyV1Query => "https://www.linkedin.com",
			_ => "https://api.linkedin.com",
		}
	}

	/// Authorization endpoint, absolute or relative to [`site`](Self::site).
	pub const fn authorize_url(self) -> &'static str {
		match self {
			ApiVersion::LegacyV1 =>
				"https://www.linkedin.com/uas/oauth2/authorization?response_type=code",
			ApiVersion::LegacyV1Query => "/uas/oauth2/authorization?response_type=code",
			_ => "https://www.linkedin.com/oauth/v2/authorization?response_type=code",
		}
	}

	/// Token endpoint, absolute or relative to [`site`](Self::site).
	pub const fn token_url(self) -> &'static str {
		match self {
			ApiVersion::LegacyV1 => "https://www.linkedin.com/uas/oauth2/accessToken",
			ApiVersion::LegacyV1Query => "/uas/oauth2/accessToken",
			_ => "https://www.linkedin.com/oauth/v2/accessToken",
		}
	}

	/// Scope string requested when the configuration does not override it.
	pub const fn default_scope(self) -> &'static str {
		match self {
			ApiVersion::LegacyV1 | ApiVersion::LegacyV1Query => "r_basicprofile r_emailaddress",
			ApiVersion::RestV2 => "r_liteprofile r_emailaddress",
			ApiVersion::OidcUserinfoLegacyScopes => "openid r_liteprofile r_emailaddress",
			ApiVersion::OidcUserinfoModernScopes => "openid profile email",
		}
	}

	/// Logical fields requested when the configuration does not override them.
	pub const fn default_fields(self) -> &'static [&'static str] {
		match self {
			ApiVersion::LegacyV1 | ApiVersion::LegacyV1Query => &[
				"id",
				"email-address",
				"first-name",
				"last-name",
				"headline",
				"location",
				"industry",
				"picture-url",
				"public-profile-url",
			],
			ApiVersion::RestV2 => &["id", "first-name", "last-name", "picture-url", "email-address"],
			ApiVersion::OidcUserinfoLegacyScopes | ApiVersion::OidcUserinfoModernScopes => &[],
		}
	}
}
impl Display for ApiVersion {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for ApiVersion {
	type Err = UnknownApiVersion;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|version| version.as_str().eq_ignore_ascii_case(s))
			.ok_or_else(|| UnknownApiVersion(s.to_owned()))
	}
}

/// Error returned when parsing an unknown revision label.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Unknown LinkedIn API version `{0}`.")]
pub struct UnknownApiVersion(pub String);

/// Revisions that share the same `info` bundle layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApiFamily {
	/// `v1/people` profile formats.
	Legacy,
	/// `v2/me` projection format.
	Rest,
	/// OpenID Connect userinfo claims.
	Userinfo,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn labels_parse_back_to_the_same_version() {
		for version in ApiVersion::ALL {
			assert_eq!(version.as_str().parse::<ApiVersion>(), Ok(version));
		}

		assert_eq!(
			"v3".parse::<ApiVersion>(),
			Err(UnknownApiVersion("v3".into())),
			"Unknown labels must be rejected."
		);
	}

	#[test]
	fn serde_uses_snake_case_labels() {
		let version: ApiVersion = serde_json::from_str("\"rest_v2\"")
			.expect("Snake-case label should deserialize successfully.");

		assert_eq!(version, ApiVersion::RestV2);
		assert_eq!(
			serde_json::to_string(&ApiVersion::OidcUserinfoLegacyScopes)
				.expect("Version should serialize."),
			"\"oidc_userinfo_legacy_scopes\""
		);
	}

	#[test]
	fn families_group_compatible_versions() {
		assert_eq!(ApiVersion::LegacyV1Query.family(), ApiFamily::Legacy);
		assert_eq!(ApiVersion::RestV2.family(), ApiFamily::Rest);
		assert_eq!(ApiVersion::OidcUserinfoModernScopes.family(), ApiFamily::Userinfo);
	}

	#[test]
	fn userinfo_versions_request_no_fields() {
		assert!(ApiVersion::OidcUserinfoLegacyScopes.default_fields().is_empty());
		assert_eq!(ApiVersion::LegacyV1.default_fields().len(), 9);
		assert!(ApiVersion::RestV2.default_fields().contains(&"email-address"));
	}
}
