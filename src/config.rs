//! Strategy configuration.
//!
//! [`StrategyConfigBuilder`] is the loose, serde-friendly shape hosts load from their own
//! configuration files; [`StrategyConfigBuilder::build`] applies the per-revision
//! defaults and validates every URL into a [`StrategyConfig`].

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	endpoint::FieldRequest,
	error::ConfigError,
	provider::ProviderDescriptor,
	version::ApiVersion,
};

/// Strategy name used in the callback path when none is configured.
pub const DEFAULT_NAME: &str = "linkedin";
/// Authorize parameters that callers may override per request by default.
pub const DEFAULT_AUTHORIZE_OPTIONS: [&str; 2] = ["scope", "state"];

/// Validated configuration of one strategy instance.
#[derive(Clone, Debug)]
pub struct StrategyConfig {
	/// Name used to build `/auth/<name>/callback`.
	pub name: String,
	/// API revision targeted by every attempt.
	pub version: ApiVersion,
	/// OAuth client identifier.
	pub client_id: String,
	/// OAuth client secret.
	pub client_secret: Option<TokenSecret>,
	/// Provider endpoints.
	pub descriptor: ProviderDescriptor,
	/// Scope sent on the authorize URL.
	pub scope: String,
	/// Logical profile fields requested from the provider.
	pub fields: FieldRequest,
	/// Ask the legacy API for HTTPS picture URLs.
	pub secure_image_url: bool,
	/// Redirect URI override; when unset the callback URL is derived from the host.
	pub redirect_uri: Option<Url>,
	/// Authorize parameters that a request may override.
	pub authorize_options: Vec<String>,
	/// Static authorize parameters.
	pub authorize_params: BTreeMap<String, String>,
}
impl StrategyConfig {
	/// Creates a new builder for `version` and `client_id`.
	pub fn builder(version: ApiVersion, client_id: impl Into<String>) -> StrategyConfigBuilder {
		StrategyConfigBuilder::new(version, client_id)
	}
}

/// Unvalidated strategy configuration.
///
/// Every field is optional when deserializing; omitted values take the defaults of the
/// selected [`ApiVersion`].
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct StrategyConfigBuilder {
	/// Strategy name, defaults to [`DEFAULT_NAME`].
	pub name: Option<String>,
	/// API revision.
	pub version: ApiVersion,
	/// OAuth client identifier.
	pub client_id: String,
	/// OAuth client secret.
	pub client_secret: Option<String>,
	/// Provider site override.
	pub site: Option<String>,
	/// Authorization endpoint override (absolute or site-relative).
	pub authorize_url: Option<String>,
	/// Token endpoint override (absolute or site-relative).
	pub token_url: Option<String>,
	/// Scope override.
	pub scope: Option<String>,
	/// Logical field override.
	pub fields: Option<Vec<String>>,
	/// Ask the legacy API for HTTPS picture URLs.
	pub secure_image_url: bool,
	/// Redirect URI override.
	pub redirect_uri: Option<String>,
	/// Overridable authorize parameter names, defaults to [`DEFAULT_AUTHORIZE_OPTIONS`].
	pub authorize_options: Option<Vec<String>>,
	/// Static authorize parameters.
	pub authorize_params: BTreeMap<String, String>,
}
impl StrategyConfigBuilder {
	/// Creates a builder for `version` and `client_id`.
	pub fn new(version: ApiVersion, client_id: impl Into<String>) -> Self {
		Self { version, client_id: client_id.into(), ..Default::default() }
	}

	/// Sets the strategy name.
	pub fn name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());

		self
	}

	/// Sets the OAuth client secret.
	pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Some(secret.into());

		self
	}

	/// Overrides the provider site.
	pub fn site(mut self, site: impl Into<String>) -> Self {
		self.site = Some(site.into());

		self
	}

	/// Overrides the authorization endpoint.
	pub fn authorize_url(mut self, url: impl Into<String>) -> Self {
		self.authorize_url = Some(url.into());

		self
	}

	/// Overrides the token endpoint.
	pub fn token_url(mut self, url: impl Into<String>) -> Self {
		self.token_url = Some(url.into());

		self
	}

	/// Overrides the requested scope.
	pub fn scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = Some(scope.into());

		self
	}

	/// Overrides the logical field list.
	pub fn fields<I, S>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.fields = Some(fields.into_iter().map(Into::into).collect());

		self
	}

	/// Requests HTTPS picture URLs from the legacy API.
	pub fn secure_image_url(mut self, enabled: bool) -> Self {
		self.secure_image_url = enabled;

		self
	}

	/// Overrides the redirect URI.
	pub fn redirect_uri(mut self, uri: impl Into<String>) -> Self {
		self.redirect_uri = Some(uri.into());

		self
	}

	/// Replaces the overridable authorize parameter names.
	pub fn authorize_options<I, S>(mut self, options: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.authorize_options = Some(options.into_iter().map(Into::into).collect());

		self
	}

	/// Adds a static authorize parameter.
	pub fn authorize_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.authorize_params.insert(key.into(), value.into());

		self
	}

	/// Applies revision defaults and validates the configuration.
	pub fn build(self) -> Result<StrategyConfig> {
		let version = self.version;
		let client_id = self.client_id.trim().to_owned();

		if client_id.is_empty() {
			return Err(ConfigError::MissingClientId.into());
		}

		let descriptor = ProviderDescriptor::builder(self.site.as_deref().unwrap_or(version.site()))
			.authorize_url(self.authorize_url.as_deref().unwrap_or(version.authorize_url()))
			.token_url(self.token_url.as_deref().unwrap_or(version.token_url()))
			.build()
			.map_err(ConfigError::from)?;
		let redirect_uri = self
			.redirect_uri
			.as_deref()
			.map(|uri| {
				Url::parse(uri).map_err(|source| ConfigError::InvalidUrl { field: "redirect_uri", source })
			})
			.transpose()?;
		let fields = match self.fields {
			Some(fields) => FieldRequest::new(fields),
			None => FieldRequest::new(version.default_fields().iter().copied()),
		};
		let authorize_options = self.authorize_options.unwrap_or_else(|| {
			DEFAULT_AUTHORIZE_OPTIONS.iter().map(|option| (*option).to_owned()).collect()
		});

		Ok(StrategyConfig {
			name: self.name.unwrap_or_else(|| DEFAULT_NAME.into()),
			version,
			client_id,
			client_secret: self.client_secret.filter(|secret| !secret.is_empty()).map(TokenSecret::new),
			descriptor,
			scope: self.scope.unwrap_or_else(|| version.default_scope().into()),
			fields,
			secure_image_url: self.secure_image_url,
			redirect_uri,
			authorize_options,
			authorize_params: self.authorize_params,
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_follow_the_version() {
		let config = StrategyConfig::builder(ApiVersion::RestV2, "client")
			.build()
			.expect("Minimal configuration should build.");

		assert_eq!(config.name, "linkedin");
		assert_eq!(config.scope, "r_liteprofile r_emailaddress");
		assert_eq!(config.fields.len(), 5);
		assert_eq!(config.authorize_options, ["scope", "state"]);
		assert_eq!(config.descriptor.site.as_str(), "https://api.linkedin.com/");
		assert_eq!(
			config.descriptor.token_url.as_str(),
			"https://www.linkedin.com/oauth/v2/accessToken"
		);
		assert!(config.client_secret.is_none());
	}

	#[test]
	fn overrides_replace_defaults() {
		let config = StrategyConfig::builder(ApiVersion::LegacyV1, "client")
			.name("linked_in")
			.client_secret("secret")
			.scope("r_fullprofile")
			.fields(["id", "first-name", "id"])
			.redirect_uri("https://app.example.com/cb")
			.build()
			.expect("Overridden configuration should build.");

		assert_eq!(config.name, "linked_in");
		assert_eq!(config.scope, "r_fullprofile");
		assert_eq!(config.fields.iter().collect::<Vec<_>>(), ["id", "first-name"]);
		assert_eq!(
			config.redirect_uri.as_ref().map(Url::as_str),
			Some("https://app.example.com/cb")
		);
		assert!(!format!("{config:?}").contains("\"secret\""));
	}

	#[test]
	fn site_override_moves_relative_endpoints() {
		let config = StrategyConfig::builder(ApiVersion::LegacyV1Query, "client")
			.site("http://127.0.0.1:8080")
			.build()
			.expect("Loopback site should be accepted.");

		assert_eq!(
			config.descriptor.token_url.as_str(),
			"http://127.0.0.1:8080/uas/oauth2/accessToken"
		);
	}

	#[test]
	fn invalid_values_are_rejected() {
		let err = StrategyConfig::builder(ApiVersion::RestV2, "  ")
			.build()
			.expect_err("Blank client identifiers should be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::MissingClientId)));

		let err = StrategyConfig::builder(ApiVersion::RestV2, "client")
			.redirect_uri("not a url")
			.build()
			.expect_err("Relative redirect URIs should be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::InvalidUrl { field: "redirect_uri", .. })));

		let err = StrategyConfig::builder(ApiVersion::RestV2, "client")
			.site("http://api.example.com")
			.build()
			.expect_err("Plain HTTP sites should be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::InvalidDescriptor(_))));
	}

	#[test]
	fn builder_deserializes_with_defaults() {
		let builder: StrategyConfigBuilder = serde_json::from_value(serde_json::json!({
			"version": "oidc_userinfo_legacy_scopes",
			"client_id": "client",
			"authorize_params": { "prompt": "login" }
		}))
		.expect("Partial configuration should deserialize.");
		let config = builder.build().expect("Deserialized configuration should build.");

		assert_eq!(config.version, ApiVersion::OidcUserinfoLegacyScopes);
		assert_eq!(config.scope, "openid r_liteprofile r_emailaddress");
		assert!(config.fields.is_empty());
		assert_eq!(config.authorize_params.get("prompt").map(String::as_str), Some("login"));
	}
}
