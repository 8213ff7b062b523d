// self
use crate::{_prelude::*, provider::ProviderDescriptor};

/// Errors raised while constructing or validating descriptors.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ProviderDescriptorError {
	/// An endpoint could not be parsed or joined onto the site.
	#[error("The {endpoint} endpoint is not a valid URL.")]
	InvalidUrl {
		/// Which endpoint failed to parse.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoints must use HTTPS unless they point at a loopback host.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
}

/// Builder for [`ProviderDescriptor`] values.
///
/// Authorization and token endpoints may be absolute or relative to the site; relative
/// values are joined onto the site during [`build`](Self::build).
#[derive(Clone, Debug)]
pub struct ProviderDescriptorBuilder {
	/// Base URL for profile requests.
	pub site: String,
	/// Authorization endpoint (absolute or site-relative).
	pub authorize_url: Option<String>,
	/// Token endpoint (absolute or site-relative).
	pub token_url: Option<String>,
}
impl ProviderDescriptorBuilder {
	/// Creates a new builder rooted at `site`.
	pub fn new(site: impl Into<String>) -> Self {
		Self { site: site.into(), authorize_url: None, token_url: None }
	}

	/// Sets the authorization endpoint.
	pub fn authorize_url(mut self, url: impl Into<String>) -> Self {
		self.authorize_url = Some(url.into());

		self
	}

	/// Sets the token endpoint.
	pub fn token_url(mut self, url: impl Into<String>) -> Self {
		self.token_url = Some(url.into());

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	///
	/// Missing endpoints fall back to `/oauth/v2/authorization` and `/oauth/v2/accessToken`
	/// on the site.
	pub fn build(self) -> Result<ProviderDescriptor, ProviderDescriptorError> {
		let site = Url::parse(&self.site)
			.map_err(|source| ProviderDescriptorError::InvalidUrl { endpoint: "site", source })?;
		let authorize_url = join_endpoint(
			&site,
			"authorize",
			self.authorize_url.as_deref().unwrap_or("/oauth/v2/authorization"),
		)?;
		let token_url =
			join_endpoint(&site, "token", self.token_url.as_deref().unwrap_or("/oauth/v2/accessToken"))?;
		let descriptor = ProviderDescriptor { site, authorize_url, token_url };

		descriptor.validate()?;

		Ok(descriptor)
	}
}

impl ProviderDescriptor {
	/// Validates invariants for the descriptor.
	fn validate(&self) -> Result<(), ProviderDescriptorError> {
		validate_endpoint("site", &self.site)?;
		validate_endpoint("authorize", &self.authorize_url)?;
		validate_endpoint("token", &self.token_url)?;

		Ok(())
	}
}

fn join_endpoint(
	site: &Url,
	endpoint: &'static str,
	value: &str,
) -> Result<Url, ProviderDescriptorError> {
	// `Url::join` treats absolute inputs as replacements, so both shapes go through it.
	site.join(value).map_err(|source| ProviderDescriptorError::InvalidUrl { endpoint, source })
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ProviderDescriptorError> {
	match url.scheme() {
		"https" => Ok(()),
		"http" if is_loopback(url) => Ok(()),
		_ => Err(ProviderDescriptorError::InsecureEndpoint { endpoint: name, url: url.to_string() }),
	}
}

fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		Some(url::Host::Ipv4(addr)) => addr.is_loopback(),
		Some(url::Host::Ipv6(addr)) => addr.is_loopback(),
		None => false,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn absolute_endpoints_replace_the_site() {
		let descriptor = ProviderDescriptor::builder("https://api.example.com")
			.authorize_url("https://login.example.com/authorize")
			.token_url("/token")
			.build()
			.expect("Descriptor with mixed endpoints should build.");

		assert_eq!(descriptor.authorize_url.as_str(), "https://login.example.com/authorize");
		assert_eq!(descriptor.token_url.as_str(), "https://api.example.com/token");
	}

	#[test]
	fn insecure_endpoints_are_rejected_outside_loopback() {
		let err = ProviderDescriptor::builder("https://api.example.com")
			.token_url("http://login.example.com/token")
			.build()
			.expect_err("Plain HTTP token endpoints should be rejected.");

		assert!(matches!(err, ProviderDescriptorError::InsecureEndpoint { endpoint: "token", .. }));

		ProviderDescriptor::builder("http://127.0.0.1:8080")
			.build()
			.expect("Loopback development hosts should be accepted over HTTP.");
	}

	#[test]
	fn unparsable_site_is_reported() {
		let err = ProviderDescriptor::builder("not a url")
			.build()
			.expect_err("Relative sites cannot be parsed.");

		assert!(matches!(err, ProviderDescriptorError::InvalidUrl { endpoint: "site", .. }));
	}
}
