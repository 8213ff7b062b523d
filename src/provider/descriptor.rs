//! Provider descriptor data structures shared by the strategy and the exchange glue.

/// Builder API for assembling provider descriptors.
pub mod builder;

pub use builder::*;

// self
use crate::{_prelude::*, version::ApiVersion};

/// Immutable endpoint set consumed by strategies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
	/// Base URL that profile and userinfo paths are joined onto.
	pub site: Url,
	/// Authorization endpoint that end-users are redirected to.
	pub authorize_url: Url,
	/// Token endpoint used for the code exchange.
	pub token_url: Url,
}
impl ProviderDescriptor {
	/// Creates a new builder rooted at the provided site.
	pub fn builder(site: impl Into<String>) -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::new(site)
	}

	/// Builds the stock LinkedIn descriptor for an API revision.
	pub fn for_version(version: ApiVersion) -> Result<Self, ProviderDescriptorError> {
		Self::builder(version.site())
			.authorize_url(version.authorize_url())
			.token_url(version.token_url())
			.build()
	}

	/// Resolves a profile path (with its query) against the site.
	pub fn resolve(&self, path: &str) -> Result<Url, ProviderDescriptorError> {
		self.site
			.join(path)
			.map_err(|source| ProviderDescriptorError::InvalidUrl { endpoint: "profile", source })
	}
}
