//! Per-attempt profile fetcher.
//!
//! An [`Attempt`] owns the credential and resolved request paths of a single callback and
//! memoizes each endpoint's parsed body in a write-once slot. Each endpoint is therefore
//! fetched at most once, no matter how many of `uid`, `info`, and `extra` the host reads.
//! A failed fetch leaves its slot empty, so a later read issues the request again.

// crates.io
use async_lock::OnceCell;
use serde_json::{Map, Value};
// self
use crate::{
	_prelude::*,
	auth::Credential,
	endpoint::{EndpointKind, ProfileRequest},
	error::ConfigError,
	http::ProfileHttpClient,
	obs::{self, FetchOutcome, FetchSpan},
	profile::{self, NormalizedIdentity, RawProfile},
	provider::ProviderDescriptor,
	version::ApiVersion,
};

/// Context of one authentication attempt.
pub struct Attempt<C>
where
	C: ?Sized + ProfileHttpClient,
{
	http_client: Arc<C>,
	version: ApiVersion,
	descriptor: ProviderDescriptor,
	request: ProfileRequest,
	credential: Credential,
	profile: OnceCell<RawProfile>,
	email: OnceCell<Option<RawProfile>>,
}
impl<C> Attempt<C>
where
	C: ?Sized + ProfileHttpClient,
{
	/// Creates an attempt with empty memo slots.
	pub fn new(
		http_client: impl Into<Arc<C>>,
		version: ApiVersion,
		descriptor: ProviderDescriptor,
		request: ProfileRequest,
		credential: Credential,
	) -> Self {
		Self {
			http_client: http_client.into(),
			version,
			descriptor,
			request,
			credential,
			profile: OnceCell::new(),
			email: OnceCell::new(),
		}
	}

	/// API revision of this attempt.
	pub fn version(&self) -> ApiVersion {
		self.version
	}

	/// Credential used for every request; hosts persist its refresh metadata.
	pub fn credential(&self) -> &Credential {
		&self.credential
	}

	/// Resolved request paths.
	pub fn request(&self) -> &ProfileRequest {
		&self.request
	}

	/// Profile (or userinfo) payload, fetched on first use.
	pub async fn raw_info(&self) -> Result<&RawProfile> {
		self.profile.get_or_try_init(|| self.fetch(self.request.kind, &self.request.profile)).await
	}

	/// Email lookup payload, fetched on first use; `None` when the revision has no
	/// companion lookup or `email-address` was not requested.
	pub async fn raw_email_info(&self) -> Result<Option<&RawProfile>> {
		let email = self
			.email
			.get_or_try_init(|| async {
				match &self.request.email {
					Some(path) => self.fetch(EndpointKind::EmailAddress, path).await.map(Some),
					None => Ok(None),
				}
			})
			.await?;

		Ok(email.as_ref())
	}

	/// Provider-unique identifier; never triggers the email lookup.
	pub async fn uid(&self) -> Result<Option<String>> {
		Ok(profile::uid(self.version, self.raw_info().await?))
	}

	/// Full normalized identity.
	pub async fn identity(&self) -> Result<NormalizedIdentity> {
		let raw = self.raw_info().await?;
		let email = self.raw_email_info().await?;

		Ok(profile::normalize(self.version, raw, email))
	}

	/// Host-facing `info` bundle.
	pub async fn info(&self) -> Result<Map<String, Value>> {
		Ok(profile::info(self.version, &self.identity().await?))
	}

	/// Host-facing `extra` bundle.
	pub async fn extra(&self) -> Result<Map<String, Value>> {
		Ok(profile::extra(self.raw_info().await?))
	}

	async fn fetch(&self, kind: EndpointKind, path: &str) -> Result<RawProfile> {
		let span = FetchSpan::new(kind, self.version);

		span.instrument(async move {
			obs::record_fetch_outcome(kind, FetchOutcome::Attempt);

			let result = self.fetch_once(kind, path).await;
			let outcome = if result.is_ok() { FetchOutcome::Success } else { FetchOutcome::Failure };

			obs::record_fetch_outcome(kind, outcome);

			result
		})
		.await
	}

	async fn fetch_once(&self, kind: EndpointKind, path: &str) -> Result<RawProfile> {
		let endpoint = kind.as_str();
		let url = self.descriptor.resolve(path).map_err(ConfigError::from)?;
		let body = self.http_client.get(self.credential.sign(endpoint, url)).await?;
		let de = &mut serde_json::Deserializer::from_slice(&body);
		let value: Value = serde_path_to_error::deserialize(de)
			.map_err(|source| Error::MalformedResponse { endpoint, source })?;

		Ok(RawProfile::new(value))
	}
}
impl<C> Debug for Attempt<C>
where
	C: ?Sized + ProfileHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Attempt")
			.field("version", &self.version)
			.field("request", &self.request)
			.field("credential", &self.credential)
			.field("profile_fetched", &self.profile.is_initialized())
			.field("email_fetched", &self.email.is_initialized())
			.finish()
	}
}
