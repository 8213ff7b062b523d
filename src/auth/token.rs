//! Raw token produced by the authorization-code exchange.

pub mod secret;

// self
use crate::{_prelude::*, auth::token::secret::TokenSecret};

/// Bearer credential plus the expiry and refresh metadata returned by the token endpoint.
///
/// The adapter never persists this value; it is consumed by
/// [`Credential::adapt`](crate::auth::Credential::adapt) for a single attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
	/// Access token secret; callers must avoid logging it.
	pub token: TokenSecret,
	/// Relative lifetime reported by the provider.
	pub expires_in: Option<Duration>,
	/// Absolute expiry instant, when known.
	#[serde(with = "time::serde::rfc3339::option", default)]
	pub expires_at: Option<OffsetDateTime>,
	/// Refresh token secret, if the provider issued one.
	pub refresh_token: Option<TokenSecret>,
}
impl AccessToken {
	/// Wraps a bare access token without expiry or refresh metadata.
	pub fn new(token: impl Into<String>) -> Self {
		Self { token: TokenSecret::new(token), expires_in: None, expires_at: None, refresh_token: None }
	}

	/// Records a relative lifetime.
	pub fn with_expires_in(mut self, expires_in: Duration) -> Self {
		self.expires_in = Some(expires_in);

		self
	}

	/// Records an absolute expiry instant.
	pub fn with_expires_at(mut self, expires_at: OffsetDateTime) -> Self {
		self.expires_at = Some(expires_at);

		self
	}

	/// Records the refresh token.
	pub fn with_refresh_token(mut self, token: impl Into<String>) -> Self {
		self.refresh_token = Some(TokenSecret::new(token));

		self
	}

	/// Stamps both `expires_in` and `expires_at` relative to `issued_at`.
	///
	/// `expires_at` stays `None` when the resulting instant is not representable.
	pub fn issued_at(mut self, issued_at: OffsetDateTime, expires_in: Duration) -> Self {
		self.expires_in = Some(expires_in);
		self.expires_at = issued_at.checked_add(expires_in);

		self
	}
}
