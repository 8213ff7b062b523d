//! Token adapter: binds an [`AccessToken`] to the transport convention of an API revision.
//!
//! The legacy `v1/people` API only accepts the token as an `oauth2_access_token` query
//! parameter, while `v2` and userinfo endpoints expect an `Authorization: Bearer` header.
//! No I/O happens here; the adapter only repackages the token so HTTP clients can stay
//! oblivious to the revision in use.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, TokenSecret},
	version::ApiVersion,
};

/// Where a credential travels on outgoing requests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenPlacement {
	/// Appended to the query string under `param_name`.
	Query {
		/// Query parameter carrying the token.
		param_name: &'static str,
	},
	/// Sent as `Authorization: Bearer <token>`.
	BearerHeader,
}

/// Request-ready credential for one authentication attempt.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
	token: TokenSecret,
	placement: TokenPlacement,
	expires_in: Option<Duration>,
	expires_at: Option<OffsetDateTime>,
	refresh_token: Option<TokenSecret>,
}
impl Credential {
	/// Query parameter name required by the legacy profile API.
	pub const LEGACY_QUERY_PARAM: &'static str = "oauth2_access_token";

	/// Adapts a freshly exchanged token to the transport `version` requires.
	///
	/// Legacy revisions re-wrap the bare token, so expiry and refresh metadata are not
	/// carried; every other revision forwards them for the caller to persist.
	pub fn adapt(version: ApiVersion, token: AccessToken) -> Self {
		let AccessToken { token, expires_in, expires_at, refresh_token } = token;

		match version {
			ApiVersion::LegacyV1 | ApiVersion::LegacyV1Query => Self {
				token,
				placement: TokenPlacement::Query { param_name: Self::LEGACY_QUERY_PARAM },
				expires_in: None,
				expires_at: None,
				refresh_token: None,
			},
			ApiVersion::RestV2
			| ApiVersion::OidcUserinfoLegacyScopes
			| ApiVersion::OidcUserinfoModernScopes => Self {
				token,
				placement: TokenPlacement::BearerHeader,
				expires_in,
				expires_at,
				refresh_token,
			},
		}
	}

	/// Transport convention in effect.
	pub fn placement(&self) -> &TokenPlacement {
		&self.placement
	}

	/// Access token secret.
	pub fn token(&self) -> &TokenSecret {
		&self.token
	}

	/// Relative lifetime forwarded from the exchange.
	pub fn expires_in(&self) -> Option<Duration> {
		self.expires_in
	}

	/// Absolute expiry forwarded from the exchange.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		self.expires_at
	}

	/// Refresh token forwarded from the exchange.
	pub fn refresh_token(&self) -> Option<&TokenSecret> {
		self.refresh_token.as_ref()
	}

	/// Binds the credential to a resolved endpoint URL.
	pub fn sign(&self, endpoint: &'static str, mut url: Url) -> SignedRequest {
		let authorization = match &self.placement {
			TokenPlacement::Query { param_name } => {
				url.query_pairs_mut().append_pair(param_name, self.token.expose());

				None
			},
			TokenPlacement::BearerHeader =>
				Some(TokenSecret::new(format!("Bearer {}", self.token.expose()))),
		};

		SignedRequest { endpoint, url, authorization }
	}
}
impl Debug for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credential")
			.field("token", &self.token)
			.field("placement", &self.placement)
			.field("expires_in", &self.expires_in)
			.field("expires_at", &self.expires_at)
			.field("refresh_token", &self.refresh_token)
			.finish()
	}
}

/// GET request with the credential already applied.
#[derive(Clone)]
pub struct SignedRequest {
	/// Endpoint label used in errors, spans, and metrics.
	pub endpoint: &'static str,
	url: Url,
	authorization: Option<TokenSecret>,
}
impl SignedRequest {
	/// Full request URL; may embed the token for legacy revisions.
	pub fn url(&self) -> &Url {
		&self.url
	}

	/// `Authorization` header value, when the credential travels as a bearer header.
	pub fn authorization(&self) -> Option<&str> {
		self.authorization.as_ref().map(TokenSecret::expose)
	}

	/// URL path plus query with the token parameter removed, safe for logs and lookups.
	pub fn redacted_path(&self) -> String {
		if self.authorization.is_some() {
			return match self.url.query() {
				Some(query) => format!("{}?{query}", self.url.path()),
				None => self.url.path().to_owned(),
			};
		}

		let mut url = self.url.clone();
		let kept: Vec<(String, String)> = self
			.url
			.query_pairs()
			.filter(|(key, _)| key != Credential::LEGACY_QUERY_PARAM)
			.map(|(key, value)| (key.into_owned(), value.into_owned()))
			.collect();

		url.set_query(None);

		if !kept.is_empty() {
			url.query_pairs_mut().extend_pairs(kept);
		}

		match url.query() {
			Some(query) => format!("{}?{query}", url.path()),
			None => url.path().to_owned(),
		}
	}
}
impl Debug for SignedRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SignedRequest")
			.field("endpoint", &self.endpoint)
			.field("path", &self.redacted_path())
			.field("authorization", &self.authorization)
			.finish()
	}
}
