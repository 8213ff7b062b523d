//! Adapter-level error types shared by the resolver, fetcher, and exchange glue.
//!
//! Field-level absence inside a provider payload is never represented here; the
//! normalizer resolves it to `None`. Only transport, parse, configuration, and grant
//! failures reach callers.

// self
use crate::_prelude::*;

/// Adapter-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical adapter error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, non-success status).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Provider answered with a body that is not valid JSON.
	#[error("The {endpoint} endpoint returned malformed JSON.")]
	MalformedResponse {
		/// Endpoint label (`profile`, `email_address`, `userinfo`, `token`).
		endpoint: &'static str,
		/// Structured parsing failure including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Provider rejected the authorization code.
	#[error("Provider rejected the grant: {reason}.")]
	InvalidGrant {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Provider rejected the client credentials.
	#[error("Client authentication failed: {reason}.")]
	InvalidClient {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// The `state` returned on the callback does not match the session.
	#[error("Authorization state mismatch.")]
	StateMismatch,
}

/// Configuration and validation failures raised while assembling a strategy.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Provider descriptor failed validation.
	#[error(transparent)]
	InvalidDescriptor(#[from] crate::provider::ProviderDescriptorError),
	/// A configured URL cannot be parsed.
	#[error("The {field} URL is invalid.")]
	InvalidUrl {
		/// Configuration field holding the URL.
		field: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Client identifier is empty.
	#[error("Client identifier cannot be empty.")]
	MissingClientId,
	/// Token endpoint reported a lifetime that cannot be represented.
	#[error("Token endpoint returned an expires_in value that is out of range.")]
	ExpiresInOutOfRange,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO, HTTP status).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the {endpoint} endpoint.")]
	Network {
		/// Endpoint label.
		endpoint: &'static str,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
	/// Provider answered with a non-success HTTP status.
	#[error("The {endpoint} endpoint responded with HTTP {status}.")]
	Status {
		/// Endpoint label.
		endpoint: &'static str,
		/// HTTP status code.
		status: u16,
	},
	/// HTTP client failed in a way it could not classify.
	#[error("HTTP client error occurred while calling the {endpoint} endpoint: {message}.")]
	Unexpected {
		/// Endpoint label.
		endpoint: &'static str,
		/// Client-supplied message.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(
		endpoint: &'static str,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { endpoint, source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl TransportError {
	/// Wraps a reqwest failure after stripping the request URL, which may carry the
	/// legacy query-string token.
	pub fn reqwest(endpoint: &'static str, e: ReqwestError) -> Self {
		Self::network(endpoint, e.without_url())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn status_errors_name_the_endpoint() {
		let err: Error = TransportError::Status { endpoint: "profile", status: 503 }.into();

		assert_eq!(err.to_string(), "The profile endpoint responded with HTTP 503.");
	}

	#[test]
	fn malformed_response_keeps_json_path() {
		let de = &mut serde_json::Deserializer::from_str("{\"id\": tru}");
		let source = serde_path_to_error::deserialize::<_, serde_json::Value>(de)
			.expect_err("Broken literal should fail to parse.");
		let err = Error::MalformedResponse { endpoint: "userinfo", source };

		assert_eq!(err.to_string(), "The userinfo endpoint returned malformed JSON.");
		assert!(std::error::Error::source(&err).is_some());
	}
}
