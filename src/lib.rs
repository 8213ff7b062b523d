//! LinkedIn sign-in adapter: resolve versioned profile endpoints, fetch each one once per
//! attempt, and normalize every API revision into one identity record.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod attempt;
pub mod auth;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod profile;
pub mod provider;
pub mod session;
pub mod strategy;
pub mod version;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and test doubles for unit tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{AccessToken, SignedRequest},
		error::TransportError,
		http::{HttpFuture, ProfileHttpClient},
		oauth::{CodeExchange, ExchangeFuture, TokenExchanger},
	};

	/// Canned answer served by [`CannedHttpClient`].
	#[derive(Clone, Debug)]
	pub enum CannedResponse {
		/// 2xx response with this body.
		Body(Vec<u8>),
		/// Non-success HTTP status.
		Status(u16),
	}

	/// Request observed by [`CannedHttpClient`].
	#[derive(Clone, Debug)]
	pub struct RecordedCall {
		/// Path plus query with the token parameter removed.
		pub path: String,
		/// Full request URL as sent.
		pub url: Url,
		/// `Authorization` header, if any.
		pub authorization: Option<String>,
	}

	/// [`ProfileHttpClient`] serving canned bodies keyed by redacted path; unknown paths
	/// answer HTTP 404.
	#[derive(Debug, Default)]
	pub struct CannedHttpClient {
		responses: HashMap<String, CannedResponse>,
		calls: Mutex<Vec<RecordedCall>>,
	}
	impl CannedHttpClient {
		/// Serves `value` as JSON for `path`.
		pub fn with_json(self, path: &str, value: serde_json::Value) -> Self {
			self.with_body(path, value.to_string())
		}

		/// Serves a raw body for `path`.
		pub fn with_body(mut self, path: &str, body: impl Into<Vec<u8>>) -> Self {
			self.responses.insert(path.into(), CannedResponse::Body(body.into()));

			self
		}

		/// Answers `path` with a non-success status.
		pub fn with_status(mut self, path: &str, status: u16) -> Self {
			self.responses.insert(path.into(), CannedResponse::Status(status));

			self
		}

		/// Every request observed so far.
		pub fn calls(&self) -> Vec<RecordedCall> {
			self.calls.lock().clone()
		}

		/// Number of requests observed for `path`.
		pub fn call_count(&self, path: &str) -> usize {
			self.calls.lock().iter().filter(|call| call.path == path).count()
		}
	}
	impl ProfileHttpClient for CannedHttpClient {
		fn get(&self, request: SignedRequest) -> HttpFuture<'_, Vec<u8>> {
			let path = request.redacted_path();

			self.calls.lock().push(RecordedCall {
				path: path.clone(),
				url: request.url().clone(),
				authorization: request.authorization().map(str::to_owned),
			});

			let response = self.responses.get(&path).cloned();
			let endpoint = request.endpoint;

			Box::pin(async move {
				match response {
					Some(CannedResponse::Body(body)) => Ok(body),
					Some(CannedResponse::Status(status)) =>
						Err(TransportError::Status { endpoint, status }),
					None => Err(TransportError::Status { endpoint, status: 404 }),
				}
			})
		}
	}

	/// Exchange observed by [`CannedExchanger`].
	#[derive(Clone, Debug)]
	pub struct RecordedExchange {
		/// Authorization code.
		pub code: String,
		/// Client secret sent with the exchange.
		pub client_secret: Option<String>,
		/// Redirect URI sent with the exchange.
		pub redirect_uri: Url,
	}

	/// [`TokenExchanger`] that issues a fixed token, or rejects every code when built
	/// with [`Default`].
	#[derive(Debug, Default)]
	pub struct CannedExchanger {
		token: Option<AccessToken>,
		exchanges: Mutex<Vec<RecordedExchange>>,
	}
	impl CannedExchanger {
		/// Issues `token` for every code.
		pub fn issuing(token: AccessToken) -> Self {
			Self { token: Some(token), exchanges: Mutex::default() }
		}

		/// Every exchange observed so far.
		pub fn exchanges(&self) -> Vec<RecordedExchange> {
			self.exchanges.lock().clone()
		}
	}
	impl TokenExchanger for CannedExchanger {
		fn exchange_code<'a>(&'a self, request: CodeExchange<'a>) -> ExchangeFuture<'a> {
			self.exchanges.lock().push(RecordedExchange {
				code: request.code.to_owned(),
				client_secret: request.client_secret.map(str::to_owned),
				redirect_uri: request.redirect_uri.clone(),
			});

			let token = self.token.clone();

			Box::pin(async move {
				token.ok_or_else(|| Error::InvalidGrant { reason: "invalid_grant".into() })
			})
		}
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
pub use {
	attempt::Attempt,
	config::{StrategyConfig, StrategyConfigBuilder},
	profile::NormalizedIdentity,
	strategy::Strategy,
	version::ApiVersion,
};
#[cfg(test)] use {color_eyre as _, httpmock as _};
