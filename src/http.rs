//! Transport primitives for profile fetches and token exchanges.
//!
//! [`ProfileHttpClient`] issues the signed GET requests of an attempt, while
//! [`TokenHttpClient`] hands the `oauth2` crate an [`AsyncHttpClient`] handle for the
//! code exchange. [`ReqwestHttpClient`] implements both. Handles record the status of
//! the last response in a [`ResponseMetadataSlot`] so error mapping can tell a rejected
//! grant from a broken endpoint.

// std
use std::ops::Deref;
// crates.io
use oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse};
#[cfg(feature = "reqwest")] use reqwest::header::{ACCEPT, AUTHORIZATION};
// self
#[cfg(feature = "reqwest")] use crate::error::ConfigError;
use crate::{_prelude::*, auth::SignedRequest, error::TransportError};

/// Boxed future returned by [`ProfileHttpClient`] implementations.
pub type HttpFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, TransportError>> + 'a + Send>>;

/// Executes the signed profile GET requests of an attempt.
///
/// Implementations must fail with [`TransportError::Status`] on non-2xx responses and
/// must never log or echo the request URL, which may carry the legacy query token.
pub trait ProfileHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and resolves to the raw response body.
	fn get(&self, request: SignedRequest) -> HttpFuture<'_, Vec<u8>>;
}

/// Abstraction over HTTP transports capable of executing the OAuth code exchange.
pub trait TokenHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// [`AsyncHttpClient`] handle tied to a [`ResponseMetadataSlot`].
	///
	/// The request future returned by [`AsyncHttpClient::call`] must be `Send` so exchange
	/// futures can hop executors.
	type Handle: for<'c> AsyncHttpClient<
			'c,
			Error = HttpClientError<Self::TransportError>,
			Future: 'c + Send,
		>
		+ 'static
		+ Send
		+ Sync;

	/// Builds an [`AsyncHttpClient`] handle that records response status in `slot`.
	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle;

	/// Converts a transport failure raised by a handle into an adapter error.
	fn map_transport_error(&self, error: HttpClientError<Self::TransportError>) -> Error;
}

/// Metadata captured from the most recent token endpoint response.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadata {
	/// HTTP status code, if a response arrived.
	pub status: Option<u16>,
}

/// Thread-safe slot for sharing [`ResponseMetadata`] between transport and error layers.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadataSlot(Arc<Mutex<Option<ResponseMetadata>>>);
impl ResponseMetadataSlot {
	/// Stores new metadata for the current request.
	pub fn store(&self, meta: ResponseMetadata) {
		*self.0.lock() = Some(meta);
	}

	/// Returns the captured metadata, if any, consuming it from the slot.
	pub fn take(&self) -> Option<ResponseMetadata> {
		self.0.lock().take()
	}
}

/// Thin wrapper around [`ReqwestClient`] shared by profile fetches and token exchanges.
///
/// Token requests should not follow redirects; configure any custom [`ReqwestClient`]
/// accordingly before wrapping it.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ProfileHttpClient for ReqwestHttpClient {
	fn get(&self, request: SignedRequest) -> HttpFuture<'_, Vec<u8>> {
		Box::pin(async move {
			let endpoint = request.endpoint;
			let mut builder =
				self.0.get(request.url().clone()).header(ACCEPT, "application/json");

			if let Some(authorization) = request.authorization() {
				builder = builder.header(AUTHORIZATION, authorization);
			}

			let response =
				builder.send().await.map_err(|e| TransportError::reqwest(endpoint, e))?;
			let status = response.status();

			if !status.is_success() {
				return Err(TransportError::Status { endpoint, status: status.as_u16() });
			}

			let body = response.bytes().await.map_err(|e| TransportError::reqwest(endpoint, e))?;

			Ok(body.to_vec())
		})
	}
}
#[cfg(feature = "reqwest")]
impl TokenHttpClient for ReqwestHttpClient {
	type Handle = InstrumentedHandle;
	type TransportError = ReqwestError;

	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle {
		InstrumentedHandle::new(self.0.clone(), slot)
	}

	fn map_transport_error(&self, error: HttpClientError<ReqwestError>) -> Error {
		const ENDPOINT: &str = "token";

		match error {
			HttpClientError::Reqwest(inner) =>
				if inner.is_builder() {
					ConfigError::from(*inner).into()
				} else {
					TransportError::reqwest(ENDPOINT, *inner).into()
				},
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(inner) => TransportError::Io(inner).into(),
			HttpClientError::Other(message) =>
				TransportError::Unexpected { endpoint: ENDPOINT, message }.into(),
			_ => TransportError::Unexpected {
				endpoint: ENDPOINT,
				message: "unclassified transport failure".into(),
			}
			.into(),
		}
	}
}

#[cfg(feature = "reqwest")]
struct InstrumentedHttpClient {
	client: ReqwestClient,
	slot: ResponseMetadataSlot,
}

/// [`AsyncHttpClient`] handle returned by [`ReqwestHttpClient`].
#[cfg(feature = "reqwest")]
#[derive(Clone)]
pub struct InstrumentedHandle(Arc<InstrumentedHttpClient>);
#[cfg(feature = "reqwest")]
impl InstrumentedHandle {
	fn new(client: ReqwestClient, slot: ResponseMetadataSlot) -> Self {
		Self(Arc::new(InstrumentedHttpClient { client, slot }))
	}
}
#[cfg(feature = "reqwest")]
impl<'c> AsyncHttpClient<'c> for InstrumentedHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let client = Arc::clone(&self.0);

		Box::pin(async move {
			client.slot.take();

			let response = client
				.client
				.execute(request.try_into().map_err(Box::new)?)
				.await
				.map_err(|e| Box::new(e.without_url()))?;
			let status = response.status();
			let headers = response.headers().to_owned();

			client.slot.store(ResponseMetadata { status: Some(status.as_u16()) });

			let mut response_new = HttpResponse::new(
				response.bytes().await.map_err(|e| Box::new(e.without_url()))?.to_vec(),
			);

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn metadata_slot_is_consumed_on_take() {
		let slot = ResponseMetadataSlot::default();

		slot.store(ResponseMetadata { status: Some(400) });

		assert_eq!(slot.clone().take().and_then(|meta| meta.status), Some(400));
		assert!(slot.take().is_none(), "Metadata should not leak into the next request.");
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn other_transport_failures_name_the_token_endpoint() {
		let client = ReqwestHttpClient::default();
		let err = client.map_transport_error(HttpClientError::Other("boom".into()));

		assert!(matches!(
			err,
			Error::Transport(TransportError::Unexpected { endpoint: "token", .. })
		));
	}
}
