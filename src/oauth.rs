//! Authorization-code exchange glue on top of the `oauth2` crate.

pub use oauth2;

// std
use std::borrow::Cow;
// crates.io
use oauth2::{
	AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, EndpointNotSet, EndpointSet,
	HttpClientError, RedirectUrl, RequestTokenError, TokenResponse, TokenUrl,
	basic::{
		BasicClient, BasicErrorResponse, BasicErrorResponseType, BasicRequestTokenError,
		BasicTokenResponse,
	},
};
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	endpoint::EndpointKind,
	error::{ConfigError, TransportError},
	http::{ResponseMetadata, ResponseMetadataSlot, TokenHttpClient},
	obs::{self, FetchOutcome, FetchSpan},
	provider::ProviderDescriptor,
	version::ApiVersion,
};

type ConfiguredBasicClient =
	BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Boxed future returned by [`TokenExchanger`] implementations.
pub type ExchangeFuture<'a> = Pin<Box<dyn Future<Output = Result<AccessToken>> + 'a + Send>>;

/// Collaborator that trades an authorization code for an [`AccessToken`].
pub trait TokenExchanger
where
	Self: 'static + Send + Sync,
{
	/// Exchanges `request.code` at the descriptor's token endpoint.
	fn exchange_code<'a>(&'a self, request: CodeExchange<'a>) -> ExchangeFuture<'a>;
}

/// Inputs of a single code exchange.
#[derive(Clone, Copy)]
pub struct CodeExchange<'a> {
	/// API revision of the attempt, used for span fields.
	pub version: ApiVersion,
	/// Provider endpoints.
	pub descriptor: &'a ProviderDescriptor,
	/// OAuth client identifier.
	pub client_id: &'a str,
	/// OAuth client secret, sent in the request body.
	pub client_secret: Option<&'a str>,
	/// Authorization code returned on the callback.
	pub code: &'a str,
	/// Redirect URI used when the authorization request was built.
	pub redirect_uri: &'a Url,
}
impl Debug for CodeExchange<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CodeExchange")
			.field("version", &self.version)
			.field("token_url", &self.descriptor.token_url.as_str())
			.field("client_id", &self.client_id)
			.field("redirect_uri", &self.redirect_uri.as_str())
			.finish_non_exhaustive()
	}
}

/// [`TokenExchanger`] backed by `oauth2::basic::BasicClient` and a [`TokenHttpClient`].
///
/// LinkedIn expects client credentials in the form body, so the client is configured with
/// [`AuthType::RequestBody`].
pub struct BasicExchanger<C>
where
	C: ?Sized + TokenHttpClient,
{
	http_client: Arc<C>,
}
impl<C> BasicExchanger<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Wraps the transport used for token requests.
	pub fn new(http_client: impl Into<Arc<C>>) -> Self {
		Self { http_client: http_client.into() }
	}
}
impl<C> Debug for BasicExchanger<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("BasicExchanger(..)")
	}
}
impl<C> TokenExchanger for BasicExchanger<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn exchange_code<'a>(&'a self, request: CodeExchange<'a>) -> ExchangeFuture<'a> {
		let span = FetchSpan::new(EndpointKind::Token, request.version);
		let meta = ResponseMetadataSlot::default();

		Box::pin(span.instrument(async move {
			obs::record_fetch_outcome(EndpointKind::Token, FetchOutcome::Attempt);

			let result = self.exchange(request, meta).await;
			let outcome = if result.is_ok() { FetchOutcome::Success } else { FetchOutcome::Failure };

			obs::record_fetch_outcome(EndpointKind::Token, outcome);

			result
		}))
	}
}
impl<C> BasicExchanger<C>
where
	C: ?Sized + TokenHttpClient,
{
	async fn exchange(
		&self,
		request: CodeExchange<'_>,
		meta: ResponseMetadataSlot,
	) -> Result<AccessToken> {
		let oauth_client = build_client(&request)?;
		let redirect_url = RedirectUrl::new(request.redirect_uri.to_string())
			.map_err(|source| ConfigError::InvalidUrl { field: "redirect_uri", source })?;
		let handle = self.http_client.with_metadata(meta.clone());
		let response = oauth_client
			.exchange_code(AuthorizationCode::new(request.code.to_owned()))
			.set_redirect_uri(Cow::Owned(redirect_url))
			.request_async(&handle)
			.await
			.map_err(|err| map_request_error(self.http_client.as_ref(), meta.take(), err))?;

		map_token_response(response, OffsetDateTime::now_utc())
	}
}

fn build_client(request: &CodeExchange<'_>) -> Result<ConfiguredBasicClient> {
	let auth_url = AuthUrl::new(request.descriptor.authorize_url.to_string())
		.map_err(|source| ConfigError::InvalidUrl { field: "authorize_url", source })?;
	let token_url = TokenUrl::new(request.descriptor.token_url.to_string())
		.map_err(|source| ConfigError::InvalidUrl { field: "token_url", source })?;
	let mut oauth_client = BasicClient::new(ClientId::new(request.client_id.to_owned()))
		.set_auth_uri(auth_url)
		.set_token_uri(token_url)
		.set_auth_type(AuthType::RequestBody);

	if let Some(secret) = request.client_secret {
		oauth_client = oauth_client.set_client_secret(ClientSecret::new(secret.to_owned()));
	}

	Ok(oauth_client)
}

fn map_token_response(
	response: BasicTokenResponse,
	issued_at: OffsetDateTime,
) -> Result<AccessToken> {
	let mut token = AccessToken::new(response.access_token().secret().to_owned());

	if let Some(lifetime) = response.expires_in() {
		let expires_in = i64::try_from(lifetime.as_secs())
			.map(Duration::seconds)
			.map_err(|_| ConfigError::ExpiresInOutOfRange)?;

		if issued_at.checked_add(expires_in).is_none() {
			return Err(ConfigError::ExpiresInOutOfRange.into());
		}

		token = token.issued_at(issued_at, expires_in);
	}
	if let Some(refresh) = response.refresh_token() {
		token = token.with_refresh_token(refresh.secret().to_owned());
	}

	Ok(token)
}

fn map_server_response(response: BasicErrorResponse) -> Error {
	let reason = match response.error_description() {
		Some(description) => format!("{}: {description}", response.error().as_ref()),
		None => response.error().as_ref().to_owned(),
	};

	match response.error() {
		BasicErrorResponseType::InvalidClient | BasicErrorResponseType::UnauthorizedClient =>
			Error::InvalidClient { reason },
		_ => Error::InvalidGrant { reason },
	}
}

fn map_request_error<C>(
	http_client: &C,
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<C::TransportError>>,
) -> Error
where
	C: ?Sized + TokenHttpClient,
{
	let endpoint = EndpointKind::Token.as_str();

	match err {
		RequestTokenError::ServerResponse(response) => map_server_response(response),
		RequestTokenError::Request(error) => http_client.map_transport_error(error),
		RequestTokenError::Parse(source, _body) => match meta.and_then(|value| value.status) {
			Some(status) if !(200..300).contains(&status) =>
				TransportError::Status { endpoint, status }.into(),
			_ => Error::MalformedResponse { endpoint, source },
		},
		RequestTokenError::Other(message) => TransportError::Unexpected { endpoint, message }.into(),
	}
}
