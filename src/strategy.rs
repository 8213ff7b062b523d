//! Strategy facade: authorize URL construction, callback completion, and attempt setup.

// self
#[cfg(feature = "reqwest")] use crate::{http::ReqwestHttpClient, oauth::BasicExchanger};
use crate::{
	_prelude::*,
	attempt::Attempt,
	auth::{AccessToken, Credential},
	config::StrategyConfig,
	endpoint::{self, ResolveOptions},
	error::ConfigError,
	http::ProfileHttpClient,
	oauth::{CodeExchange, TokenExchanger},
	session::{self, AuthorizationSession},
};

/// Strategy wired to the reqwest transport and the `oauth2` exchange.
#[cfg(feature = "reqwest")]
pub type ReqwestStrategy = Strategy<ReqwestHttpClient>;

const RESPONSE_TYPE: &str = "response_type";
const STATE: &str = "state";
const SCOPE: &str = "scope";

/// LinkedIn sign-in strategy for one configured client.
pub struct Strategy<C>
where
	C: ?Sized + ProfileHttpClient,
{
	config: StrategyConfig,
	http_client: Arc<C>,
	exchanger: Arc<dyn TokenExchanger>,
}
impl<C> Strategy<C>
where
	C: ?Sized + ProfileHttpClient,
{
	/// Assembles a strategy from explicit collaborators.
	pub fn with_http_client(
		config: StrategyConfig,
		http_client: impl Into<Arc<C>>,
		exchanger: Arc<dyn TokenExchanger>,
	) -> Self {
		Self { config, http_client: http_client.into(), exchanger }
	}

	/// Validated configuration.
	pub fn config(&self) -> &StrategyConfig {
		&self.config
	}

	/// Host path the provider redirects back to.
	pub fn callback_path(&self) -> String {
		format!("/auth/{}/callback", self.config.name)
	}

	/// Absolute callback URL: the configured redirect URI, or [`callback_path`](Self::callback_path)
	/// appended to the path `host` is mounted under.
	pub fn callback_url(&self, host: &Url) -> Result<Url> {
		if let Some(redirect_uri) = &self.config.redirect_uri {
			return Ok(redirect_uri.clone());
		}
		if host.cannot_be_a_base() {
			return Err(ConfigError::InvalidUrl {
				field: "callback_url",
				source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
			}
			.into());
		}

		let mut callback = host.clone();
		let mount = host.path().trim_end_matches('/');

		callback.set_path(&format!("{mount}{}", self.callback_path()));
		callback.set_query(None);
		callback.set_fragment(None);

		Ok(callback)
	}

	/// Authorize parameters for one request.
	///
	/// Static parameters are always included. Every key listed in `authorize_options` takes
	/// its configured value (`scope` from the strategy scope), and a non-empty request
	/// parameter of the same key wins. Request parameters outside `authorize_options` are
	/// ignored.
	pub fn authorize_params(&self, request_params: &BTreeMap<String, String>) -> BTreeMap<String, String> {
		let mut params = self.config.authorize_params.clone();

		for option in &self.config.authorize_options {
			let requested = request_params.get(option).filter(|value| !value.is_empty());
			let configured = if option == SCOPE {
				Some(&self.config.scope)
			} else {
				self.config.authorize_params.get(option)
			};

			if let Some(value) = requested.or(configured) {
				params.insert(option.clone(), value.clone());
			}
		}

		params
	}

	/// Builds the authorize redirect for an inbound request to the strategy.
	pub fn start_authorization(
		&self,
		host: &Url,
		request_params: &BTreeMap<String, String>,
	) -> Result<AuthorizationSession> {
		let mut params = self.authorize_params(request_params);
		let state = match params.get(STATE) {
			Some(state) if !state.is_empty() => state.clone(),
			_ => session::random_state(),
		};

		params.insert(STATE.into(), state.clone());

		let redirect_uri = self.callback_url(host)?;
		let mut authorize_url = self.config.descriptor.authorize_url.clone();
		let has_response_type = authorize_url.query_pairs().any(|(key, _)| key == RESPONSE_TYPE);
		let mut pairs = authorize_url.query_pairs_mut();

		if !has_response_type {
			pairs.append_pair(RESPONSE_TYPE, "code");
		}

		pairs.append_pair("client_id", &self.config.client_id);
		pairs.append_pair("redirect_uri", redirect_uri.as_str());

		for (key, value) in &params {
			pairs.append_pair(key, value);
		}

		drop(pairs);

		Ok(AuthorizationSession {
			state,
			scope: params.get(SCOPE).cloned(),
			redirect_uri,
			authorize_url,
			params,
		})
	}

	/// Validates the callback `state`, exchanges `code`, and opens an attempt.
	pub async fn complete(
		&self,
		session: &AuthorizationSession,
		returned_state: &str,
		code: &str,
	) -> Result<Attempt<C>> {
		session.validate_state(returned_state)?;

		let token = self
			.exchanger
			.exchange_code(CodeExchange {
				version: self.config.version,
				descriptor: &self.config.descriptor,
				client_id: &self.config.client_id,
				client_secret: self.config.client_secret.as_ref().map(|secret| secret.expose()),
				code,
				redirect_uri: &session.redirect_uri,
			})
			.await?;

		Ok(self.attempt(token))
	}

	/// Opens an attempt for a token obtained elsewhere.
	pub fn attempt(&self, token: AccessToken) -> Attempt<C> {
		let version = self.config.version;
		let request = endpoint::resolve(
			version,
			&self.config.fields,
			ResolveOptions { secure_image_url: self.config.secure_image_url },
		);

		Attempt::new(
			self.http_client.clone(),
			version,
			self.config.descriptor.clone(),
			request,
			Credential::adapt(version, token),
		)
	}
}
#[cfg(feature = "reqwest")]
impl Strategy<ReqwestHttpClient> {
	/// Builds a strategy on a fresh reqwest client that never follows redirects.
	pub fn new(config: StrategyConfig) -> Result<Self> {
		let client = ReqwestClient::builder()
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.map_err(ConfigError::from)?;

		Ok(Self::with_reqwest_client(config, ReqwestHttpClient::with_client(client)))
	}

	/// Builds a strategy that shares `http_client` between profile fetches and the exchange.
	pub fn with_reqwest_client(config: StrategyConfig, http_client: ReqwestHttpClient) -> Self {
		let http_client = Arc::new(http_client);
		let exchanger = Arc::new(BasicExchanger::<ReqwestHttpClient>::new(http_client.clone()));

		Self::with_http_client(config, http_client, exchanger)
	}
}
impl<C> Debug for Strategy<C>
where
	C: ?Sized + ProfileHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Strategy").field("config", &self.config).finish_non_exhaustive()
	}
}
