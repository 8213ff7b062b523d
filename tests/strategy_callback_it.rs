#![cfg(feature = "reqwest")]

// std
use std::collections::{BTreeMap, HashMap};
// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use oauth2_linkedin::{
	ApiVersion, StrategyConfig, StrategyConfigBuilder,
	error::{Error, TransportError},
	http::ReqwestHttpClient,
	strategy::ReqwestStrategy,
	url::Url,
};

const CLIENT_ID: &str = "client-it";
const CLIENT_SECRET: &str = "secret-it";

fn strategy(server: &MockServer, version: ApiVersion) -> ReqwestStrategy {
	let config = StrategyConfig::builder(version, CLIENT_ID)
		.client_secret(CLIENT_SECRET)
		.site(server.base_url())
		.authorize_url("/oauth/v2/authorization?response_type=code")
		.token_url("/oauth/v2/accessToken")
		.build()
		.expect("Loopback configuration should build successfully.");

	ReqwestStrategy::with_reqwest_client(config, ReqwestHttpClient::default())
}

fn host() -> Url {
	Url::parse("https://app.example.com").expect("Host fixture should parse successfully.")
}

#[tokio::test]
async fn callback_exchanges_the_code_and_reads_userinfo() {
	let server = MockServer::start_async().await;
	let strategy = strategy(&server, ApiVersion::OidcUserinfoLegacyScopes);
	let session = strategy
		.start_authorization(&host(), &BTreeMap::new())
		.expect("Authorization session should start successfully.");
	let authorize_pairs: HashMap<_, _> = session.authorize_url.query_pairs().into_owned().collect();

	assert_eq!(authorize_pairs.get("response_type"), Some(&"code".into()));
	assert_eq!(authorize_pairs.get("client_id"), Some(&CLIENT_ID.into()));
	assert_eq!(
		authorize_pairs.get("redirect_uri"),
		Some(&"https://app.example.com/auth/linkedin/callback".into())
	);
	assert_eq!(authorize_pairs.get("scope"), Some(&"openid r_liteprofile r_emailaddress".into()));
	assert_eq!(authorize_pairs.get("state"), Some(&session.state));

	let token = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/oauth/v2/accessToken")
				.header("content-type", "application/x-www-form-urlencoded");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"access-it\",\"refresh_token\":\"refresh-it\",\"token_type\":\"bearer\",\"expires_in\":5184000}",
			);
		})
		.await;
	let userinfo = server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/userinfo").header("authorization", "Bearer access-it");
			then.status(200).header("content-type", "application/json").json_body(json!({
				"sub": "member-it",
				"given_name": "Ada",
				"family_name": "Lovelace",
				"email": "ada@example.com",
				"vanityName": "ada-lovelace"
			}));
		})
		.await;
	let attempt = strategy
		.complete(&session, &session.state, "code-it")
		.await
		.expect("Callback should complete successfully.");

	token.assert_async().await;
	userinfo.assert_calls_async(0).await;

	let info = attempt.info().await.expect("Info should resolve.");

	assert_eq!(attempt.uid().await.expect("Uid should resolve.").as_deref(), Some("member-it"));
	assert_eq!(info.get("email"), Some(&json!("ada@example.com")));
	assert_eq!(
		info.get("public_profile_url"),
		Some(&json!("https://www.linkedin.com/in/ada-lovelace"))
	);
	assert_eq!(attempt.credential().refresh_token().map(|secret| secret.expose()), Some("refresh-it"));
	assert!(attempt.credential().expires_at().is_some());

	userinfo.assert_calls_async(1).await;
}

#[tokio::test]
async fn rejected_codes_map_to_invalid_grant() {
	let server = MockServer::start_async().await;
	let strategy = strategy(&server, ApiVersion::RestV2);
	let session = strategy
		.start_authorization(&host(), &BTreeMap::new())
		.expect("Authorization session should start successfully.");
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/v2/accessToken");
			then.status(400)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_grant\",\"error_description\":\"already used\"}");
		})
		.await;
	let err = strategy
		.complete(&session, &session.state, "stale-code")
		.await
		.expect_err("Rejected codes should surface to the caller.");

	assert!(matches!(err, Error::InvalidGrant { ref reason } if reason.contains("already used")));

	mock.assert_async().await;
}

#[tokio::test]
async fn rejected_client_credentials_map_to_invalid_client() {
	let server = MockServer::start_async().await;
	let strategy = strategy(&server, ApiVersion::RestV2);
	let session = strategy
		.start_authorization(&host(), &BTreeMap::new())
		.expect("Authorization session should start successfully.");
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/v2/accessToken");
			then.status(401)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_client\",\"error_description\":\"Client authentication failed\"}");
		})
		.await;
	let err = strategy
		.complete(&session, &session.state, "code")
		.await
		.expect_err("Bad client credentials should surface to the caller.");

	assert!(matches!(err, Error::InvalidClient { ref reason } if reason.starts_with("invalid_client")));

	mock.assert_async().await;
}

#[tokio::test]
async fn broken_token_endpoint_reports_its_status() {
	let server = MockServer::start_async().await;
	let strategy = strategy(&server, ApiVersion::RestV2);
	let session = strategy
		.start_authorization(&host(), &BTreeMap::new())
		.expect("Authorization session should start successfully.");
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/v2/accessToken");
			then.status(502).body("<html>Bad Gateway</html>");
		})
		.await;
	let err = strategy
		.complete(&session, &session.state, "code")
		.await
		.expect_err("Gateway failures should surface to the caller.");

	assert!(matches!(
		err,
		Error::Transport(TransportError::Status { endpoint: "token", status: 502 })
	));
}

#[tokio::test]
async fn forged_state_never_reaches_the_token_endpoint() {
	let server = MockServer::start_async().await;
	let strategy = strategy(&server, ApiVersion::RestV2);
	let session = strategy
		.start_authorization(&host(), &BTreeMap::new())
		.expect("Authorization session should start successfully.");
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/v2/accessToken");
			then.status(200);
		})
		.await;
	let err = strategy
		.complete(&session, "forged", "code")
		.await
		.expect_err("Forged state should be rejected.");

	assert!(matches!(err, Error::StateMismatch));

	mock.assert_calls_async(0).await;
}

#[test]
fn deserialized_config_drives_the_authorize_url() {
	let builder: StrategyConfigBuilder = serde_json::from_value(json!({
		"name": "linkedin_oidc",
		"version": "oidc_userinfo_modern_scopes",
		"client_id": CLIENT_ID,
		"redirect_uri": "https://app.example.com/custom/callback",
		"authorize_options": ["scope", "state", "prompt"],
		"authorize_params": { "prompt": "consent" }
	}))
	.expect("Configuration should deserialize.");
	let strategy =
		ReqwestStrategy::new(builder.build().expect("Configuration should build."))
			.expect("Strategy should build.");
	let request: BTreeMap<String, String> =
		[("prompt".to_owned(), "login".to_owned())].into_iter().collect();
	let session =
		strategy.start_authorization(&host(), &request).expect("Authorization should start.");
	let pairs: HashMap<_, _> = session.authorize_url.query_pairs().into_owned().collect();

	assert_eq!(strategy.callback_path(), "/auth/linkedin_oidc/callback");
	assert_eq!(session.authorize_url.host_str(), Some("www.linkedin.com"));
	assert_eq!(pairs.get("redirect_uri"), Some(&"https://app.example.com/custom/callback".into()));
	assert_eq!(pairs.get("scope"), Some(&"openid profile email".into()));
	assert_eq!(pairs.get("prompt"), Some(&"login".into()));
}
