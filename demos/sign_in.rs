//! Walks through building the LinkedIn authorize redirect and, when an access token is
//! supplied through `LINKEDIN_ACCESS_TOKEN`, reading the normalized identity.

// std
use std::{collections::BTreeMap, env};
// crates.io
use color_eyre::Result;
use url::Url;
// self
use oauth2_linkedin::{
	ApiVersion, StrategyConfig, auth::AccessToken, strategy::ReqwestStrategy,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let version = env::var("LINKEDIN_API_VERSION")
		.ok()
		.map(|value| value.parse::<ApiVersion>())
		.transpose()?
		.unwrap_or_default();
	let config = StrategyConfig::builder(version, "demo-client")
		.client_secret("demo-secret")
		.build()?;
	let strategy = ReqwestStrategy::new(config)?;
	let host = Url::parse("https://app.example.com")?;
	let session = strategy.start_authorization(&host, &BTreeMap::new())?;

	println!("Send your user to {}.", &session.authorize_url);
	println!("LinkedIn will redirect back to {}.", &session.redirect_uri);

	let Ok(token) = env::var("LINKEDIN_ACCESS_TOKEN") else {
		println!("Set LINKEDIN_ACCESS_TOKEN to fetch the {version} profile.");

		return Ok(());
	};
	let attempt = strategy.attempt(AccessToken::new(token));

	println!("uid: {:?}", attempt.uid().await?);
	println!("info: {}", serde_json::to_string_pretty(&attempt.info().await?)?);

	Ok(())
}
