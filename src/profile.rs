//! Facebook Graph profile retrieval with `appsecret_proof` signing.
//!
//! The fetcher performs one signed `GET /me` per exchange request. Facebook
//! rejects server-side Graph calls that do not prove possession of the app
//! secret, so every request carries an `appsecret_proof` parameter holding the
//! hex-encoded HMAC-SHA256 of the presented access token keyed by the secret.

// crates.io
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, UpstreamError},
	http::GraphHttpClient,
	obs::{self, Stage, StageOutcome, StageSpan},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestGraphClient;

type HmacSha256 = Hmac<Sha256>;

/// Production Graph API base URL.
pub const GRAPH_BASE_URL: &str = "https://graph.facebook.com";
/// Environment variable consulted by [`AppSecret::from_env`].
pub const APP_SECRET_ENV: &str = "FB_APP_SECRET";

/// Redacted Facebook app secret used to sign `appsecret_proof` values.
#[derive(Clone, PartialEq, Eq)]
pub struct AppSecret(String);
impl AppSecret {
	/// Wraps a secret value after validating that it is non-empty.
	pub fn new(value: impl Into<String>) -> Result<Self, ConfigError> {
		let value = value.into();

		if value.is_empty() {
			return Err(ConfigError::EmptyAppSecret);
		}

		Ok(Self(value))
	}

	/// Reads the secret from the `FB_APP_SECRET` environment variable.
	///
	/// The value is validated once at startup and is immutable afterwards; a
	/// missing or empty variable fails here, so an unsigned Graph request can
	/// never be issued later.
	pub fn from_env() -> Result<Self, ConfigError> {
		std::env::var(APP_SECRET_ENV)
			.ok()
			.filter(|value| !value.is_empty())
			.map(Self)
			.ok_or(ConfigError::MissingAppSecret { var: APP_SECRET_ENV })
	}

	/// Computes the hex-encoded HMAC-SHA256 proof for an access token.
	pub fn proof_for(&self, access_token: &str) -> String {
		let mut mac = HmacSha256::new_from_slice(self.0.as_bytes())
			.expect("HMAC-SHA256 accepts keys of any length.");

		mac.update(access_token.as_bytes());

		hex::encode(mac.finalize().into_bytes())
	}
}
impl Debug for AppSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("AppSecret").field(&"<redacted>").finish()
	}
}
impl Display for AppSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Retrieves Facebook profiles on behalf of the exchange handler.
///
/// The fetcher owns the app secret and the HTTP transport; the Graph endpoint
/// defaults to [`GRAPH_BASE_URL`] and may be overridden for proxies or tests as
/// long as it stays HTTPS.
#[derive(Clone)]
pub struct ProfileFetcher<C>
where
	C: ?Sized + GraphHttpClient,
{
	http_client: Arc<C>,
	app_secret: AppSecret,
	graph_url: Url,
}
impl<C> ProfileFetcher<C>
where
	C: ?Sized + GraphHttpClient,
{
	/// Creates a fetcher that reuses the caller-provided transport.
	pub fn with_http_client(app_secret: AppSecret, http_client: impl Into<Arc<C>>) -> Self {
		Self { http_client: http_client.into(), app_secret, graph_url: default_graph_url() }
	}

	/// Overrides the Graph endpoint; non-HTTPS endpoints are rejected.
	pub fn graph_url(mut self, url: Url) -> Result<Self, ConfigError> {
		if url.scheme() != "https" {
			return Err(ConfigError::InsecureGraphEndpoint { url: url.to_string() });
		}

		self.graph_url = url;

		Ok(self)
	}

	/// Returns the proof-signing secret.
	pub fn app_secret(&self) -> &AppSecret {
		&self.app_secret
	}

	/// Retrieves the caller's profile from the Graph API.
	///
	/// Issues exactly one GET; empty documents, transport failures, and malformed
	/// JSON all surface as `invalid_request` protocol errors without retries.
	pub async fn fetch(&self, fields: Option<&[String]>, access_token: &str) -> Result<Value> {
		const STAGE: Stage = Stage::ProfileFetch;

		let span = StageSpan::new(STAGE, "fetch");

		obs::record_stage_outcome(STAGE, StageOutcome::Attempt);

		let result = span.instrument(self.fetch_profile(fields, access_token)).await;

		match &result {
			Ok(_) => obs::record_stage_outcome(STAGE, StageOutcome::Success),
			Err(_) => obs::record_stage_outcome(STAGE, StageOutcome::Failure),
		}

		result
	}

	async fn fetch_profile(&self, fields: Option<&[String]>, access_token: &str) -> Result<Value> {
		let url = self.profile_url(fields, access_token);
		let bytes = self.http_client.get(&url).await.map_err(UpstreamError::transport)?;

		if bytes.is_empty() {
			return Err(UpstreamError::EmptyProfile.into());
		}

		let mut deserializer = serde_json::Deserializer::from_slice(&bytes);
		let profile: Value = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| UpstreamError::ProfileParse { source })?;

		if profile.is_null() {
			return Err(UpstreamError::EmptyProfile.into());
		}

		Ok(profile)
	}

	fn profile_url(&self, fields: Option<&[String]>, access_token: &str) -> Url {
		let mut url = self.graph_url.clone();

		url.set_path("/me");

		{
			let mut pairs = url.query_pairs_mut();

			pairs.append_pair("access_token", access_token);
			pairs.append_pair("appsecret_proof", &self.app_secret.proof_for(access_token));

			if let Some(fields) = fields.filter(|fields| !fields.is_empty()) {
				pairs.append_pair("fields", &fields.join(","));
			}
		}

		url
	}
}
#[cfg(feature = "reqwest")]
impl ProfileFetcher<ReqwestGraphClient> {
	/// Creates a fetcher backed by the crate's default reqwest transport.
	pub fn new(app_secret: AppSecret) -> Self {
		Self::with_http_client(app_secret, ReqwestGraphClient::default())
	}
}
impl<C> Debug for ProfileFetcher<C>
where
	C: ?Sized + GraphHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProfileFetcher")
			.field("app_secret", &self.app_secret)
			.field("graph_url", &self.graph_url.as_str())
			.finish()
	}
}

fn default_graph_url() -> Url {
	Url::parse(GRAPH_BASE_URL).expect("The production Graph endpoint is a valid URL.")
}
