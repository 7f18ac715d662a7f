//! Facebook token-exchange middleware: configuration, request processing, and
//! response assembly.

pub mod issue;
pub use issue::*;

// crates.io
use serde_json::{Map, Value};
// self
use crate::{
	_prelude::*,
	context::ExchangeContext,
	error::ConfigError,
	exchange::issue::Issuer,
	http::GraphHttpClient,
	obs::{self, Stage, StageOutcome, StageSpan},
	profile::ProfileFetcher,
	scope::ScopeSeparators,
};

/// Default per-request attribute holding the authenticated client.
pub const DEFAULT_USER_PROPERTY: &str = "user";

/// Immutable exchange configuration, built once and shared across requests.
#[derive(Clone, Debug)]
pub struct ExchangeOptions {
	/// Per-request attribute holding the authenticated client.
	pub user_property: String,
	/// Candidate scope separators in priority order.
	pub scope_separators: ScopeSeparators,
	/// Profile fields requested from the Graph API.
	pub fields: Option<Vec<String>>,
}
impl Default for ExchangeOptions {
	fn default() -> Self {
		Self {
			user_property: DEFAULT_USER_PROPERTY.into(),
			scope_separators: ScopeSeparators::default(),
			fields: None,
		}
	}
}

/// Middleware that exchanges a Facebook access token for locally-issued API
/// tokens.
///
/// One value serves every request: the configuration is read-only after
/// construction and the only suspension point is the outbound profile lookup,
/// so concurrent requests proceed independently. Construction performs no I/O.
pub struct FacebookExchange<C>
where
	C: ?Sized + GraphHttpClient,
{
	options: ExchangeOptions,
	fetcher: ProfileFetcher<C>,
	issuer: Issuer,
}
impl<C> FacebookExchange<C>
where
	C: ?Sized + GraphHttpClient,
{
	/// Creates an exchange with default options and a basic issuance callback.
	pub fn new(fetcher: ProfileFetcher<C>, issuer: impl IssueToken) -> Self {
		Self {
			options: ExchangeOptions::default(),
			fetcher,
			issuer: Issuer::Basic(Arc::new(issuer)),
		}
	}

	/// Creates an exchange that requests the given profile fields.
	pub fn with_fields<I, S>(
		fetcher: ProfileFetcher<C>,
		fields: I,
		issuer: impl IssueToken,
	) -> Result<Self, ConfigError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self::builder(fetcher).fields(fields).issue(issuer)
	}

	/// Starts a builder for the fully-configurable construction shape.
	pub fn builder(fetcher: ProfileFetcher<C>) -> FacebookExchangeBuilder<C> {
		FacebookExchangeBuilder::new(fetcher)
	}

	/// Returns the effective configuration.
	pub fn options(&self) -> &ExchangeOptions {
		&self.options
	}

	/// Processes one token-exchange request against the supplied context.
	///
	/// On success the serialized token response and its headers are written into
	/// the context; any failure aborts the whole request and surfaces through
	/// [`Error`], classified for the host's error-response translation.
	pub async fn handle<Ctx>(&self, ctx: &mut Ctx) -> Result<()>
	where
		Ctx: ExchangeContext,
	{
		const STAGE: Stage = Stage::Exchange;

		let span = StageSpan::new(STAGE, "handle");

		obs::record_stage_outcome(STAGE, StageOutcome::Attempt);

		let result = span.instrument(self.process(ctx)).await;

		match &result {
			Ok(_) => obs::record_stage_outcome(STAGE, StageOutcome::Success),
			Err(_) => obs::record_stage_outcome(STAGE, StageOutcome::Failure),
		}

		result
	}

	async fn process<Ctx>(&self, ctx: &mut Ctx) -> Result<()>
	where
		Ctx: ExchangeContext,
	{
		let Some(body) = ctx.body() else {
			return Err(Error::MissingBody);
		};
		// Non-string and empty values count as absent.
		let access_token = body
			.get("access_token")
			.and_then(Value::as_str)
			.filter(|token| !token.is_empty())
			.ok_or(Error::MissingParameter { name: "access_token" })?;
		let raw_scope =
			body.get("scope").and_then(Value::as_str).filter(|scope| !scope.is_empty());
		// The configured attribute holds the authenticated client; at the token
		// endpoint this is the OAuth 2.0 client, not the resource owner.
		let client = ctx.attribute(&self.options.user_property);
		let profile =
			self.fetcher.fetch(self.options.fields.as_deref(), access_token).await?;
		let scope = raw_scope
			.map(|raw| self.options.scope_separators.split(raw))
			.unwrap_or_default();
		let issuance = self.issuer.issue(client, &profile, &scope, body).await?;
		let Some((access_token, refresh_token, params)) = issuance.into_parts() else {
			return Err(Error::InvalidGrant);
		};
		let payload = assemble_token_response(access_token, refresh_token, params);

		ctx.set_header("Content-Type", "application/json");
		ctx.set_header("Cache-Control", "no-store");
		ctx.set_header("Pragma", "no-cache");
		ctx.set_body(Value::Object(payload).to_string());

		Ok(())
	}
}
impl<C> Debug for FacebookExchange<C>
where
	C: ?Sized + GraphHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("FacebookExchange")
			.field("options", &self.options)
			.field("fetcher", &self.fetcher)
			.finish()
	}
}

/// Builder for [`FacebookExchange`] values.
///
/// Collects the option overrides and finalizes through [`issue`](Self::issue)
/// or [`issue_with_body`](Self::issue_with_body), so an exchange without an
/// issuance callback is unrepresentable.
pub struct FacebookExchangeBuilder<C>
where
	C: ?Sized + GraphHttpClient,
{
	fetcher: ProfileFetcher<C>,
	user_property: String,
	scope_separators: Vec<String>,
	fields: Option<Vec<String>>,
}
impl<C> FacebookExchangeBuilder<C>
where
	C: ?Sized + GraphHttpClient,
{
	fn new(fetcher: ProfileFetcher<C>) -> Self {
		Self {
			fetcher,
			user_property: DEFAULT_USER_PROPERTY.into(),
			scope_separators: vec![" ".into()],
			fields: None,
		}
	}

	/// Overrides the per-request attribute holding the authenticated client.
	pub fn user_property(mut self, name: impl Into<String>) -> Self {
		self.user_property = name.into();

		self
	}

	/// Replaces the separator list with a single separator.
	pub fn scope_separator(mut self, separator: impl Into<String>) -> Self {
		self.scope_separators = vec![separator.into()];

		self
	}

	/// Replaces the separator list; earlier entries take priority when splitting.
	pub fn scope_separators<I, S>(mut self, separators: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scope_separators = separators.into_iter().map(Into::into).collect();

		self
	}

	/// Sets the profile fields requested from the Graph API.
	pub fn fields<I, S>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.fields = Some(fields.into_iter().map(Into::into).collect());

		self
	}

	/// Finalizes the exchange with a basic issuance callback.
	pub fn issue(self, issuer: impl IssueToken) -> Result<FacebookExchange<C>, ConfigError> {
		self.finish(Issuer::Basic(Arc::new(issuer)))
	}

	/// Finalizes the exchange with a callback that receives the raw request body.
	pub fn issue_with_body(
		self,
		issuer: impl IssueTokenWithBody,
	) -> Result<FacebookExchange<C>, ConfigError> {
		self.finish(Issuer::WithBody(Arc::new(issuer)))
	}

	fn finish(self, issuer: Issuer) -> Result<FacebookExchange<C>, ConfigError> {
		if self.fields.as_ref().is_some_and(|fields| fields.iter().any(String::is_empty)) {
			return Err(ConfigError::EmptyProfileField);
		}

		let scope_separators = ScopeSeparators::new(self.scope_separators)?;
		let options = ExchangeOptions {
			user_property: self.user_property,
			scope_separators,
			fields: self.fields,
		};

		Ok(FacebookExchange { options, fetcher: self.fetcher, issuer })
	}
}

/// Builds the token response document.
///
/// Extra parameters are merged over the base fields (parameters win on key
/// conflicts) and `token_type` falls back to `Bearer` only when the parameters
/// did not set it.
fn assemble_token_response(
	access_token: String,
	refresh_token: Option<String>,
	params: Option<Map<String, Value>>,
) -> Map<String, Value> {
	let mut payload = Map::new();

	payload.insert("access_token".into(), Value::String(access_token));

	if let Some(refresh_token) = refresh_token {
		payload.insert("refresh_token".into(), Value::String(refresh_token));
	}
	if let Some(params) = params {
		for (key, value) in params {
			payload.insert(key, value);
		}
	}

	payload.entry("token_type").or_insert_with(|| Value::String("Bearer".into()));

	payload
}
