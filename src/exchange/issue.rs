//! Issuance callback contracts consumed by the exchange handler.
//!
//! The embedding application supplies the callback that actually mints and
//! persists local tokens. Two variants exist: [`IssueToken`] receives
//! `(client, profile, scope)`, while [`IssueTokenWithBody`] additionally
//! receives the raw request body. Registering one or the other replaces the
//! runtime capability negotiation a dynamic host would perform.

// crates.io
use serde_json::{Map, Value};
// self
use crate::_prelude::*;

/// Boxed future returned by issuance callbacks.
pub type IssueFuture<'a> = Pin<Box<dyn Future<Output = Result<Issuance>> + 'a + Send>>;

/// Value produced by an issuance callback.
///
/// The shapes mirror the ordered results an authorization server may mint: a
/// bare access token, a token accompanied by extra response parameters, or a
/// token with a refresh token and optional parameters. [`Denied`](Self::Denied)
/// (and an empty access-token string) makes the exchange fail with
/// `invalid_grant`.
#[derive(Clone, Debug, PartialEq)]
pub enum Issuance {
	/// The callback declined to mint a token.
	Denied,
	/// Bare access token.
	Token(String),
	/// Access token plus additional response parameters.
	TokenWithParams(String, Map<String, Value>),
	/// Access token, refresh token, and optional additional response parameters.
	TokenWithRefresh(String, String, Option<Map<String, Value>>),
}
impl Issuance {
	/// Normalizes the issuance into `(access_token, refresh_token, params)`,
	/// or `None` when no token was produced.
	pub(crate) fn into_parts(self) -> Option<(String, Option<String>, Option<Map<String, Value>>)> {
		let parts = match self {
			Self::Denied => return None,
			Self::Token(access_token) => (access_token, None, None),
			Self::TokenWithParams(access_token, params) => (access_token, None, Some(params)),
			Self::TokenWithRefresh(access_token, refresh_token, params) =>
				(access_token, Some(refresh_token), params),
		};

		if parts.0.is_empty() {
			return None;
		}

		Some(parts)
	}
}

/// Issuance callback receiving the authenticated client, the Facebook profile,
/// and the requested scopes.
///
/// `client` is the per-request attribute the host deposited under the configured
/// user property; it is absent when the host performed no client authentication.
/// The profile is passed through from the Graph API unmodified.
pub trait IssueToken
where
	Self: 'static + Send + Sync,
{
	/// Mints the local token(s) for the presented exchange.
	fn issue<'a>(
		&'a self,
		client: Option<&'a Value>,
		profile: &'a Value,
		scope: &'a [String],
	) -> IssueFuture<'a>;
}

/// Issuance callback variant that additionally receives the raw request body.
pub trait IssueTokenWithBody
where
	Self: 'static + Send + Sync,
{
	/// Mints the local token(s) for the presented exchange.
	fn issue<'a>(
		&'a self,
		client: Option<&'a Value>,
		profile: &'a Value,
		scope: &'a [String],
		body: &'a Map<String, Value>,
	) -> IssueFuture<'a>;
}

/// Adapter that lifts a synchronous closure into [`IssueToken`].
pub struct IssueFn<F>(pub F);
impl<F> IssueToken for IssueFn<F>
where
	F: 'static + Send + Sync + Fn(Option<&Value>, &Value, &[String]) -> Result<Issuance>,
{
	fn issue<'a>(
		&'a self,
		client: Option<&'a Value>,
		profile: &'a Value,
		scope: &'a [String],
	) -> IssueFuture<'a> {
		let result = (self.0)(client, profile, scope);

		Box::pin(async move { result })
	}
}

/// Adapter that lifts a synchronous closure into [`IssueTokenWithBody`].
pub struct IssueWithBodyFn<F>(pub F);
impl<F> IssueTokenWithBody for IssueWithBodyFn<F>
where
	F: 'static
		+ Send
		+ Sync
		+ Fn(Option<&Value>, &Value, &[String], &Map<String, Value>) -> Result<Issuance>,
{
	fn issue<'a>(
		&'a self,
		client: Option<&'a Value>,
		profile: &'a Value,
		scope: &'a [String],
		body: &'a Map<String, Value>,
	) -> IssueFuture<'a> {
		let result = (self.0)(client, profile, scope, body);

		Box::pin(async move { result })
	}
}

/// Registered issuance callback; the variant records whether the callback asked
/// for raw-body access when it was registered.
pub(crate) enum Issuer {
	Basic(Arc<dyn IssueToken>),
	WithBody(Arc<dyn IssueTokenWithBody>),
}
impl Issuer {
	pub(crate) async fn issue(
		&self,
		client: Option<&Value>,
		profile: &Value,
		scope: &[String],
		body: &Map<String, Value>,
	) -> Result<Issuance> {
		match self {
			Self::Basic(issuer) => issuer.issue(client, profile, scope).await,
			Self::WithBody(issuer) => issuer.issue(client, profile, scope, body).await,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn issuance_normalizes_result_shapes() {
		assert_eq!(Issuance::Denied.into_parts(), None);
		assert_eq!(Issuance::Token(String::new()).into_parts(), None);
		assert_eq!(
			Issuance::Token("TOK".into()).into_parts(),
			Some(("TOK".into(), None, None)),
		);

		let mut params = Map::new();

		params.insert("foo".into(), Value::String("bar".into()));

		assert_eq!(
			Issuance::TokenWithParams("TOK".into(), params.clone()).into_parts(),
			Some(("TOK".into(), None, Some(params.clone()))),
		);
		assert_eq!(
			Issuance::TokenWithRefresh("TOK".into(), "REF".into(), Some(params.clone()))
				.into_parts(),
			Some(("TOK".into(), Some("REF".into()), Some(params))),
		);
	}

	#[tokio::test]
	async fn closure_adapters_dispatch_to_the_registered_variant() {
		let basic = Issuer::Basic(Arc::new(IssueFn(
			|_: Option<&Value>, _: &Value, scope: &[String]| -> Result<Issuance> {
				Ok(Issuance::Token(format!("basic-{}", scope.len())))
			},
		)));
		let with_body = Issuer::WithBody(Arc::new(IssueWithBodyFn(
			|_: Option<&Value>,
			 _: &Value,
			 _: &[String],
			 body: &Map<String, Value>|
			 -> Result<Issuance> {
				Ok(Issuance::Token(format!("body-{}", body.len())))
			},
		)));
		let profile = Value::Null;
		let scope = vec!["read".to_owned()];
		let mut body = Map::new();

		body.insert("access_token".into(), Value::String("tok".into()));

		let issued = basic
			.issue(None, &profile, &scope, &body)
			.await
			.expect("Basic issuance should succeed.");

		assert_eq!(issued, Issuance::Token("basic-1".into()));

		let issued = with_body
			.issue(None, &profile, &scope, &body)
			.await
			.expect("With-body issuance should succeed.");

		assert_eq!(issued, Issuance::Token("body-1".into()));
	}
}
