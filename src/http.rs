//! Transport primitives for Graph API profile lookups.
//!
//! The module exposes [`GraphHttpClient`] so downstream crates can integrate custom
//! HTTP clients without pulling a specific stack into the exchange core. The crate
//! ships [`ReqwestGraphClient`] as the default implementation behind the `reqwest`
//! feature; implementations perform exactly one attempt per call and must surface
//! non-success statuses as errors, because the fetcher never retries.

// std
use std::ops::Deref;
// self
use crate::_prelude::*;

/// Boxed error emitted by Graph transports.
pub type GraphTransportError = Box<dyn StdError + Send + Sync>;
/// Boxed response future returned by [`GraphHttpClient::get`].
pub type GraphFuture<'a> =
	Pin<Box<dyn Future<Output = Result<Vec<u8>, GraphTransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing the profile lookup.
///
/// The trait is the crate's only dependency on an HTTP stack. Callers provide an
/// implementation (typically behind `Arc<T>` where `T: GraphHttpClient`) and the
/// fetcher issues a single GET through it per exchange request. Implementations
/// must be `Send + Sync + 'static` so one fetcher can serve concurrent requests,
/// and the returned futures must be `Send` for the lifetime of the in-flight call.
pub trait GraphHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Executes a single GET and resolves with the response body on a success status.
	///
	/// Non-2xx statuses, connection failures, and body-read failures all resolve to
	/// an error; the fetcher wraps them without retrying.
	fn get<'a>(&'a self, url: &'a Url) -> GraphFuture<'a>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
/// The profile lookup is a plain GET with query parameters; any custom
/// [`ReqwestClient`] configuration (timeouts, proxies) carries over unchanged.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestGraphClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestGraphClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestGraphClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestGraphClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl GraphHttpClient for ReqwestGraphClient {
	fn get<'a>(&'a self, url: &'a Url) -> GraphFuture<'a> {
		let client = self.0.clone();

		Box::pin(async move {
			let response = client.get(url.as_str()).send().await?.error_for_status()?;

			Ok(response.bytes().await?.to_vec())
		})
	}
}
