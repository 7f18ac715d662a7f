//! Rust's turnkey Facebook token exchange—swap Facebook access tokens for locally-issued API
//! tokens with signed profile lookups and transport-aware observability in one middleware crate
//! built for production.
//!
//! The handler reads `access_token` (and optionally `scope`) from the parsed request body,
//! retrieves the caller's Graph profile through an `appsecret_proof`-signed lookup, and hands
//! `(client, profile, scope)` to the embedding application's issuance callback, which mints the
//! local tokens. The serialized token response is written back through the host's request
//! context.
//!
//! ```no_run
//! use facebook_token_exchange::{
//! 	error::Result,
//! 	exchange::{FacebookExchange, Issuance, IssueFn},
//! 	profile::{AppSecret, ProfileFetcher},
//! };
//! use serde_json::Value;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//! 	let fetcher = ProfileFetcher::new(AppSecret::from_env()?);
//! 	let exchange = FacebookExchange::new(
//! 		fetcher,
//! 		IssueFn(|_client: Option<&Value>, profile: &Value, scope: &[String]| -> Result<Issuance> {
//! 			let subject = profile["id"].as_str().unwrap_or_default();
//!
//! 			Ok(Issuance::Token(format!("local-{subject}-{}", scope.len())))
//! 		}),
//! 	);
//!
//! 	// Hand `exchange` to the authorization server and call
//! 	// `exchange.handle(&mut ctx).await` once per token-exchange request.
//! 	# let _ = exchange;
//! 	Ok(())
//! }
//! ```

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod context;
pub mod error;
pub mod exchange;
pub mod http;
pub mod obs;
pub mod profile;
pub mod scope;
#[cfg(feature = "reqwest")]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; available with the default
	//! `reqwest` transport.

	pub use crate::_prelude::*;

	// self
	use crate::{
		http::ReqwestGraphClient,
		profile::{AppSecret, ProfileFetcher},
	};

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_graph_client() -> ReqwestGraphClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestGraphClient::with_client(client)
	}

	/// Constructs a [`ProfileFetcher`] aimed at a mock server and backed by the reqwest
	/// transport used across integration tests.
	pub fn build_test_fetcher(base_url: &str, secret: &str) -> ProfileFetcher<ReqwestGraphClient> {
		let app_secret = AppSecret::new(secret).expect("Test app secret should be valid.");
		let graph_url = Url::parse(base_url).expect("Mock Graph URL should parse successfully.");

		ProfileFetcher::with_http_client(app_secret, test_reqwest_graph_client())
			.graph_url(graph_url)
			.expect("Mock Graph URL should be accepted.")
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::Client as ReqwestClient;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use httpmock as _;
