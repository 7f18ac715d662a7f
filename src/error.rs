//! Exchange-level error types shared across the handler and the profile fetcher.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical exchange error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Request body was never parsed by the host framework.
	#[error("Token exchange requires body parsing; apply a body-parsing layer before this handler.")]
	MissingBody,
	/// A required body parameter is absent.
	#[error("Missing required parameter: {name}")]
	MissingParameter {
		/// Name of the missing body parameter.
		name: &'static str,
	},
	/// Upstream profile retrieval failed.
	#[error(transparent)]
	Upstream(#[from] UpstreamError),
	/// The issuance callback produced no access token.
	#[error("Invalid facebook access token")]
	InvalidGrant,
}
impl Error {
	/// Returns the classification consumed by the host's error-response translation.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Config(_) => ErrorKind::Configuration,
			Self::InvalidGrant => ErrorKind::InvalidGrant,
			Self::MissingBody | Self::MissingParameter { .. } | Self::Upstream(_) =>
				ErrorKind::InvalidRequest,
		}
	}
}

/// Error classification surfaced alongside the message.
///
/// The protocol kinds map one-to-one onto OAuth 2.0 error-response codes;
/// [`Configuration`](Self::Configuration) marks setup failures that should never
/// reach a client as a protocol error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// Fatal setup problem raised at construction time.
	Configuration,
	/// Reported to the client as an `invalid_request` error response.
	InvalidRequest,
	/// Reported to the client as an `invalid_grant` error response.
	InvalidGrant,
}
impl ErrorKind {
	/// Returns a stable label suitable for error responses and metrics fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ErrorKind::Configuration => "configuration",
			ErrorKind::InvalidRequest => "invalid_request",
			ErrorKind::InvalidGrant => "invalid_grant",
		}
	}
}
impl Display for ErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Configuration and validation failures raised while building the exchange.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum ConfigError {
	/// App secret environment variable is absent or empty.
	#[error("{var} needs to be on your environment properties.")]
	MissingAppSecret {
		/// Environment variable consulted for the secret.
		var: &'static str,
	},
	/// App secret values cannot be empty.
	#[error("Facebook app secret cannot be empty.")]
	EmptyAppSecret,
	/// Profile field names must be non-empty strings.
	#[error("Facebook profile field names cannot be empty.")]
	EmptyProfileField,
	/// Scope separators must be non-empty strings.
	#[error("Scope separators cannot be empty.")]
	EmptyScopeSeparator,
	/// The Graph endpoint must use HTTPS.
	#[error("The Graph endpoint must use HTTPS: {url}.")]
	InsecureGraphEndpoint {
		/// Endpoint URL that failed validation.
		url: String,
	},
}

/// Upstream profile retrieval failures, all reported as `invalid_request`.
#[derive(Debug, ThisError)]
pub enum UpstreamError {
	/// Graph API returned an empty profile document.
	#[error("Could not get Facebook profile using provided access token.")]
	EmptyProfile,
	/// Transport failure while calling the Graph API.
	#[error("Could not get Facebook profile using provided access token - {message}")]
	Transport {
		/// Text of the underlying transport failure, preserved for diagnostics.
		message: String,
		/// Transport-specific failure.
		#[source]
		source: crate::http::GraphTransportError,
	},
	/// Graph API response could not be parsed as JSON.
	#[error("Could not get Facebook profile using provided access token - malformed profile document")]
	ProfileParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl UpstreamError {
	/// Wraps a transport failure, keeping its message text intact.
	pub fn transport(source: crate::http::GraphTransportError) -> Self {
		Self::Transport { message: source.to_string(), source }
	}
}
