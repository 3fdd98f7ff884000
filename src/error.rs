//! Client-level error types shared across the token cache, transports, and Graph wrappers.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Temporary upstream failure; retry with backoff.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Token endpoint rejected the password grant (bad user name or password).
	#[error("Token endpoint rejected the grant: {reason}.")]
	InvalidGrant {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Client authentication failed or the client id is unknown to the tenant.
	#[error("Client authentication failed: {reason}.")]
	InvalidClient {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Graph API rejected the request.
	#[error("Graph API returned {status}: {message}.")]
	Graph {
		/// HTTP status code.
		status: u16,
		/// OData error code, when the body carried one.
		code: Option<String>,
		/// OData error message or a body preview.
		message: String,
	},
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// A required option was not supplied.
	#[error("Params Error: option `{field}` is required.")]
	MissingOption {
		/// Option key as it appears in the plugin options.
		field: &'static str,
	},
	/// An option was supplied with the wrong type or an unusable value.
	#[error("Params Error: option `{field}` {reason}.")]
	InvalidOption {
		/// Option key as it appears in the plugin options.
		field: &'static str,
		/// What is wrong with the supplied value.
		reason: String,
	},
	/// An endpoint URL could not be assembled.
	#[error("Endpoint URL is invalid.")]
	InvalidUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoint URL cannot carry path segments (e.g. `data:` URLs).
	#[error("Endpoint URL `{url}` cannot be used as a base.")]
	CannotBeABase {
		/// Offending URL.
		url: String,
	},
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	SerializeBody(#[source] serde_json::Error),
	/// Token endpoint response omitted `access_token`.
	#[error("Token endpoint response is missing access_token.")]
	MissingAccessToken,
	/// Token endpoint response omitted `expires_on`.
	#[error("Token endpoint response is missing expires_on.")]
	MissingExpiresOn,
	/// Token endpoint returned an `expires_on` that cannot be represented.
	#[error("The expires_on value exceeds the supported range.")]
	ExpiresOnOutOfRange,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}

	/// Shorthand for an [`InvalidOption`](Self::InvalidOption) that expected a string.
	pub fn not_a_string(field: &'static str) -> Self {
		Self::InvalidOption { field, reason: "must be a String".into() }
	}
}
impl From<url::ParseError> for ConfigError {
	fn from(source: url::ParseError) -> Self {
		Self::InvalidUrl { source }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Temporary failure variants (safe to retry).
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Token endpoint returned an unexpected but non-fatal response.
	#[error("Token endpoint returned an unexpected response: {message}.")]
	TokenEndpoint {
		/// Provider- or client-supplied message summarizing the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Token endpoint responded with malformed JSON that could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Transport gave up waiting for a response.
	#[error("Request timed out while calling {endpoint}.")]
	Timeout {
		/// URL that was being called.
		endpoint: String,
	},
	/// Graph endpoint throttled the caller or failed server-side.
	#[error("Graph endpoint returned {status}: {message}.")]
	GraphEndpoint {
		/// Provider-supplied message summarizing the failure.
		message: String,
		/// HTTP status code.
		status: u16,
	},
	/// Graph endpoint responded with malformed JSON that could not be parsed.
	#[error("Graph endpoint returned malformed JSON.")]
	GraphResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code.
		status: u16,
	},
}

/// Transport-level failures (DNS, TCP, TLS).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {endpoint}.")]
	Network {
		/// Host or URL that was being called.
		endpoint: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(
		endpoint: impl Into<String>,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { endpoint: endpoint.into(), source: Box::new(src) }
	}
}
