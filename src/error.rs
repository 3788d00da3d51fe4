//! Client-level error types shared across configuration, transport, and decoding.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration or request construction problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Upstream answered, but the body did not match the expected shape.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// Transport failure (DNS, TCP, TLS) before any HTTP status was obtained.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Upstream rejected the request with a non-2xx status.
	#[error(transparent)]
	Upstream(#[from] UpstreamError),
}
impl Error {
	/// Returns the upstream rejection, if this error carries one.
	pub fn as_upstream(&self) -> Option<&UpstreamError> {
		match self {
			Self::Upstream(e) => Some(e),
			_ => None,
		}
	}

	/// HTTP status attached to the failure, when the exchange got that far.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Upstream(e) => Some(e.status),
			Self::Decode(e) => e.status(),
			_ => None,
		}
	}
}

/// Configuration and request construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] http::Error),
	/// Host address cannot be parsed.
	#[error("Host `{host}` is not a valid URL.")]
	InvalidHost {
		/// Raw host string that failed to parse.
		host: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Host address uses a scheme other than `http` or `https`.
	#[error("Host scheme `{scheme}` is not supported; use http or https.")]
	UnsupportedScheme {
		/// Rejected scheme.
		scheme: String,
	},
	/// API token is empty.
	#[error("API token must not be empty.")]
	MissingToken,
	/// A configured value cannot be sent as an HTTP header.
	#[error("The {header} header value is invalid.")]
	InvalidHeaderValue {
		/// Header name that failed validation.
		header: &'static str,
		/// Underlying header validation failure.
		#[source]
		source: http::header::InvalidHeaderValue,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Bodies that could not be encoded or decoded.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Request payload could not be serialized.
	#[error("Request body could not be encoded as JSON.")]
	RequestEncode(#[source] serde_json::Error),
	/// Successful response did not match the expected result shape.
	#[error("Response body (status {status}) does not match the expected shape.")]
	ResponseBody {
		/// Structured parsing failure including the offending field path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
	/// Error response did not carry a parsable `message` payload.
	///
	/// The raw body is kept in `body` only; it never reaches the rendered message.
	#[error("Error response (status {status}) could not be parsed.")]
	ErrorBody {
		/// Structured parsing failure including the offending field path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
		/// Raw body, lossily decoded as UTF-8.
		body: String,
	},
}
impl DecodeError {
	/// HTTP status code of the undecodable response, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::RequestEncode(_) => None,
			Self::ResponseBody { status, .. } | Self::ErrorBody { status, .. } => Some(*status),
		}
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the Pivnet API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Non-2xx response carrying the upstream `message`.
///
/// The rendered form is `"<status> - <message>"`, optionally followed by
/// `". Errors: <a>, <b>"` when upstream listed detail errors. Callers may match on that prefix.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("{status} - {message}{}", render_details(.errors))]
pub struct UpstreamError {
	/// HTTP status code returned by the API.
	pub status: u16,
	/// Upstream message, verbatim.
	pub message: String,
	/// Optional detail errors listed by upstream.
	pub errors: Vec<String>,
	/// Retry-After hint expressed as a relative duration.
	pub retry_after: Option<Duration>,
}
impl UpstreamError {
	/// Classifies the rejection by status code.
	pub fn kind(&self) -> RejectionKind {
		RejectionKind::from_status(self.status)
	}
}

/// Well-known rejection classes surfaced by the Pivnet API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RejectionKind {
	/// 401: the token is missing, expired, or invalid.
	Unauthorized,
	/// 404: the resource does not exist or is hidden from the caller.
	NotFound,
	/// 429: the caller is being throttled.
	TooManyRequests,
	/// 451: the resource is export-controlled or otherwise restricted.
	UnavailableForLegalReasons,
	/// Any other non-2xx status.
	Other,
}
impl RejectionKind {
	/// Maps an HTTP status code to its rejection class.
	pub const fn from_status(status: u16) -> Self {
		match status {
			401 => Self::Unauthorized,
			404 => Self::NotFound,
			429 => Self::TooManyRequests,
			451 => Self::UnavailableForLegalReasons,
			_ => Self::Other,
		}
	}
}

fn render_details(errors: &[String]) -> String {
	if errors.is_empty() { String::new() } else { format!(". Errors: {}", errors.join(", ")) }
}
