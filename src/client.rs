//! Pivnet API client and the request plumbing shared by every endpoint.
//!
//! [`PivnetClient`] owns the immutable [`ClientConfig`] and a transport. Each call builds one
//! request under [`API_PREFIX`](crate::config::API_PREFIX), attaches the authorization and
//! `User-Agent` headers, and classifies the response: 2xx bodies decode into the typed result,
//! anything else decodes into an [`UpstreamError`] carrying the status and upstream message.

// crates.io
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserializer, de::DeserializeOwned};
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	config::ClientConfig,
	error::{ConfigError, DecodeError, UpstreamError},
	http::{ApiHttpClient, ApiResponse, parse_retry_after},
	obs::{self, Operation, RequestOutcome, RequestSpan},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

const JSON: &str = "application/json";

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestPivnetClient = PivnetClient<ReqwestHttpClient>;

/// Authenticated client for the Pivnet API.
///
/// The configuration and transport are shared behind `Arc`s and never mutated, so clones are
/// cheap and concurrent calls do not interfere with each other.
pub struct PivnetClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Validated configuration applied to every request.
	pub config: Arc<ClientConfig>,
	/// Transport used for every outbound request.
	pub http_client: Arc<C>,
}
impl<C> PivnetClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(config: ClientConfig, http_client: impl Into<Arc<C>>) -> Self {
		Self { config: Arc::new(config), http_client: http_client.into() }
	}

	/// Sends `body` as JSON to `path` and decodes the JSON response into `T`.
	pub(crate) async fn call_json<B, T>(
		&self,
		operation: Operation,
		method: Method,
		path: &'static str,
		body: &B,
	) -> Result<T>
	where
		B: ?Sized + Serialize + Sync,
		T: DeserializeOwned,
	{
		let span = RequestSpan::new(operation, &method, path);

		obs::record_request_outcome(operation, RequestOutcome::Attempt);

		let result = span
			.instrument(async {
				let response = self.make_request(&span, method, path, body).await?;

				span.record_status(response.status().as_u16());

				decode_response(&response)
			})
			.await;

		match &result {
			Ok(_) => obs::record_request_outcome(operation, RequestOutcome::Success),
			Err(e) => {
				span.record_failure(e);
				obs::record_request_outcome(operation, RequestOutcome::Failure);
			},
		}

		result
	}

	async fn make_request<B>(
		&self,
		span: &RequestSpan,
		method: Method,
		path: &str,
		body: &B,
	) -> Result<ApiResponse>
	where
		B: ?Sized + Serialize + Sync,
	{
		let url = self.config.endpoint_url(path);
		let payload = serde_json::to_vec(body).map_err(DecodeError::RequestEncode)?;
		let request = http::Request::builder()
			.method(method)
			.uri(url.as_str())
			.header(AUTHORIZATION, self.config.authorization_value())
			.header(USER_AGENT, self.config.user_agent.as_str())
			.header(ACCEPT, JSON)
			.header(CONTENT_TYPE, JSON)
			.body(payload)
			.map_err(ConfigError::from)?;

		span.record_dispatch(&url);

		self.http_client.send(request).await.map_err(|e| self.http_client.map_transport_error(e))
	}
}
#[cfg(feature = "reqwest")]
impl PivnetClient<ReqwestHttpClient> {
	/// Creates a client backed by a reqwest transport built from `config`.
	pub fn new(config: ClientConfig) -> Result<Self> {
		let http_client = ReqwestHttpClient::from_config(&config)?;

		Ok(Self::with_http_client(config, http_client))
	}
}
impl<C> Clone for PivnetClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn clone(&self) -> Self {
		Self { config: Arc::clone(&self.config), http_client: Arc::clone(&self.http_client) }
	}
}
impl<C> Debug for PivnetClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PivnetClient")
			.field("host", &self.config.host.as_str())
			.field("auth_scheme", &self.config.auth_scheme)
			.field("user_agent", &self.config.user_agent)
			.finish()
	}
}

/// Failure payload returned by the API for non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
	message: String,
	#[serde(default, deserialize_with = "lenient_errors")]
	errors: Vec<String>,
}

/// Accepts `null`, a single string, or an array of arbitrary values for `errors`; only `message`
/// is load-bearing.
fn lenient_errors<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
	D: Deserializer<'de>,
{
	let errors = match Value::deserialize(deserializer)? {
		Value::Array(items) => items
			.into_iter()
			.map(|item| match item {
				Value::String(s) => s,
				other => other.to_string(),
			})
			.collect(),
		Value::String(s) => vec![s],
		_ => Vec::new(),
	};

	Ok(errors)
}

fn decode_response<T>(response: &ApiResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	let status = response.status();

	if status.is_success() {
		return decode_json(response.body())
			.map_err(|source| DecodeError::ResponseBody { source, status: status.as_u16() }.into());
	}

	let body: ErrorBody = decode_json(response.body()).map_err(|source| DecodeError::ErrorBody {
		source,
		status: status.as_u16(),
		body: String::from_utf8_lossy(response.body()).into_owned(),
	})?;

	Err(UpstreamError {
		status: status.as_u16(),
		message: body.message,
		errors: body.errors,
		retry_after: parse_retry_after(response.headers()),
	}
	.into())
}

fn decode_json<T>(bytes: &[u8]) -> Result<T, serde_path_to_error::Error<serde_json::Error>>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(bytes);

	serde_path_to_error::deserialize(&mut deserializer)
}
