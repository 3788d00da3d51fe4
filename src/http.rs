//! Transport primitives for Pivnet API exchanges.
//!
//! The module exposes [`ApiHttpClient`], the client's only dependency on an HTTP stack, together
//! with the [`ReqwestHttpClient`] adapter enabled by the default `reqwest` feature. Custom
//! transports (test doubles, proxies, alternative stacks) implement the trait and are handed to
//! [`PivnetClient::with_http_client`](crate::client::PivnetClient::with_http_client).

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
use http::header::{HeaderMap, RETRY_AFTER};
#[cfg(feature = "reqwest")] use reqwest::redirect::Policy;
use time::format_description::well_known::Rfc2822;
// self
use crate::{_prelude::*, error::TransportError};
#[cfg(feature = "reqwest")] use crate::{config::ClientConfig, error::ConfigError};

/// Fully-built request handed to a transport.
pub type ApiRequest = http::Request<Vec<u8>>;
/// Raw response returned by a transport.
pub type ApiResponse = http::Response<Vec<u8>>;
/// Boxed future returned by [`ApiHttpClient::send`].
pub type HttpFuture<'a, E> = Pin<Box<dyn Future<Output = Result<ApiResponse, E>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing one request/response exchange.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can be shared by
/// concurrent callers behind an `Arc`. The returned future must own whatever state it needs; the
/// client never holds a borrow of the request across the call.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Sends `request` and resolves once the full response body has been read.
	///
	/// Non-2xx statuses are responses, not errors; only failures that prevent obtaining an HTTP
	/// status belong in [`ApiHttpClient::TransportError`].
	fn send(&self, request: ApiRequest) -> HttpFuture<'_, Self::TransportError>;

	/// Converts a transport failure into a client [`Error`].
	fn map_transport_error(&self, error: Self::TransportError) -> Error {
		TransportError::network(error).into()
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
/// API calls must not follow redirects: a 3xx answer is classified like any other non-2xx
/// status instead of being replayed as a body-less `GET`. Configure any custom
/// [`ReqwestClient`] passed to [`ReqwestHttpClient::with_client`] the same way.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a non-redirecting reqwest client honoring the configuration's TLS switch.
	pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.redirect(Policy::none())
			.danger_accept_invalid_certs(config.skip_tls_verification)
			.danger_accept_invalid_hostnames(config.skip_tls_verification)
			.build()?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn send(&self, request: ApiRequest) -> HttpFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let response = client.execute(request.try_into()?).await?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new = ApiResponse::new(response.bytes().await?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok::<_, ReqwestError>(response_new)
		})
	}

	fn map_transport_error(&self, error: Self::TransportError) -> Error {
		if error.is_builder() {
			return ConfigError::from(error).into();
		}

		TransportError::from(error).into()
	}
}

/// Parses a `Retry-After` header expressed either as delta seconds or an RFC 2822 date.
pub(crate) fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX)));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}
