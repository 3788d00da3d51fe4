//! Demonstrates plugging a custom transport into the client.
//!
//! 1. Implement [`ApiHttpClient`] so the transport turns an [`ApiRequest`] into an
//!    [`ApiResponse`].
//! 2. Optionally override [`ApiHttpClient::map_transport_error`] to classify transport failures.
//! 3. Pass the transport to [`PivnetClient::with_http_client`].

// std
use std::{
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
};
// crates.io
use color_eyre::Result;
// self
use pivnet_client::{
	client::PivnetClient,
	config::ClientConfig,
	error::{Error, TransportError},
	http::{ApiHttpClient, ApiRequest, ApiResponse, HttpFuture},
};

#[derive(Debug)]
enum MockTransportError {
	Offline,
}
impl Display for MockTransportError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Offline => write!(f, "Mock transport is offline."),
		}
	}
}
impl StdError for MockTransportError {}

#[derive(Default)]
struct MockHttpClient {
	offline: bool,
}
impl ApiHttpClient for MockHttpClient {
	type TransportError = MockTransportError;

	fn send(&self, request: ApiRequest) -> HttpFuture<'_, Self::TransportError> {
		let offline = self.offline;

		Box::pin(async move {
			if offline {
				return Err(MockTransportError::Offline);
			}

			println!(
				"{} {} with body {}",
				request.method(),
				request.uri(),
				String::from_utf8_lossy(request.body())
			);

			let body = br#"{"access_key_id":"AKIA-DEMO","secret_access_key":"demo","session_token":"demo","bucket":"demo-bucket","region":"us-east-1"}"#;

			Ok(ApiResponse::new(body.to_vec()))
		})
	}

	fn map_transport_error(&self, error: Self::TransportError) -> Error {
		TransportError::network(error).into()
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = ClientConfig::builder("https://network.example.com", "demo-token").build()?;
	let client: PivnetClient<MockHttpClient> =
		PivnetClient::with_http_client(config.clone(), MockHttpClient::default());
	let token = client.generate_federation_token("demo-product").await?;

	println!("Mock transport issued credentials for bucket {}: {token:?}.", token.bucket);

	let offline: PivnetClient<MockHttpClient> =
		PivnetClient::with_http_client(config, MockHttpClient { offline: true });

	match offline.generate_federation_token("demo-product").await {
		Ok(_) => println!("Offline transport unexpectedly succeeded."),
		Err(e) => println!("Offline transport failed as expected: {e}"),
	}

	Ok(())
}
