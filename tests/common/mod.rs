//! Shared helpers for integration tests.

#![allow(dead_code)]

// self
use pivnet_client::{
	client::ReqwestPivnetClient,
	config::{ClientConfig, ClientConfigBuilder},
};

/// Token configured on every test client.
pub const TEST_TOKEN: &str = "my-auth-token";
/// User agent configured on every test client.
pub const TEST_USER_AGENT: &str = "pivnet-resource/0.1.0 (some-url)";

/// Returns a config builder pointed at `host` with the shared test token and user agent.
///
/// TLS verification is skipped so the self-signed certificates produced by `httpmock` are
/// accepted.
pub fn test_config_builder(host: &str) -> ClientConfigBuilder {
	ClientConfig::builder(host, TEST_TOKEN).user_agent(TEST_USER_AGENT).skip_tls_verification(true)
}

/// Constructs a [`ReqwestPivnetClient`] from `config` using the production transport setup.
pub fn build_reqwest_client(config: ClientConfig) -> ReqwestPivnetClient {
	ReqwestPivnetClient::new(config).expect("Failed to build reqwest test client.")
}

/// Constructs a [`ReqwestPivnetClient`] pointed at `host` with the shared test configuration.
pub fn build_reqwest_test_client(host: &str) -> ReqwestPivnetClient {
	let config =
		test_config_builder(host).build().expect("Failed to build test client configuration.");

	build_reqwest_client(config)
}
