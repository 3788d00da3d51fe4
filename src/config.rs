//! Client configuration shared by every outgoing request.
//!
//! A [`ClientConfig`] is assembled once through [`ClientConfigBuilder`], validated, and then held
//! immutably by the client. It carries the API host, the credential and the scheme used to
//! present it, the `User-Agent` string, and the TLS verification switch consumed by the default
//! transport.

/// Builder API for assembling client configurations.
pub mod builder;

pub use builder::*;

// self
use crate::{_prelude::*, secret::Secret};

/// Versioned path prefix placed between the host and every endpoint path.
pub const API_PREFIX: &str = "/api/v2";
/// `User-Agent` sent when the caller does not configure one.
pub const DEFAULT_USER_AGENT: &str = concat!("pivnet-client/", env!("CARGO_PKG_VERSION"));

/// Scheme used to present the API token in the `Authorization` header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthScheme {
	#[default]
	/// Legacy API token: `Authorization: Token <token>`.
	Token,
	/// Access token: `Authorization: Bearer <token>`.
	Bearer,
}
impl AuthScheme {
	/// Returns the header prefix for this scheme.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuthScheme::Token => "Token",
			AuthScheme::Bearer => "Bearer",
		}
	}
}
impl Display for AuthScheme {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Immutable, validated client configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// API host, e.g. `https://network.pivotal.io`.
	pub host: Url,
	/// Credential attached to every request.
	pub token: Secret,
	/// Scheme used to present [`ClientConfig::token`].
	pub auth_scheme: AuthScheme,
	/// Value of the `User-Agent` header.
	pub user_agent: String,
	/// Disables TLS certificate and hostname verification in the default transport.
	pub skip_tls_verification: bool,
}
impl ClientConfig {
	/// Creates a new builder for the provided host and token.
	pub fn builder(host: impl Into<String>, token: impl Into<Secret>) -> ClientConfigBuilder {
		ClientConfigBuilder::new(host, token)
	}

	/// Renders the `Authorization` header value.
	pub fn authorization_value(&self) -> String {
		format!("{} {}", self.auth_scheme, self.token.expose())
	}

	/// Resolves an endpoint path (e.g. `/federation_token`) against the host and [`API_PREFIX`].
	pub fn endpoint_url(&self, path: &str) -> Url {
		let mut url = self.host.clone();
		let joined = format!(
			"{}{API_PREFIX}/{}",
			url.path().trim_end_matches('/'),
			path.trim_start_matches('/')
		);

		url.set_path(&joined);
		url.set_query(None);
		url.set_fragment(None);

		url
	}
}
