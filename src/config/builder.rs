// crates.io
use http::HeaderValue;
// self
use crate::{
	_prelude::*,
	config::{AuthScheme, ClientConfig, DEFAULT_USER_AGENT},
	error::ConfigError,
	secret::Secret,
};

/// Builder for [`ClientConfig`] values.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	/// Raw host string; parsed during [`ClientConfigBuilder::build`].
	pub host: String,
	/// API token.
	pub token: Secret,
	/// Scheme used to present the token.
	pub auth_scheme: AuthScheme,
	/// `User-Agent` header value.
	pub user_agent: String,
	/// Disables TLS verification in the default transport.
	pub skip_tls_verification: bool,
}
impl ClientConfigBuilder {
	/// Creates a new builder seeded with the provided host and token.
	pub fn new(host: impl Into<String>, token: impl Into<Secret>) -> Self {
		Self {
			host: host.into(),
			token: token.into(),
			auth_scheme: AuthScheme::default(),
			user_agent: DEFAULT_USER_AGENT.into(),
			skip_tls_verification: false,
		}
	}

	/// Overrides the `User-Agent` header value.
	pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = user_agent.into();

		self
	}

	/// Overrides the authorization scheme (defaults to [`AuthScheme::Token`]).
	pub fn auth_scheme(mut self, scheme: AuthScheme) -> Self {
		self.auth_scheme = scheme;

		self
	}

	/// Toggles TLS verification in the default transport.
	pub fn skip_tls_verification(mut self, skip: bool) -> Self {
		self.skip_tls_verification = skip;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let host = Url::parse(self.host.trim())
			.map_err(|source| ConfigError::InvalidHost { host: self.host.clone(), source })?;

		if !matches!(host.scheme(), "http" | "https") {
			return Err(ConfigError::UnsupportedScheme { scheme: host.scheme().into() });
		}
		if self.token.expose().trim().is_empty() {
			return Err(ConfigError::MissingToken);
		}

		let config = ClientConfig {
			host,
			token: self.token,
			auth_scheme: self.auth_scheme,
			user_agent: self.user_agent,
			skip_tls_verification: self.skip_tls_verification,
		};

		config.validate()?;

		Ok(config)
	}
}

impl ClientConfig {
	/// Ensures every configured value can be carried as an HTTP header.
	fn validate(&self) -> Result<(), ConfigError> {
		validate_header("user-agent", &self.user_agent)?;
		validate_header("authorization", &self.authorization_value())?;

		Ok(())
	}
}

fn validate_header(header: &'static str, value: &str) -> Result<(), ConfigError> {
	HeaderValue::from_str(value)
		.map(|_| ())
		.map_err(|source| ConfigError::InvalidHeaderValue { header, source })
}
