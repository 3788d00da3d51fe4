//! Federation token issuance.
//!
//! [`PivnetClient::generate_federation_token`] exchanges a product slug for temporary storage
//! credentials scoped to that product's bucket. The call is a single `POST` with no local
//! validation of the slug; upstream decides whether the caller administers the product.

// crates.io
use serde::{Deserializer, de::Error as DeError};
// self
use crate::{
	_prelude::*,
	client::PivnetClient,
	http::ApiHttpClient,
	obs::Operation,
	secret::Secret,
};

/// Endpoint path, relative to the API prefix.
pub const FEDERATION_TOKEN_PATH: &str = "/federation_token";

/// Temporary storage credentials issued for one product.
///
/// All five fields are required and must be non-empty when decoding; a response missing or blanking
/// any of them is rejected as a decode failure rather than producing a partially-populated value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederationToken {
	/// Access key identifier.
	#[serde(deserialize_with = "non_empty")]
	pub access_key_id: String,
	/// Secret access key paired with [`FederationToken::access_key_id`].
	#[serde(deserialize_with = "non_empty")]
	pub secret_access_key: Secret,
	/// Session token scoping the temporary credentials.
	#[serde(deserialize_with = "non_empty")]
	pub session_token: Secret,
	/// Bucket the credentials grant access to.
	#[serde(deserialize_with = "non_empty")]
	pub bucket: String,
	/// Region hosting [`FederationToken::bucket`].
	#[serde(deserialize_with = "non_empty")]
	pub region: String,
}
impl FederationToken {
	/// Returns `true` when every field carries a non-empty value.
	pub fn is_populated(&self) -> bool {
		!self.access_key_id.is_empty()
			&& !self.secret_access_key.is_empty()
			&& !self.session_token.is_empty()
			&& !self.bucket.is_empty()
			&& !self.region.is_empty()
	}
}

/// Request payload for [`FEDERATION_TOKEN_PATH`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FederationTokenRequest<'a> {
	/// Product slug, forwarded as-is.
	pub product_id: &'a str,
}

fn non_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: From<String>,
{
	let value = String::deserialize(deserializer)?;

	if value.is_empty() {
		return Err(DeError::custom("credential field must not be empty"));
	}

	Ok(T::from(value))
}

impl<C> PivnetClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Requests temporary storage credentials for `product_id`.
	pub async fn generate_federation_token(&self, product_id: &str) -> Result<FederationToken> {
		self.call_json(
			Operation::GenerateFederationToken,
			Method::POST,
			FEDERATION_TOKEN_PATH,
			&FederationTokenRequest { product_id },
		)
		.await
	}
}
