//! Requests federation credentials for a product slug against a live Pivnet host.
//!
//! ```sh
//! PIVNET_HOST=https://network.pivotal.io PIVNET_TOKEN=... \
//!   cargo run --example generate_federation_token -- my-product
//! ```

// std
use std::env;
// crates.io
use color_eyre::{Result, eyre::eyre};
// self
use pivnet_client::{client::ReqwestPivnetClient, config::ClientConfig};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let host = env::var("PIVNET_HOST").unwrap_or_else(|_| "https://network.pivotal.io".into());
	let token = env::var("PIVNET_TOKEN").map_err(|_| eyre!("PIVNET_TOKEN must be set."))?;
	let product = env::args().nth(1).ok_or_else(|| eyre!("Usage: <product-slug>"))?;
	let config = ClientConfig::builder(host, token).build()?;
	let client = ReqwestPivnetClient::new(config)?;
	let federation_token = client.generate_federation_token(&product).await?;

	println!(
		"Issued credentials for bucket `{}` in `{}` (access key {}).",
		federation_token.bucket, federation_token.region, federation_token.access_key_id
	);

	Ok(())
}
