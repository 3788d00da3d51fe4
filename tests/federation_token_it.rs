mod common;

// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use common::*;
use pivnet_client::{
	config::AuthScheme,
	error::{DecodeError, Error, RejectionKind},
	federation_token::FederationToken,
	secret::Secret,
};

const TOKEN_PATH: &str = "/api/v2/federation_token";
const TOKEN_BODY: &str = "{\"access_key_id\":\"some-AccessKeyID\",\"secret_access_key\":\"some-SecretAccessKey\",\"session_token\":\"some-SessionToken\",\"bucket\":\"some-bucket\",\"region\":\"some-region\"}";

fn expected_token() -> FederationToken {
	FederationToken {
		access_key_id: "some-AccessKeyID".into(),
		secret_access_key: Secret::new("some-SecretAccessKey"),
		session_token: Secret::new("some-SessionToken"),
		bucket: "some-bucket".into(),
		region: "some-region".into(),
	}
}

#[tokio::test]
async fn generate_federation_token_returns_decoded_token() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(TOKEN_PATH)
				.header("authorization", format!("Token {TEST_TOKEN}"))
				.header("user-agent", TEST_USER_AGENT)
				.header("content-type", "application/json")
				.json_body(json!({ "product_id": "banana" }));
			then.status(200).header("content-type", "application/json").body(TOKEN_BODY);
		})
		.await;
	let token = client
		.generate_federation_token("banana")
		.await
		.expect("Federation token request should succeed.");

	assert_eq!(token, expected_token());
	assert!(token.is_populated());

	mock.assert_async().await;
}

#[tokio::test]
async fn generate_federation_token_maps_forbidden_to_upstream_error() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(TOKEN_PATH)
				.json_body(json!({ "product_id": "something-i-dont-manage" }));
			then.status(403).header("content-type", "application/json").body(
				"{\"message\":\"only available for product admins and partner product admins\"}",
			);
		})
		.await;
	let err = client
		.generate_federation_token("something-i-dont-manage")
		.await
		.expect_err("Forbidden products should surface an error.");

	assert!(
		err.to_string()
			.contains("403 - only available for product admins and partner product admins")
	);

	let upstream = err.as_upstream().expect("403 should map to an upstream rejection.");

	assert_eq!(upstream.status, 403);
	assert_eq!(upstream.kind(), RejectionKind::Other);

	mock.assert_async().await;
}

#[tokio::test]
async fn generate_federation_token_escapes_product_identifier() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH).body("{\"product_id\":\"quo\\\"te\\\\slash\"}");
			then.status(200).header("content-type", "application/json").body(TOKEN_BODY);
		})
		.await;

	client
		.generate_federation_token("quo\"te\\slash")
		.await
		.expect("Escaped identifier should still be accepted.");

	mock.assert_async().await;
}

#[tokio::test]
async fn generate_federation_token_forwards_empty_identifier() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH).json_body(json!({ "product_id": "" }));
			then.status(404)
				.header("content-type", "application/json")
				.body("{\"message\":\"product not found\"}");
		})
		.await;
	let err = client
		.generate_federation_token("")
		.await
		.expect_err("Empty identifier should be rejected by upstream.");

	assert_eq!(err.to_string(), "404 - product not found");
	assert_eq!(err.as_upstream().map(|e| e.kind()), Some(RejectionKind::NotFound));

	mock.assert_async().await;
}

#[tokio::test]
async fn generate_federation_token_uses_bearer_scheme_when_configured() {
	let server = MockServer::start_async().await;
	let config = test_config_builder(&server.base_url())
		.auth_scheme(AuthScheme::Bearer)
		.build()
		.expect("Bearer configuration should be valid.");
	let client = build_reqwest_client(config);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(TOKEN_PATH)
				.header("authorization", format!("Bearer {TEST_TOKEN}"));
			then.status(200).header("content-type", "application/json").body(TOKEN_BODY);
		})
		.await;

	client
		.generate_federation_token("banana")
		.await
		.expect("Bearer-authenticated request should succeed.");

	mock.assert_async().await;
}

#[tokio::test]
async fn generate_federation_token_keeps_message_when_errors_is_null() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(403).header("content-type", "application/json").body(
				"{\"message\":\"only available for product admins and partner product admins\",\"errors\":null}",
			);
		})
		.await;
	let err = client
		.generate_federation_token("something-i-dont-manage")
		.await
		.expect_err("Forbidden products should surface an error.");
	let upstream = err.as_upstream().expect("Null detail errors must keep the rejection.");

	assert!(upstream.errors.is_empty());
	assert_eq!(
		err.to_string(),
		"403 - only available for product admins and partner product admins"
	);

	mock.assert_async().await;
}

#[tokio::test]
async fn generate_federation_token_does_not_follow_redirects() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url());
	let elsewhere_url = server.url("/elsewhere");
	let redirect = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(302)
				.header("location", elsewhere_url.as_str())
				.header("content-type", "application/json")
				.body("{\"message\":\"moved\"}");
		})
		.await;
	let elsewhere = server
		.mock_async(|when, then| {
			when.path("/elsewhere");
			then.status(200).header("content-type", "application/json").body(TOKEN_BODY);
		})
		.await;
	let err = client
		.generate_federation_token("banana")
		.await
		.expect_err("Redirects must surface as non-2xx responses.");

	assert_eq!(err.status(), Some(302));
	assert_eq!(err.to_string(), "302 - moved");

	redirect.assert_async().await;
	elsewhere.assert_calls_async(0).await;
}

#[tokio::test]
async fn generate_federation_token_rejects_empty_credential_fields() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).header("content-type", "application/json").body(
				"{\"access_key_id\":\"\",\"secret_access_key\":\"\",\"session_token\":\"\",\"bucket\":\"\",\"region\":\"\"}",
			);
		})
		.await;
	let err = client
		.generate_federation_token("banana")
		.await
		.expect_err("Empty credentials must not be returned as a token.");

	match err {
		Error::Decode(DecodeError::ResponseBody { source, status }) => {
			assert_eq!(status, 200);
			assert_eq!(source.path().to_string(), "access_key_id");
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}

	mock.assert_async().await;
}

#[tokio::test]
async fn generate_federation_token_rejects_incomplete_success_body() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_key_id\":\"some-AccessKeyID\",\"bucket\":\"some-bucket\"}");
		})
		.await;
	let err = client
		.generate_federation_token("banana")
		.await
		.expect_err("Incomplete token bodies should fail to decode.");

	assert!(matches!(err, Error::Decode(DecodeError::ResponseBody { status: 200, .. })));

	mock.assert_async().await;
}

#[tokio::test]
async fn generate_federation_token_keeps_unparsable_error_bodies_distinct() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(500).header("content-type", "text/plain").body("internal error");
		})
		.await;
	let err = client
		.generate_federation_token("banana")
		.await
		.expect_err("Unparsable error bodies should fail.");

	assert!(matches!(err, Error::Decode(DecodeError::ErrorBody { status: 500, .. })));
	assert_eq!(err.status(), Some(500));

	mock.assert_async().await;
}

#[tokio::test]
async fn generate_federation_token_is_repeatable() {
	let server = MockServer::start_async().await;
	let client = build_reqwest_test_client(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).header("content-type", "application/json").body(TOKEN_BODY);
		})
		.await;
	let (first, second) = tokio::join!(
		client.generate_federation_token("banana"),
		client.generate_federation_token("banana"),
	);
	let first = first.expect("First call should succeed.");
	let second = second.expect("Second call should succeed.");

	assert_eq!(first, second);

	mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn generate_federation_token_surfaces_transport_failures() {
	// Nothing listens on the discard port locally.
	let client = build_reqwest_test_client("http://127.0.0.1:9");
	let err = client
		.generate_federation_token("banana")
		.await
		.expect_err("Unreachable hosts should fail.");

	assert!(matches!(err, Error::Transport(_)));
	assert_eq!(err.status(), None);
}
