#![cfg(feature = "reqwest")]

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
use serde_json::{Value, json};
use time::Duration;
// self
use jsonrpc_miniapp::{
	client::{Client, RequestOptions},
	config::ClientConfig,
	error::{Error, ProtocolError, TransportError},
	http::ReqwestTransport,
	nav::PageStack,
	store::{JWT_KEY, MemoryStore},
};

fn build_client(server: &MockServer, store: MemoryStore) -> Client<ReqwestTransport> {
	let client = Client::new(Arc::new(store), Arc::new(PageStack::new(["pages/index/index"])));

	client.init(
		ClientConfig::builder(server.base_url())
			.app_id("app-1")
			.app_secret("s")
			.sign_key("k")
			.use_authorization(true)
			.build()
			.expect("Mock server config should build successfully."),
	);

	client
}

#[tokio::test]
async fn signed_call_reaches_the_endpoint() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/json-rpc")
				.query_param_exists("__sessionId")
				.query_param_exists("__routeId")
				.header("content-type", "application/json")
				.header("signature-appid", "app-1")
				.header("authorization", "Bearer token-1")
				.header_exists("signature")
				.header_exists("signature-nonce")
				.header_exists("signature-timestamp")
				.header_exists("json-rpc-sign");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"jsonrpc\":\"2.0\",\"result\":{\"id\":\"123\",\"name\":\"X\"},\"id\":\"r1\"}");
		})
		.await;
	let client = build_client(&server, MemoryStore::with_entries([(JWT_KEY, "token-1")]));
	let result: Value = client
		.request("user.getProfile", json!({ "userId": "123" }), RequestOptions::new().with_jwt())
		.await
		.expect("Signed call should succeed against the mock server.");

	mock.assert_async().await;

	assert_eq!(result, json!({ "id": "123", "name": "X" }));
}

#[tokio::test]
async fn error_statuses_still_surface_the_rpc_error() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/json-rpc");
			then.status(500)
				.header("content-type", "application/json")
				.body("{\"jsonrpc\":\"2.0\",\"error\":{\"code\":-32000,\"message\":\"Server busy\"},\"id\":\"r1\"}");
		})
		.await;
	let client = build_client(&server, MemoryStore::default());
	let err = client
		.call::<Value, _>("system.getStats", json!({}))
		.await
		.expect_err("Server errors should fail the call.");

	mock.assert_async().await;

	assert_eq!(err.code(), -32000);
	assert_eq!(err.message(), "Server busy");
}

#[tokio::test]
async fn non_json_bodies_are_protocol_errors() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/json-rpc");
			then.status(502).header("content-type", "text/html").body("<html>502</html>");
		})
		.await;
	let client = build_client(&server, MemoryStore::default());
	let err = client
		.call::<Value, _>("system.getStats", json!({}))
		.await
		.expect_err("HTML bodies should be rejected.");

	mock.assert_async().await;

	assert!(matches!(err, Error::Protocol(ProtocolError::MalformedResponse { .. })));
	assert_eq!(err.normalized().code, -1);
}

#[tokio::test]
async fn slow_servers_hit_the_per_call_timeout() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/json-rpc");
			then.status(200)
				.header("content-type", "application/json")
				.delay(std::time::Duration::from_secs(2))
				.body("{\"jsonrpc\":\"2.0\",\"result\":true,\"id\":\"r1\"}");
		})
		.await;
	let client = build_client(&server, MemoryStore::default());
	let err = client
		.request::<Value, _>(
			"system.getStats",
			json!({}),
			RequestOptions::new().with_timeout(Duration::milliseconds(200)),
		)
		.await
		.expect_err("Slow responses should time out.");

	assert!(matches!(
		err,
		Error::Transport(TransportError::Timeout { timeout }) if timeout == Duration::milliseconds(200)
	));
}
