//! Calls a mocked JSON-RPC endpoint with the default reqwest transport, signing the request and
//! attaching the stored JWT as a bearer token.

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
use serde::Deserialize;
// self
use jsonrpc_miniapp::{
	client::{Client, RequestOptions},
	config::ClientConfig,
	nav::PageStack,
	serde_json::json,
	store::{JWT_KEY, MemoryStore},
};

#[derive(Debug, Deserialize)]
struct Profile {
	id: String,
	name: String,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let rpc_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/json-rpc")
				.header("authorization", "Bearer demo-jwt")
				.header_exists("signature");
			then.status(200).header("content-type", "application/json").body(
				"{\"jsonrpc\":\"2.0\",\"result\":{\"id\":\"123\",\"name\":\"Demo\"},\"id\":\"r1\"}",
			);
		})
		.await;
	let storage = Arc::new(MemoryStore::with_entries([(JWT_KEY, "demo-jwt")]));
	let pages = Arc::new(PageStack::new(["pages/index/index"]));
	let client = Client::new(storage, pages);

	client.init(
		ClientConfig::builder(server.base_url())
			.app_id("demo-app")
			.app_secret("demo-secret")
			.use_authorization(true)
			.build()?,
	);

	let profile: Profile = client
		.request("user.getProfile", json!({ "userId": "123" }), RequestOptions::new().with_jwt())
		.await?;

	println!("Profile {} is {} (route {}).", profile.id, profile.name, client.route_id());

	rpc_mock.assert_async().await;

	Ok(())
}
