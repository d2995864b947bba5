//! Signed JSON-RPC 2.0 client for mini-program hosts with session/route tagging, HMAC request
//! signatures, an optional base64 payload mode, and one normalized error shape for every failure.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod http;
pub mod identity;
pub mod nav;
pub mod obs;
pub mod rpc;
pub mod sign;
pub mod store;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for tests; enabled via `cfg(test)` or the `test` crate
	//! feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		client::Client,
		config::ClientConfig,
		error::TransportError,
		http::{RpcTransport, TransportFuture, TransportRequest, TransportResponse},
		nav::PageStack,
		store::MemoryStore,
	};

	/// Client type alias used by stub-backed tests.
	pub type StubClient = Client<StubTransport>;

	/// In-process [`RpcTransport`] that replays a canned response and records every request.
	#[derive(Debug, Default)]
	pub struct StubTransport {
		response: Mutex<Option<std::result::Result<Value, String>>>,
		requests: Mutex<Vec<TransportRequest>>,
	}
	impl StubTransport {
		/// Builds a stub that answers every request with `data` as the decoded response body.
		pub fn replying(data: Value) -> Self {
			Self { response: Mutex::new(Some(Ok(data))), ..Default::default() }
		}

		/// Builds a stub whose every call fails at the network layer with `message`.
		pub fn failing(message: impl Into<String>) -> Self {
			Self { response: Mutex::new(Some(Err(message.into()))), ..Default::default() }
		}

		/// Replaces the canned response body.
		pub fn set_response(&self, data: Value) {
			*self.response.lock() = Some(Ok(data));
		}

		/// Returns every request dispatched so far, oldest first.
		pub fn requests(&self) -> Vec<TransportRequest> {
			self.requests.lock().clone()
		}

		/// Returns the most recent request, if any.
		pub fn last_request(&self) -> Option<TransportRequest> {
			self.requests.lock().last().cloned()
		}
	}
	impl RpcTransport for StubTransport {
		fn send(&self, request: TransportRequest) -> TransportFuture<'_> {
			self.requests.lock().push(request);

			let outcome = self.response.lock().clone();

			Box::pin(async move {
				match outcome {
					Some(Ok(data)) => Ok(TransportResponse { data, status_code: 200, ..Default::default() }),
					Some(Err(message)) =>
						Err(TransportError::network(std::io::Error::other(message))),
					None => Err(TransportError::network(std::io::Error::other(
						"Stub transport has no canned response.",
					))),
				}
			})
		}
	}

	/// Builds a stub-backed client with an in-memory store and a single-page navigator.
	///
	/// The client is not initialized; call [`Client::init`] with a config before issuing requests.
	pub fn build_stub_client(
		transport: StubTransport,
	) -> (StubClient, Arc<StubTransport>, Arc<MemoryStore>, Arc<PageStack>) {
		let transport = Arc::new(transport);
		let storage = Arc::new(MemoryStore::default());
		let pages = Arc::new(PageStack::new(["pages/index/index"]));
		let client = Client::with_transport(transport.clone(), storage.clone(), pages.clone());

		(client, transport, storage, pages)
	}

	/// Returns a minimal signed config pointing at `https://a.test`.
	pub fn signed_test_config() -> ClientConfig {
		ClientConfig::builder("https://a.test")
			.app_secret("s")
			.build()
			.expect("Signed test config should build successfully.")
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use serde_json;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
