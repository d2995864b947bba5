//! Transport primitives for JSON-RPC calls.
//!
//! The module exposes [`RpcTransport`] so hosts can plug in whatever HTTP primitive they own
//! (a mini-program bridge, a test stub, or the bundled reqwest client). The client hands each
//! transport a fully built [`TransportRequest`]; the transport only moves bytes and reports the
//! decoded response body, leaving JSON-RPC semantics to the client.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// self
use crate::{_prelude::*, error::TransportError};

/// HTTP method used for every JSON-RPC call.
pub const METHOD_POST: &str = "POST";

/// Boxed future returned by [`RpcTransport::send`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<TransportResponse, TransportError>> + 'a + Send>>;

/// Fully built outbound request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportRequest {
	/// Target URL including the identity query string.
	pub url: String,
	/// HTTP method, always [`METHOD_POST`] for JSON-RPC calls.
	pub method: &'static str,
	/// JSON body, or its base64 encoding in base64 mode.
	pub body: String,
	/// Request headers.
	pub headers: BTreeMap<String, String>,
	/// Effective timeout.
	pub timeout: Duration,
}

/// Response reported by a transport.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransportResponse {
	/// Decoded response body; bodies that are not JSON arrive as a JSON string.
	pub data: Value,
	/// HTTP status code.
	pub status_code: u16,
	/// Response headers.
	pub headers: BTreeMap<String, String>,
}

/// Abstraction over the host's HTTP primitive.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared by every
/// request issued through a client, and the futures they return must be `Send` so callers can
/// drive requests from any executor. Dropping the future abandons the request; no other
/// cancellation is expected.
pub trait RpcTransport
where
	Self: 'static + Send + Sync,
{
	/// Dispatches `request` and resolves with the decoded response or a transport failure.
	///
	/// Non-2xx statuses are not failures at this layer: the body is still reported so the
	/// client can surface the server's JSON-RPC error object.
	fn send(&self, request: TransportRequest) -> TransportFuture<'_>;
}

#[cfg(feature = "reqwest")]
/// Thin wrapper around [`ReqwestClient`] implementing [`RpcTransport`].
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl RpcTransport for ReqwestTransport {
	fn send(&self, request: TransportRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let TransportRequest { url, method, body, headers, timeout } = request;
			let method =
				reqwest::Method::from_bytes(method.as_bytes()).map_err(TransportError::network)?;
			let mut builder = client.request(method, &url).timeout(timeout.unsigned_abs()).body(body);

			for (name, value) in &headers {
				builder = builder.header(name, value);
			}

			let response =
				builder.send().await.map_err(|e| TransportError::from_reqwest(e, timeout))?;
			let status_code = response.status().as_u16();
			let headers = response
				.headers()
				.iter()
				.filter_map(|(name, value)| {
					value.to_str().ok().map(|value| (name.as_str().to_owned(), value.to_owned()))
				})
				.collect();
			let bytes =
				response.bytes().await.map_err(|e| TransportError::from_reqwest(e, timeout))?;

			Ok(TransportResponse { data: decode_body(&bytes), status_code, headers })
		})
	}
}

/// Parses a response body as JSON, keeping non-JSON bodies as a JSON string.
pub fn decode_body(bytes: &[u8]) -> Value {
	serde_json::from_slice(bytes)
		.unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn decode_body_prefers_json() {
		assert_eq!(decode_body(b"{\"result\":1}"), serde_json::json!({ "result": 1 }));
		assert_eq!(decode_body(b"<html>502</html>"), Value::String("<html>502</html>".into()));
		assert_eq!(decode_body(b""), Value::String(String::new()));
	}
}
