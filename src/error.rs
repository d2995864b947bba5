//! Client-level error types and the normalized error shape every failure collapses into.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Code reported for every failure that does not carry a server-provided code.
pub const FALLBACK_CODE: i64 = -1;
/// Message used when a server error omits its message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Request failed.";
/// Message reported when a response carries neither a usable result nor an error.
pub const INVALID_RESPONSE_MESSAGE: &str = "Invalid response.";

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem; never retried.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response violated the JSON-RPC contract.
	#[error(transparent)]
	Protocol(#[from] ProtocolError),
	/// Server answered with a JSON-RPC error object.
	#[error(transparent)]
	Rpc(#[from] RpcError),

	/// Caller-supplied params could not be serialized to JSON.
	#[error("Request parameters could not be serialized.")]
	Encode {
		/// Underlying serialization failure.
		#[source]
		source: serde_json::Error,
	},
}
impl Error {
	/// Returns the numeric code callers branch on: the server's code for [`Error::Rpc`],
	/// [`FALLBACK_CODE`] otherwise.
	pub fn code(&self) -> i64 {
		match self {
			Self::Rpc(e) => e.code,
			_ => FALLBACK_CODE,
		}
	}

	/// Returns the human-readable message, preferring the server's message when one exists.
	pub fn message(&self) -> String {
		match self {
			Self::Rpc(e) => e.message.clone(),
			other => other.to_string(),
		}
	}

	/// Classifies the failure for metric labels and logs.
	pub fn class(&self) -> ErrorClass {
		match self {
			Self::Config(_) => ErrorClass::Config,
			Self::Transport(_) => ErrorClass::Transport,
			Self::Protocol(_) => ErrorClass::Protocol,
			Self::Rpc(_) => ErrorClass::Rpc,
			Self::Encode { .. } => ErrorClass::Encode,
		}
	}

	/// Collapses the error into the single [`NormalizedError`] shape.
	///
	/// `data` always carries a diagnostic of the original failure: the full server error object
	/// for [`Error::Rpc`], or the error class plus its display chain for everything else.
	pub fn normalized(&self) -> NormalizedError {
		NormalizedError { code: self.code(), message: self.message(), data: Some(self.diagnostic()) }
	}

	fn diagnostic(&self) -> Value {
		if let Self::Rpc(e) = self {
			return e.raw.clone().unwrap_or_else(
				|| serde_json::json!({ "code": e.code, "message": e.message, "data": e.data }),
			);
		}

		let mut chain = Vec::new();
		let mut cursor = StdError::source(self);

		while let Some(source) = cursor {
			chain.push(source.to_string());

			cursor = source.source();
		}

		serde_json::json!({
			"class": self.class().as_str(),
			"error": self.to_string(),
			"chain": chain,
		})
	}
}

/// Coarse failure classes used for metric labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorClass {
	/// Precondition failure (missing or invalid configuration).
	Config,
	/// Network or timeout failure.
	Transport,
	/// Malformed or empty response.
	Protocol,
	/// Server-reported JSON-RPC error.
	Rpc,
	/// Caller params could not be serialized.
	Encode,
}
impl ErrorClass {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ErrorClass::Config => "config",
			ErrorClass::Transport => "transport",
			ErrorClass::Protocol => "protocol",
			ErrorClass::Rpc => "rpc",
			ErrorClass::Encode => "encode",
		}
	}
}
impl Display for ErrorClass {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// The single `{ code, message, data? }` shape every failure path converges to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ThisError)]
#[error("{message} (code {code})")]
pub struct NormalizedError {
	/// Server-provided code or [`FALLBACK_CODE`].
	pub code: i64,
	/// Server-provided message or a local description.
	pub message: String,
	/// Diagnostic payload describing the original failure.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub data: Option<Value>,
}
impl From<&Error> for NormalizedError {
	fn from(e: &Error) -> Self {
		e.normalized()
	}
}
impl From<Error> for NormalizedError {
	fn from(e: Error) -> Self {
		e.normalized()
	}
}

/// JSON-RPC error reported by the server, with defaults applied to missing fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ThisError)]
#[error("JSON-RPC error {code}: {message}")]
pub struct RpcError {
	/// Server-provided code, [`FALLBACK_CODE`] when absent.
	pub code: i64,
	/// Server-provided message, [`GENERIC_FAILURE_MESSAGE`] when absent.
	pub message: String,
	/// Optional server-provided payload.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub data: Option<Value>,
	/// Error object exactly as the server sent it, when it came off the wire.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub raw: Option<Value>,
}

/// Configuration and precondition failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A request was issued before [`Client::init`](crate::client::Client::init).
	#[error("Client is not initialized; call `Client::init` before issuing requests.")]
	NotInitialized,
	/// Base URL was empty.
	#[error("Base URL must not be empty.")]
	MissingBaseUrl,
	/// Base URL could not be parsed.
	#[error("Base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, timeout, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the JSON-RPC endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The endpoint did not answer within the effective timeout.
	#[error("JSON-RPC endpoint did not respond within {timeout}.")]
	Timeout {
		/// Effective timeout applied to the request.
		timeout: Duration,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the JSON-RPC endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Maps a reqwest failure, promoting timeouts to [`TransportError::Timeout`].
	#[cfg(feature = "reqwest")]
	pub fn from_reqwest(e: ReqwestError, timeout: Duration) -> Self {
		if e.is_timeout() { Self::Timeout { timeout } } else { Self::network(e) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Responses that break the JSON-RPC contract.
#[derive(Debug, ThisError)]
pub enum ProtocolError {
	/// Neither a usable `result` nor an `error` was present.
	#[error("Invalid response.")]
	MissingResult,
	/// The response body is not a JSON-RPC envelope.
	#[error("JSON-RPC endpoint returned a malformed response envelope.")]
	MalformedResponse {
		/// Structured parsing failure with the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// A base64-mode `result` string was not valid base64.
	#[error("Encoded result is not valid base64.")]
	InvalidBase64 {
		/// Underlying decoding failure.
		#[source]
		source: base64::DecodeError,
	},
	/// A base64-mode `result` decoded to something other than JSON.
	#[error("Decoded result is not valid JSON.")]
	InvalidEncodedResult {
		/// Underlying parsing failure.
		#[source]
		source: serde_json::Error,
	},
	/// The `result` does not match the type the caller asked for.
	#[error("Result does not match the expected type.")]
	ResultType {
		/// Structured parsing failure with the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
