//! JSON-RPC 2.0 wire types and response normalization.

// self
use crate::{
	_prelude::*,
	codec,
	error::{FALLBACK_CODE, GENERIC_FAILURE_MESSAGE, ProtocolError, RpcError},
	identity::{self, TOKEN_LEN},
};

/// Protocol version written into every envelope.
pub const JSONRPC_VERSION: &str = "2.0";

/// Request envelope; immutable once built and serialized exactly once per request.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RpcRequest {
	/// Always [`JSONRPC_VERSION`].
	pub jsonrpc: &'static str,
	/// Remote method name.
	pub method: String,
	/// Method parameters; an empty object when the caller passed none.
	pub params: Value,
	/// Fresh random request id.
	pub id: String,
}
impl RpcRequest {
	/// Builds an envelope with a fresh random id. `null` params become an empty object.
	pub fn new(method: impl Into<String>, params: Value) -> Self {
		let params = if params.is_null() { Value::Object(Default::default()) } else { params };

		Self {
			jsonrpc: JSONRPC_VERSION,
			method: method.into(),
			params,
			id: identity::random_token(TOKEN_LEN),
		}
	}

	/// Serializes the envelope. The returned string is both the signed input and the body.
	pub fn to_json(&self) -> Result<String> {
		serde_json::to_string(self).map_err(|source| Error::Encode { source })
	}
}

/// Error object as it appears on the wire; every field may be missing or loosely typed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RpcErrorObject {
	/// Server error code; only integral numbers are kept as the code.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub code: Option<Value>,
	/// Server error message; only strings are kept as the message.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<Value>,
	/// Optional server payload.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub data: Option<Value>,
}
impl RpcErrorObject {
	/// Applies the fallback code and message to missing or unusable fields.
	///
	/// The object exactly as received is kept in [`RpcError::raw`].
	pub fn into_rpc_error(self) -> RpcError {
		let raw = serde_json::to_value(&self).ok();
		let code = self.code.as_ref().and_then(integral_code).unwrap_or(FALLBACK_CODE);
		let message = match self.message {
			Some(Value::String(message)) => message,
			_ => GENERIC_FAILURE_MESSAGE.to_owned(),
		};

		RpcError { code, message, data: self.data, raw }
	}
}

fn integral_code(code: &Value) -> Option<i64> {
	code.as_i64().or_else(|| {
		code.as_f64()
			.filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
			.map(|f| f as i64)
	})
}

/// Response envelope as decoded from the transport.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
	/// Protocol version echoed by the server.
	#[serde(default)]
	pub jsonrpc: Option<String>,
	/// Successful result payload.
	#[serde(default)]
	pub result: Option<Value>,
	/// Server-reported error.
	#[serde(default)]
	pub error: Option<RpcErrorObject>,
	/// Echoed request id.
	#[serde(default)]
	pub id: Option<Value>,
}
impl RpcResponse {
	/// Decodes a transport payload into an envelope, reporting the offending path on failure.
	pub fn from_value(data: Value) -> Result<Self, ProtocolError> {
		serde_path_to_error::deserialize(data)
			.map_err(|source| ProtocolError::MalformedResponse { source })
	}

	/// Resolves the envelope into the caller's result type.
	///
	/// In base64 mode a string `result` is decoded and parsed before any other check. A present
	/// `error` wins over `result`; a missing or falsy `result` is a protocol violation.
	pub fn into_result<R>(mut self, use_base64: bool) -> Result<R>
	where
		R: DeserializeOwned,
	{
		let decoded = match &self.result {
			Some(Value::String(encoded)) if use_base64 => Some(codec::decode_json(encoded)?),
			_ => None,
		};

		if decoded.is_some() {
			self.result = decoded;
		}
		if let Some(error) = self.error {
			return Err(error.into_rpc_error().into());
		}

		match self.result {
			Some(result) if !is_falsy(&result) => serde_path_to_error::deserialize(result)
				.map_err(|source| ProtocolError::ResultType { source }.into()),
			_ => Err(ProtocolError::MissingResult.into()),
		}
	}
}

/// JSON values treated as "no result": `null`, `false`, zero, and the empty string.
pub fn is_falsy(value: &Value) -> bool {
	match value {
		Value::Null => true,
		Value::Bool(b) => !b,
		Value::Number(n) => n.as_f64() == Some(0.0),
		Value::String(s) => s.is_empty(),
		Value::Array(_) | Value::Object(_) => false,
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn envelope_serializes_in_wire_order() {
		let request = RpcRequest::new("user.getProfile", json!({ "userId": "123" }));
		let payload = request.to_json().expect("Envelope should serialize.");

		assert_eq!(request.id.len(), TOKEN_LEN);
		assert_eq!(
			payload,
			format!(
				"{{\"jsonrpc\":\"2.0\",\"method\":\"user.getProfile\",\"params\":{{\"userId\":\"123\"}},\"id\":\"{}\"}}",
				request.id
			)
		);
	}

	#[test]
	fn null_params_become_empty_object() {
		let request = RpcRequest::new("system.getStats", Value::Null);

		assert_eq!(request.params, json!({}));
		assert_ne!(request.id, RpcRequest::new("system.getStats", Value::Null).id);
	}

	#[test]
	fn error_object_defaults_missing_fields() {
		let error = RpcErrorObject::default().into_rpc_error();

		assert_eq!(error.code, FALLBACK_CODE);
		assert_eq!(error.message, GENERIC_FAILURE_MESSAGE);
		assert_eq!(error.data, None);
	}

	#[test]
	fn error_wins_over_result() {
		let response = RpcResponse::from_value(json!({
			"jsonrpc": "2.0",
			"result": { "ok": true },
			"error": { "code": -32000, "message": "Server busy" },
			"id": "r1",
		}))
		.expect("Envelope should decode.");
		let err = response.into_result::<Value>(false).expect_err("Errors should win.");

		assert!(matches!(err, Error::Rpc(RpcError { code: -32000, .. })));
	}

	#[test]
	fn falsy_results_are_protocol_violations() {
		for result in [json!(null), json!(false), json!(0), json!(""), json!(0.0)] {
			let response = RpcResponse { result: Some(result), ..Default::default() };
			let err = response.into_result::<Value>(false).expect_err("Falsy results should fail.");

			assert!(matches!(err, Error::Protocol(ProtocolError::MissingResult)));
		}

		let response = RpcResponse { result: Some(json!([])), ..Default::default() };

		assert_eq!(response.into_result::<Value>(false).expect("Empty arrays are truthy."), json!([]));
	}

	#[test]
	fn base64_string_results_are_decoded_in_place() {
		let response = RpcResponse {
			result: Some(json!("eyJpZCI6IjEyMyIsIm5hbWUiOiJYIn0=")),
			..Default::default()
		};
		let value: Value = response.clone().into_result(true).expect("Encoded result should decode.");

		assert_eq!(value, json!({ "id": "123", "name": "X" }));

		let raw: String = response.into_result(false).expect("Plain mode keeps the raw string.");

		assert_eq!(raw, "eyJpZCI6IjEyMyIsIm5hbWUiOiJYIn0=");
	}

	#[test]
	fn loosely_typed_error_fields_keep_what_they_can() {
		let response = RpcResponse::from_value(json!({
			"error": { "code": -32000.0, "message": "bad", "data": { "retry": true } },
		}))
		.expect("Float codes should not break the envelope.");
		let err = response.into_result::<Value>(false).expect_err("Errors should surface.");

		assert_eq!(err.code(), -32000);
		assert_eq!(err.message(), "bad");

		let response = RpcResponse::from_value(json!({ "error": { "code": "E1", "message": "bad" } }))
			.expect("String codes should not break the envelope.");
		let err = response.into_result::<Value>(false).expect_err("Errors should surface.");
		let normalized = err.normalized();

		assert_eq!(normalized.code, FALLBACK_CODE);
		assert_eq!(normalized.message, "bad");
		assert_eq!(normalized.data, Some(json!({ "code": "E1", "message": "bad" })));

		let rpc = RpcErrorObject { code: Some(json!(1.5)), message: Some(json!(42)), data: None }
			.into_rpc_error();

		assert_eq!(rpc.code, FALLBACK_CODE);
		assert_eq!(rpc.message, GENERIC_FAILURE_MESSAGE);
		assert_eq!(rpc.raw, Some(json!({ "code": 1.5, "message": 42 })));
	}

	#[test]
	fn malformed_envelopes_report_path() {
		let err = RpcResponse::from_value(json!({ "error": "oops" }))
			.expect_err("Non-object errors should be rejected.");

		assert!(err.to_string().contains("malformed"));

		if let ProtocolError::MalformedResponse { source } = err {
			assert_eq!(source.path().to_string(), "error");
		} else {
			panic!("Expected a malformed response error.");
		}
	}

	#[test]
	fn mismatched_result_type_is_reported() {
		let response = RpcResponse { result: Some(json!({ "id": 5 })), ..Default::default() };

		#[derive(Debug, Deserialize)]
		struct Profile {
			#[allow(dead_code)]
			id: String,
		}

		let err = response.into_result::<Profile>(false).expect_err("Type mismatch should fail.");

		assert!(matches!(err, Error::Protocol(ProtocolError::ResultType { .. })));
	}
}
