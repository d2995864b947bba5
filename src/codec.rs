//! Base64 body codec used when the client runs in base64 mode.
//!
//! Bodies are encoded with the standard alphabet and padding. Decoding accepts padded and
//! unpadded input, since servers differ on whether they pad encoded results.

// crates.io
use base64::{
	Engine,
	alphabet,
	engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
// self
use crate::{_prelude::*, error::ProtocolError};

const BASE64: GeneralPurpose = GeneralPurpose::new(
	&alphabet::STANDARD,
	GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encodes a serialized payload as standard base64 (UTF-8 bytes).
pub fn encode(payload: &str) -> String {
	BASE64.encode(payload.as_bytes())
}

/// Decodes standard base64, padded or not.
pub fn decode(encoded: &str) -> Result<Vec<u8>, ProtocolError> {
	BASE64.decode(encoded.trim()).map_err(|source| ProtocolError::InvalidBase64 { source })
}

/// Decodes a base64 string and parses the result as JSON.
pub fn decode_json(encoded: &str) -> Result<Value, ProtocolError> {
	let bytes = decode(encoded)?;

	serde_json::from_slice(&bytes).map_err(|source| ProtocolError::InvalidEncodedResult { source })
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn encode_matches_standard_alphabet() {
		assert_eq!(encode("{\"id\":\"123\",\"name\":\"X\"}"), "eyJpZCI6IjEyMyIsIm5hbWUiOiJYIn0=");
		assert_eq!(encode("{\"name\":\"张三\"}"), "eyJuYW1lIjoi5byg5LiJIn0=");
	}

	#[test]
	fn decode_restores_ascii_and_unicode_payloads() {
		for payload in [
			"",
			"{}",
			"{\"jsonrpc\":\"2.0\",\"method\":\"user.getProfile\",\"params\":{},\"id\":\"a\"}",
			"{\"name\":\"张三\",\"emoji\":\"🚀\",\"quote\":\"\\\"\"}",
		] {
			let bytes = decode(&encode(payload)).expect("Encoded payload should decode.");

			assert_eq!(String::from_utf8(bytes).expect("Decoded bytes should be UTF-8."), payload);
		}
	}

	#[test]
	fn decode_accepts_missing_padding() {
		let value =
			decode_json("eyJpZCI6IjEyMyIsIm5hbWUiOiJYIn0").expect("Unpadded input should decode.");

		assert_eq!(value, serde_json::json!({ "id": "123", "name": "X" }));
	}

	#[test]
	fn decode_json_reports_each_failure_stage() {
		assert!(matches!(decode_json("%%%"), Err(ProtocolError::InvalidBase64 { .. })));
		assert!(matches!(
			decode_json(&encode("not json")),
			Err(ProtocolError::InvalidEncodedResult { .. })
		));
	}
}
