//! Request signatures: HMAC-SHA1 headers plus the legacy MD5 `Json-RPC-Sign` digest.
//!
//! The signed input is `payload + timestamp + nonce`, where `payload` is the exact JSON string
//! sent as the request body (before any base64 encoding). Signing twice with the same inputs
//! yields the same headers; only [`Signer::sign_now`] touches the clock and the RNG.

// crates.io
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use rand::distr::{Alphanumeric, SampleString};
use sha1::Sha1;
// self
use crate::{
	_prelude::*,
	config::{ClientConfig, Secret},
};

type HmacSha1 = Hmac<Sha1>;

/// Header carrying the configured app id (empty when unset).
pub const HEADER_APP_ID: &str = "Signature-AppID";
/// Header carrying the per-request nonce.
pub const HEADER_NONCE: &str = "Signature-Nonce";
/// Header carrying the signing timestamp in whole seconds.
pub const HEADER_TIMESTAMP: &str = "Signature-Timestamp";
/// Header carrying the HMAC-SHA1 hex digest.
pub const HEADER_SIGNATURE: &str = "Signature";
/// Header carrying the legacy MD5 hex digest.
pub const HEADER_JSON_RPC_SIGN: &str = "Json-RPC-Sign";
/// Nonce length in characters.
pub const NONCE_LEN: usize = 32;

/// Headers produced for one signed request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureHeaders {
	/// `Signature-AppID` value.
	pub app_id: String,
	/// `Signature-Nonce` value.
	pub nonce: String,
	/// `Signature-Timestamp` value.
	pub timestamp: String,
	/// `Signature` value.
	pub signature: String,
	/// `Json-RPC-Sign` value, present only when a sign key is configured.
	pub json_rpc_sign: Option<String>,
}
impl SignatureHeaders {
	/// Writes the headers into `headers`, replacing same-named entries.
	pub fn apply(self, headers: &mut BTreeMap<String, String>) {
		headers.insert(HEADER_APP_ID.into(), self.app_id);
		headers.insert(HEADER_NONCE.into(), self.nonce);
		headers.insert(HEADER_TIMESTAMP.into(), self.timestamp);
		headers.insert(HEADER_SIGNATURE.into(), self.signature);

		if let Some(sign) = self.json_rpc_sign {
			headers.insert(HEADER_JSON_RPC_SIGN.into(), sign);
		}
	}
}

/// Computes signature headers from the configured app credentials.
#[derive(Clone, Debug)]
pub struct Signer {
	app_id: Option<String>,
	app_secret: Secret,
	sign_key: Option<Secret>,
}
impl Signer {
	/// Creates a signer keyed by `app_secret`.
	pub fn new(app_secret: impl Into<Secret>) -> Self {
		Self { app_id: None, app_secret: app_secret.into(), sign_key: None }
	}

	/// Returns a signer for `config`, or `None` when no app secret is configured.
	pub fn from_config(config: &ClientConfig) -> Option<Self> {
		let app_secret = config.app_secret.clone()?;

		Some(Self { app_id: config.app_id.clone(), app_secret, sign_key: config.sign_key.clone() })
	}

	/// Sets the app id reported in `Signature-AppID`.
	pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
		self.app_id = Some(app_id.into());

		self
	}

	/// Enables the legacy `Json-RPC-Sign` digest.
	pub fn with_sign_key(mut self, sign_key: impl Into<Secret>) -> Self {
		self.sign_key = Some(sign_key.into());

		self
	}

	/// Signs `payload` with an explicit timestamp and nonce.
	pub fn sign(&self, payload: &str, timestamp: &str, nonce: &str) -> SignatureHeaders {
		let signature = hmac_sha1_hex(self.app_secret.expose(), &[payload, timestamp, nonce]);
		let json_rpc_sign =
			self.sign_key.as_ref().map(|key| md5_hex(&[key.expose(), payload, timestamp]));

		SignatureHeaders {
			app_id: self.app_id.clone().unwrap_or_default(),
			nonce: nonce.to_owned(),
			timestamp: timestamp.to_owned(),
			signature,
			json_rpc_sign,
		}
	}

	/// Signs `payload` with the current Unix time and a fresh nonce.
	pub fn sign_now(&self, payload: &str) -> SignatureHeaders {
		let timestamp = OffsetDateTime::now_utc().unix_timestamp().to_string();

		self.sign(payload, &timestamp, &generate_nonce())
	}
}

/// Returns a [`NONCE_LEN`]-character token drawn uniformly from `A-Za-z0-9`.
pub fn generate_nonce() -> String {
	Alphanumeric.sample_string(&mut rand::rng(), NONCE_LEN)
}

fn hmac_sha1_hex(key: &str, parts: &[&str]) -> String {
	// Keys longer than the block size are hashed and shorter ones padded, so no length is invalid.
	let mut mac =
		HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC should accept keys of any length.");

	for part in parts {
		mac.update(part.as_bytes());
	}

	hex::encode(mac.finalize().into_bytes())
}

fn md5_hex(parts: &[&str]) -> String {
	let mut hasher = Md5::new();

	for part in parts {
		hasher.update(part.as_bytes());
	}

	hex::encode(hasher.finalize())
}
