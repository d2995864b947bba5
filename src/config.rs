//! Client configuration: endpoint, app identity, signing material, and wire modes.

pub mod secret;

pub use secret::Secret;

// self
use crate::{_prelude::*, error::ConfigError};

/// Resolved client configuration installed through [`Client::init`](crate::client::Client::init).
///
/// Every mode flag is a plain boolean resolved at build time, so the encode and decode paths of a
/// request always agree on `use_base64`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// Base URL the JSON-RPC endpoint path is appended to.
	pub base_url: String,
	/// Application identifier sent as `Signature-AppID`.
	pub app_id: Option<String>,
	/// HMAC key; enables request signing when present.
	pub app_secret: Option<Secret>,
	/// Legacy key for the `Json-RPC-Sign` digest; only used alongside `app_secret`.
	pub sign_key: Option<Secret>,
	/// Sends JWTs as `Authorization: Bearer <token>` instead of the raw `JWT` header.
	pub use_authorization: bool,
	/// Base64-encodes request bodies and decodes string results.
	pub use_base64: bool,
	/// Default request timeout; the client falls back to ten seconds when unset.
	pub timeout: Option<Duration>,
}
impl ClientConfig {
	/// Starts a builder for the provided base URL.
	pub fn builder(base_url: impl Into<String>) -> ClientConfigBuilder {
		ClientConfigBuilder::new(base_url)
	}

	/// Base URL with trailing slashes stripped.
	pub fn endpoint_base(&self) -> &str {
		self.base_url.trim_end_matches('/')
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	base_url: String,
	app_id: Option<String>,
	app_secret: Option<Secret>,
	sign_key: Option<Secret>,
	use_authorization: bool,
	use_base64: bool,
	timeout: Option<Duration>,
}
impl ClientConfigBuilder {
	/// Creates a new builder seeded with the provided base URL.
	pub fn new(base_url: impl Into<String>) -> Self {
		Self {
			base_url: base_url.into(),
			app_id: None,
			app_secret: None,
			sign_key: None,
			use_authorization: false,
			use_base64: false,
			timeout: None,
		}
	}

	/// Sets the application identifier.
	pub fn app_id(mut self, app_id: impl Into<String>) -> Self {
		self.app_id = Some(app_id.into());

		self
	}

	/// Sets the HMAC signing secret. Empty secrets disable signing.
	pub fn app_secret(mut self, secret: impl Into<Secret>) -> Self {
		self.app_secret = Some(secret.into()).filter(|s: &Secret| !s.is_empty());

		self
	}

	/// Sets the legacy `Json-RPC-Sign` key. Empty keys are ignored.
	pub fn sign_key(mut self, key: impl Into<Secret>) -> Self {
		self.sign_key = Some(key.into()).filter(|s: &Secret| !s.is_empty());

		self
	}

	/// Chooses between `Authorization: Bearer` (true) and the raw `JWT` header (false).
	pub fn use_authorization(mut self, enabled: bool) -> Self {
		self.use_authorization = enabled;

		self
	}

	/// Enables base64 request bodies and string-result decoding.
	pub fn use_base64(mut self, enabled: bool) -> Self {
		self.use_base64 = enabled;

		self
	}

	/// Overrides the default request timeout. Negative values are clamped to zero.
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = Some(if timeout.is_negative() { Duration::ZERO } else { timeout });

		self
	}

	/// Validates the base URL and produces the configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let trimmed = self.base_url.trim();

		if trimmed.is_empty() {
			return Err(ConfigError::MissingBaseUrl);
		}

		Url::parse(trimmed).map_err(|source| ConfigError::InvalidBaseUrl { source })?;

		Ok(ClientConfig {
			base_url: trimmed.to_owned(),
			app_id: self.app_id,
			app_secret: self.app_secret,
			sign_key: self.sign_key,
			use_authorization: self.use_authorization,
			use_base64: self.use_base64,
			timeout: self.timeout,
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn builder_rejects_missing_or_invalid_base_url() {
		assert!(matches!(ClientConfig::builder("  ").build(), Err(ConfigError::MissingBaseUrl)));
		assert!(matches!(
			ClientConfig::builder("not a url").build(),
			Err(ConfigError::InvalidBaseUrl { .. })
		));
	}

	#[test]
	fn builder_defaults_modes_to_false() {
		let config = ClientConfig::builder("https://a.test/")
			.build()
			.expect("Config with only a base URL should build.");

		assert!(!config.use_authorization);
		assert!(!config.use_base64);
		assert!(config.app_secret.is_none());
		assert_eq!(config.timeout, None);
		assert_eq!(config.endpoint_base(), "https://a.test");
	}

	#[test]
	fn empty_secrets_disable_signing() {
		let config = ClientConfig::builder("https://a.test")
			.app_secret("")
			.sign_key("")
			.timeout(Duration::seconds(-5))
			.build()
			.expect("Config with empty secrets should still build.");

		assert!(config.app_secret.is_none());
		assert!(config.sign_key.is_none());
		assert_eq!(config.timeout, Some(Duration::ZERO));
	}

	#[test]
	fn trailing_slashes_are_stripped_from_endpoint_base() {
		let config = ClientConfig::builder("https://a.test/rpc///")
			.build()
			.expect("Config with trailing slashes should build.");

		assert_eq!(config.endpoint_base(), "https://a.test/rpc");
	}
}
