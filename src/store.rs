//! Host storage contract and built-in key/value backends.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, obs};

/// Storage key holding the caller's JWT.
pub const JWT_KEY: &str = "JWT";
/// Storage key holding the share member id forwarded as `__mid`.
pub const SHARE_MID_KEY: &str = "KEY_SHARE_MID";
/// Storage key holding the traffic source forwarded as `__ts`.
pub const TRAFFIC_SOURCE_KEY: &str = "TRAFFIC_SOURCE";

/// Synchronous key/value storage exposed by the host.
///
/// Reads happen on the request path before any network I/O, so implementations must be local and
/// non-blocking in practice.
pub trait KeyValueStore
where
	Self: Send + Sync,
{
	/// Reads the value stored under `key`.
	fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

	/// Stores `value` under `key`, replacing any previous value.
	fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

	/// Removes `key` and returns the previous value, if any.
	fn remove(&self, key: &str) -> Result<Option<String>, StoreError>;
}

/// Error type produced by [`KeyValueStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Best-effort read: empty values and backend failures both resolve to `None`.
pub fn lookup(store: &dyn KeyValueStore, key: &str) -> Option<String> {
	match store.get(key) {
		Ok(value) => value.filter(|value| !value.is_empty()),
		Err(e) => {
			obs::storage_read_failed(key, &e);

			None
		},
	}
}
