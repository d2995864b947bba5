//! Thread-safe in-memory [`KeyValueStore`] for hosts without persistence and for tests.

// self
use crate::{
	_prelude::*,
	store::{KeyValueStore, StoreError},
};

/// Thread-safe storage backend that keeps entries in-process.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Arc<RwLock<HashMap<String, String>>>);
impl MemoryStore {
	/// Creates a store pre-populated with `entries`.
	pub fn with_entries<I, K, V>(entries: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		let map = entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect();

		Self(Arc::new(RwLock::new(map)))
	}

	/// Number of stored entries.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when no entries are stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}
}
impl KeyValueStore for MemoryStore {
	fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
		Ok(self.0.read().get(key).cloned())
	}

	fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
		self.0.write().insert(key.to_owned(), value);

		Ok(())
	}

	fn remove(&self, key: &str) -> Result<Option<String>, StoreError> {
		Ok(self.0.write().remove(key))
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::store::JWT_KEY;

	#[test]
	fn set_get_remove_round_trip() {
		let store = MemoryStore::default();

		store.set(JWT_KEY, "token-1".into()).expect("Memory store writes should succeed.");

		assert_eq!(store.get(JWT_KEY).expect("Reads should succeed.").as_deref(), Some("token-1"));
		assert_eq!(
			store.remove(JWT_KEY).expect("Removes should succeed.").as_deref(),
			Some("token-1")
		);
		assert!(store.is_empty());
	}

	#[test]
	fn clones_share_entries() {
		let store = MemoryStore::with_entries([(JWT_KEY, "shared")]);
		let clone = store.clone();

		clone.set("other", "value".into()).expect("Memory store writes should succeed.");

		assert_eq!(store.len(), 2);
	}
}
