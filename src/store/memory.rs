//! Thread-safe in-memory [`TokenStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::TokenRecord,
	store::{StorageLocator, StoreError, StoreFuture, StoreKey, TokenStore},
};

type StoreMap = Arc<RwLock<HashMap<StoreKey, TokenRecord>>>;

/// Thread-safe storage backend that keeps records in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Returns the record currently stored for the locator, if any.
	///
	/// Unlike [`TokenStore::load`], a missing record is reported as `None` instead of the
	/// zero-value record so tests can distinguish "never written" from "written empty".
	pub fn snapshot(&self, locator: &StorageLocator) -> Option<TokenRecord> {
		self.0.read().get(&StoreKey::new(locator)).cloned()
	}

	fn load_now(map: StoreMap, key: StoreKey) -> Result<TokenRecord, StoreError> {
		Ok(map.read().get(&key).cloned().unwrap_or_else(TokenRecord::empty))
	}

	fn save_now(map: StoreMap, key: StoreKey, record: TokenRecord) -> Result<(), StoreError> {
		map.write().insert(key, record);

		Ok(())
	}
}
impl TokenStore for MemoryStore {
	fn load<'a>(&'a self, locator: &'a StorageLocator) -> StoreFuture<'a, TokenRecord> {
		let map = self.0.clone();
		let key = StoreKey::new(locator);

		Box::pin(async move { Self::load_now(map, key) })
	}

	fn save<'a>(
		&'a self,
		locator: &'a StorageLocator,
		record: TokenRecord,
	) -> StoreFuture<'a, ()> {
		let map = self.0.clone();
		let key = StoreKey::new(locator);

		Box::pin(async move { Self::save_now(map, key, record) })
	}
}
