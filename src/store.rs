//! Storage contracts, locator types, and built-in token document stores.

pub mod document;
pub mod memory;

pub use document::DocumentStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::{TokenRecord, TokenSecret}};

/// Future type returned by [`TokenStore`] implementations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Persistence contract for token records.
///
/// One record lives per locator; `save` replaces the whole record in place and records are
/// never deleted. Load and save are not atomic with each other: the external document host
/// resolves concurrent writers with last-write-wins semantics, and no conditional update is
/// available. See the crate-level concurrency notes for the accepted racing-renewal window.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Fetches the record stored at the locator's slot.
	///
	/// Stores return the zero-value record when the slot holds no credentials yet, and an
	/// error for transport, status, or parse failures, so callers can tell "genuinely
	/// empty" from "store unreachable".
	fn load<'a>(&'a self, locator: &'a StorageLocator) -> StoreFuture<'a, TokenRecord>;

	/// Persists or replaces the record at the locator's slot.
	fn save<'a>(
		&'a self,
		locator: &'a StorageLocator,
		record: TokenRecord,
	) -> StoreFuture<'a, ()>;
}

/// Identifies where a user's token document lives in the external store.
///
/// Supplied fresh by the configuration resolver on every request. Whoever controls the
/// locator's access credential effectively owns the record, independent of the
/// application's own user table.
#[derive(Clone, PartialEq, Eq)]
pub struct StorageLocator {
	/// Opaque identifier of the remote document.
	pub document_id: String,
	/// Bearer credential authorizing reads and writes of the document.
	pub access_credential: TokenSecret,
	/// Named slot within the document holding the token record.
	pub slot: String,
}
impl StorageLocator {
	/// Builds a locator from its three parts.
	pub fn new(
		document_id: impl Into<String>,
		access_credential: impl Into<String>,
		slot: impl Into<String>,
	) -> Self {
		Self {
			document_id: document_id.into(),
			access_credential: TokenSecret::new(access_credential),
			slot: slot.into(),
		}
	}
}
impl Debug for StorageLocator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("StorageLocator")
			.field("document_id", &self.document_id)
			.field("access_credential", &self.access_credential)
			.field("slot", &self.slot)
			.finish()
	}
}

/// Unique key identifying a stored token record.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StoreKey {
	/// Document identifier component.
	pub document_id: String,
	/// Slot name component.
	pub slot: String,
}
impl StoreKey {
	/// Builds a key from a locator, ignoring its access credential.
	pub fn new(locator: &StorageLocator) -> Self {
		Self { document_id: locator.document_id.clone(), slot: locator.slot.clone() }
	}
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Backend-level failure (network, IO) for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload; never contains credential material.
		message: String,
	},
	/// The document host answered with a non-success status.
	#[error("Document request returned status {status}.")]
	Status {
		/// HTTP status reported by the document host.
		status: u16,
	},
	/// The document exists but has no slot with the configured name.
	#[error("Document has no slot named `{slot}`.")]
	MissingSlot {
		/// Slot name that was requested.
		slot: String,
	},
	/// Serialization failures surfaced by the backend or the slot content.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
}
