//! Token lifecycle and playback-control dispatch for music-streaming proxies.
//!
//! The crate persists renewable token records in a hosted document store, renews them
//! pre-emptively inside a grace window, and replays upstream playback calls once on 401
//! with a freshly renewed token.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
pub mod flows;
pub mod http;
pub mod obs;
pub mod playback;
pub mod store;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{ClientCredentials, UserConfig},
		flows::Broker,
		store::{MemoryStore, StorageLocator, TokenStore},
	};

	/// Builds the per-user configuration bundle used across integration tests.
	pub fn test_user_config() -> UserConfig {
		UserConfig {
			credentials: ClientCredentials::new("client-demo", "client-secret-demo"),
			locator: StorageLocator::new(
				"document-demo",
				"document-credential",
				"playback_tokens.json",
			),
		}
	}

	/// Constructs a [`Broker`] backed by an in-memory store and the provided mock endpoints.
	pub fn build_memory_test_broker(
		token_endpoint: Url,
		api_base: Url,
	) -> (Broker, Arc<MemoryStore>) {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn TokenStore> = store_backend.clone();
		let broker = Broker::new(store)
			.expect("Failed to build broker for tests.")
			.with_token_endpoint(token_endpoint)
			.with_api_base(api_base);

		(broker, store_backend)
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError, Method, StatusCode};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, playback_broker as _};
