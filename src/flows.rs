//! High-level flow implementations powered by the broker.
//!
//! Each submodule contributes one `impl Broker` block: the valid-token accessor, the
//! refresh-token renewal engine, the authorization-code exchange, the upstream dispatcher,
//! and the typed playback helpers built on top of it.

pub mod access;
pub mod common;
pub mod dispatch;
pub mod exchange;
pub mod playback;
pub mod renew;

pub use access::TokenDiagnostics;
pub use common::TokenExchange;
pub use dispatch::UpstreamResponse;
pub use exchange::AuthorizationOutcome;
pub use renew::RenewMetrics;

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	http::HttpClient,
	store::{StoreKey, TokenStore},
};

/// Default authorization-server token endpoint.
pub const DEFAULT_TOKEN_ENDPOINT: &str = "https://accounts.spotify.com/api/token";
/// Default playback API base.
pub const DEFAULT_API_BASE: &str = "https://api.spotify.com/v1";

/// Coordinates the token lifecycle and playback dispatch for one upstream service.
///
/// The broker owns the HTTP client, token store, and endpoint configuration so individual
/// flows can focus on their own semantics. Per-user client credentials and storage locators
/// are never held here; they arrive fresh with every call inside a
/// [`UserConfig`](crate::auth::UserConfig).
#[derive(Clone)]
pub struct Broker {
	/// HTTP client used for every outbound request.
	pub http_client: HttpClient,
	/// Token store implementation that persists the renewable pair.
	pub store: Arc<dyn TokenStore>,
	/// Authorization-server token endpoint.
	pub token_endpoint: Url,
	/// Playback API base URL.
	pub api_base: Url,
	/// Shared metrics recorder for renewal outcomes.
	pub renew_metrics: Arc<RenewMetrics>,
	renew_guards: Arc<Mutex<HashMap<StoreKey, Arc<AsyncMutex<()>>>>>,
}
impl Broker {
	/// Creates a broker with its own default transport and the stock endpoints.
	pub fn new(store: Arc<dyn TokenStore>) -> Result<Self, ConfigError> {
		Self::with_http_client(store, HttpClient::new()?)
	}

	/// Creates a broker that reuses the caller-provided transport.
	pub fn with_http_client(
		store: Arc<dyn TokenStore>,
		http_client: HttpClient,
	) -> Result<Self, ConfigError> {
		let token_endpoint = Url::parse(DEFAULT_TOKEN_ENDPOINT)
			.map_err(|source| ConfigError::InvalidEndpoint { source })?;
		let api_base =
			Url::parse(DEFAULT_API_BASE).map_err(|source| ConfigError::InvalidEndpoint { source })?;

		Ok(Self {
			http_client,
			store,
			token_endpoint,
			api_base,
			renew_metrics: Default::default(),
			renew_guards: Default::default(),
		})
	}

	/// Overrides the authorization-server token endpoint.
	pub fn with_token_endpoint(mut self, endpoint: Url) -> Self {
		self.token_endpoint = endpoint;

		self
	}

	/// Overrides the playback API base URL.
	pub fn with_api_base(mut self, base: Url) -> Self {
		self.api_base = base;

		self
	}

	pub(crate) fn renew_guard(&self, key: &StoreKey) -> Arc<AsyncMutex<()>> {
		let mut guards = self.renew_guards.lock();

		guards.entry(key.clone()).or_insert_with(|| Arc::new(AsyncMutex::new(()))).clone()
	}
}
impl Debug for Broker {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Broker")
			.field("token_endpoint", &self.token_endpoint)
			.field("api_base", &self.api_base)
			.finish()
	}
}
