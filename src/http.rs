//! Shared HTTP transport configuration.
//!
//! Every outbound call the broker makes (document load/save, token exchange, playback
//! dispatch) goes through one [`HttpClient`] so the request timeout is bounded in a single
//! place. A timed-out call surfaces through the normal error path of whichever component
//! issued it; there is no cooperative cancellation.

// std
use std::ops::Deref;
// self
use crate::{_prelude::*, error::ConfigError};

/// Upper bound applied to every outbound request.
pub const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[derive(Clone, Debug)]
pub struct HttpClient(ReqwestClient);
impl HttpClient {
	/// Builds a client with the broker's default [`REQUEST_TIMEOUT`].
	pub fn new() -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.timeout(REQUEST_TIMEOUT)
			.build()
			.map_err(ConfigError::http_client_build)?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	///
	/// Callers are responsible for configuring a timeout; the broker applies none beyond what
	/// the provided client carries.
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
impl AsRef<ReqwestClient> for HttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for HttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
