//! Broker-level error types shared across flows and stores.

// self
use crate::_prelude::*;

/// Broker-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical broker error exposed by public APIs.
///
/// Every transport or parse failure raised inside a component is converted into one of these
/// variants at the component boundary; no raw transport error crosses it, and no secret material
/// ever appears in a message.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure reading or writing the token document.
	#[error("{0}")]
	Store(#[from] crate::store::StoreError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout) on the playback API path.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// No access token is stored for this locator; initial authorization has not completed.
	#[error("No access token is stored; complete the initial authorization or call init first.")]
	MissingAccessToken,
	/// An access token exists but its refresh token is gone; the record cannot be renewed.
	#[error("Stored record has no refresh token; re-run the full authorization flow.")]
	MissingRefreshToken,
	/// The authorization server rejected the token exchange.
	#[error("Token renewal failed: {reason}.")]
	RenewalFailed {
		/// HTTP status returned by the token endpoint, when one was received.
		status: Option<u16>,
		/// Short, non-sensitive summary of the failure.
		reason: String,
	},
	/// The playback API answered with a non-2xx status that the dispatcher does not recover from.
	#[error("Playback API returned status {status}.")]
	Upstream {
		/// Status code propagated from the upstream response.
		status: u16,
		/// Sanitized summary; the full upstream body is only ever logged.
		message: String,
	},
	/// No track is currently playing, so the requested track-level operation has no target.
	#[error("No track is currently playing.")]
	NoActivePlayback,
}

/// Configuration and validation failures raised by the broker.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// An endpoint URL could not be parsed.
	#[error("Endpoint URL is invalid.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Volume level outside the 0-100 range accepted by the playback API.
	#[error("Volume must be between 0 and 100, got {value}.")]
	VolumeOutOfRange {
		/// Rejected volume level.
		value: u32,
	},
	/// Queue index beyond the snapshot returned by the playback API.
	#[error("Queue index {index} is out of range for {len} entries.")]
	QueueIndexOutOfRange {
		/// Requested queue position (0 targets the currently playing track).
		index: usize,
		/// Number of entries in the snapshot.
		len: usize,
	},
	/// The configuration resolver has no entry for the requested user.
	#[error("No configuration is registered for user `{user}`.")]
	UnresolvedUser {
		/// User identifier presented by the caller.
		user: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Transport-level failures (network, IO, timeout) on the playback API path.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {endpoint}.")]
	Network {
		/// Label for the endpoint being called.
		endpoint: &'static str,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The request exceeded the configured timeout.
	#[error("Request to {endpoint} timed out.")]
	Timeout {
		/// Label for the endpoint being called.
		endpoint: &'static str,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(
		endpoint: &'static str,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { endpoint, source: Box::new(src) }
	}

	/// Classifies a reqwest failure, folding timeouts into [`TransportError::Timeout`].
	pub fn from_reqwest(endpoint: &'static str, err: ReqwestError) -> Self {
		if err.is_timeout() { Self::Timeout { endpoint } } else { Self::network(endpoint, err) }
	}
}
