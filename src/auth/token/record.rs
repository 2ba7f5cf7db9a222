//! The renewable access/refresh token pair and its freshness rules.

// self
use crate::{_prelude::*, auth::token::secret::TokenSecret};

/// Margin before declared expiry at which renewal is triggered pre-emptively.
///
/// The margin exists so a token judged valid at dispatch time does not expire mid-flight,
/// before the upstream request that carries it completes.
pub const GRACE_WINDOW: Duration = Duration::seconds(300);
/// Lifetime assumed when the authorization server omits `expires_in`, and the lifetime
/// applied to explicitly seeded records.
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::seconds(3600);

/// The renewable credential pair, stored as one document slot.
///
/// This struct is the authoritative wire shape: it serializes to exactly
/// `{"access_token": "...", "refresh_token": "...", "expires_at": 0.0}` with `expires_at` in unix
/// seconds (floats accepted). An empty `access_token` marks the record as uninitialized;
/// there is nothing to refresh toward and no renewal is attempted.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
	/// Short-lived bearer credential used to authorize upstream calls.
	#[serde(default)]
	pub access_token: TokenSecret,
	/// Long-lived credential exchanged for a new access token; may rotate on renewal.
	#[serde(default)]
	pub refresh_token: TokenSecret,
	/// Absolute unix timestamp (seconds) after which `access_token` must not be used.
	///
	/// Always computed as renewal-time plus the server-declared lifetime, never trusted
	/// from any other source.
	#[serde(default)]
	pub expires_at: f64,
}
impl TokenRecord {
	/// Builds a record from its three fields.
	pub fn new(
		access_token: impl Into<TokenSecret>,
		refresh_token: impl Into<TokenSecret>,
		expires_at: f64,
	) -> Self {
		Self { access_token: access_token.into(), refresh_token: refresh_token.into(), expires_at }
	}

	/// Returns the zero-value record callers treat as "no credentials available".
	pub fn empty() -> Self {
		Self::default()
	}

	/// Builds a freshly seeded record expiring [`DEFAULT_TOKEN_LIFETIME`] after `now`.
	pub fn seeded(access_token: &str, refresh_token: &str, now: OffsetDateTime) -> Self {
		Self::new(
			TokenSecret::new(access_token),
			TokenSecret::new(refresh_token),
			now.unix_timestamp() as f64 + DEFAULT_TOKEN_LIFETIME.whole_seconds() as f64,
		)
	}

	/// Returns `true` when no access token has ever been stored.
	pub fn is_uninitialized(&self) -> bool {
		self.access_token.is_empty()
	}

	/// Returns `true` when a refresh token is available for renewal.
	pub fn has_refresh_token(&self) -> bool {
		!self.refresh_token.is_empty()
	}

	/// Returns `true` when renewal must run before `access_token` is handed out.
	///
	/// Renewal triggers exactly when `now >= expires_at - GRACE_WINDOW`.
	pub fn needs_renewal_at(&self, now: OffsetDateTime) -> bool {
		now.unix_timestamp() as f64 >= self.expires_at - GRACE_WINDOW.whole_seconds() as f64
	}

	/// Seconds remaining until declared expiry; negative once expired.
	pub fn expires_in_at(&self, now: OffsetDateTime) -> f64 {
		self.expires_at - now.unix_timestamp() as f64
	}

	/// Returns `true` once the declared expiry has passed.
	pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
		self.expires_in_at(now) <= 0.
	}
}
impl Debug for TokenRecord {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenRecord")
			.field("access_token", &self.access_token)
			.field("refresh_token", &self.refresh_token)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}
