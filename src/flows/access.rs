//! Valid-token accessor and redacted token diagnostics.
//!
//! The accessor is the decision function of the token lifecycle: it loads the stored
//! record, decides whether the pre-emptive grace window has been reached, renews when
//! needed, and returns a token usable for at least that window. Within one process a
//! per-locator guard serializes the load-check-renew-save sequence so concurrent requests
//! share a single renewal; across processes the documented last-write-wins race remains.

// self
use crate::{
	_prelude::*,
	auth::{TokenRecord, UserConfig},
	flows::Broker,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	store::{StorageLocator, StoreKey},
};

impl Broker {
	/// Returns an access token guaranteed usable for at least the grace window.
	///
	/// Fails with [`Error::MissingAccessToken`] when no record has been seeded (complete
	/// the initial authorization first), [`Error::MissingRefreshToken`] when the record is
	/// in the unrecoverable access-without-refresh state, and [`Error::RenewalFailed`] when
	/// a required renewal is rejected. When renewal runs, the new token is returned
	/// directly from the exchange result rather than re-read from storage.
	pub async fn valid_access_token(&self, config: &UserConfig) -> Result<String> {
		const KIND: FlowKind = FlowKind::Access;

		let span = FlowSpan::new(KIND, "valid_access_token");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let key = StoreKey::new(&config.locator);
				let guard = self.renew_guard(&key);
				let _singleflight = guard.lock().await;
				let record = self.load_or_empty(&config.locator).await;

				if record.is_uninitialized() {
					return Err(Error::MissingAccessToken);
				}
				if !record.has_refresh_token() {
					return Err(Error::MissingRefreshToken);
				}

				let now = OffsetDateTime::now_utc();

				if record.needs_renewal_at(now) {
					let exchange = self
						.renew_with_refresh_token(config, record.refresh_token.expose())
						.await?;

					return Ok(exchange.access_token.expose().to_owned());
				}

				Ok(record.access_token.expose().to_owned())
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	/// Reports redacted token status for operators.
	///
	/// Secrets never appear in the result; the access token is reduced to a truncated
	/// preview and the refresh token to a presence flag.
	pub async fn diagnostics(&self, config: &UserConfig) -> TokenDiagnostics {
		let record = self.load_or_empty(&config.locator).await;
		let now = OffsetDateTime::now_utc();

		TokenDiagnostics {
			access_token_preview: (!record.is_uninitialized())
				.then(|| record.access_token.preview()),
			has_refresh_token: record.has_refresh_token(),
			expires_at: record.expires_at,
			expires_in_seconds: record.expires_in_at(now) as i64,
			is_expired: record.is_expired_at(now),
		}
	}

	/// Loads the stored record, collapsing store failures to the zero-value record.
	///
	/// This preserves the "no credentials available" contract at the flow boundary: a store
	/// outage and a genuinely empty slot both surface as the uninitialized record, with the
	/// outage detail kept in the logs.
	pub(crate) async fn load_or_empty(&self, locator: &StorageLocator) -> TokenRecord {
		match self.store.load(locator).await {
			Ok(record) => record,
			Err(err) => {
				obs::warn_failure(
					FlowKind::Store,
					&format!("token document load collapsed to the zero-value record: {err}"),
				);

				TokenRecord::empty()
			},
		}
	}
}

/// Redacted token status snapshot for operator endpoints.
#[derive(Clone, Debug, Serialize)]
pub struct TokenDiagnostics {
	/// Truncated access-token preview, absent when uninitialized.
	pub access_token_preview: Option<String>,
	/// Whether a refresh token is stored.
	pub has_refresh_token: bool,
	/// Declared absolute expiry (unix seconds).
	pub expires_at: f64,
	/// Seconds until expiry; negative once expired.
	pub expires_in_seconds: i64,
	/// Whether the declared expiry has passed.
	pub is_expired: bool,
}
