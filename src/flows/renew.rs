//! Refresh-token renewal against the authorization server's token endpoint.
//!
//! Renewal exchanges the stored refresh token for a fresh access token, recomputes the
//! absolute expiry from the server-declared lifetime, and persists the whole record through
//! the token store. Renewal never retries internally; a rejected or unreachable exchange is
//! terminal for the calling operation. Two concurrent renewals for the same locator in
//! different processes both succeed and the store keeps whichever write lands last.

mod metrics;

pub use metrics::RenewMetrics;

// self
use crate::{
	_prelude::*,
	auth::{TokenRecord, TokenSecret, UserConfig},
	flows::{Broker, TokenExchange},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl Broker {
	/// Renews the stored token pair using the record's own refresh token.
	///
	/// Fails with [`Error::MissingRefreshToken`] when no refresh token is stored; there is
	/// nothing to exchange.
	pub async fn renew(&self, config: &UserConfig) -> Result<TokenExchange> {
		const KIND: FlowKind = FlowKind::Renew;

		let span = FlowSpan::new(KIND, "renew");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let record = self.load_or_empty(&config.locator).await;

				if !record.has_refresh_token() {
					// Failures must never outnumber attempts.
					self.renew_metrics.record_attempt();
					self.renew_metrics.record_failure();

					return Err(Error::MissingRefreshToken);
				}

				self.renew_with_refresh_token(config, record.refresh_token.expose()).await
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	/// Performs the `refresh_token` grant with an explicit refresh token and persists the
	/// renewed pair.
	///
	/// When the server omits a rotated refresh token, the provided one is retained in the
	/// stored record. The returned exchange carries the new access token directly so callers
	/// avoid a read-after-write round trip against the store.
	pub async fn renew_with_refresh_token(
		&self,
		config: &UserConfig,
		refresh_token: &str,
	) -> Result<TokenExchange> {
		self.renew_metrics.record_attempt();

		let form = [("grant_type", "refresh_token"), ("refresh_token", refresh_token)];
		let exchange = self
			.request_token_exchange(&config.credentials, &form, "refresh_token")
			.await
			.inspect_err(|_| self.renew_metrics.record_failure())?;
		let now = OffsetDateTime::now_utc();
		let retained = exchange
			.refresh_token
			.clone()
			.unwrap_or_else(|| TokenSecret::new(refresh_token));
		let record = TokenRecord {
			access_token: exchange.access_token.clone(),
			refresh_token: retained,
			expires_at: exchange.expires_at(now),
		};

		// The in-hand exchange result stays valid even when persistence fails; the next
		// request will renew again from the previous stored pair.
		if let Err(err) = self.store.save(&config.locator, record).await {
			obs::warn_failure(FlowKind::Store, &format!("renewed pair was not persisted: {err}"));
		}

		self.renew_metrics.record_success();

		Ok(exchange)
	}
}
