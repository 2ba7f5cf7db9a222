//! Initial authorization: code exchange and manual record seeding.

// self
use crate::{
	_prelude::*,
	auth::{TokenRecord, UserConfig},
	flows::{Broker, TokenExchange},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl Broker {
	/// Exchanges an authorization code for the initial token pair and persists it.
	///
	/// Unlike renewal, the exchange is expected to return a refresh token; a response
	/// without one leaves the stored record with an empty refresh slot and every later
	/// renewal fails with [`Error::MissingRefreshToken`]. Persistence failures are logged
	/// and swallowed for parity with renewal: the in-hand pair remains usable.
	pub async fn exchange_authorization_code(
		&self,
		config: &UserConfig,
		code: &str,
		redirect_uri: &Url,
	) -> Result<TokenExchange> {
		const KIND: FlowKind = FlowKind::Exchange;

		let span = FlowSpan::new(KIND, "exchange_authorization_code");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let form = [
					("grant_type", "authorization_code"),
					("code", code),
					("redirect_uri", redirect_uri.as_str()),
				];
				let exchange = self
					.request_token_exchange(&config.credentials, &form, "authorization_code")
					.await?;
				let now = OffsetDateTime::now_utc();
				let record = TokenRecord {
					access_token: exchange.access_token.clone(),
					refresh_token: exchange.refresh_token.clone().unwrap_or_default(),
					expires_at: exchange.expires_at(now),
				};

				if let Err(err) = self.store.save(&config.locator, record).await {
					obs::warn_failure(
						FlowKind::Store,
						&format!("exchanged pair was not persisted: {err}"),
					);
				}

				Ok(exchange)
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	/// Seeds the stored record from an externally obtained token pair.
	///
	/// The expiry is set one default lifetime ahead of now. Unlike the exchange flows this
	/// propagates persistence failures, since a seeding call that saved nothing did nothing.
	pub async fn init(
		&self,
		config: &UserConfig,
		access_token: &str,
		refresh_token: &str,
	) -> Result<()> {
		let record = TokenRecord::seeded(access_token, refresh_token, OffsetDateTime::now_utc());

		self.store.save(&config.locator, record).await?;

		Ok(())
	}
}

/// Presentable result of an authorization attempt.
///
/// Front ends completing the authorization redirect need a user-facing success flag and a
/// message that never leaks grant internals; this is that reduction.
#[derive(Clone, Debug, Serialize)]
pub struct AuthorizationOutcome {
	/// Whether the token pair was obtained and stored.
	pub success: bool,
	/// Human-readable summary safe to render to the end user.
	pub message: String,
}
impl AuthorizationOutcome {
	/// Outcome for a completed exchange.
	pub fn succeeded() -> Self {
		Self { success: true, message: "Authorization complete; playback is ready.".into() }
	}

	/// Outcome for a failed exchange, keeping only the error's display form.
	pub fn failed(err: &Error) -> Self {
		Self { success: false, message: err.to_string() }
	}

	/// Reduces an exchange result to its presentable outcome.
	pub fn from_result(result: &Result<TokenExchange>) -> Self {
		match result {
			Ok(_) => Self::succeeded(),
			Err(err) => Self::failed(err),
		}
	}
}
