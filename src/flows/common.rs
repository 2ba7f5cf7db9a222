//! Shared helpers for flow implementations (exchange payloads, token-endpoint requests).

// crates.io
use reqwest::header::AUTHORIZATION;
// self
use crate::{
	_prelude::*,
	auth::{ClientCredentials, DEFAULT_TOKEN_LIFETIME, TokenSecret},
	flows::Broker,
	obs::{self, FlowKind},
};

/// Parsed authorization-server token response.
///
/// `access_token` is the hard requirement; its absence fails the exchange during parsing.
/// `refresh_token` is optional because servers are not required to rotate refresh tokens on
/// every call, and `expires_in` defaults to one hour when omitted.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenExchange {
	/// Freshly issued access token.
	pub access_token: TokenSecret,
	/// Rotated refresh token, when the server issued one.
	#[serde(default)]
	pub refresh_token: Option<TokenSecret>,
	/// Declared lifetime in seconds.
	#[serde(default)]
	pub expires_in: Option<i64>,
}
impl TokenExchange {
	/// Returns the declared lifetime, falling back to [`DEFAULT_TOKEN_LIFETIME`].
	pub fn lifetime(&self) -> Duration {
		self.expires_in.map_or(DEFAULT_TOKEN_LIFETIME, Duration::seconds)
	}

	/// Computes the absolute expiry for a record issued at `now`.
	pub fn expires_at(&self, now: OffsetDateTime) -> f64 {
		now.unix_timestamp() as f64 + self.lifetime().whole_seconds() as f64
	}
}

impl Broker {
	/// POSTs a form-encoded grant to the token endpoint and parses the response.
	///
	/// Shared by the refresh and authorization-code exchanges; both treat any non-200 status
	/// or transport failure as a terminal renewal failure with a sanitized reason, logging
	/// the truncated body server-side only.
	pub(crate) async fn request_token_exchange(
		&self,
		credentials: &ClientCredentials,
		form: &[(&str, &str)],
		grant: &'static str,
	) -> Result<TokenExchange> {
		let response = self
			.http_client
			.post(self.token_endpoint.clone())
			.header(AUTHORIZATION, credentials.basic_authorization())
			.form(form)
			.send()
			.await
			.map_err(|err| transport_renewal_failure(grant, err))?;
		let status = response.status();
		let body = response
			.text()
			.await
			.map_err(|err| transport_renewal_failure(grant, err))?;

		if status != StatusCode::OK {
			obs::warn_failure(
				FlowKind::Renew,
				&format!(
					"{grant} grant returned status {}: {}",
					status.as_u16(),
					obs::body_preview(&body),
				),
			);

			return Err(Error::RenewalFailed {
				status: Some(status.as_u16()),
				reason: format!("the authorization server rejected the {grant} grant"),
			});
		}

		let mut deserializer = serde_json::Deserializer::from_str(&body);

		serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
			obs::warn_failure(FlowKind::Renew, &format!("{grant} grant response is malformed: {err}"));

			Error::RenewalFailed {
				status: Some(status.as_u16()),
				reason: format!("the {grant} grant response could not be parsed"),
			}
		})
	}
}

fn transport_renewal_failure(grant: &'static str, err: ReqwestError) -> Error {
	let reason = if err.is_timeout() {
		format!("the token endpoint timed out during the {grant} grant")
	} else {
		format!("the token endpoint could not be reached for the {grant} grant")
	};

	obs::warn_failure(FlowKind::Renew, &reason);

	Error::RenewalFailed { status: err.status().map(|status| status.as_u16()), reason }
}
