//! Authenticated upstream dispatch with a single transparent retry on 401.

// crates.io
use reqwest::header::AUTHORIZATION;
// self
use crate::{
	_prelude::*,
	auth::UserConfig,
	error::TransportError,
	flows::Broker,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

/// Raw upstream response handed back by the dispatcher.
///
/// Dispatch never interprets the body; callers decide whether a status is an error for
/// their operation and how to decode the payload.
#[derive(Clone, Debug)]
pub struct UpstreamResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl UpstreamResponse {
	/// Whether the status is in the 2xx range.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Decodes the body as JSON, reporting the failing path on malformed payloads.
	pub fn json<T>(&self) -> Result<T>
	where
		T: for<'de> Deserialize<'de>,
	{
		let mut deserializer = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
			obs::warn_failure(
				FlowKind::Dispatch,
				&format!("upstream response body is malformed: {err}"),
			);

			Error::Upstream {
				status: self.status,
				message: "the playback API response could not be parsed".into(),
			}
		})
	}

	/// Converts non-2xx statuses into [`Error::Upstream`], logging a truncated body.
	pub fn require_success(self) -> Result<Self> {
		if self.is_success() {
			return Ok(self);
		}

		obs::warn_failure(
			FlowKind::Dispatch,
			&format!(
				"upstream returned status {}: {}",
				self.status,
				obs::body_preview(&self.text()),
			),
		);

		Err(Error::Upstream {
			status: self.status,
			message: "the playback API rejected the request".into(),
		})
	}

	/// Returns the body decoded as UTF-8 text, lossily.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}

impl Broker {
	/// Sends one authenticated request to the playback API, retrying exactly once on 401.
	///
	/// The retry reloads the stored record, renews unconditionally with its refresh token,
	/// and replays the request with the renewed access token. When the renewal fails or no
	/// refresh token is stored, the original 401 response is returned untouched; every other
	/// status, including a second 401, passes straight through.
	pub async fn dispatch(
		&self,
		config: &UserConfig,
		method: Method,
		path: &str,
		access_token: &str,
		body: Option<&serde_json::Value>,
	) -> Result<UpstreamResponse> {
		const KIND: FlowKind = FlowKind::Dispatch;

		let span = FlowSpan::new(KIND, "dispatch");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let url = self.api_url(path)?;
				let response =
					self.send_bearer(method.clone(), url.clone(), access_token, body).await?;

				if response.status != StatusCode::UNAUTHORIZED.as_u16() {
					return Ok(response);
				}

				let record = self.load_or_empty(&config.locator).await;

				if !record.has_refresh_token() {
					obs::warn_failure(
						KIND,
						"upstream returned 401 but no refresh token is stored; not retrying",
					);

					return Ok(response);
				}

				// A 401 against an unexpired record means the token was revoked upstream, so
				// the staleness check is skipped and renewal runs unconditionally.
				let Ok(exchange) =
					self.renew_with_refresh_token(config, record.refresh_token.expose()).await
				else {
					return Ok(response);
				};

				self.send_bearer(method, url, exchange.access_token.expose(), body).await
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	async fn send_bearer(
		&self,
		method: Method,
		url: Url,
		access_token: &str,
		body: Option<&serde_json::Value>,
	) -> Result<UpstreamResponse> {
		let mut request = self
			.http_client
			.request(method, url)
			.header(AUTHORIZATION, format!("Bearer {access_token}"));

		if let Some(body) = body {
			request = request.json(body);
		}

		let response = request
			.send()
			.await
			.map_err(|err| TransportError::from_reqwest("the playback API", err))?;
		let status = response.status().as_u16();
		let body = response
			.bytes()
			.await
			.map_err(|err| TransportError::from_reqwest("the playback API", err))?
			.to_vec();

		Ok(UpstreamResponse { status, body })
	}

	fn api_url(&self, path: &str) -> Result<Url> {
		let joined = format!(
			"{}/{}",
			self.api_base.as_str().trim_end_matches('/'),
			path.trim_start_matches('/'),
		);

		Url::parse(&joined)
			.map_err(|source| crate::error::ConfigError::InvalidEndpoint { source }.into())
	}
}
