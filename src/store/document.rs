//! HTTPS document-hosting [`TokenStore`] backed by a Gist-shaped API.
//!
//! The remote service hosts JSON documents addressed by an opaque id, each containing named
//! slots with string content. `load` extracts and parses one slot; `save` issues a partial
//! update replacing that slot's content with the pretty-printed record. The host applies
//! last-write-wins semantics and offers no conditional update.

// crates.io
use reqwest::header::{ACCEPT, AUTHORIZATION};
// self
use crate::{
	_prelude::*,
	auth::TokenRecord,
	error::ConfigError,
	http::HttpClient,
	obs::{self, FlowKind},
	store::{StorageLocator, StoreError, StoreFuture, TokenStore},
};

/// Default document API endpoint.
pub const DEFAULT_DOCUMENT_API: &str = "https://api.github.com/gists";

const DOCUMENT_ACCEPT: &str = "application/vnd.github+json";

/// Remote document-hosting store reached over HTTPS.
#[derive(Clone, Debug)]
pub struct DocumentStore {
	http_client: HttpClient,
	base: Url,
}
impl DocumentStore {
	/// Builds a store against the default document API.
	pub fn new(http_client: HttpClient) -> Result<Self, ConfigError> {
		let base = Url::parse(DEFAULT_DOCUMENT_API)
			.map_err(|source| ConfigError::InvalidEndpoint { source })?;

		Ok(Self { http_client, base })
	}

	/// Overrides the document API base URL (mock servers, self-hosted instances).
	pub fn with_base(mut self, base: Url) -> Self {
		self.base = base;

		self
	}

	fn document_url(&self, document_id: &str) -> Result<Url, StoreError> {
		let mut url = self.base.clone();

		url.path_segments_mut()
			.map_err(|_| StoreError::Backend {
				message: "document API base URL cannot carry path segments".into(),
			})?
			.push(document_id);

		Ok(url)
	}

	async fn load_inner(&self, locator: &StorageLocator) -> Result<TokenRecord, StoreError> {
		let url = self.document_url(&locator.document_id)?;
		let response = self
			.http_client
			.get(url)
			.header(AUTHORIZATION, format!("Bearer {}", locator.access_credential.expose()))
			.header(ACCEPT, DOCUMENT_ACCEPT)
			.send()
			.await
			.map_err(|err| transport_failure("load", err))?;
		let status = response.status();
		let body = response.text().await.map_err(|err| transport_failure("load", err))?;

		if !status.is_success() {
			obs::warn_failure(
				FlowKind::Store,
				&format!(
					"document load returned status {}: {}",
					status.as_u16(),
					obs::body_preview(&body),
				),
			);

			return Err(StoreError::Status { status: status.as_u16() });
		}

		let envelope = parse_json::<DocumentEnvelope>(&body)?;
		let slot = envelope
			.files
			.get(&locator.slot)
			.ok_or_else(|| StoreError::MissingSlot { slot: locator.slot.clone() })?;

		parse_json(&slot.content)
	}

	async fn save_inner(
		&self,
		locator: &StorageLocator,
		record: TokenRecord,
	) -> Result<(), StoreError> {
		let url = self.document_url(&locator.document_id)?;
		let content = serde_json::to_string_pretty(&record)
			.map_err(|err| StoreError::Serialization { message: err.to_string() })?;
		let patch = DocumentPatch {
			files: HashMap::from_iter([(locator.slot.clone(), SlotPatch { content })]),
		};
		let response = self
			.http_client
			.patch(url)
			.header(AUTHORIZATION, format!("Bearer {}", locator.access_credential.expose()))
			.header(ACCEPT, DOCUMENT_ACCEPT)
			.json(&patch)
			.send()
			.await
			.map_err(|err| transport_failure("save", err))?;
		let status = response.status();

		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();

			obs::warn_failure(
				FlowKind::Store,
				&format!(
					"document save returned status {}: {}",
					status.as_u16(),
					obs::body_preview(&body),
				),
			);

			return Err(StoreError::Status { status: status.as_u16() });
		}

		Ok(())
	}
}
impl TokenStore for DocumentStore {
	fn load<'a>(&'a self, locator: &'a StorageLocator) -> StoreFuture<'a, TokenRecord> {
		Box::pin(self.load_inner(locator))
	}

	fn save<'a>(
		&'a self,
		locator: &'a StorageLocator,
		record: TokenRecord,
	) -> StoreFuture<'a, ()> {
		Box::pin(self.save_inner(locator, record))
	}
}

/// Document payload subset returned by the host on load.
#[derive(Debug, Deserialize)]
struct DocumentEnvelope {
	#[serde(default)]
	files: HashMap<String, DocumentSlot>,
}

#[derive(Debug, Deserialize)]
struct DocumentSlot {
	#[serde(default)]
	content: String,
}

#[derive(Debug, Serialize)]
struct DocumentPatch {
	files: HashMap<String, SlotPatch>,
}

#[derive(Debug, Serialize)]
struct SlotPatch {
	content: String,
}

fn parse_json<T>(payload: &str) -> Result<T, StoreError>
where
	T: for<'de> Deserialize<'de>,
{
	let mut deserializer = serde_json::Deserializer::from_str(payload);

	serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
		obs::warn_failure(FlowKind::Store, &format!("document content is malformed: {err}"));

		StoreError::Serialization { message: err.to_string() }
	})
}

fn transport_failure(stage: &'static str, err: ReqwestError) -> StoreError {
	let message = if err.is_timeout() {
		format!("document {stage} timed out")
	} else {
		format!("document {stage} failed: {}", sanitized_reqwest_error(&err))
	};

	obs::warn_failure(FlowKind::Store, &message);

	StoreError::Backend { message }
}

// reqwest error strings embed the request URL; strip it so document ids never reach logs
// attached to an error they did not cause.
fn sanitized_reqwest_error(err: &ReqwestError) -> String {
	if err.is_connect() {
		"connection error".into()
	} else if err.is_request() {
		"request error".into()
	} else {
		"transport error".into()
	}
}
