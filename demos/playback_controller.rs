//! Demonstrates the full token lifecycle against mock services: a stale record stored in a
//! document host is renewed pre-emptively, persisted back, and used to read the current
//! playback state.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use playback_broker::{
	auth::{ClientCredentials, UserConfig},
	flows::Broker,
	http::HttpClient,
	store::{DocumentStore, StorageLocator, TokenStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;

	// Document host serving a record 10 seconds past its expiry.
	server
		.mock_async(|when, then| {
			when.method(GET).path("/document-demo");
			then.status(200).header("content-type", "application/json").json_body(
				serde_json::json!({
					"files": {
						"playback_tokens.json": {
							"content": "{\"access_token\":\"demo-stale\",\"refresh_token\":\"demo-refresh\",\"expires_at\":0}",
						},
					},
				}),
			);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(PATCH).path("/document-demo");
			then.status(200).header("content-type", "application/json").json_body(
				serde_json::json!({ "id": "document-demo" }),
			);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"demo-fresh\",\"expires_in\":3600}");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/me/player").header("authorization", "Bearer demo-fresh");
			then.status(200).header("content-type", "application/json").json_body(
				serde_json::json!({
					"is_playing": true,
					"progress_ms": 42_000,
					"item": {
						"id": "demo-track",
						"name": "Demo Song",
						"duration_ms": 180_000,
						"album": { "name": "Demo Album", "images": [{ "url": "https://img.example/a" }] },
						"artists": [{ "name": "Demo Artist" }],
					},
					"device": { "name": "Demo Speaker", "volume_percent": 50 },
					"repeat_state": "off",
				}),
			);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/me/tracks/contains");
			then.status(200).header("content-type", "application/json").body("[false]");
		})
		.await;

	let store: Arc<dyn TokenStore> = Arc::new(
		DocumentStore::new(HttpClient::new()?)?.with_base(Url::parse(&server.base_url())?),
	);
	let broker = Broker::new(store)?
		.with_token_endpoint(Url::parse(&server.url("/token"))?)
		.with_api_base(Url::parse(&server.base_url())?);
	let config = UserConfig {
		credentials: ClientCredentials::new("demo-client", "demo-secret"),
		locator: StorageLocator::new("document-demo", "document-credential", "playback_tokens.json"),
	};
	let token = broker.valid_access_token(&config).await?;

	println!("Renewed access token preview: {}...", &token[..4.min(token.len())]);

	if let Some(state) = broker.current_playback(&config).await? {
		println!("Now playing: {} - {} ({}).", state.artist, state.track, state.progress);
	} else {
		println!("Nothing is playing.");
	}

	let diagnostics = broker.diagnostics(&config).await;

	println!("Token expires in {} seconds.", diagnostics.expires_in_seconds);

	Ok(())
}
