// crates.io
use httpmock::prelude::*;
// self
use playback_broker::{
	_preludet::*,
	auth::TokenRecord,
	flows::Broker,
	store::{MemoryStore, TokenStore},
};

fn now_unix() -> f64 {
	OffsetDateTime::now_utc().unix_timestamp() as f64
}

fn setup(server: &MockServer) -> (Broker, Arc<MemoryStore>) {
	let token_endpoint =
		Url::parse(&server.url("/token")).expect("Mock token endpoint should parse.");
	let api_base = Url::parse(&server.base_url()).expect("Mock API base should parse.");

	build_memory_test_broker(token_endpoint, api_base)
}

#[tokio::test]
async fn renew_rotates_tokens_and_persists_the_whole_record() {
	let server = MockServer::start_async().await;
	let (broker, store) = setup(&server);
	let config = test_user_config();

	store
		.save(&config.locator, TokenRecord::new("access-old", "refresh-old", now_unix() - 10.))
		.await
		.expect("Seeding the store should succeed.");

	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/token")
				.header("authorization", config.credentials.basic_authorization())
				.body_includes("grant_type=refresh_token")
				.body_includes("refresh_token=refresh-old");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"access-new\",\"refresh_token\":\"refresh-new\",\"expires_in\":1800}",
			);
		})
		.await;
	let exchange = broker.renew(&config).await.expect("Renewal should succeed.");

	mock.assert_async().await;

	assert_eq!(exchange.access_token.expose(), "access-new");

	let stored = store
		.snapshot(&config.locator)
		.expect("Renewed record should be present in the store.");

	assert_eq!(stored.access_token.expose(), "access-new");
	assert_eq!(stored.refresh_token.expose(), "refresh-new");
	assert!((stored.expires_at - (now_unix() + 1_800.)).abs() <= 5.);
	assert_eq!(broker.renew_metrics.attempts(), 1);
	assert_eq!(broker.renew_metrics.successes(), 1);
	assert_eq!(broker.renew_metrics.failures(), 0);
}

#[tokio::test]
async fn renew_retains_the_previous_refresh_token_when_omitted() {
	let server = MockServer::start_async().await;
	let (broker, store) = setup(&server);
	let config = test_user_config();

	store
		.save(&config.locator, TokenRecord::new("access-old", "refresh-keep", now_unix() - 10.))
		.await
		.expect("Seeding the store should succeed.");
	server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"access-new\",\"expires_in\":3600}");
		})
		.await;

	let exchange = broker.renew(&config).await.expect("Renewal should succeed.");

	assert!(exchange.refresh_token.is_none());

	let stored = store
		.snapshot(&config.locator)
		.expect("Renewed record should be present in the store.");

	assert_eq!(stored.refresh_token.expose(), "refresh-keep");
}

#[tokio::test]
async fn renew_rejection_surfaces_and_leaves_the_store_untouched() {
	let server = MockServer::start_async().await;
	let (broker, store) = setup(&server);
	let config = test_user_config();
	let seeded = TokenRecord::new("access-old", "refresh-old", now_unix() - 10.);

	store
		.save(&config.locator, seeded.clone())
		.await
		.expect("Seeding the store should succeed.");
	server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(400)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_grant\"}");
		})
		.await;

	let err = broker.renew(&config).await.expect_err("Rejected renewal should fail.");

	assert!(matches!(err, Error::RenewalFailed { status: Some(400), .. }));
	assert_eq!(
		store.snapshot(&config.locator).expect("Seeded record should remain present."),
		seeded,
	);
	assert_eq!(broker.renew_metrics.failures(), 1);
}

#[tokio::test]
async fn renew_without_a_refresh_token_never_calls_the_endpoint() {
	let server = MockServer::start_async().await;
	let (broker, store) = setup(&server);
	let config = test_user_config();

	store
		.save(&config.locator, TokenRecord::new("access-only", "", now_unix() + 100.))
		.await
		.expect("Seeding the store should succeed.");

	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200).body("{\"access_token\":\"never\"}");
		})
		.await;
	let err = broker.renew(&config).await.expect_err("Renewal should fail without a refresh token.");

	assert!(matches!(err, Error::MissingRefreshToken));

	mock.assert_calls_async(0).await;

	// The impossible renewal still counts as one attempt, so the counters stay consistent.
	assert_eq!(broker.renew_metrics.attempts(), 1);
	assert_eq!(broker.renew_metrics.failures(), 1);
}

#[tokio::test]
async fn renew_rejects_malformed_token_responses() {
	let server = MockServer::start_async().await;
	let (broker, store) = setup(&server);
	let config = test_user_config();

	store
		.save(&config.locator, TokenRecord::new("access-old", "refresh-old", now_unix() - 10.))
		.await
		.expect("Seeding the store should succeed.");
	server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"token_type\":\"bearer\"}");
		})
		.await;

	let err = broker.renew(&config).await.expect_err("Malformed response should fail renewal.");

	assert!(matches!(err, Error::RenewalFailed { .. }));
}
