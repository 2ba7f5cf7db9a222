// crates.io
use httpmock::prelude::*;
// self
use playback_broker::{
	_preludet::*,
	auth::TokenRecord,
	error::ConfigError,
	flows::Broker,
	playback::QUEUE_LIMIT,
	store::{MemoryStore, TokenStore},
};

fn now_unix() -> f64 {
	OffsetDateTime::now_utc().unix_timestamp() as f64
}

async fn setup(server: &MockServer) -> (Broker, Arc<MemoryStore>) {
	let token_endpoint =
		Url::parse(&server.url("/token")).expect("Mock token endpoint should parse.");
	let api_base = Url::parse(&server.base_url()).expect("Mock API base should parse.");
	let (broker, store) = build_memory_test_broker(token_endpoint, api_base);
	let config = test_user_config();

	store
		.save(&config.locator, TokenRecord::new("access-fresh", "refresh-1", now_unix() + 3_600.))
		.await
		.expect("Seeding the store should succeed.");

	(broker, store)
}

fn track_json(id: &str, name: &str) -> serde_json::Value {
	serde_json::json!({
		"id": id,
		"name": name,
		"duration_ms": 200_000,
		"album": {
			"name": "Sample Album",
			"images": [
				{ "url": "https://img.example/large" },
				{ "url": "https://img.example/medium" },
			],
		},
		"artists": [{ "name": "First" }, { "name": "Second" }],
	})
}

#[tokio::test]
async fn current_playback_shapes_the_player_state_and_resolves_likes() {
	let server = MockServer::start_async().await;
	let (broker, _store) = setup(&server).await;
	let config = test_user_config();

	server
		.mock_async(|when, then| {
			when.method(GET).path("/me/player").header("authorization", "Bearer access-fresh");
			then.status(200).header("content-type", "application/json").json_body(
				serde_json::json!({
					"is_playing": true,
					"progress_ms": 65_000,
					"item": track_json("track-1", "Sample Song"),
					"device": { "name": "Speaker", "volume_percent": 40 },
					"shuffle_state": false,
					"repeat_state": "off",
					"context": { "uri": "spotify:playlist:p1" },
				}),
			);
		})
		.await;

	let liked = server
		.mock_async(|when, then| {
			when.method(GET).path("/me/tracks/contains").query_param("ids", "track-1");
			then.status(200).header("content-type", "application/json").body("[true]");
		})
		.await;
	let state = broker
		.current_playback(&config)
		.await
		.expect("Current playback should succeed.")
		.expect("An active session should shape into a state.");

	liked.assert_async().await;

	assert_eq!(state.track, "Sample Song");
	assert_eq!(state.artist, "First, Second");
	assert_eq!(state.thumbnail, "https://img.example/medium");
	assert_eq!(state.progress, "01:05 / 03:20");
	assert_eq!(state.progress_percent, 32.5);
	assert_eq!(state.volume_percent, Some(40));
	assert_eq!(state.is_liked, Some(true));
}

#[tokio::test]
async fn idle_sessions_shape_to_none() {
	let server = MockServer::start_async().await;
	let (broker, _store) = setup(&server).await;
	let config = test_user_config();

	server
		.mock_async(|when, then| {
			when.method(GET).path("/me/player");
			then.status(204);
		})
		.await;

	let state = broker.current_playback(&config).await.expect("Current playback should succeed.");

	assert!(state.is_none());
}

#[tokio::test]
async fn like_current_saves_the_playing_track_and_returns_its_id() {
	let server = MockServer::start_async().await;
	let (broker, _store) = setup(&server).await;
	let config = test_user_config();

	server
		.mock_async(|when, then| {
			when.method(GET).path("/me/player");
			then.status(200).header("content-type", "application/json").json_body(
				serde_json::json!({
					"is_playing": true,
					"item": track_json("track-9", "Saved Song"),
				}),
			);
		})
		.await;

	let saved = server
		.mock_async(|when, then| {
			when.method(PUT).path("/me/tracks").query_param("ids", "track-9");
			then.status(200);
		})
		.await;
	let id = broker.like_current(&config).await.expect("Like should succeed.");

	saved.assert_async().await;

	assert_eq!(id, "track-9");
}

#[tokio::test]
async fn like_current_without_active_playback_fails() {
	let server = MockServer::start_async().await;
	let (broker, _store) = setup(&server).await;
	let config = test_user_config();

	server
		.mock_async(|when, then| {
			when.method(GET).path("/me/player");
			then.status(204);
		})
		.await;

	let err = broker.like_current(&config).await.expect_err("Like should need a playing track.");

	assert!(matches!(err, Error::NoActivePlayback));
}

#[tokio::test]
async fn dislike_current_removes_the_playing_track() {
	let server = MockServer::start_async().await;
	let (broker, _store) = setup(&server).await;
	let config = test_user_config();

	server
		.mock_async(|when, then| {
			when.method(GET).path("/me/player");
			then.status(200).header("content-type", "application/json").json_body(
				serde_json::json!({ "item": track_json("track-9", "Removed Song") }),
			);
		})
		.await;

	let removed = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/me/tracks").query_param("ids", "track-9");
			then.status(200);
		})
		.await;
	let id = broker.dislike_current(&config).await.expect("Dislike should succeed.");

	removed.assert_async().await;

	assert_eq!(id, "track-9");
}

#[tokio::test]
async fn queue_snapshot_is_capped_to_the_display_window() {
	let server = MockServer::start_async().await;
	let (broker, _store) = setup(&server).await;
	let config = test_user_config();
	let queue: Vec<_> = (0..25).map(|i| track_json(&format!("t{i}"), "Queued")).collect();

	server
		.mock_async(|when, then| {
			when.method(GET).path("/me/player/queue");
			then.status(200).header("content-type", "application/json").json_body(
				serde_json::json!({
					"currently_playing": track_json("t-now", "Playing"),
					"queue": queue,
				}),
			);
		})
		.await;

	let snapshot = broker.queue(&config).await.expect("Queue fetch should succeed.");

	assert_eq!(snapshot.up_next.len(), QUEUE_LIMIT);
	assert_eq!(snapshot.total, QUEUE_LIMIT);
	assert_eq!(snapshot.up_next[0].index, 1);
	assert_eq!(snapshot.up_next[0].summary.track_id.as_deref(), Some("t0"));
	assert_eq!(
		snapshot.currently_playing.expect("Playing track should be present.").track,
		"Playing",
	);
}

#[tokio::test]
async fn play_from_queue_jumps_within_the_session_context() {
	let server = MockServer::start_async().await;
	let (broker, _store) = setup(&server).await;
	let config = test_user_config();

	server
		.mock_async(|when, then| {
			when.method(GET).path("/me/player/queue");
			then.status(200).header("content-type", "application/json").json_body(
				serde_json::json!({
					"queue": [
						track_json("t1", "One"),
						track_json("t2", "Two"),
						track_json("t3", "Three"),
					],
				}),
			);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/me/player");
			then.status(200).header("content-type", "application/json").json_body(
				serde_json::json!({ "context": { "uri": "spotify:playlist:p1" } }),
			);
		})
		.await;

	let play = server
		.mock_async(|when, then| {
			when.method(PUT)
				.path("/me/player/play")
				.body_includes("spotify:playlist:p1")
				.body_includes("spotify:track:t2");
			then.status(204);
		})
		.await;

	broker.play_from_queue(&config, 2).await.expect("Queue jump should succeed.");

	play.assert_async().await;
}

#[tokio::test]
async fn play_from_queue_position_zero_replays_the_playing_track() {
	let server = MockServer::start_async().await;
	let (broker, _store) = setup(&server).await;
	let config = test_user_config();

	server
		.mock_async(|when, then| {
			when.method(GET).path("/me/player/queue");
			then.status(200).header("content-type", "application/json").json_body(
				serde_json::json!({
					"currently_playing": track_json("t-now", "Playing"),
					"queue": [track_json("t1", "One")],
				}),
			);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/me/player");
			then.status(204);
		})
		.await;

	let play = server
		.mock_async(|when, then| {
			when.method(PUT).path("/me/player/play").body_includes("spotify:track:t-now");
			then.status(204);
		})
		.await;

	broker.play_from_queue(&config, 0).await.expect("Replaying the playing track should succeed.");

	play.assert_async().await;
}

#[tokio::test]
async fn play_from_queue_rejects_positions_beyond_the_window() {
	let server = MockServer::start_async().await;
	let (broker, _store) = setup(&server).await;
	let config = test_user_config();

	server
		.mock_async(|when, then| {
			when.method(GET).path("/me/player/queue");
			then.status(200).header("content-type", "application/json").json_body(
				serde_json::json!({ "queue": [track_json("t1", "One")] }),
			);
		})
		.await;

	let err = broker
		.play_from_queue(&config, 5)
		.await
		.expect_err("Out-of-range positions should be rejected.");

	assert!(matches!(
		err,
		Error::Config(ConfigError::QueueIndexOutOfRange { index: 5, len: 1 }),
	));
}

#[tokio::test]
async fn set_volume_rejects_levels_above_one_hundred_before_any_request() {
	let server = MockServer::start_async().await;
	let (broker, _store) = setup(&server).await;
	let config = test_user_config();
	let any_request = server
		.mock_async(|when, then| {
			when.any_request();
			then.status(500);
		})
		.await;
	let err = broker
		.set_volume(&config, 150)
		.await
		.expect_err("Volume above 100 should be rejected locally.");

	assert!(matches!(err, Error::Config(ConfigError::VolumeOutOfRange { value: 150 })));

	any_request.assert_calls_async(0).await;
}

#[tokio::test]
async fn transport_commands_hit_their_endpoints() {
	let server = MockServer::start_async().await;
	let (broker, _store) = setup(&server).await;
	let config = test_user_config();
	let shuffle = server
		.mock_async(|when, then| {
			when.method(PUT).path("/me/player/shuffle").query_param("state", "true");
			then.status(204);
		})
		.await;
	let volume = server
		.mock_async(|when, then| {
			when.method(PUT).path("/me/player/volume").query_param("volume_percent", "35");
			then.status(204);
		})
		.await;
	let next = server
		.mock_async(|when, then| {
			when.method(POST).path("/me/player/next");
			then.status(204);
		})
		.await;

	broker.set_shuffle(&config, true).await.expect("Shuffle toggle should succeed.");
	broker.set_volume(&config, 35).await.expect("Volume change should succeed.");
	broker.next_track(&config).await.expect("Skip should succeed.");

	shuffle.assert_async().await;
	volume.assert_async().await;
	next.assert_async().await;
}

#[tokio::test]
async fn upstream_rejections_surface_as_upstream_errors() {
	let server = MockServer::start_async().await;
	let (broker, _store) = setup(&server).await;
	let config = test_user_config();

	server
		.mock_async(|when, then| {
			when.method(PUT).path("/me/player/play");
			then.status(403).body("{\"error\":{\"status\":403,\"reason\":\"PREMIUM_REQUIRED\"}}");
		})
		.await;

	let err = broker.play(&config).await.expect_err("Premium rejection should fail the call.");

	assert!(matches!(err, Error::Upstream { status: 403, .. }));
}
