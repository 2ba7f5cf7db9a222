//! Typed playback operations built on the authenticated dispatcher.
//!
//! Every helper obtains a valid access token first and goes through [`Broker::dispatch`],
//! so the transparent retry-on-401 applies uniformly.

// crates.io
use serde_json::json;
// self
use crate::{
	_prelude::*,
	auth::UserConfig,
	error::ConfigError,
	flows::Broker,
	playback::{PlaybackState, QUEUE_LIMIT, QueueSnapshot, raw},
};

impl Broker {
	/// Fetches the current playback session, shaped for display.
	///
	/// Returns [`None`] for an idle session (upstream 204 or a payload with no item). When
	/// the playing track has an id, its library membership is resolved with a best-effort
	/// follow-up lookup; lookup failures leave `is_liked` unset rather than failing the
	/// whole call.
	pub async fn current_playback(&self, config: &UserConfig) -> Result<Option<PlaybackState>> {
		let token = self.valid_access_token(config).await?;
		let response = self.dispatch(config, Method::GET, "me/player", &token, None).await?;

		if response.status == StatusCode::NO_CONTENT.as_u16() {
			return Ok(None);
		}

		let raw: raw::PlayerState = response.require_success()?.json()?;
		let Some(mut state) = PlaybackState::from_raw(raw) else {
			return Ok(None);
		};

		if let Some(id) = &state.track_id {
			let path = format!("me/tracks/contains?ids={id}");

			if let Ok(response) = self.dispatch(config, Method::GET, &path, &token, None).await
				&& response.is_success()
				&& let Ok(flags) = response.json::<Vec<bool>>()
			{
				state.is_liked = flags.first().copied();
			}
		}

		Ok(Some(state))
	}

	/// Resumes playback on the active device.
	pub async fn play(&self, config: &UserConfig) -> Result<()> {
		self.command(config, Method::PUT, "me/player/play").await
	}

	/// Pauses playback.
	pub async fn pause(&self, config: &UserConfig) -> Result<()> {
		self.command(config, Method::PUT, "me/player/pause").await
	}

	/// Skips to the next track.
	pub async fn next_track(&self, config: &UserConfig) -> Result<()> {
		self.command(config, Method::POST, "me/player/next").await
	}

	/// Returns to the previous track.
	pub async fn previous_track(&self, config: &UserConfig) -> Result<()> {
		self.command(config, Method::POST, "me/player/previous").await
	}

	/// Saves the currently playing track to the user's library.
	///
	/// Returns the saved track id. Fails with [`Error::NoActivePlayback`] when nothing with
	/// a track id is playing.
	pub async fn like_current(&self, config: &UserConfig) -> Result<String> {
		self.set_current_saved(config, Method::PUT).await
	}

	/// Removes the currently playing track from the user's library.
	///
	/// Returns the removed track id. Fails with [`Error::NoActivePlayback`] when nothing
	/// with a track id is playing.
	pub async fn dislike_current(&self, config: &UserConfig) -> Result<String> {
		self.set_current_saved(config, Method::DELETE).await
	}

	/// Fetches the playback queue, capped to [`QUEUE_LIMIT`] upcoming entries.
	pub async fn queue(&self, config: &UserConfig) -> Result<QueueSnapshot> {
		let token = self.valid_access_token(config).await?;
		let payload: raw::QueuePayload = self
			.dispatch(config, Method::GET, "me/player/queue", &token, None)
			.await?
			.require_success()?
			.json()?;

		Ok(QueueSnapshot::from_raw(payload))
	}

	/// Jumps playback to the queue entry at the given position.
	///
	/// Position `0` replays the currently playing track; positions `1..=window` target the
	/// upcoming queue. When the session has a play context, the jump targets the track
	/// inside that context so the rest of the queue survives; otherwise the track plays
	/// standalone. Fails with [`ConfigError::QueueIndexOutOfRange`] when the position is
	/// beyond the visible queue window.
	pub async fn play_from_queue(&self, config: &UserConfig, index: usize) -> Result<()> {
		let token = self.valid_access_token(config).await?;
		let payload: raw::QueuePayload = self
			.dispatch(config, Method::GET, "me/player/queue", &token, None)
			.await?
			.require_success()?
			.json()?;
		let len = payload.queue.len().min(QUEUE_LIMIT);
		let track = if index == 0 {
			payload.currently_playing.as_ref().ok_or(Error::NoActivePlayback)?
		} else if index <= len {
			&payload.queue[index - 1]
		} else {
			return Err(ConfigError::QueueIndexOutOfRange { index, len }.into());
		};
		let Some(id) = &track.id else {
			return Err(Error::NoActivePlayback);
		};
		let uri = format!("spotify:track:{id}");
		let context_uri = self.current_context_uri(config, &token).await;
		let body = match context_uri {
			Some(context_uri) => json!({ "context_uri": context_uri, "offset": { "uri": uri } }),
			None => json!({ "uris": [uri] }),
		};

		self.dispatch(config, Method::PUT, "me/player/play", &token, Some(&body))
			.await?
			.require_success()?;

		Ok(())
	}

	/// Enables or disables shuffle.
	pub async fn set_shuffle(&self, config: &UserConfig, state: bool) -> Result<()> {
		self.command(config, Method::PUT, &format!("me/player/shuffle?state={state}")).await
	}

	/// Sets the device volume; values above 100 are rejected before any request is sent.
	pub async fn set_volume(&self, config: &UserConfig, level: u32) -> Result<()> {
		if level > 100 {
			return Err(ConfigError::VolumeOutOfRange { value: level }.into());
		}

		self.command(config, Method::PUT, &format!("me/player/volume?volume_percent={level}"))
			.await
	}

	/// Seeks to the given playhead position.
	pub async fn seek(&self, config: &UserConfig, position_ms: u64) -> Result<()> {
		self.command(config, Method::PUT, &format!("me/player/seek?position_ms={position_ms}"))
			.await
	}

	async fn command(&self, config: &UserConfig, method: Method, path: &str) -> Result<()> {
		let token = self.valid_access_token(config).await?;

		self.dispatch(config, method, path, &token, None).await?.require_success()?;

		Ok(())
	}

	async fn set_current_saved(&self, config: &UserConfig, method: Method) -> Result<String> {
		let token = self.valid_access_token(config).await?;
		let response = self.dispatch(config, Method::GET, "me/player", &token, None).await?;

		if response.status == StatusCode::NO_CONTENT.as_u16() {
			return Err(Error::NoActivePlayback);
		}

		let raw: raw::PlayerState = response.require_success()?.json()?;
		let id = raw.item.and_then(|item| item.id).ok_or(Error::NoActivePlayback)?;

		self.dispatch(config, method, &format!("me/tracks?ids={id}"), &token, None)
			.await?
			.require_success()?;

		Ok(id)
	}

	async fn current_context_uri(&self, config: &UserConfig, token: &str) -> Option<String> {
		let response =
			self.dispatch(config, Method::GET, "me/player", token, None).await.ok()?;

		if !response.is_success() {
			return None;
		}

		response.json::<raw::PlayerState>().ok()?.context.map(|context| context.uri)
	}
}
