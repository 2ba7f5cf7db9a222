//! Loose mirrors of the upstream playback payloads.
//!
//! Every field defaults so partial or extended payloads decode without failing; the
//! shaping layer decides what absence means.

// self
use crate::_prelude::*;

/// `/me/player` response.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PlayerState {
	/// Whether playback is running.
	#[serde(default)]
	pub is_playing: bool,
	/// Playhead position in milliseconds.
	#[serde(default)]
	pub progress_ms: u64,
	/// The playing item; absent for sessions without an active track.
	#[serde(default)]
	pub item: Option<Track>,
	/// Active device.
	#[serde(default)]
	pub device: Device,
	/// Whether shuffle is enabled.
	#[serde(default)]
	pub shuffle_state: bool,
	/// Repeat mode.
	#[serde(default)]
	pub repeat_state: String,
	/// Context the playback was started from.
	#[serde(default)]
	pub context: Option<PlayContext>,
}

/// Track object.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Track {
	/// Upstream id; absent for local files.
	#[serde(default)]
	pub id: Option<String>,
	/// Title.
	#[serde(default)]
	pub name: String,
	/// Length in milliseconds.
	#[serde(default)]
	pub duration_ms: u64,
	/// Containing album.
	#[serde(default)]
	pub album: Album,
	/// Credited artists.
	#[serde(default)]
	pub artists: Vec<Artist>,
}

/// Album object, reduced to what shaping needs.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Album {
	/// Title.
	#[serde(default)]
	pub name: String,
	/// Cover art, ordered largest-first.
	#[serde(default)]
	pub images: Vec<Image>,
}

/// One cover-art rendition.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Image {
	/// Image URL.
	#[serde(default)]
	pub url: String,
}

/// Artist object, reduced to the display name.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Artist {
	/// Display name.
	#[serde(default)]
	pub name: String,
}

/// Playback device.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Device {
	/// Device name.
	#[serde(default)]
	pub name: String,
	/// Volume, when the device reports one.
	#[serde(default)]
	pub volume_percent: Option<u32>,
}

/// Playback context (playlist, album, artist radio).
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PlayContext {
	/// Context URI.
	#[serde(default)]
	pub uri: String,
}

/// `/me/player/queue` response.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct QueuePayload {
	/// The currently playing track.
	#[serde(default)]
	pub currently_playing: Option<Track>,
	/// Upcoming tracks in play order.
	#[serde(default)]
	pub queue: Vec<Track>,
}
