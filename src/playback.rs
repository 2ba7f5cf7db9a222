//! Playback API payload models and their presentable reductions.
//!
//! The `raw` types mirror the upstream JSON loosely, defaulting every field so partial
//! payloads never fail decoding. The shaped types are what this crate hands to callers:
//! flattened track data, a `mm:ss / mm:ss` progress string, and a queue capped to a
//! display-friendly length.

pub mod raw;

// self
use crate::_prelude::*;

/// Maximum number of upcoming entries included in a queue snapshot.
pub const QUEUE_LIMIT: usize = 20;

/// Presentable snapshot of the active playback session.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlaybackState {
	/// Track title.
	pub track: String,
	/// All artist names joined with `", "`.
	pub artist: String,
	/// Album title.
	pub album: String,
	/// Album art URL; prefers the mid-size image, empty when the album has none.
	pub thumbnail: String,
	/// Track length in milliseconds.
	pub duration_ms: u64,
	/// Playhead position in milliseconds.
	pub progress_ms: u64,
	/// Playhead position as a percentage of the duration, rounded to two decimals.
	pub progress_percent: f64,
	/// `mm:ss / mm:ss` progress display.
	pub progress: String,
	/// Whether playback is currently running.
	pub is_playing: bool,
	/// Name of the active device.
	pub device: String,
	/// Device volume, when the device reports one.
	pub volume_percent: Option<u32>,
	/// Whether shuffle is enabled.
	pub shuffle_state: bool,
	/// Repeat mode as reported upstream (`off`, `track`, `context`).
	pub repeat_state: String,
	/// Context URI the playback was started from, when any.
	pub context_uri: Option<String>,
	/// Upstream track id, when the item is a real track.
	pub track_id: Option<String>,
	/// Whether the track is in the user's library; absent until the caller resolves it.
	pub is_liked: Option<bool>,
}
impl PlaybackState {
	/// Flattens a raw player payload into the presentable state.
	///
	/// Returns [`None`] when the payload carries no item, which upstream uses for sessions
	/// without an active track.
	pub fn from_raw(state: raw::PlayerState) -> Option<Self> {
		let item = state.item?;
		let duration_ms = item.duration_ms;
		let progress_ms = state.progress_ms;
		let progress_percent = if duration_ms == 0 {
			0.
		} else {
			(progress_ms as f64 / duration_ms as f64 * 10_000.).round() / 100.
		};
		let progress =
			format!("{} / {}", format_timestamp(progress_ms), format_timestamp(duration_ms));

		Some(Self {
			track: item.name,
			artist: join_artists(&item.artists),
			album: item.album.name,
			thumbnail: thumbnail_url(&item.album.images),
			duration_ms,
			progress_ms,
			progress_percent,
			progress,
			is_playing: state.is_playing,
			device: state.device.name,
			volume_percent: state.device.volume_percent,
			shuffle_state: state.shuffle_state,
			repeat_state: state.repeat_state,
			context_uri: state.context.map(|context| context.uri),
			track_id: item.id,
			is_liked: None,
		})
	}
}

/// Presentable track reference used in queue listings.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrackSummary {
	/// Track title.
	pub track: String,
	/// All artist names joined with `", "`.
	pub artist: String,
	/// Album title.
	pub album: String,
	/// Album art URL.
	pub thumbnail: String,
	/// Upstream track id, when known.
	pub track_id: Option<String>,
}
impl TrackSummary {
	fn from_raw(track: raw::Track) -> Self {
		Self {
			track: track.name,
			artist: join_artists(&track.artists),
			album: track.album.name,
			thumbnail: thumbnail_url(&track.album.images),
			track_id: track.id,
		}
	}
}

/// One upcoming queue entry with its 1-based position.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QueueEntry {
	/// 1-based position in the upcoming queue.
	pub index: usize,
	/// Track summary.
	#[serde(flatten)]
	pub summary: TrackSummary,
}

/// Presentable queue snapshot.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QueueSnapshot {
	/// The currently playing track, when any.
	pub currently_playing: Option<TrackSummary>,
	/// Upcoming entries, capped to [`QUEUE_LIMIT`].
	pub up_next: Vec<QueueEntry>,
	/// Number of upcoming entries included in the snapshot (after the cap).
	pub total: usize,
}
impl QueueSnapshot {
	/// Flattens a raw queue payload, keeping at most [`QUEUE_LIMIT`] upcoming entries.
	pub fn from_raw(payload: raw::QueuePayload) -> Self {
		let up_next: Vec<_> = payload
			.queue
			.into_iter()
			.take(QUEUE_LIMIT)
			.enumerate()
			.map(|(i, track)| QueueEntry { index: i + 1, summary: TrackSummary::from_raw(track) })
			.collect();
		let total = up_next.len();

		Self {
			currently_playing: payload.currently_playing.map(TrackSummary::from_raw),
			up_next,
			total,
		}
	}
}

/// Formats milliseconds as zero-padded `mm:ss`, flooring sub-second remainders.
pub fn format_timestamp(ms: u64) -> String {
	let total_secs = ms / 1_000;

	format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

fn join_artists(artists: &[raw::Artist]) -> String {
	artists.iter().map(|artist| artist.name.as_str()).collect::<Vec<_>>().join(", ")
}

// The upstream image list is ordered largest-first; index 1 is the mid-size art.
fn thumbnail_url(images: &[raw::Image]) -> String {
	images.get(1).or_else(|| images.first()).map(|image| image.url.clone()).unwrap_or_default()
}
