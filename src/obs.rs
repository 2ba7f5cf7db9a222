//! Optional observability helpers for broker flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `playback_broker.flow` with the `flow`
//!   and `stage` (call site) fields, plus warning events for swallowed failures.
//! - Enable `metrics` to increment the `playback_broker_flow_total` counter for every
//!   attempt/success/failure, labeled by `flow` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

const BODY_PREVIEW_CHARS: usize = 200;

/// Flow kinds observed by the broker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Valid-token accessor.
	Access,
	/// Upstream playback API dispatch.
	Dispatch,
	/// Authorization-code exchange and record seeding.
	Exchange,
	/// Refresh-token renewal.
	Renew,
	/// Document store reads and writes.
	Store,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Access => "access",
			FlowKind::Dispatch => "dispatch",
			FlowKind::Exchange => "exchange",
			FlowKind::Renew => "renew",
			FlowKind::Store => "store",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a broker helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Emits a warning event describing a swallowed failure (no-op without `tracing`).
///
/// Callers must pass pre-sanitized detail; this helper never truncates or redacts on its
/// own beyond what [`body_preview`] already produced.
pub(crate) fn warn_failure(flow: FlowKind, detail: &str) {
	#[cfg(feature = "tracing")]
	::tracing::warn!(flow = flow.as_str(), detail, "playback_broker.failure");
	#[cfg(not(feature = "tracing"))]
	let _ = (flow, detail);
}

/// Truncates an upstream body for operator logs; detail beyond the cap is dropped.
pub(crate) fn body_preview(text: &str) -> String {
	let mut preview: String = text.chars().take(BODY_PREVIEW_CHARS).collect();

	if text.chars().nth(BODY_PREVIEW_CHARS).is_some() {
		preview.push_str("...");
	}

	preview
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn body_preview_caps_long_payloads() {
		let long = "x".repeat(500);
		let preview = body_preview(&long);

		assert_eq!(preview.len(), BODY_PREVIEW_CHARS + 3);
		assert!(preview.ends_with("..."));
		assert_eq!(body_preview("short"), "short");
	}

	#[test]
	fn labels_are_stable() {
		assert_eq!(FlowKind::Renew.as_str(), "renew");
		assert_eq!(FlowOutcome::Failure.to_string(), "failure");
	}
}
