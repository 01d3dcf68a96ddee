//! Observability helpers for relay stages.
//!
//! Every stage runs inside a span named `courses_relay.stage` carrying a `stage` field.
//!
//! # Feature Flags
//!
//! - Enable `metrics` to increment the `courses_relay_stage_total` counter for every
//!   attempt/success/failure, labeled by `stage` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Upper bound, in characters, for response bodies copied into logs and errors.
pub const BODY_PREVIEW_LIMIT: usize = 512;

/// Lossy UTF-8 copy of `body`, cut at [`BODY_PREVIEW_LIMIT`] characters.
pub fn body_preview(body: &[u8]) -> String {
	let text = String::from_utf8_lossy(body);
	let mut chars = text.chars();
	let mut preview: String = chars.by_ref().take(BODY_PREVIEW_LIMIT).collect();

	if chars.next().is_some() {
		preview.push('…');
	}

	preview
}

/// Stages a relay request moves through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
	/// Client-credentials exchange against the identity provider.
	TokenExchange,
	/// List items request against Graph.
	ListFetch,
	/// Whole inbound request, from guard to response.
	Relay,
}
impl Stage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Stage::TokenExchange => "token_exchange",
			Stage::ListFetch => "list_fetch",
			Stage::Relay => "relay",
		}
	}
}
impl Display for Stage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
	/// Entry to a stage.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl Outcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Outcome::Attempt => "attempt",
			Outcome::Success => "success",
			Outcome::Failure => "failure",
		}
	}
}
impl Display for Outcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn previews_are_bounded() {
		let preview = body_preview("x".repeat(BODY_PREVIEW_LIMIT + 10).as_bytes());

		assert_eq!(preview.chars().count(), BODY_PREVIEW_LIMIT + 1);
		assert!(preview.ends_with('…'));
		assert_eq!(body_preview(b"short"), "short");
		assert_eq!(body_preview("x".repeat(BODY_PREVIEW_LIMIT).as_bytes()).chars().count(), BODY_PREVIEW_LIMIT);
	}
}
