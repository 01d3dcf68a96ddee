// crates.io
use tracing::{Span, instrument::Instrumented};
use tracing_subscriber::EnvFilter;
// self
use crate::{_prelude::*, obs::Stage};

/// Filter applied when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "courses_relay=info,tower_http=info";

/// Installs the global `fmt` subscriber, honoring `RUST_LOG`.
///
/// Repeated calls are ignored so tests and the binary can both invoke it.
pub fn init_tracing() {
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
	let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// A span builder used by relay stages.
#[derive(Clone, Debug)]
pub struct StageSpan {
	span: Span,
}
impl StageSpan {
	/// Creates a new span tagged with the provided stage + call site.
	pub fn new(stage: Stage, site: &'static str) -> Self {
		Self { span: tracing::info_span!("courses_relay.stage", stage = stage.as_str(), site) }
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> Instrumented<Fut>
	where
		Fut: Future,
	{
		tracing::Instrument::instrument(fut, self.span.clone())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = StageSpan::new(Stage::ListFetch, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}

	#[tokio::test]
	async fn instrumented_future_runs_inside_the_stage_span() {
		let span = StageSpan::new(Stage::TokenExchange, "instrumented_future_runs_inside_the_stage_span");
		let inner = span.instrument(async { Span::current().id() }).await;

		assert_eq!(inner, span.span.id());
	}

	#[test]
	fn init_tracing_is_idempotent() {
		init_tracing();
		init_tracing();
	}
}
