//! Route handlers.

// crates.io
use axum::{
	Json,
	extract::State,
	response::{IntoResponse, Response},
};
// self
use crate::{
	_prelude::*,
	graph::{self, CourseSummary},
	obs::{self, Outcome, Stage, StageSpan},
	relay::{RelayFailure, RelayState},
};

/// Body served by `GET /`.
pub const LIVENESS_MESSAGE: &str = "Courses relay is running.";

/// `GET /`.
pub async fn liveness() -> &'static str {
	LIVENESS_MESSAGE
}

/// `GET /get-courses-data`: token, list fetch, filter, projection.
pub async fn get_courses(State(state): State<Arc<RelayState>>) -> Response {
	const STAGE: Stage = Stage::Relay;

	let span = StageSpan::new(STAGE, "get_courses");

	obs::record_stage_outcome(STAGE, Outcome::Attempt);

	let result = span.instrument(relay_courses(&state)).await;

	match result {
		Ok(courses) => {
			obs::record_stage_outcome(STAGE, Outcome::Success);

			Json(courses).into_response()
		},
		Err(failure) => {
			obs::record_stage_outcome(STAGE, Outcome::Failure);

			failure.into_response()
		},
	}
}

async fn relay_courses(state: &RelayState) -> Result<Vec<CourseSummary>, RelayFailure> {
	let token = state.tokens.client_credentials().await.map_err(|e| {
		tracing::error!(error = %e, "Failed to get access token.");

		RelayFailure::TokenUnavailable
	})?;
	let page = state.list.fetch_items(&token).await.map_err(|e| {
		tracing::error!(error = %e, "Failed to fetch SharePoint data.");

		RelayFailure::from(&e)
	})?;
	let courses = graph::summarize(&page.value);

	tracing::info!(fetched = page.value.len(), served = courses.len(), "Relayed course list.");

	Ok(courses)
}
