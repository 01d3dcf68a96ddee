//! Basic-auth guard placed in front of the course route.

// crates.io
use axum::{
	extract::{Request, State},
	http::header,
	middleware::Next,
	response::{IntoResponse, Response},
};
// self
use crate::{
	_prelude::*,
	auth::BasicCredentials,
	relay::{RelayFailure, RelayState},
};

/// Rejects requests whose `Authorization: Basic` credentials differ from the configured pair.
///
/// Runs before the handler, so a rejected request never reaches the token provider.
pub async fn require_basic_auth(
	State(state): State<Arc<RelayState>>,
	request: Request,
	next: Next,
) -> Response {
	let Some(expected) = state.basic_auth.as_ref() else {
		return next.run(request).await;
	};
	let submitted = request
		.headers()
		.get(header::AUTHORIZATION)
		.and_then(|value| value.to_str().ok())
		.map(BasicCredentials::from_header);

	match submitted {
		Some(Ok(credentials)) if expected.matches(&credentials) => next.run(request).await,
		Some(Ok(credentials)) => {
			tracing::warn!(username = %credentials.username, "Rejected mismatched credentials.");

			RelayFailure::Unauthorized.into_response()
		},
		Some(Err(e)) => {
			tracing::warn!(error = %e, "Rejected unreadable credentials.");

			RelayFailure::Unauthorized.into_response()
		},
		None => {
			tracing::debug!("Rejected request without credentials.");

			RelayFailure::Unauthorized.into_response()
		},
	}
}
