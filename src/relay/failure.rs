//! Request-level failures and their HTTP rendering.

// crates.io
use axum::{
	Json,
	http::{HeaderValue, StatusCode, header},
	response::{IntoResponse, Response},
};
use serde_json::json;
// self
use crate::error::GraphError;

/// Challenge sent with every 401.
pub const BASIC_CHALLENGE: &str = "Basic realm=\"Login Required\"";

/// Terminal failure for one inbound request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelayFailure {
	/// Credentials were missing or did not match.
	Unauthorized,
	/// The token exchange failed for any reason.
	TokenUnavailable,
	/// Graph answered with a non-200 status, forwarded as is.
	UpstreamStatus(StatusCode),
	/// Graph could not be reached or sent an unreadable page.
	UpstreamUnavailable,
}
impl RelayFailure {
	/// Status code returned to the caller.
	pub fn status(self) -> StatusCode {
		match self {
			Self::Unauthorized => StatusCode::UNAUTHORIZED,
			Self::TokenUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
			Self::UpstreamStatus(status) => status,
			Self::UpstreamUnavailable => StatusCode::BAD_GATEWAY,
		}
	}

	/// Generic message placed under `error`.
	pub fn message(self) -> &'static str {
		match self {
			Self::Unauthorized => "Unauthorized",
			Self::TokenUnavailable => "Failed to get access token",
			Self::UpstreamStatus(_) | Self::UpstreamUnavailable => "Failed to fetch SharePoint data",
		}
	}
}
impl From<&GraphError> for RelayFailure {
	fn from(err: &GraphError) -> Self {
		match err {
			GraphError::UpstreamStatus { status } => StatusCode::from_u16(*status)
				.map(Self::UpstreamStatus)
				.unwrap_or(Self::UpstreamUnavailable),
			GraphError::Network(_) | GraphError::Parse(_) => Self::UpstreamUnavailable,
		}
	}
}
impl IntoResponse for RelayFailure {
	fn into_response(self) -> Response {
		let mut response = (self.status(), Json(json!({ "error": self.message() }))).into_response();

		if self == Self::Unauthorized {
			response
				.headers_mut()
				.insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(BASIC_CHALLENGE));
		}

		response
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn unauthorized_carries_the_challenge() {
		let response = RelayFailure::Unauthorized.into_response();

		assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
		assert_eq!(
			response.headers().get(header::WWW_AUTHENTICATE).and_then(|v| v.to_str().ok()),
			Some(BASIC_CHALLENGE),
		);
	}

	#[test]
	fn graph_failures_map_to_forwarded_or_bad_gateway() {
		let forwarded = RelayFailure::from(&GraphError::UpstreamStatus { status: 403 });

		assert_eq!(forwarded.status(), StatusCode::FORBIDDEN);
		assert_eq!(forwarded.message(), "Failed to fetch SharePoint data");

		let mut de = serde_json::Deserializer::from_str("[");
		let source = serde_path_to_error::deserialize::<_, crate::graph::ListItemsPage>(&mut de)
			.expect_err("Truncated JSON must fail to parse.");

		assert_eq!(RelayFailure::from(&GraphError::Parse(source)).status(), StatusCode::BAD_GATEWAY);
	}

	#[test]
	fn token_failure_is_internal_error() {
		let response = RelayFailure::TokenUnavailable.into_response();

		assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
		assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
	}
}
