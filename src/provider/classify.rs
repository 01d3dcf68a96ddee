//! Reads a token response that carried no `access_token` into the relay error taxonomy.

// self
use crate::{_prelude::*, error::TransientError};

/// How a refused token request is reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenErrorKind {
	/// The grant itself was refused.
	InvalidGrant,
	/// Client id or secret were not accepted.
	InvalidClient,
	/// The application may not obtain the requested scope.
	InsufficientScope,
	/// Nothing in the response points at the request.
	Transient,
}

// Checked in order; the first match wins.
const KNOWN_CODES: &[(&str, TokenErrorKind)] = &[
	("invalid_grant", TokenErrorKind::InvalidGrant),
	("access_denied", TokenErrorKind::InvalidGrant),
	("invalid_client", TokenErrorKind::InvalidClient),
	("unauthorized_client", TokenErrorKind::InvalidClient),
	// Entra ID: invalid client secret.
	("aadsts7000215", TokenErrorKind::InvalidClient),
	("invalid_scope", TokenErrorKind::InsufficientScope),
	("insufficient_scope", TokenErrorKind::InsufficientScope),
	("temporarily_unavailable", TokenErrorKind::Transient),
	("server_error", TokenErrorKind::Transient),
];

/// What the token endpoint told us when it did not hand out a token.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenErrorContext {
	/// HTTP status of the response.
	pub status: Option<u16>,
	/// OAuth `error` field.
	pub oauth_error: Option<String>,
	/// OAuth `error_description` field.
	pub error_description: Option<String>,
	/// Bounded copy of the raw body.
	pub body_preview: Option<String>,
}
impl TokenErrorContext {
	/// Records the HTTP status.
	pub fn with_status(mut self, status: u16) -> Self {
		self.status = Some(status);

		self
	}

	/// Records the OAuth `error` field.
	pub fn with_oauth_error(mut self, error: impl Into<String>) -> Self {
		self.oauth_error = Some(error.into());

		self
	}

	/// Records the OAuth `error_description` field.
	pub fn with_error_description(mut self, description: impl Into<String>) -> Self {
		self.error_description = Some(description.into());

		self
	}

	/// Keeps a bounded preview of the raw body.
	pub fn with_body(mut self, body: &[u8]) -> Self {
		self.body_preview = Some(crate::obs::body_preview(body));

		self
	}

	/// Exact OAuth code first, then any known code mentioned in the description or body,
	/// then the HTTP status.
	pub fn classify(&self) -> TokenErrorKind {
		self.oauth_error
			.as_deref()
			.and_then(kind_of_code)
			.or_else(|| self.error_description.as_deref().and_then(kind_in_text))
			.or_else(|| self.body_preview.as_deref().and_then(kind_in_text))
			.unwrap_or_else(|| kind_of_status(self.status))
	}

	/// Converts the refusal into the [`Error`] surfaced by the token provider.
	pub fn into_error(self) -> Error {
		let kind = self.classify();
		let reason = match (&self.error_description, &self.oauth_error) {
			(Some(description), _) => format!("Token endpoint returned an OAuth error: {description}"),
			(None, Some(code)) => format!("Token endpoint returned an OAuth error: {code}"),
			(None, None) => "Token endpoint response carried no access token".to_owned(),
		};

		match kind {
			TokenErrorKind::InvalidGrant => Error::InvalidGrant { reason },
			TokenErrorKind::InvalidClient => Error::InvalidClient { reason },
			TokenErrorKind::InsufficientScope => Error::InsufficientScope { reason },
			TokenErrorKind::Transient =>
				TransientError::TokenEndpoint { message: reason, status: self.status }.into(),
		}
	}
}

fn kind_of_code(code: &str) -> Option<TokenErrorKind> {
	KNOWN_CODES.iter().find(|(known, _)| code.eq_ignore_ascii_case(known)).map(|(_, kind)| *kind)
}

fn kind_in_text(text: &str) -> Option<TokenErrorKind> {
	let lowered = text.to_ascii_lowercase();

	KNOWN_CODES.iter().find(|(known, _)| lowered.contains(known)).map(|(_, kind)| *kind)
}

fn kind_of_status(status: Option<u16>) -> TokenErrorKind {
	match status {
		Some(400) => TokenErrorKind::InvalidGrant,
		Some(401) => TokenErrorKind::InvalidClient,
		Some(403) => TokenErrorKind::InsufficientScope,
		_ => TokenErrorKind::Transient,
	}
}
