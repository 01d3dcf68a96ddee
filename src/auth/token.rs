//! Access token issued by the client-credentials exchange.

// self
use crate::{_prelude::*, auth::Secret};

/// Token type assumed when the provider omits `token_type`.
pub const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// Access token obtained for a single relay request.
///
/// Tokens are used once and dropped. `expires_at` is only written to logs.
#[derive(Clone)]
pub struct AccessToken {
	/// Bearer secret; callers must avoid logging it.
	pub secret: Secret,
	/// Token type reported by the provider, [`DEFAULT_TOKEN_TYPE`] when absent.
	pub token_type: String,
	/// Instant the relay received the token.
	pub issued_at: OffsetDateTime,
	/// Expiry derived from `expires_in`, when the provider reported one.
	pub expires_at: Option<OffsetDateTime>,
}
impl AccessToken {
	/// Creates a token received now.
	pub fn new(secret: impl Into<String>, token_type: Option<String>) -> Self {
		Self {
			secret: Secret::new(secret),
			token_type: token_type.unwrap_or_else(|| DEFAULT_TOKEN_TYPE.into()),
			issued_at: OffsetDateTime::now_utc(),
			expires_at: None,
		}
	}

	/// Records the provider-reported lifetime.
	pub fn with_expires_in(mut self, expires_in: Duration) -> Self {
		self.expires_at = Some(self.issued_at + expires_in);

		self
	}

	/// Value for the Graph `Authorization` header.
	///
	/// Graph only accepts bearer tokens, whatever `token_type` says.
	pub fn bearer(&self) -> String {
		format!("Bearer {}", self.secret.expose())
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessToken")
			.field("secret", &self.secret)
			.field("token_type", &self.token_type)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn bearer_header_and_redaction() {
		let token = AccessToken::new("eyJ0eXAi", None);

		assert_eq!(token.bearer(), "Bearer eyJ0eXAi");
		assert_eq!(token.token_type, DEFAULT_TOKEN_TYPE);
		assert!(!format!("{token:?}").contains("eyJ0eXAi"));
	}

	#[test]
	fn expiry_is_relative_to_receipt() {
		let token = AccessToken::new("t", Some("bearer".into())).with_expires_in(Duration::seconds(3599));

		assert_eq!(token.expires_at, Some(token.issued_at + Duration::seconds(3599)));
		assert_eq!(token.token_type, "bearer");
	}
}
