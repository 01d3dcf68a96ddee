//! Static HTTP Basic credentials guarding the relay endpoint.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use sha2::{Digest, Sha256};
// self
use crate::{_prelude::*, auth::Secret};

/// Errors raised while reading an `Authorization: Basic` header.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum BasicAuthError {
	/// The header uses another scheme or carries no payload.
	#[error("Authorization header does not use the Basic scheme.")]
	NotBasic,
	/// The payload is not valid base64.
	#[error("Basic credentials are not valid base64.")]
	InvalidEncoding,
	/// The decoded payload is not UTF-8 or lacks the `:` separator.
	#[error("Basic credentials are malformed.")]
	Malformed,
}

/// Username/password pair compared verbatim against submitted credentials.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BasicCredentials {
	/// Expected username.
	pub username: String,
	/// Expected password.
	pub password: Secret,
}
impl BasicCredentials {
	/// Creates a credential pair.
	pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
		Self { username: username.into(), password: Secret::new(password) }
	}

	/// Parses the value of an `Authorization` header.
	pub fn from_header(value: &str) -> Result<Self, BasicAuthError> {
		let (scheme, payload) = value.trim().split_once(' ').ok_or(BasicAuthError::NotBasic)?;

		if !scheme.eq_ignore_ascii_case("basic") {
			return Err(BasicAuthError::NotBasic);
		}

		let decoded =
			STANDARD.decode(payload.trim()).map_err(|_| BasicAuthError::InvalidEncoding)?;
		let decoded = String::from_utf8(decoded).map_err(|_| BasicAuthError::Malformed)?;
		let (username, password) = decoded.split_once(':').ok_or(BasicAuthError::Malformed)?;

		Ok(Self::new(username, password))
	}

	/// Encodes the pair as an `Authorization` header value.
	pub fn to_header(&self) -> String {
		format!("Basic {}", STANDARD.encode(format!("{}:{}", self.username, self.password.expose())))
	}

	/// Returns true when both fields match exactly.
	///
	/// Fields are compared through their SHA-256 digests so the comparison does not stop at
	/// the first differing byte of the submitted value.
	pub fn matches(&self, submitted: &Self) -> bool {
		let username = digest(&self.username) == digest(&submitted.username);
		let password = digest(self.password.expose()) == digest(submitted.password.expose());

		username & password
	}
}

fn digest(value: &str) -> sha2::digest::Output<Sha256> {
	Sha256::digest(value.as_bytes())
}
