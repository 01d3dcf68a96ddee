//! The `client_credentials` exchange on the wire.
//!
//! The form is posted with `client_secret_post` authentication. The response body is
//! decoded here rather than through `oauth2`'s typed client: any JSON body carrying an
//! `access_token` string yields a token, whatever its status, content type, or other fields.

pub use oauth2;

// crates.io
use oauth2::{
	HttpClientError, HttpRequest, HttpResponse,
	http::{Method, header},
};
use serde::Deserializer;
use serde_json::Value;
use url::form_urlencoded::Serializer as FormSerializer;
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ScopeSet, Secret},
	error::{ConfigError, TransientError, TransportError},
	provider::TokenErrorContext,
};

/// Assembles the token request: `grant_type`, `client_id`, `client_secret`, then `scope`
/// when one is configured.
pub fn client_credentials_request(
	token_endpoint: &Url,
	client_id: &str,
	client_secret: &Secret,
	scope: &ScopeSet,
) -> Result<HttpRequest, ConfigError> {
	let mut form = FormSerializer::new(String::new());

	form.append_pair("grant_type", "client_credentials")
		.append_pair("client_id", client_id)
		.append_pair("client_secret", client_secret.expose());

	if !scope.is_empty() {
		form.append_pair("scope", scope.normalized());
	}

	let request = oauth2::http::Request::builder()
		.method(Method::POST)
		.uri(token_endpoint.as_str())
		.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
		.header(header::ACCEPT, "application/json")
		.body(form.finish().into_bytes())?;

	Ok(request)
}

/// Turns a token endpoint response into an [`AccessToken`].
///
/// A body that is not a JSON object fails with [`TransientError::TokenResponseParse`]. A
/// JSON body without `access_token` is classified through [`TokenErrorContext`]. Both
/// failures log the raw body.
pub fn read_token_response(response: &HttpResponse) -> Result<AccessToken> {
	let status = response.status().as_u16();
	let body = response.body();
	let mut de = serde_json::Deserializer::from_slice(body);
	let fields: TokenEndpointBody = serde_path_to_error::deserialize(&mut de).map_err(|source| {
		tracing::error!(
			status,
			body = %crate::obs::body_preview(body),
			"Error getting token."
		);

		TransientError::TokenResponseParse { source, status: Some(status) }
	})?;

	if let Some(secret) = fields.access_token {
		let mut token = AccessToken::new(secret, fields.token_type);

		if let Some(seconds) = fields.expires_in.as_ref().and_then(expires_in_seconds) {
			token = token.with_expires_in(Duration::seconds(seconds));
		}

		return Ok(token);
	}

	tracing::error!(status, body = %crate::obs::body_preview(body), "Error getting token.");

	let mut ctx = TokenErrorContext::default().with_status(status).with_body(body);

	if let Some(error) = fields.error {
		ctx = ctx.with_oauth_error(error);
	}
	if let Some(description) = fields.error_description {
		ctx = ctx.with_error_description(description);
	}

	Err(ctx.into_error())
}

/// Maps a failure to obtain any response from the token endpoint.
pub fn map_transport_error<E>(error: HttpClientError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	tracing::error!(error = %error, "Token endpoint could not be reached.");

	match error {
		HttpClientError::Reqwest(inner) => TransportError::network(*inner).into(),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		other => TransientError::TokenEndpoint { message: other.to_string(), status: None }.into(),
	}
}

/// The parts of a token endpoint body the relay looks at.
///
/// Every field is optional and tolerant of unexpected JSON types so that only a body that
/// is not a JSON object at all fails to decode.
#[derive(Debug, Deserialize)]
struct TokenEndpointBody {
	#[serde(default, deserialize_with = "string_or_none")]
	access_token: Option<String>,
	#[serde(default, deserialize_with = "string_or_none")]
	token_type: Option<String>,
	#[serde(default)]
	expires_in: Option<Value>,
	#[serde(default, deserialize_with = "string_or_none")]
	error: Option<String>,
	#[serde(default, deserialize_with = "string_or_none")]
	error_description: Option<String>,
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match Value::deserialize(deserializer)? {
		Value::String(value) => Some(value),
		_ => None,
	})
}

// Entra ID sends a number; older endpoints send a numeric string.
fn expires_in_seconds(value: &Value) -> Option<i64> {
	let seconds = match value {
		Value::Number(number) => number.as_i64()?,
		Value::String(text) => text.trim().parse().ok()?,
		_ => return None,
	};

	(seconds >= 0).then_some(seconds)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn response(status: u16, content_type: &str, body: &str) -> HttpResponse {
		let mut response = HttpResponse::new(body.as_bytes().to_vec());

		*response.status_mut() =
			oauth2::http::StatusCode::from_u16(status).expect("Status fixture should be valid.");
		response.headers_mut().insert(
			header::CONTENT_TYPE,
			content_type.parse().expect("Content type fixture should be valid."),
		);

		response
	}

	#[test]
	fn form_carries_credentials_and_scope() {
		let endpoint = Url::parse("https://login.microsoftonline.com/contoso/oauth2/v2.0/token")
			.expect("Endpoint should parse.");
		let scope = ScopeSet::from_str("https://graph.microsoft.com/.default")
			.expect("Scope should parse.");
		let request =
			client_credentials_request(&endpoint, "relay client", &Secret::new("s&cret"), &scope)
				.expect("Request should build.");

		assert_eq!(request.method(), Method::POST);
		assert_eq!(request.uri().to_string(), endpoint.as_str());
		assert_eq!(
			String::from_utf8_lossy(request.body()),
			"grant_type=client_credentials&client_id=relay+client&client_secret=s%26cret&scope=https%3A%2F%2Fgraph.microsoft.com%2F.default",
		);
	}

	#[test]
	fn empty_scope_is_left_out_of_the_form() {
		let endpoint = Url::parse("https://login.example.com/t/oauth2/v2.0/token")
			.expect("Endpoint should parse.");
		let request =
			client_credentials_request(&endpoint, "id", &Secret::new("s"), &ScopeSet::default())
				.expect("Request should build.");

		assert!(!String::from_utf8_lossy(request.body()).contains("scope="));
	}

	#[test]
	fn access_token_alone_is_enough() {
		let token = read_token_response(&response(200, "application/json", "{\"access_token\":\"abc\"}"))
			.expect("A body with only access_token should yield a token.");

		assert_eq!(token.bearer(), "Bearer abc");
		assert!(token.expires_at.is_none());
	}

	#[test]
	fn content_type_is_not_enforced() {
		let token = read_token_response(&response(
			200,
			"text/plain",
			"{\"access_token\":\"abc\",\"token_type\":\"Bearer\",\"expires_in\":\"3599\"}",
		))
		.expect("A text/plain token body should still yield a token.");

		assert_eq!(token.expires_at, Some(token.issued_at + Duration::seconds(3599)));
	}

	#[test]
	fn non_json_body_is_a_parse_failure() {
		let err = read_token_response(&response(502, "text/html", "<html>Bad Gateway</html>"))
			.expect_err("HTML must not yield a token.");

		assert!(matches!(
			err,
			Error::Transient(TransientError::TokenResponseParse { status: Some(502), .. })
		));
	}

	#[test]
	fn oauth_error_body_is_classified() {
		let err = read_token_response(&response(
			400,
			"application/json",
			"{\"error\":\"invalid_scope\",\"error_description\":\"AADSTS70011: The provided value for scope is not valid.\"}",
		))
		.expect_err("An OAuth error body must not yield a token.");

		assert!(matches!(err, Error::InsufficientScope { .. }));
	}
}
