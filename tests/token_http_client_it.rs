// self
use courses_relay::{
	_preludet::*,
	auth::{ScopeSet, Secret, TenantId},
	error::{TransientError, TransportError},
	http::{TokenHttpClient, TokenHttpFuture},
	oauth::oauth2::{
		HttpClientError, HttpRequest, HttpResponse,
		http::{StatusCode, header},
	},
	provider::ProviderDescriptor,
	token::TokenProvider,
};

#[derive(Debug)]
struct IdentityPlatformDown;
impl Display for IdentityPlatformDown {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("Identity platform unavailable.")
	}
}
impl StdError for IdentityPlatformDown {}

/// Answers every token request with a canned response, or with a transport failure.
enum ScriptedIdentityPlatform {
	Respond { status: u16, content_type: &'static str, body: &'static str },
	Unreachable,
}
impl TokenHttpClient for ScriptedIdentityPlatform {
	type TransportError = IdentityPlatformDown;

	fn send(&self, request: HttpRequest) -> TokenHttpFuture<'_, Self::TransportError> {
		Box::pin(async move {
			assert_eq!(request.uri().path(), "/contoso/oauth2/v2.0/token");
			assert_eq!(
				request.headers().get(header::CONTENT_TYPE).and_then(|value| value.to_str().ok()),
				Some("application/x-www-form-urlencoded"),
			);

			let form = String::from_utf8_lossy(request.body()).into_owned();

			assert!(form.contains("grant_type=client_credentials"));
			assert!(form.contains("client_id=fake-client"));
			assert!(form.contains("client_secret=fake-secret"));

			match self {
				Self::Respond { status, content_type, body } => {
					let mut response = HttpResponse::new(body.as_bytes().to_vec());

					*response.status_mut() =
						StatusCode::from_u16(*status).expect("Scripted status should be valid.");
					response.headers_mut().insert(
						header::CONTENT_TYPE,
						content_type.parse().expect("Scripted content type should be valid."),
					);

					Ok(response)
				},
				Self::Unreachable => Err(HttpClientError::Reqwest(Box::new(IdentityPlatformDown))),
			}
		})
	}
}

fn build_provider(platform: ScriptedIdentityPlatform) -> TokenProvider<ScriptedIdentityPlatform> {
	let authority =
		Url::parse("https://login.example.com").expect("Fake authority URL should parse.");
	let tenant = TenantId::new("contoso").expect("Fake tenant should be valid.");

	TokenProvider::with_http_client(
		ProviderDescriptor::microsoft_identity(&authority, &tenant)
			.expect("Fake descriptor should build."),
		"fake-client",
		Secret::new("fake-secret"),
		ScopeSet::new(["https://graph.microsoft.com/.default"])
			.expect("Fake scope set should be valid."),
		platform,
	)
}

#[tokio::test]
async fn plain_text_token_body_is_accepted() {
	let provider = build_provider(ScriptedIdentityPlatform::Respond {
		status: 200,
		content_type: "text/plain; charset=utf-8",
		body: "{\"access_token\":\"graph-token\",\"token_type\":\"Bearer\",\"expires_in\":3599}",
	});
	let token = provider
		.client_credentials()
		.await
		.expect("The content type of a token body must not matter.");

	assert_eq!(token.bearer(), "Bearer graph-token");
	assert!(token.expires_at.is_some());
}

#[tokio::test]
async fn transport_failure_is_a_transport_error() {
	let provider = build_provider(ScriptedIdentityPlatform::Unreachable);
	let err = provider
		.client_credentials()
		.await
		.expect_err("Exchange should fail when no response arrives.");

	match err {
		Error::Transport(TransportError::Network { source }) =>
			assert_eq!(source.to_string(), "Identity platform unavailable."),
		other => panic!("Unexpected error variant: {other:?}."),
	}
}

#[tokio::test]
async fn service_unavailable_keeps_the_status() {
	let provider = build_provider(ScriptedIdentityPlatform::Respond {
		status: 503,
		content_type: "application/json",
		body: "{\"error\":\"temporarily_unavailable\",\"error_description\":\"AADSTS90033: service unavailable\"}",
	});
	let err = provider
		.client_credentials()
		.await
		.expect_err("A refusal without access_token must fail the exchange.");

	match err {
		Error::Transient(TransientError::TokenEndpoint { status, message }) => {
			assert_eq!(status, Some(503));
			assert!(message.contains("AADSTS90033"));
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
}
