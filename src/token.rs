//! Token provider: trades the static client credentials for a Graph bearer token.
//!
//! Every call performs a fresh `client_credentials` exchange. Nothing is cached between
//! calls, so a failure on one request never affects the next.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ScopeSet, Secret},
	http::{ReqwestHttpClient, TokenHttpClient},
	oauth,
	obs::{self, Outcome, Stage, StageSpan},
	provider::ProviderDescriptor,
};

/// Token provider backed by reqwest.
pub type ReqwestTokenProvider = TokenProvider<ReqwestHttpClient>;

/// Issues client-credentials exchanges against one token endpoint.
#[derive(Clone)]
pub struct TokenProvider<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Transport used for every exchange.
	pub http_client: Arc<C>,
	/// Token endpoint.
	pub descriptor: ProviderDescriptor,
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// Client secret sent with every exchange.
	pub client_secret: Secret,
	/// Scopes requested for every token.
	pub scope: ScopeSet,
}
impl<C> TokenProvider<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Creates a provider on top of any [`TokenHttpClient`].
	pub fn with_http_client(
		descriptor: ProviderDescriptor,
		client_id: impl Into<String>,
		client_secret: Secret,
		scope: ScopeSet,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self { http_client: http_client.into(), descriptor, client_id: client_id.into(), client_secret, scope }
	}

	/// Performs one `client_credentials` exchange.
	///
	/// Any response body carrying `access_token` yields a token. Everything else is an
	/// error, and the raw body has already been logged when this returns `Err`.
	pub async fn client_credentials(&self) -> Result<AccessToken> {
		const STAGE: Stage = Stage::TokenExchange;

		let span = StageSpan::new(STAGE, "client_credentials");

		obs::record_stage_outcome(STAGE, Outcome::Attempt);

		let result = span
			.instrument(async move {
				let request = oauth::client_credentials_request(
					&self.descriptor.token_endpoint,
					&self.client_id,
					&self.client_secret,
					&self.scope,
				)?;
				let response =
					self.http_client.send(request).await.map_err(oauth::map_transport_error)?;
				let token = oauth::read_token_response(&response)?;

				tracing::debug!(
					token_type = %token.token_type,
					expires_at = ?token.expires_at,
					"Obtained access token."
				);

				Ok::<_, Error>(token)
			})
			.await;

		match &result {
			Ok(_) => obs::record_stage_outcome(STAGE, Outcome::Success),
			Err(_) => obs::record_stage_outcome(STAGE, Outcome::Failure),
		}

		result
	}
}
impl ReqwestTokenProvider {
	/// Creates a provider backed by the given reqwest client.
	pub fn new(
		descriptor: ProviderDescriptor,
		client_id: impl Into<String>,
		client_secret: Secret,
		scope: ScopeSet,
		http_client: ReqwestHttpClient,
	) -> Self {
		Self::with_http_client(descriptor, client_id, client_secret, scope, http_client)
	}
}
impl<C> Debug for TokenProvider<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenProvider")
			.field("token_endpoint", &self.descriptor.token_endpoint.as_str())
			.field("client_id", &self.client_id)
			.field("scope", &self.scope)
			.finish()
	}
}
