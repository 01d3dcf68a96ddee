//! Outbound HTTP clients.
//!
//! The token exchange goes through [`TokenHttpClient`] so tests can script the identity
//! platform without a socket. Graph is called with a plain [`ReqwestClient`] built by
//! [`graph_client`].

// std
use std::time::Duration as StdDuration;
// crates.io
use oauth2::{HttpClientError, HttpRequest, HttpResponse};
// self
use crate::{_prelude::*, error::ConfigError};

/// Future returned by [`TokenHttpClient::send`].
pub type TokenHttpFuture<'a, E> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, HttpClientError<E>>> + 'a + Send>>;

/// Transport used to post the client-credentials form.
///
/// Implementations return every HTTP response, whatever its status or content type. Only
/// failures to obtain a response at all are errors.
pub trait TokenHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Error raised by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Sends `request` and buffers the full response body.
	fn send(&self, request: HttpRequest) -> TokenHttpFuture<'_, Self::TransportError>;
}

/// reqwest transport for the token endpoint.
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(ReqwestClient);
impl ReqwestHttpClient {
	/// Builds a client bounded by `timeout` that never follows redirects.
	///
	/// Client secrets travel in the request body, so a redirect from the token endpoint is
	/// reported instead of replayed.
	pub fn with_timeout(timeout: StdDuration) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.timeout(timeout)
			.redirect(reqwest::redirect::Policy::none())
			.build()?;

		Ok(Self(client))
	}
}
impl TokenHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn send(&self, request: HttpRequest) -> TokenHttpFuture<'_, Self::TransportError> {
		Box::pin(async move {
			let response = self.0.execute(request.try_into().map_err(Box::new)?).await.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let body = response.bytes().await.map_err(Box::new)?;
			let mut buffered = HttpResponse::new(body.to_vec());

			*buffered.status_mut() = status;
			*buffered.headers_mut() = headers;

			Ok(buffered)
		})
	}
}

/// Builds the Graph client: bounded by `timeout`, following reqwest's default redirect
/// policy (at most ten hops).
///
/// reqwest drops the `Authorization` header when a redirect leaves the original host.
pub fn graph_client(timeout: StdDuration) -> Result<ReqwestClient, ConfigError> {
	Ok(ReqwestClient::builder().timeout(timeout).build()?)
}
