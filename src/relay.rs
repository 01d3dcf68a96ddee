//! Inbound HTTP surface: router, shared state, and server loop.
//!
//! `GET /get-courses-data` runs token exchange, list fetch, and projection for every call.
//! When basic-auth credentials are configured the route sits behind [`require_basic_auth`].

pub mod failure;
pub mod guard;
pub mod handler;

pub use failure::*;
pub use guard::*;
pub use handler::*;

// crates.io
use axum::{Router, middleware, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
// self
use crate::{
	_prelude::*,
	auth::BasicCredentials,
	config::RelayConfig,
	error::ConfigError,
	graph::ListClient,
	http::{self, ReqwestHttpClient},
	token::ReqwestTokenProvider,
};

/// Path serving the filtered course list.
pub const COURSES_PATH: &str = "/get-courses-data";

/// Immutable state shared by every request.
#[derive(Debug)]
pub struct RelayState {
	/// Issues a fresh Graph token per request.
	pub tokens: ReqwestTokenProvider,
	/// Reads the course list.
	pub list: ListClient,
	/// Expected inbound credentials; `None` disables the guard.
	pub basic_auth: Option<BasicCredentials>,
}
impl RelayState {
	/// Wires the token provider and list client from validated configuration.
	///
	/// Both outbound clients are bounded by the configured timeout. Only the Graph client
	/// follows redirects.
	pub fn from_config(config: &RelayConfig) -> Result<Self, ConfigError> {
		let tokens = ReqwestTokenProvider::new(
			config.provider_descriptor()?,
			config.client_id.clone(),
			config.client_secret.clone(),
			config.scope.clone(),
			ReqwestHttpClient::with_timeout(config.http_timeout)?,
		);
		let list = ListClient::new(
			http::graph_client(config.http_timeout)?,
			&config.graph_base_url,
			&config.site_id,
			&config.list_id,
		)?;

		Ok(Self { tokens, list, basic_auth: config.basic_auth.clone() })
	}
}

/// Builds the relay router.
pub fn router(state: Arc<RelayState>) -> Router {
	let mut courses = get(get_courses);

	if state.basic_auth.is_some() {
		courses =
			courses.route_layer(middleware::from_fn_with_state(state.clone(), require_basic_auth));
	}

	Router::new()
		.route("/", get(liveness))
		.route(COURSES_PATH, courses)
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}

/// Serves the relay on `listener` until Ctrl-C or SIGTERM.
pub async fn serve(listener: TcpListener, state: Arc<RelayState>) -> std::io::Result<()> {
	if let Ok(addr) = listener.local_addr() {
		tracing::info!(%addr, guarded = state.basic_auth.is_some(), "Relay listening.");
	}

	axum::serve(listener, router(state)).with_graceful_shutdown(shutdown_signal()).await?;

	tracing::info!("Relay stopped.");

	Ok(())
}

async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(e) = tokio::signal::ctrl_c().await {
			tracing::warn!(error = %e, "Failed to listen for Ctrl-C.");

			std::future::pending::<()>().await;
		}
	};
	#[cfg(unix)]
	let terminate = async {
		match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
			Ok(mut signal) => {
				signal.recv().await;
			},
			Err(e) => {
				tracing::warn!(error = %e, "Failed to listen for SIGTERM.");

				std::future::pending::<()>().await;
			},
		}
	};
	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}

	tracing::info!("Shutdown signal received.");
}
