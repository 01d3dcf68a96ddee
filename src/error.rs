//! Error types shared by configuration, the token provider, and the Graph client.

// self
use crate::_prelude::*;

/// Result alias defaulting to the relay [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Everything that can stop the relay from producing a course list.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Bad or incomplete settings.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// The token endpoint answered, but not with a token.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// The token endpoint could not be reached.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// The list items request failed.
	#[error(transparent)]
	Graph(#[from] GraphError),

	/// The application may not obtain the requested scope.
	#[error("Scope was refused: {reason}.")]
	InsufficientScope {
		/// Refusal reported by the identity platform.
		reason: String,
	},
	/// The identity platform refused the grant.
	#[error("Grant was refused: {reason}.")]
	InvalidGrant {
		/// Refusal reported by the identity platform.
		reason: String,
	},
	/// Client id or secret were not accepted.
	#[error("Client credentials were refused: {reason}.")]
	InvalidClient {
		/// Refusal reported by the identity platform.
		reason: String,
	},
}

/// Startup settings that cannot be used, or requests that cannot be assembled from them.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// reqwest refused the client configuration.
	#[error("Outbound HTTP client could not be built.")]
	HttpClientBuild(#[source] BoxError),
	/// The token request could not be assembled.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Environment could not be read into the expected shape.
	#[error("Configuration could not be loaded.")]
	Load(#[from] config::ConfigError),
	/// A URL setting does not parse.
	#[error("The {name} setting is not a valid URL.")]
	InvalidUrl {
		/// Environment variable name.
		name: &'static str,
		/// Parser failure.
		#[source]
		source: url::ParseError,
	},
	/// A URL setting cannot carry path segments.
	#[error("The {name} setting cannot be used as a base URL: {url}.")]
	CannotBeABase {
		/// Environment variable name.
		name: &'static str,
		/// Rejected URL.
		url: String,
	},
	/// Plain HTTP to anything but a loopback host.
	#[error("The {name} setting must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Environment variable name.
		name: &'static str,
		/// Rejected URL.
		url: String,
	},
	/// `LISTEN_ADDR` is not a socket address.
	#[error("Listen address is invalid: {value}.")]
	InvalidListenAddr {
		/// Rejected value.
		value: String,
	},
	/// `HTTP_TIMEOUT_SECS` is zero.
	#[error("The HTTP timeout must be greater than zero.")]
	ZeroTimeout,
	/// Only one of `AUTH_USERNAME` and `AUTH_PASSWORD` is set.
	#[error("Basic auth requires both AUTH_USERNAME and AUTH_PASSWORD.")]
	IncompleteBasicAuth,
	/// Tenant, site, or list identifier refused.
	#[error(transparent)]
	InvalidIdentifier(#[from] crate::auth::IdentifierError),
	/// `SCOPE` refused.
	#[error("The SCOPE setting is invalid.")]
	InvalidScope(#[from] crate::auth::ScopeValidationError),
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::HttpClientBuild(Box::new(e))
	}
}

/// Token endpoint responses that carried no usable token.
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// A response without `access_token` that names no recognizable refusal.
	#[error("Token endpoint did not issue a token: {message}.")]
	TokenEndpoint {
		/// Refusal text, or a summary of the response.
		message: String,
		/// HTTP status, when a response arrived.
		status: Option<u16>,
	},
	/// The body is not a JSON object.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponseParse {
		/// Decoder failure with the JSON path it stopped at.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status of the response.
		status: Option<u16>,
	},
}
impl TransientError {
	/// HTTP status of the token endpoint response, if one arrived.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::TokenEndpoint { status, .. } | Self::TokenResponseParse { status, .. } => *status,
		}
	}
}

/// No response arrived from the token endpoint.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Connection, TLS, timeout, or body read failure.
	#[error("Token endpoint could not be reached.")]
	Network {
		/// Transport failure.
		#[source]
		source: BoxError,
	},
	/// Local I/O failure while sending.
	#[error("I/O failed while calling the token endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Boxes a transport-specific failure.
	pub fn network(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { source: Box::new(src) }
	}
}

/// Failures raised while fetching list items from Microsoft Graph.
#[derive(Debug, ThisError)]
pub enum GraphError {
	/// Graph answered with a status other than 200.
	#[error("Graph returned HTTP {status} for the list items request.")]
	UpstreamStatus {
		/// Status code to forward to the caller.
		status: u16,
	},
	/// Graph could not be reached or the body could not be read.
	#[error("Network error occurred while calling Graph.")]
	Network(#[source] ReqwestError),
	/// Graph answered 200 with a body that is not a list items page.
	#[error("Graph returned a malformed list items page.")]
	Parse(#[source] serde_path_to_error::Error<serde_json::Error>),
}
impl From<ReqwestError> for GraphError {
	fn from(e: ReqwestError) -> Self {
		Self::Network(e)
	}
}
