//! Process configuration sourced from the environment (and an optional `.env` file).

// std
use std::{collections::HashMap, net::SocketAddr, time::Duration as StdDuration};
// self
use crate::{
	_prelude::*,
	auth::{BasicCredentials, ListId, ScopeSet, Secret, SiteId, TenantId},
	error::ConfigError,
	provider::ProviderDescriptor,
};

/// Scope requested when `SCOPE` is unset.
pub const DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";
/// Identity platform authority used when `AUTHORITY_HOST` is unset.
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";
/// Graph root used when `GRAPH_BASE_URL` is unset.
pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com";
/// Bind address used when `LISTEN_ADDR` is unset.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:5000";
/// Outbound timeout used when `HTTP_TIMEOUT_SECS` is unset.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Validated relay configuration, built once at startup and shared read-only.
#[derive(Clone, Debug)]
pub struct RelayConfig {
	/// Directory tenant hosting the application registration.
	pub tenant_id: TenantId,
	/// Application (client) identifier.
	pub client_id: String,
	/// Application client secret.
	pub client_secret: Secret,
	/// SharePoint site holding the course list.
	pub site_id: SiteId,
	/// Course list identifier.
	pub list_id: ListId,
	/// Credentials required on inbound requests; `None` leaves the endpoint open.
	pub basic_auth: Option<BasicCredentials>,
	/// Scopes requested for the Graph token.
	pub scope: ScopeSet,
	/// Identity platform authority host.
	pub authority_host: Url,
	/// Graph API root.
	pub graph_base_url: Url,
	/// Socket address the HTTP server binds to.
	pub listen_addr: SocketAddr,
	/// Timeout applied to each outbound request.
	pub http_timeout: StdDuration,
}
impl RelayConfig {
	/// Loads `.env` (when present) and then reads the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		if let Ok(path) = dotenv::dotenv() {
			tracing::debug!(path = %path.display(), "Loaded environment file.");
		}

		Self::load(config::Environment::default())
	}

	/// Reads configuration from an explicit variable map instead of the process environment.
	pub fn from_source(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
		Self::load(config::Environment::default().source(Some(vars)))
	}

	/// Descriptor for the tenant's token endpoint.
	pub fn provider_descriptor(&self) -> Result<ProviderDescriptor, ConfigError> {
		ProviderDescriptor::microsoft_identity(&self.authority_host, &self.tenant_id)
	}

	fn load(source: config::Environment) -> Result<Self, ConfigError> {
		let raw: RawConfig =
			config::Config::builder().add_source(source).build()?.try_deserialize()?;

		raw.validate()
	}
}

/// Environment variables as read, before validation. Keys arrive lowercased.
#[derive(Debug, Deserialize)]
struct RawConfig {
	tenant_id: String,
	client_id: String,
	client_secret: String,
	site_id: String,
	list: String,
	auth_username: Option<String>,
	auth_password: Option<String>,
	scope: Option<String>,
	authority_host: Option<String>,
	graph_base_url: Option<String>,
	listen_addr: Option<String>,
	http_timeout_secs: Option<u64>,
}
impl RawConfig {
	fn validate(self) -> Result<RelayConfig, ConfigError> {
		let basic_auth = match (non_empty(self.auth_username), non_empty(self.auth_password)) {
			(Some(username), Some(password)) => Some(BasicCredentials::new(username, password)),
			(None, None) => None,
			_ => return Err(ConfigError::IncompleteBasicAuth),
		};
		let scope = ScopeSet::from_str(non_empty(self.scope).as_deref().unwrap_or(DEFAULT_SCOPE))?;
		let listen_value = self.listen_addr.unwrap_or_else(|| DEFAULT_LISTEN_ADDR.into());
		let listen_addr = listen_value
			.parse()
			.map_err(|_| ConfigError::InvalidListenAddr { value: listen_value.clone() })?;
		let http_timeout = match self.http_timeout_secs.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS) {
			0 => return Err(ConfigError::ZeroTimeout),
			secs => StdDuration::from_secs(secs),
		};

		Ok(RelayConfig {
			tenant_id: TenantId::new(self.tenant_id)?,
			client_id: self.client_id,
			client_secret: Secret::new(self.client_secret),
			site_id: SiteId::new(self.site_id)?,
			list_id: ListId::new(self.list)?,
			basic_auth,
			scope,
			authority_host: parse_endpoint(
				"AUTHORITY_HOST",
				self.authority_host.as_deref().unwrap_or(DEFAULT_AUTHORITY_HOST),
			)?,
			graph_base_url: parse_endpoint(
				"GRAPH_BASE_URL",
				self.graph_base_url.as_deref().unwrap_or(DEFAULT_GRAPH_BASE_URL),
			)?,
			listen_addr,
			http_timeout,
		})
	}
}

fn non_empty(value: Option<String>) -> Option<String> {
	value.filter(|value| !value.is_empty())
}

fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
		Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
		None => false,
	}
}

fn parse_endpoint(name: &'static str, value: &str) -> Result<Url, ConfigError> {
	let url = Url::parse(value).map_err(|source| ConfigError::InvalidUrl { name, source })?;

	if url.cannot_be_a_base() {
		return Err(ConfigError::CannotBeABase { name, url: url.to_string() });
	}

	match url.scheme() {
		"https" => Ok(url),
		"http" if is_loopback(&url) => Ok(url),
		_ => Err(ConfigError::InsecureEndpoint { name, url: url.to_string() }),
	}
}
