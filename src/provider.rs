//! Microsoft identity platform: where tokens come from and how refusals are read.

pub mod classify;

pub use classify::*;

// self
use crate::{_prelude::*, auth::TenantId, error::ConfigError};

/// Token endpoint of the tenant the relay authenticates against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderDescriptor {
	/// `<authority>/<tenant>/oauth2/v2.0/token`.
	pub token_endpoint: Url,
}
impl ProviderDescriptor {
	/// Describes the v2.0 token endpoint of `tenant` under `authority`.
	///
	/// A path already present on `authority` is kept as a prefix.
	pub fn microsoft_identity(authority: &Url, tenant: &TenantId) -> Result<Self, ConfigError> {
		let mut token_endpoint = authority.clone();

		token_endpoint
			.path_segments_mut()
			.map_err(|_| ConfigError::CannotBeABase {
				name: "AUTHORITY_HOST",
				url: authority.to_string(),
			})?
			.pop_if_empty()
			.extend([tenant.as_ref(), "oauth2", "v2.0", "token"]);

		Ok(Self { token_endpoint })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn tenant() -> TenantId {
		TenantId::new("contoso.onmicrosoft.com").expect("Tenant should be valid.")
	}

	#[test]
	fn token_endpoint_sits_under_the_tenant() {
		let authority =
			Url::parse("https://login.microsoftonline.com").expect("Authority URL should parse.");
		let descriptor = ProviderDescriptor::microsoft_identity(&authority, &tenant())
			.expect("Descriptor should build for the public authority.");

		assert_eq!(
			descriptor.token_endpoint.as_str(),
			"https://login.microsoftonline.com/contoso.onmicrosoft.com/oauth2/v2.0/token",
		);
	}

	#[test]
	fn authority_path_prefix_is_kept() {
		let authority =
			Url::parse("https://login.example.com/proxy/").expect("Authority URL should parse.");
		let descriptor = ProviderDescriptor::microsoft_identity(&authority, &tenant())
			.expect("Descriptor should build for a prefixed authority.");

		assert_eq!(
			descriptor.token_endpoint.path(),
			"/proxy/contoso.onmicrosoft.com/oauth2/v2.0/token",
		);
	}

	#[test]
	fn authority_must_accept_path_segments() {
		let authority = Url::parse("mailto:ops@example.com").expect("Mailto URL should parse.");
		let err = ProviderDescriptor::microsoft_identity(&authority, &tenant())
			.expect_err("An authority without a path cannot host the token endpoint.");

		assert!(matches!(err, ConfigError::CannotBeABase { name: "AUTHORITY_HOST", .. }));
	}
}
