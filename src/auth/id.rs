//! Strongly typed identifiers for the tenant, site, and list the relay is wired to.
//!
//! Each identifier ends up as a URL path segment, so validation rejects anything that
//! would change the shape of the request path.

// self
use crate::_prelude::*;

// Graph site ids concatenate a hostname with two GUIDs.
const IDENTIFIER_MAX_LEN: usize = 256;

macro_rules! path_segment_id {
	($name:ident, $kind:literal, $doc:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, Hash)]
		pub struct $name(Arc<str>);
		impl $name {
			/// Validates `value` and wraps it.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let value = value.as_ref();

				check_segment($kind, value)?;

				Ok(Self(Arc::from(value)))
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, "{}({})", $kind, self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
	};
}

path_segment_id! { TenantId, "Tenant", "Directory (tenant) hosting the application registration." }
path_segment_id! { SiteId, "Site", "SharePoint site as addressed by Graph." }
path_segment_id! { ListId, "List", "SharePoint list, either a GUID or its display name." }

/// Why an identifier was refused.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum IdentifierError {
	/// Nothing was configured.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Identifier kind (`Tenant`, `Site`, `List`).
		kind: &'static str,
	},
	/// Whitespace anywhere in the value.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Identifier kind (`Tenant`, `Site`, `List`).
		kind: &'static str,
	},
	/// A `/` or `\` would split the path segment.
	#[error("{kind} identifier contains a path separator.")]
	ContainsSeparator {
		/// Identifier kind (`Tenant`, `Site`, `List`).
		kind: &'static str,
	},
	/// Longer than any identifier Graph hands out.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Identifier kind (`Tenant`, `Site`, `List`).
		kind: &'static str,
		/// Maximum accepted length.
		max: usize,
	},
}

fn check_segment(kind: &'static str, value: &str) -> Result<(), IdentifierError> {
	match value {
		"" => Err(IdentifierError::Empty { kind }),
		v if v.chars().any(char::is_whitespace) => Err(IdentifierError::ContainsWhitespace { kind }),
		v if v.contains(['/', '\\']) => Err(IdentifierError::ContainsSeparator { kind }),
		v if v.len() > IDENTIFIER_MAX_LEN =>
			Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN }),
		_ => Ok(()),
	}
}
