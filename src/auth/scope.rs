//! The `scope` parameter sent with every token request.

// std
use std::collections::BTreeSet;
// self
use crate::_prelude::*;

/// Why a scope list was refused.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ScopeValidationError {
	/// A scope entry was empty, or the whole value was blank.
	#[error("Scope entries cannot be empty.")]
	Empty,
	/// An entry carried embedded whitespace.
	#[error("Scope contains whitespace: {scope}.")]
	ContainsWhitespace {
		/// The rejected entry.
		scope: String,
	},
}

/// Deduplicated, sorted scopes rendered as one space-delimited string.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ScopeSet(Arc<str>);
impl ScopeSet {
	/// Collects `scopes`, dropping duplicates.
	pub fn new<I, S>(scopes: I) -> Result<Self, ScopeValidationError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut unique = BTreeSet::new();

		for scope in scopes.into_iter().map(Into::into) {
			if scope.is_empty() {
				return Err(ScopeValidationError::Empty);
			}
			if scope.contains(char::is_whitespace) {
				return Err(ScopeValidationError::ContainsWhitespace { scope });
			}

			unique.insert(scope);
		}

		Ok(Self(Arc::from(unique.into_iter().collect::<Vec<_>>().join(" "))))
	}

	/// Returns true if no scope will be requested.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Value of the `scope` form field.
	pub fn normalized(&self) -> &str {
		&self.0
	}
}
impl Debug for ScopeSet {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ScopeSet").field(&&*self.0).finish()
	}
}
impl Display for ScopeSet {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for ScopeSet {
	type Err = ScopeValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"" => Ok(Self::default()),
			blank if blank.trim().is_empty() => Err(ScopeValidationError::Empty),
			listed => Self::new(listed.split_whitespace()),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn duplicates_collapse_and_order_is_stable() {
		let lhs = ScopeSet::new(["Sites.Read.All", "https://graph.microsoft.com/.default", "Sites.Read.All"])
			.expect("Left-hand scope set should be valid.");
		let rhs = ScopeSet::from_str("https://graph.microsoft.com/.default  Sites.Read.All")
			.expect("Right-hand scope string should parse.");

		assert_eq!(lhs, rhs);
		assert_eq!(lhs.normalized(), "Sites.Read.All https://graph.microsoft.com/.default");
	}

	#[test]
	fn blank_and_padded_entries_are_rejected() {
		let err = ScopeSet::new([" profile "]).expect_err("Padded scopes must be rejected.");

		assert!(matches!(err, ScopeValidationError::ContainsWhitespace { .. }));
		assert!(ScopeSet::from_str("").is_ok_and(|scope| scope.is_empty()));
		assert_eq!(ScopeSet::from_str("   "), Err(ScopeValidationError::Empty));
		assert!(ScopeSet::new([""]).is_err());
	}
}
