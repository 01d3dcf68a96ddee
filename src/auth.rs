//! Auth-domain identifiers, scope sets, secrets, token models, and basic-auth credentials.

pub mod basic;
pub mod id;
pub mod scope;
pub mod secret;
pub mod token;

pub use basic::*;
pub use id::*;
pub use scope::*;
pub use secret::*;
pub use token::*;
