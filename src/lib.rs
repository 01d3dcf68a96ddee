//! Single-endpoint relay that trades OAuth 2.0 client credentials for a Microsoft Graph token,
//! reads a SharePoint course list, and serves the courses still inside their grace window as JSON.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod graph;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod provider;
pub mod relay;
pub mod token;
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports for integration tests.

	pub use crate::_prelude::*;
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
// Startup error reporting lives in the binary target.
use color_eyre as _;
#[cfg(test)] use {httpmock as _, tower as _};
