//! Microsoft Graph access for the SharePoint course list.
//!
//! [`ListClient`] issues the single list-items request and [`summarize`] turns the page into
//! the course summaries the relay serves.

pub mod client;
pub mod item;

pub use client::*;
pub use item::*;
