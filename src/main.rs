//! Courses relay server binary.

// std
use std::sync::Arc;
// crates.io
use color_eyre::{Result, eyre::WrapErr};
use tokio::net::TcpListener;
// self
use courses_relay::{
	config::RelayConfig,
	obs,
	relay::{self, RelayState},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;
	obs::init_tracing();

	let config = RelayConfig::from_env().wrap_err("Failed to load relay configuration.")?;
	let state = RelayState::from_config(&config).wrap_err("Failed to build relay state.")?;
	let listener = TcpListener::bind(config.listen_addr)
		.await
		.wrap_err_with(|| format!("Failed to bind {}.", config.listen_addr))?;

	relay::serve(listener, Arc::new(state)).await.wrap_err("Relay server failed.")?;

	Ok(())
}
