//! Runs a reporting client that posts `Hello, World!` to the collector in a loop.
//!
//! Settings come from `TEST_URI`, `TEST_REFRESH`, `TOKEN_FILE`, `SLEEP`, and `LOG_FILE`. Copy
//! the token file to a second directory and start another reporter there to watch both copies
//! land on the same collector row.

// std
use std::{fs::OpenOptions, sync::Mutex};
// crates.io
use color_eyre::Result;
use tracing_subscriber::EnvFilter;
// self
use erf_ledger::{client::ErfClient, config::ReporterConfig, http::Reporter};

const OPERATION: &str = "Hello, World!";

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = ReporterConfig::from_env()?;
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

	match &config.log_file {
		Some(path) => {
			let file = OpenOptions::new().create(true).append(true).open(path)?;

			tracing_subscriber::fmt()
				.with_env_filter(filter)
				.with_ansi(false)
				.with_writer(Mutex::new(file))
				.init();
		},
		None =>
			tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init(),
	}

	let client = ErfClient::open(&config.token_file, config.refresh_interval)?;
	let reporter = Reporter::new(config.collector.clone())?;

	tracing::info!(
		client_id = %client.client_id(),
		collector = %reporter.endpoint(),
		"reporter started"
	);

	loop {
		let token = client.token()?;
		let counter = token.decode()?.counter;

		match reporter.report(&token, OPERATION).await {
			Ok(()) => tracing::info!(client_id = %client.client_id(), counter, "reported"),
			Err(e) => {
				tracing::warn!(client_id = %client.client_id(), counter, error = %e, "report failed")
			},
		}

		tokio::select! {
			_ = tokio::time::sleep(config.pause) => {},
			_ = tokio::signal::ctrl_c() => break,
		}
	}

	Ok(())
}
