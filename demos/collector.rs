//! Runs the collector: `POST /` records operations, `GET /results` shows per-client counts.
//!
//! Listens on `PORT` (default 8080) until interrupted.

// std
use std::net::SocketAddr;
// crates.io
use color_eyre::Result;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
// self
use erf_ledger::{collector, config::CollectorConfig, ledger::Ledger};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
		.init();

	let config = CollectorConfig::from_env()?;
	let listener = TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], config.port))).await?;
	let ledger = Ledger::default();

	tracing::info!(addr = %listener.local_addr()?, "collector listening");

	collector::serve(listener, ledger.clone(), async {
		let _ = tokio::signal::ctrl_c().await;
	})
	.await?;

	let metrics = ledger.metrics();

	tracing::info!(
		clients = ledger.client_count(),
		appended = metrics.appended(),
		rejected = metrics.rejected(),
		"collector stopped"
	);

	Ok(())
}
