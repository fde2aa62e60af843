//! Environment-driven settings for the reporter and collector processes.
//!
//! Both loaders accept a lookup function so tests can supply variables without touching the
//! process environment.

// std
use std::{env, path::PathBuf, time::Duration as StdDuration};
// self
use crate::{_prelude::*, error::ConfigError};

/// Collector endpoint variable.
pub const URI_KEY: &str = "TEST_URI";
/// Refresh interval (seconds) variable.
pub const REFRESH_KEY: &str = "TEST_REFRESH";
/// Token file path variable.
pub const TOKEN_FILE_KEY: &str = "TOKEN_FILE";
/// Log file path variable.
pub const LOG_FILE_KEY: &str = "LOG_FILE";
/// Pause between reports (seconds) variable.
pub const SLEEP_KEY: &str = "SLEEP";
/// Collector listen port variable.
pub const PORT_KEY: &str = "PORT";

/// Settings for a reporting client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReporterConfig {
	/// Collector endpoint that receives operations.
	pub collector: Url,
	/// Seconds between token rotations.
	pub refresh_interval: u64,
	/// Path of the persisted token state.
	pub token_file: PathBuf,
	/// Optional log destination; `None` logs to stderr.
	pub log_file: Option<PathBuf>,
	/// Pause between two reports.
	pub pause: StdDuration,
}
impl ReporterConfig {
	const DEFAULT_URI: &'static str = "http://localhost:8080";
	const DEFAULT_REFRESH: u64 = 5;
	const DEFAULT_TOKEN_FILE: &'static str = "tokenfile.txt";
	const DEFAULT_SLEEP: u64 = 1;

	/// Loads settings from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|key| env::var(key).ok())
	}

	/// Loads settings through `lookup`, falling back to defaults for unset variables.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let uri = lookup(URI_KEY).unwrap_or_else(|| Self::DEFAULT_URI.to_owned());
		let collector =
			Url::parse(&uri).map_err(|source| ConfigError::InvalidUrl { key: URI_KEY, source })?;

		Ok(Self {
			collector,
			refresh_interval: parse_number(&lookup, REFRESH_KEY, Self::DEFAULT_REFRESH)?,
			token_file: lookup(TOKEN_FILE_KEY)
				.map_or_else(|| PathBuf::from(Self::DEFAULT_TOKEN_FILE), PathBuf::from),
			log_file: lookup(LOG_FILE_KEY).map(PathBuf::from),
			pause: StdDuration::from_secs(parse_number(&lookup, SLEEP_KEY, Self::DEFAULT_SLEEP)?),
		})
	}
}

/// Settings for the collector process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollectorConfig {
	/// TCP port to listen on.
	pub port: u16,
}
impl CollectorConfig {
	const DEFAULT_PORT: u16 = 8080;

	/// Loads settings from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|key| env::var(key).ok())
	}

	/// Loads settings through `lookup`, falling back to defaults for unset variables.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		Ok(Self { port: parse_number(&lookup, PORT_KEY, Self::DEFAULT_PORT)? })
	}
}
impl Default for CollectorConfig {
	fn default() -> Self {
		Self { port: Self::DEFAULT_PORT }
	}
}

fn parse_number<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
	F: Fn(&str) -> Option<String>,
	T: FromStr,
{
	match lookup(key) {
		None => Ok(default),
		Some(value) =>
			value.trim().parse().map_err(|_| ConfigError::InvalidNumber { key, value }),
	}
}
