//! Crate-level error types shared by rotators, the ledger, and the transport boundary.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Persisted token state could not be read or written.
	#[error("{0}")]
	StoreUnavailable(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// A presented token could not be decoded.
	#[error("Malformed token: {0}")]
	MalformedToken(
		#[from]
		#[source]
		crate::token::TokenDecodeError,
	),
	/// An append carried an empty operation label.
	#[error("Operation label cannot be empty.")]
	EmptyOperation,
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure between a reporter and the collector.
	#[error(transparent)]
	Transport(#[from] TransportError),
}
impl Error {
	/// Coarse classification of the error.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
			Self::MalformedToken(_) => ErrorKind::MalformedToken,
			Self::EmptyOperation => ErrorKind::InvalidInput,
			Self::Config(_) => ErrorKind::Config,
			Self::Transport(_) => ErrorKind::Transport,
		}
	}
}

/// Classification returned by [`Error::kind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// Persisted state is unreadable or unwritable; fatal to the rotator's caller.
	StoreUnavailable,
	/// The ledger rejected a token it could not decode.
	MalformedToken,
	/// The ledger rejected an append for another input reason.
	InvalidInput,
	/// Configuration could not be loaded.
	Config,
	/// The boundary transport failed.
	Transport,
}

/// Configuration failures raised while loading settings.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A numeric setting could not be parsed.
	#[error("Environment variable {key} must be a non-negative integer, got `{value}`.")]
	InvalidNumber {
		/// Variable name.
		key: &'static str,
		/// Raw value.
		value: String,
	},
	/// The collector endpoint is not a valid URL.
	#[error("Environment variable {key} is not a valid URL.")]
	InvalidUrl {
		/// Variable name.
		key: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Transport-level failures between a reporter and the collector.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the collector.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The collector answered with a non-success status.
	#[error("Collector responded with HTTP {status}: {message}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Response body, if any.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
