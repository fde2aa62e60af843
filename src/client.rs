//! Caller-facing facade over a file-backed [`Rotator`].

// std
use std::path::PathBuf;
// self
use crate::{
	_prelude::*,
	clock::Clock,
	rotator::Rotator,
	store::FileStore,
	token::{ClientId, Token},
};

/// Hands out the current token of a lineage persisted at a file path.
///
/// Rotation timing and persistence stay hidden; errors from the rotator propagate unchanged.
#[derive(Debug)]
pub struct ErfClient {
	rotator: Rotator<FileStore>,
}
impl ErfClient {
	/// Opens (or creates) the lineage stored at `path`, rotating every `refresh_interval`
	/// seconds.
	pub fn open(path: impl Into<PathBuf>, refresh_interval: u64) -> Result<Self> {
		let store = FileStore::open(path)?;

		Ok(Self { rotator: Rotator::open(store, refresh_interval)? })
	}

	/// Same as [`ErfClient::open`] with an injected clock.
	pub fn with_clock(
		path: impl Into<PathBuf>,
		refresh_interval: u64,
		clock: Arc<dyn Clock>,
	) -> Result<Self> {
		let store = FileStore::open(path)?;

		Ok(Self { rotator: Rotator::with_clock(store, refresh_interval, clock)? })
	}

	/// Returns the token to present on the next request.
	pub fn token(&self) -> Result<Token> {
		self.rotator.token()
	}

	/// Identity the collector will attribute this client's operations to.
	pub fn client_id(&self) -> ClientId {
		self.rotator.client_id()
	}
}
