//! Storage contract and built-in backends for a lineage's [`TokenState`].

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, token::TokenState};

/// Single-writer persistence for one lineage.
///
/// A store holds at most one [`TokenState`]. Only the rotator that opened it writes to it;
/// copies made outside the process become independent lineages.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Loads the persisted state, returning `None` when nothing has been stored yet.
	fn load(&self) -> Result<Option<TokenState>, StoreError>;

	/// Replaces the persisted state. Either the whole state is written or nothing changes.
	fn save(&self, state: &TokenState) -> Result<(), StoreError>;
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// The stored bytes could not be (de)serialized or failed validation.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure (I/O, permissions, disk full).
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
