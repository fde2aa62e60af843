//! Thread-safe in-memory [`TokenStore`] for tests and embedded use.

// self
use crate::{
	_prelude::*,
	store::{StoreError, TokenStore},
	token::TokenState,
};

/// Keeps a lineage's state in-process.
///
/// Clones of a `MemoryStore` share one slot, like two handles to the same file. Use
/// [`MemoryStore::duplicate`] to simulate copying the persisted bytes to another host.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Arc<RwLock<Option<TokenState>>>);
impl MemoryStore {
	/// Returns an independent store seeded with a copy of the current state.
	pub fn duplicate(&self) -> Self {
		Self(Arc::new(RwLock::new(self.0.read().clone())))
	}
}
impl TokenStore for MemoryStore {
	fn load(&self) -> Result<Option<TokenState>, StoreError> {
		Ok(self.0.read().clone())
	}

	fn save(&self, state: &TokenState) -> Result<(), StoreError> {
		*self.0.write() = Some(state.clone());

		Ok(())
	}
}
