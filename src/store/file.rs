//! File-backed [`TokenStore`]: one JSON document per lineage.

// std
use std::{
	fs::{self, File},
	io::{self, Write},
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	store::{StoreError, TokenStore},
	token::TokenState,
};

/// Persists a lineage's state to a JSON file, replacing it atomically on every save.
///
/// Copying the file byte-for-byte and opening the copy with a second store yields a clone of
/// the lineage.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
}
impl FileStore {
	/// Points a store at `path`, creating missing parent directories.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		Ok(Self { path })
	}

	/// Location of the persisted state.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn temp_path(&self) -> PathBuf {
		let mut tmp_path = self.path.clone();
		let mut name = tmp_path.file_name().map(|n| n.to_os_string()).unwrap_or_default();

		name.push(".tmp");
		tmp_path.set_file_name(name);

		tmp_path
	}
}
impl TokenStore for FileStore {
	fn load(&self) -> Result<Option<TokenState>, StoreError> {
		let bytes = match fs::read(&self.path) {
			Ok(bytes) => bytes,
			Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
			Err(e) =>
				return Err(StoreError::Backend {
					message: format!("Failed to read {}: {e}", self.path.display()),
				}),
		};

		// A truncated copy must not be mistaken for a missing store.
		if bytes.is_empty() {
			return Err(StoreError::Serialization {
				message: format!("Token file {} is empty", self.path.display()),
			});
		}

		let mut deserializer = serde_json::Deserializer::from_slice(&bytes);
		let state: TokenState = serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
			StoreError::Serialization {
				message: format!(
					"Failed to parse {} at `{}`: {}",
					self.path.display(),
					e.path(),
					e.inner()
				),
			}
		})?;

		if !state.is_consistent() {
			return Err(StoreError::Serialization {
				message: format!("Client id in {} does not match its seed", self.path.display()),
			});
		}

		Ok(Some(state))
	}

	fn save(&self, state: &TokenState) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let serialized = serde_json::to_vec_pretty(state).map_err(|e| StoreError::Serialization {
			message: format!("Failed to serialize token state: {e}"),
		})?;
		let tmp_path = self.temp_path();
		let written = File::create(&tmp_path)
			.map_err(|e| format!("Failed to create {}: {e}", tmp_path.display()))
			.and_then(|mut file| {
				file.write_all(&serialized)
					.map_err(|e| format!("Failed to write {}: {e}", tmp_path.display()))?;
				file.sync_all().map_err(|e| format!("Failed to sync {}: {e}", tmp_path.display()))
			});

		if let Err(message) = written {
			let _ = fs::remove_file(&tmp_path);

			return Err(StoreError::Backend { message });
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| {
			let _ = fs::remove_file(&tmp_path);

			StoreError::Backend {
				message: format!("Failed to replace {}: {e}", self.path.display()),
			}
		})
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;
	use crate::_preludet::temp_store_path;

	#[test]
	fn save_and_reload_round_trip() {
		let path = temp_store_path("file_round_trip");
		let store = FileStore::open(&path).expect("Failed to open file store.");

		assert_eq!(store.load().expect("Missing file should load as empty."), None);

		let state = TokenState::fresh(5, macros::datetime!(2025-01-01 00:00 UTC));

		store.save(&state).expect("Failed to save token state.");
		drop(store);

		let reopened = FileStore::open(&path).expect("Failed to reopen file store.");
		let loaded = reopened
			.load()
			.expect("Failed to load token state.")
			.expect("File store lost state after reopen.");

		assert_eq!(loaded, state);
		assert!(!reopened.temp_path().exists(), "Temp file must be renamed into place.");

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary token file {}: {e}", path.display())
		});
	}

	#[test]
	fn empty_file_is_corrupt_not_missing() {
		let path = temp_store_path("file_empty");
		let store = FileStore::open(&path).expect("Failed to open file store.");

		File::create(&path).expect("Failed to create empty token file.");

		let err = store.load().expect_err("Empty file must not load as a missing store.");

		assert!(matches!(&err, StoreError::Serialization { message } if message.contains("empty")));

		let _ = fs::remove_file(&path);
	}

	#[test]
	fn unreadable_path_is_a_backend_error() {
		let path = temp_store_path("file_unreadable");

		fs::create_dir_all(&path).expect("Failed to create directory in place of the token file.");

		let store = FileStore::open(&path).expect("Failed to open file store.");

		assert!(matches!(store.load(), Err(StoreError::Backend { .. })));

		let _ = fs::remove_dir_all(&path);
	}

	#[test]
	fn blocked_temp_path_fails_without_touching_the_target() {
		let path = temp_store_path("file_temp_blocked");
		let store = FileStore::open(&path).expect("Failed to open file store.");

		// A directory at the temp path makes `File::create` fail.
		fs::create_dir_all(store.temp_path()).expect("Failed to block the temp path.");

		let state = TokenState::fresh(5, macros::datetime!(2025-01-01 00:00 UTC));

		assert!(matches!(store.save(&state), Err(StoreError::Backend { .. })));
		assert!(!path.exists(), "Failed saves must not create the token file.");

		let _ = fs::remove_dir_all(store.temp_path());
	}

	#[test]
	fn corrupt_file_reports_field_path() {
		let path = temp_store_path("file_corrupt");
		let store = FileStore::open(&path).expect("Failed to open file store.");

		fs::write(&path, b"{\"seed\": 7}").expect("Failed to write corrupt token file.");

		let err = store.load().expect_err("Corrupt file must fail to load.");

		assert!(matches!(&err, StoreError::Serialization { message } if message.contains("seed")));

		let _ = fs::remove_file(&path);
	}

	#[test]
	fn mismatched_identity_is_rejected() {
		let path = temp_store_path("file_mismatch");
		let mut state = TokenState::fresh(5, macros::datetime!(2025-01-01 00:00 UTC));

		state.client_id = crate::token::ClientId::new("someoneElse00000")
			.expect("Client fixture should be considered valid.");

		let store = FileStore::open(&path).expect("Failed to open file store.");

		store.save(&state).expect("Failed to save token state.");

		assert!(matches!(store.load(), Err(StoreError::Serialization { .. })));

		let _ = fs::remove_file(&path);
	}

	#[test]
	fn unwritable_target_surfaces_backend_error() {
		let path = temp_store_path("file_unwritable");

		fs::create_dir_all(&path).expect("Failed to create directory in place of the token file.");

		let store = FileStore::open(&path).expect("Failed to open file store.");
		let state = TokenState::fresh(5, macros::datetime!(2025-01-01 00:00 UTC));

		assert!(matches!(store.save(&state), Err(StoreError::Backend { .. })));
		assert!(!store.temp_path().exists(), "Failed saves must not leave a temp file behind.");

		let _ = fs::remove_dir_all(&path);
	}
}
