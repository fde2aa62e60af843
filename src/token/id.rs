//! Stable client identity shared by every token of one lineage.

// std
use std::{borrow::Borrow, ops::Deref};
// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};
// self
use crate::{_prelude::*, token::Seed};

const FINGERPRINT_LEN: usize = 12;

/// Error returned when a string is not a derived client identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identity does not have the derived length.
	#[error("Client identifier must be {expected} characters, found {found}.")]
	Length {
		/// Required character count.
		expected: usize,
		/// Character count present.
		found: usize,
	},
	/// The identity contains a character outside the base64url alphabet.
	#[error("Client identifier contains `{found}`, which is not base64url.")]
	Alphabet {
		/// First offending character.
		found: char,
	},
}

/// Identity the ledger groups operations under.
///
/// Derived once from a lineage [`Seed`] and never from the rotation counter, so every token a
/// lineage (or any copy of it) produces maps to the same value.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientId(String);
impl ClientId {
	/// Character count of a derived identity.
	pub const LEN: usize = 16;

	/// Parses an identity previously produced by [`ClientId::from_seed`].
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}

	/// Derives the identity for a seed: base64url (no padding) of the first 12 bytes of its
	/// SHA-256 digest.
	pub fn from_seed(seed: &Seed) -> Self {
		let digest = Sha256::digest(seed.as_bytes());

		Self(URL_SAFE_NO_PAD.encode(&digest[..FINGERPRINT_LEN]))
	}
}
impl Deref for ClientId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for ClientId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<ClientId> for String {
	fn from(value: ClientId) -> Self {
		value.0
	}
}
impl TryFrom<String> for ClientId {
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl Borrow<str> for ClientId {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl Debug for ClientId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Client({})", self.0)
	}
}
impl Display for ClientId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for ClientId {
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

fn validate_view(view: &str) -> Result<(), IdentifierError> {
	let invalid = |c: &char| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_');

	if let Some(found) = view.chars().find(invalid) {
		return Err(IdentifierError::Alphabet { found });
	}
	if view.len() != ClientId::LEN {
		return Err(IdentifierError::Length { expected: ClientId::LEN, found: view.len() });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn only_derived_shapes_parse() {
		assert_eq!(
			ClientId::new("short"),
			Err(IdentifierError::Length { expected: 16, found: 5 })
		);
		assert_eq!(
			ClientId::new("AAAAAAAAAAAAAAA="),
			Err(IdentifierError::Alphabet { found: '=' })
		);
		assert_eq!(
			ClientId::new("AAAAAAA AAAAAAAA"),
			Err(IdentifierError::Alphabet { found: ' ' })
		);

		let id = ClientId::new("Ab-_0123456789zZ").expect("Base64url fixture should parse.");

		assert_eq!(id.as_ref(), "Ab-_0123456789zZ");
		assert_eq!(format!("{id:?}"), "Client(Ab-_0123456789zZ)");
	}

	#[test]
	fn identity_depends_only_on_seed() {
		let seed = Seed::from_bytes([7; Seed::LEN]);
		let other = Seed::from_bytes([8; Seed::LEN]);
		let id = ClientId::from_seed(&seed);

		assert_eq!(id, ClientId::from_seed(&seed.clone()));
		assert_ne!(id, ClientId::from_seed(&other));
		assert_eq!(id.len(), ClientId::LEN);
		assert_eq!(ClientId::new(id.as_ref()), Ok(id));
	}

	#[test]
	fn deserialization_enforces_the_derived_shape() {
		let id: ClientId = serde_json::from_str("\"AAAAAAAAAAAAAAAA\"")
			.expect("Client should deserialize successfully.");

		assert_eq!(id.as_ref(), "AAAAAAAAAAAAAAAA");
		assert!(serde_json::from_str::<ClientId>("\"with space\"").is_err());
	}

	#[test]
	fn borrow_supports_fast_lookup() {
		let id = ClientId::from_seed(&Seed::from_bytes([1; Seed::LEN]));
		let map: HashMap<ClientId, u8> = HashMap::from_iter([(id.clone(), 7_u8)]);

		assert_eq!(map.get(&*id), Some(&7));
	}
}
