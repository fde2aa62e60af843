//! Fixed-size random material carried by a token lineage.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use sha2::{Digest, Sha256};
// self
use crate::_prelude::*;

macro_rules! def_material {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name([u8; Self::LEN]);
		impl $name {
			/// Byte length of the material.
			pub const LEN: usize = 16;

			/// Draws fresh material from the thread-local CSPRNG.
			pub fn generate() -> Self {
				let mut bytes = [0_u8; Self::LEN];

				rand::rng().fill_bytes(&mut bytes);

				Self(bytes)
			}

			/// Wraps raw bytes.
			pub const fn from_bytes(bytes: [u8; Self::LEN]) -> Self {
				Self(bytes)
			}

			/// Returns the raw bytes.
			pub fn as_bytes(&self) -> &[u8; Self::LEN] {
				&self.0
			}

			/// Encodes the material as base64url without padding.
			pub fn encode(&self) -> String {
				URL_SAFE_NO_PAD.encode(self.0)
			}

			/// Decodes base64url (no padding) material of exactly [`Self::LEN`] bytes.
			pub fn decode(value: &str) -> Result<Self, MaterialError> {
				let bytes = URL_SAFE_NO_PAD
					.decode(value)
					.map_err(|_| MaterialError::Encoding { kind: $kind })?;
				let bytes = <[u8; Self::LEN]>::try_from(bytes.as_slice()).map_err(|_| {
					MaterialError::Length { kind: $kind, expected: Self::LEN, actual: bytes.len() }
				})?;

				Ok(Self(bytes))
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.encode()
			}
		}
		impl TryFrom<String> for $name {
			type Error = MaterialError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				Self::decode(&value)
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.debug_tuple($kind).field(&"<redacted>").finish()
			}
		}
	};
}

/// Error returned when token material cannot be decoded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum MaterialError {
	/// The value is not base64url without padding.
	#[error("{kind} is not valid base64url.")]
	Encoding {
		/// Kind of material (seed, link).
		kind: &'static str,
	},
	/// The decoded value has the wrong length.
	#[error("{kind} must be {expected} bytes, got {actual}.")]
	Length {
		/// Kind of material (seed, link).
		kind: &'static str,
		/// Required byte length.
		expected: usize,
		/// Decoded byte length.
		actual: usize,
	},
}

def_material! { Seed, "Lineage root generated once per client and shared by every copy of its store.", "Seed" }
def_material! { Link, "Rotation chain value; advanced with fresh randomness on every rotation.", "Link" }

impl Link {
	/// Derives the next chain value from this one and a fresh nonce.
	pub fn advance(&self, nonce: &[u8]) -> Self {
		let mut hasher = Sha256::new();

		hasher.update(self.0);
		hasher.update(nonce);

		let digest = hasher.finalize();
		let mut bytes = [0_u8; Self::LEN];

		bytes.copy_from_slice(&digest[..Self::LEN]);

		Self(bytes)
	}

	/// Advances the chain with a freshly generated nonce.
	pub fn advance_random(&self) -> Self {
		self.advance(Self::generate().as_bytes())
	}
}
