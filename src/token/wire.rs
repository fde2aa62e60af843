//! Wire encoding for tokens presented in the `ERF` header.
//!
//! A token has four dot-separated parts: `v1.<seed>.<counter>.<link>`, where `seed` and `link`
//! are base64url (no padding) and `counter` is a decimal integer. The encoding carries no
//! signature; the collector only needs the seed to resolve identity.

// self
use crate::{
	_prelude::*,
	token::{ClientId, Link, MaterialError, Seed},
};

/// Header carrying the presented token between reporters and the collector.
pub const TOKEN_HEADER: &str = "ERF";

const VERSION: &str = "v1";
const SEPARATOR: char = '.';
const PART_COUNT: usize = 4;

/// Errors produced while decoding a presented token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum TokenDecodeError {
	/// The token was empty.
	#[error("Token is empty.")]
	Empty,
	/// The token did not split into the expected number of parts.
	#[error("Token must have {expected} parts, found {found}.")]
	PartCount {
		/// Required number of parts.
		expected: usize,
		/// Number of parts present.
		found: usize,
	},
	/// The version prefix is unknown.
	#[error("Token version `{found}` is not supported.")]
	Version {
		/// Version prefix found on the token.
		found: String,
	},
	/// The seed part could not be decoded.
	#[error("Token seed is invalid: {0}")]
	Seed(#[source] MaterialError),
	/// The counter part is not a decimal `u64`.
	#[error("Token counter `{found}` is not a valid integer.")]
	Counter {
		/// Counter text found on the token.
		found: String,
	},
	/// The link part could not be decoded.
	#[error("Token link is invalid: {0}")]
	Link(#[source] MaterialError),
}

/// Opaque token value as sent over the wire; callers must avoid logging it.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token(String);
impl Token {
	/// Encodes a token from its components.
	pub fn encode(seed: &Seed, counter: u64, link: &Link) -> Self {
		Self(format!(
			"{VERSION}{SEPARATOR}{}{SEPARATOR}{counter}{SEPARATOR}{}",
			seed.encode(),
			link.encode()
		))
	}

	/// Wraps a received header value without validating it.
	pub fn from_wire(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the wire value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Decodes the wire value into its components.
	pub fn decode(&self) -> Result<DecodedToken, TokenDecodeError> {
		DecodedToken::parse(&self.0)
	}
}
impl AsRef<str> for Token {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Token").field(&"<redacted>").finish()
	}
}
impl Display for Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Components recovered from a presented token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedToken {
	/// Lineage seed.
	pub seed: Seed,
	/// Rotation counter at the time the token was produced.
	pub counter: u64,
	/// Rotation chain value.
	pub link: Link,
}
impl DecodedToken {
	/// Parses a raw wire value.
	pub fn parse(raw: &str) -> Result<Self, TokenDecodeError> {
		if raw.is_empty() {
			return Err(TokenDecodeError::Empty);
		}

		let parts = raw.split(SEPARATOR).collect::<Vec<_>>();
		let [version, seed, counter, link] = parts.as_slice() else {
			return Err(TokenDecodeError::PartCount { expected: PART_COUNT, found: parts.len() });
		};

		if *version != VERSION {
			return Err(TokenDecodeError::Version { found: (*version).to_owned() });
		}

		let seed = Seed::decode(seed).map_err(TokenDecodeError::Seed)?;
		// `u64::from_str` accepts a leading `+`, which would give one token two spellings.
		let counter = counter
			.bytes()
			.all(|b| b.is_ascii_digit())
			.then(|| counter.parse::<u64>().ok())
			.flatten()
			.ok_or_else(|| TokenDecodeError::Counter { found: (*counter).to_owned() })?;
		let link = Link::decode(link).map_err(TokenDecodeError::Link)?;

		Ok(Self { seed, counter, link })
	}

	/// Identity the token resolves to.
	pub fn client_id(&self) -> ClientId {
		ClientId::from_seed(&self.seed)
	}

	/// Re-encodes the components.
	pub fn to_token(&self) -> Token {
		Token::encode(&self.seed, self.counter, &self.link)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn fixture() -> (Seed, Link) {
		(Seed::from_bytes([9; Seed::LEN]), Link::from_bytes([4; Link::LEN]))
	}

	#[test]
	fn encode_then_decode_recovers_components() {
		let (seed, link) = fixture();
		let token = Token::encode(&seed, 42, &link);
		let decoded = token.decode().expect("Encoded token should decode.");

		assert!(token.expose().starts_with("v1."));
		assert_eq!(decoded, DecodedToken { seed, counter: 42, link });
		assert_eq!(decoded.to_token(), token);
		assert_eq!(decoded.client_id(), ClientId::from_seed(&seed));
	}

	#[test]
	fn malformed_tokens_are_classified() {
		let (seed, link) = fixture();
		let seed = seed.encode();
		let link = link.encode();

		assert_eq!(DecodedToken::parse(""), Err(TokenDecodeError::Empty));
		assert_eq!(
			DecodedToken::parse("garbage"),
			Err(TokenDecodeError::PartCount { expected: 4, found: 1 })
		);
		assert_eq!(
			DecodedToken::parse(&format!("v2.{seed}.1.{link}")),
			Err(TokenDecodeError::Version { found: "v2".into() })
		);
		assert!(matches!(
			DecodedToken::parse(&format!("v1.!!.1.{link}")),
			Err(TokenDecodeError::Seed(_))
		));
		assert_eq!(
			DecodedToken::parse(&format!("v1.{seed}.+1.{link}")),
			Err(TokenDecodeError::Counter { found: "+1".into() })
		);
		assert_eq!(
			DecodedToken::parse(&format!("v1.{seed}..{link}")),
			Err(TokenDecodeError::Counter { found: String::new() })
		);
		assert!(matches!(
			DecodedToken::parse(&format!("v1.{seed}.1.AAAA")),
			Err(TokenDecodeError::Link(_))
		));
	}

	#[test]
	fn token_formatters_redact() {
		let (seed, link) = fixture();
		let token = Token::encode(&seed, 0, &link);

		assert_eq!(format!("{token:?}"), "Token(\"<redacted>\")");
		assert_eq!(format!("{token}"), "<redacted>");
	}
}
