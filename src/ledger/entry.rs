//! Immutable ledger records.

// self
use crate::{_prelude::*, token::ClientId};

/// One operation attributed to a client identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
	/// Identity the presenting token resolved to.
	pub client: ClientId,
	/// Operation label supplied by the caller.
	pub operation: String,
	/// Instant supplied by the boundary layer.
	#[serde(with = "time::serde::rfc3339")]
	pub timestamp: OffsetDateTime,
	/// Rotation counter carried by the presenting token.
	pub counter: u64,
}
