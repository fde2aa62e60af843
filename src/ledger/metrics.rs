// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for ledger activity.
#[derive(Debug, Default)]
pub struct LedgerMetrics {
	appended: AtomicU64,
	rejected: AtomicU64,
	identities: AtomicU64,
}
impl LedgerMetrics {
	/// Returns the number of accepted appends.
	pub fn appended(&self) -> u64 {
		self.appended.load(Ordering::Relaxed)
	}

	/// Returns the number of rejected appends (malformed token or empty operation).
	pub fn rejected(&self) -> u64 {
		self.rejected.load(Ordering::Relaxed)
	}

	/// Returns the number of identities created.
	pub fn identities(&self) -> u64 {
		self.identities.load(Ordering::Relaxed)
	}

	pub(crate) fn record_appended(&self) {
		self.appended.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_rejected(&self) {
		self.rejected.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_identity(&self) {
		self.identities.fetch_add(1, Ordering::Relaxed);
	}
}
