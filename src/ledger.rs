//! Collector-side ledger that attributes operations to client identities.
//!
//! Every append decodes the presented token, resolves its seed to a [`ClientId`] (creating
//! the identity on first sight), records a [`LedgerEntry`], and bumps the aggregate count.
//! Resolution, insertion, and the increment happen under one write lock, so concurrent
//! first-use appends for a seed create exactly one identity and no increment is lost.
//!
//! Identity depends on the seed only. Tokens from a copied store (a clone) and tokens from any
//! later rotation of either copy therefore all land on the same identity. Clones are
//! attributed, not flagged.

mod entry;
mod metrics;
mod view;

pub use entry::LedgerEntry;
pub use metrics::LedgerMetrics;
pub use view::AggregateView;

// std
use std::collections::hash_map::Entry;
// self
use crate::{
	_prelude::*,
	obs::{self, Activity, ActivitySpan, Outcome},
	token::{ClientId, DecodedToken},
};

/// Thread-safe, in-memory operation ledger; clones share the same state.
#[derive(Clone, Debug, Default)]
pub struct Ledger {
	state: Arc<RwLock<LedgerState>>,
	metrics: Arc<LedgerMetrics>,
}
impl Ledger {
	/// Records `operation` at `timestamp` against the identity `token` resolves to.
	///
	/// Fails with [`Error::MalformedToken`] when the token cannot be decoded and with
	/// [`Error::EmptyOperation`] when `operation` is empty; in both cases the ledger is
	/// unchanged.
	pub fn append(
		&self,
		token: impl AsRef<str>,
		operation: &str,
		timestamp: OffsetDateTime,
	) -> Result<ClientId> {
		const ACTIVITY: Activity = Activity::Append;

		let span = ActivitySpan::new(ACTIVITY, "ledger_append");
		let _guard = span.clone().entered();

		obs::record_outcome(ACTIVITY, Outcome::Attempt);

		let result = self.append_inner(token.as_ref(), operation, timestamp);

		match &result {
			Ok(client) => {
				span.record_client(client);
				self.metrics.record_appended();
			},
			Err(_) => self.metrics.record_rejected(),
		}

		obs::record_outcome(ACTIVITY, Outcome::of(&result));

		result
	}

	fn append_inner(
		&self,
		token: &str,
		operation: &str,
		timestamp: OffsetDateTime,
	) -> Result<ClientId> {
		let decoded = DecodedToken::parse(token)?;

		if operation.is_empty() {
			return Err(Error::EmptyOperation);
		}

		let client = decoded.client_id();
		let mut state = self.state.write();
		let record = match state.clients.entry(client.clone()) {
			Entry::Occupied(slot) => slot.into_mut(),
			Entry::Vacant(slot) => {
				self.metrics.record_identity();
				obs::record_identity_created();

				#[cfg(feature = "tracing")]
				tracing::info!(client_id = %client, "registered new client identity");

				slot.insert(ClientRecord::new(timestamp))
			},
		};

		record.insert(LedgerEntry {
			client: client.clone(),
			operation: operation.to_owned(),
			timestamp,
			counter: decoded.counter,
		});
		state.entry_count += 1;

		Ok(client)
	}

	/// Returns the identity `token` resolves to if it has been seen, without recording anything.
	pub fn resolve(&self, token: impl AsRef<str>) -> Result<Option<ClientId>> {
		let client = DecodedToken::parse(token.as_ref())?.client_id();

		Ok(self.state.read().clients.contains_key(&client).then_some(client))
	}

	/// Consistent snapshot of the per-identity, per-operation counts.
	pub fn snapshot(&self) -> AggregateView {
		let state = self.state.read();

		AggregateView::new(
			state
				.clients
				.iter()
				.map(|(client, record)| (client.clone(), record.counts.clone()))
				.collect(),
		)
	}

	/// Entries recorded for `client`, in timestamp order.
	pub fn entries(&self, client: &str) -> Option<Vec<LedgerEntry>> {
		self.state.read().clients.get(client).map(|record| record.entries.clone())
	}

	/// Lineage details for `client`.
	pub fn client(&self, client: &str) -> Option<ClientSummary> {
		self.state.read().clients.get(client).map(|record| ClientSummary {
			first_seen: record.first_seen,
			entries: record.entries.len(),
			highest_counter: record.highest_counter,
		})
	}

	/// Number of identities known to the ledger.
	pub fn client_count(&self) -> usize {
		self.state.read().clients.len()
	}

	/// Number of entries across all identities.
	pub fn entry_count(&self) -> usize {
		self.state.read().entry_count
	}

	/// Shared activity counters.
	pub fn metrics(&self) -> &LedgerMetrics {
		&self.metrics
	}
}

/// Per-identity details exposed by [`Ledger::client`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClientSummary {
	/// Timestamp of the first operation attributed to the identity.
	pub first_seen: OffsetDateTime,
	/// Number of recorded entries.
	pub entries: usize,
	/// Highest rotation counter presented by any copy of the lineage.
	pub highest_counter: u64,
}

#[derive(Debug, Default)]
struct LedgerState {
	clients: HashMap<ClientId, ClientRecord>,
	entry_count: usize,
}

#[derive(Debug)]
struct ClientRecord {
	first_seen: OffsetDateTime,
	highest_counter: u64,
	entries: Vec<LedgerEntry>,
	counts: BTreeMap<String, u64>,
}
impl ClientRecord {
	fn new(first_seen: OffsetDateTime) -> Self {
		Self { first_seen, highest_counter: 0, entries: Vec::new(), counts: BTreeMap::new() }
	}

	fn insert(&mut self, entry: LedgerEntry) {
		// Equal timestamps keep arrival order.
		let at = self.entries.partition_point(|existing| existing.timestamp <= entry.timestamp);

		self.first_seen = self.first_seen.min(entry.timestamp);
		self.highest_counter = self.highest_counter.max(entry.counter);
		*self.counts.entry(entry.operation.clone()).or_default() += 1;
		self.entries.insert(at, entry);
	}
}
