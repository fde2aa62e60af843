//! Read-only per-identity, per-operation counts.

// self
use crate::{_prelude::*, token::ClientId};

/// Owned snapshot of the ledger's aggregate counts.
///
/// Both levels are ordered maps, so two snapshots of an unchanged ledger serialize to identical
/// bytes. The snapshot is detached: mutating it never touches the ledger.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregateView(BTreeMap<ClientId, BTreeMap<String, u64>>);
impl AggregateView {
	pub(crate) fn new(counts: BTreeMap<ClientId, BTreeMap<String, u64>>) -> Self {
		Self(counts)
	}

	/// Count for one identity and operation; zero when never recorded.
	pub fn count(&self, client: &str, operation: &str) -> u64 {
		self.0.get(client).and_then(|ops| ops.get(operation)).copied().unwrap_or(0)
	}

	/// Per-operation counts for one identity.
	pub fn operations(&self, client: &str) -> Option<&BTreeMap<String, u64>> {
		self.0.get(client)
	}

	/// Iterates identities in order with their per-operation counts.
	pub fn iter(&self) -> impl Iterator<Item = (&ClientId, &BTreeMap<String, u64>)> {
		self.0.iter()
	}

	/// Identities in the snapshot.
	pub fn clients(&self) -> impl Iterator<Item = &ClientId> {
		self.0.keys()
	}

	/// Number of identities.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` if no operation has been recorded.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Sum of all counts.
	pub fn total(&self) -> u64 {
		self.0.values().flat_map(BTreeMap::values).sum()
	}

	/// Consumes the view into the underlying nested map.
	pub fn into_inner(self) -> BTreeMap<ClientId, BTreeMap<String, u64>> {
		self.0
	}
}
impl IntoIterator for AggregateView {
	type IntoIter = std::collections::btree_map::IntoIter<ClientId, BTreeMap<String, u64>>;
	type Item = (ClientId, BTreeMap<String, u64>);

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn client(value: &str) -> ClientId {
		ClientId::new(value).expect("Client fixture should be considered valid.")
	}

	#[test]
	fn lookups_default_to_zero() {
		let view = AggregateView::new(BTreeMap::from([(
			client("AAAAAAAAAAAAAAAA"),
			BTreeMap::from([("read".to_owned(), 2), ("write".to_owned(), 3)]),
		)]));

		assert_eq!(view.count("AAAAAAAAAAAAAAAA", "write"), 3);
		assert_eq!(view.count("AAAAAAAAAAAAAAAA", "delete"), 0);
		assert_eq!(view.count("BBBBBBBBBBBBBBBB", "write"), 0);
		assert_eq!(view.total(), 5);
		assert_eq!(view.len(), 1);
		assert!(view.operations("BBBBBBBBBBBBBBBB").is_none());
	}

	#[test]
	fn serializes_as_nested_object() {
		let view = AggregateView::new(BTreeMap::from([
			(client("bbbbbbbbbbbbbbbb"), BTreeMap::from([("op".to_owned(), 1)])),
			(client("aaaaaaaaaaaaaaaa"), BTreeMap::from([("op".to_owned(), 4)])),
		]));
		let payload = serde_json::to_string(&view).expect("View should serialize to JSON.");

		assert_eq!(payload, "{\"aaaaaaaaaaaaaaaa\":{\"op\":4},\"bbbbbbbbbbbbbbbb\":{\"op\":1}}");
	}
}
