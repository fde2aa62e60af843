//! Persisted rotation state for one client lineage.

// self
use crate::{
	_prelude::*,
	token::{ClientId, Link, Seed, Token},
};

/// Rotation state owned by a single rotator and persisted by its store.
///
/// `client_id` is derived from `seed` when the lineage is created and stored next to the
/// counter, so identity never depends on rotation fields. Copying a persisted state produces
/// a second lineage that presents the same token until either side rotates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenState {
	/// Lineage root.
	pub seed: Seed,
	/// Identity derived from `seed` at creation time.
	pub client_id: ClientId,
	/// Number of rotations performed by this lineage.
	pub counter: u64,
	/// Current rotation chain value.
	pub link: Link,
	/// Instant of the last rotation, or of creation.
	#[serde(with = "time::serde::rfc3339")]
	pub last_rotated: OffsetDateTime,
	/// Seconds between rotations.
	#[serde(rename = "refresh_interval_secs")]
	pub refresh_interval: u64,
}
impl TokenState {
	/// Creates a new lineage with a fresh seed and `counter = 0`.
	pub fn fresh(refresh_interval: u64, now: OffsetDateTime) -> Self {
		let seed = Seed::generate();

		Self {
			client_id: ClientId::from_seed(&seed),
			seed,
			counter: 0,
			link: Link::generate(),
			last_rotated: now,
			refresh_interval,
		}
	}

	/// Returns the token for the current state.
	pub fn token(&self) -> Token {
		Token::encode(&self.seed, self.counter, &self.link)
	}

	/// Returns `true` once `refresh_interval` seconds have elapsed since the last rotation.
	///
	/// A clock that moved backwards never triggers a rotation.
	pub fn rotation_due_at(&self, now: OffsetDateTime) -> bool {
		let elapsed = now - self.last_rotated;

		!elapsed.is_negative() && elapsed >= self.interval()
	}

	/// Returns the successor state rotated at `now`; `self` is left untouched.
	pub fn rotated_at(&self, now: OffsetDateTime) -> Self {
		Self {
			counter: self.counter.saturating_add(1),
			link: self.link.advance_random(),
			last_rotated: now,
			..self.clone()
		}
	}

	/// Refresh interval as a [`Duration`].
	pub fn interval(&self) -> Duration {
		Duration::seconds(i64::try_from(self.refresh_interval).unwrap_or(i64::MAX))
	}

	/// Checks that the stored identity still matches the seed.
	pub fn is_consistent(&self) -> bool {
		self.client_id == ClientId::from_seed(&self.seed)
	}
}
