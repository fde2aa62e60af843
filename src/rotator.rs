//! Lazy, clock-driven token rotation over a [`TokenStore`].
//!
//! A [`Rotator`] loads its lineage at construction (creating and persisting a fresh one when
//! the store is empty) and checks on every [`Rotator::token`] call whether the refresh
//! interval has elapsed. Rotation advances the counter by exactly one, advances the chain
//! link, persists the successor state, and only then swaps it in, so a failed write leaves
//! both the store and the in-memory state unchanged. There is no background timer.

// self
use crate::{
	_prelude::*,
	clock::{Clock, SystemClock},
	obs::{self, Activity, ActivitySpan, Outcome},
	store::TokenStore,
	token::{ClientId, Token, TokenState},
};

/// Produces the current token of one lineage, rotating when due.
pub struct Rotator<S>
where
	S: TokenStore,
{
	store: S,
	clock: Arc<dyn Clock>,
	state: Mutex<TokenState>,
}
impl<S> Rotator<S>
where
	S: TokenStore,
{
	/// Opens the lineage held by `store` using the system clock.
	///
	/// `refresh_interval` (seconds) replaces any interval recorded in the store.
	pub fn open(store: S, refresh_interval: u64) -> Result<Self> {
		Self::with_clock(store, refresh_interval, Arc::new(SystemClock))
	}

	/// Opens the lineage held by `store` with an injected clock.
	pub fn with_clock(store: S, refresh_interval: u64, clock: Arc<dyn Clock>) -> Result<Self> {
		const ACTIVITY: Activity = Activity::Open;

		let span = ActivitySpan::new(ACTIVITY, "rotator_open");
		let _guard = span.clone().entered();

		obs::record_outcome(ACTIVITY, Outcome::Attempt);

		let result = Self::load_or_create(&store, refresh_interval, clock.now());

		obs::record_outcome(ACTIVITY, Outcome::of(&result));

		if let Ok(state) = &result {
			span.record_client(&state.client_id);
		}

		Ok(Self { store, clock, state: Mutex::new(result?) })
	}

	fn load_or_create(
		store: &S,
		refresh_interval: u64,
		now: OffsetDateTime,
	) -> Result<TokenState> {
		match store.load()? {
			Some(mut state) => {
				state.refresh_interval = refresh_interval;

				Ok(state)
			},
			None => {
				let state = TokenState::fresh(refresh_interval, now);

				store.save(&state)?;

				#[cfg(feature = "tracing")]
				tracing::info!(client_id = %state.client_id, "created new token lineage");

				Ok(state)
			},
		}
	}

	/// Returns the current token, rotating first if the refresh interval has elapsed.
	pub fn token(&self) -> Result<Token> {
		self.token_at(self.clock.now())
	}

	/// Same as [`Rotator::token`] with an explicit instant.
	pub fn token_at(&self, now: OffsetDateTime) -> Result<Token> {
		const ACTIVITY: Activity = Activity::Rotation;

		let mut state = self.state.lock();

		if !state.rotation_due_at(now) {
			return Ok(state.token());
		}

		let span = ActivitySpan::new(ACTIVITY, "rotator_token");

		span.record_client(&state.client_id);

		let _guard = span.entered();

		obs::record_outcome(ACTIVITY, Outcome::Attempt);
		obs::record_rotation_lag(now - (state.last_rotated + state.interval()));

		let next = state.rotated_at(now);
		let result = self.store.save(&next);

		obs::record_outcome(ACTIVITY, Outcome::of(&result));
		result?;

		#[cfg(feature = "tracing")]
		tracing::debug!(client_id = %next.client_id, counter = next.counter, "rotated token");

		*state = next;

		Ok(state.token())
	}

	/// Identity shared by every token of this lineage.
	pub fn client_id(&self) -> ClientId {
		self.state.lock().client_id.clone()
	}

	/// Copy of the current in-memory state.
	pub fn state(&self) -> TokenState {
		self.state.lock().clone()
	}

	/// Backing store.
	pub fn store(&self) -> &S {
		&self.store
	}
}
impl<S> Debug for Rotator<S>
where
	S: TokenStore + Debug,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let state = self.state.lock();

		f.debug_struct("Rotator")
			.field("store", &self.store)
			.field("client_id", &state.client_id)
			.field("counter", &state.counter)
			.field("refresh_interval", &state.refresh_interval)
			.finish()
	}
}
