// self
use crate::{
	_prelude::*,
	obs::{Activity, Outcome},
};

/// Counter incremented per activity attempt and result.
pub const ACTIVITY_TOTAL: &str = "erf_ledger_activity_total";
/// Counter incremented when the ledger sees a seed for the first time.
pub const IDENTITIES_TOTAL: &str = "erf_ledger_identities_total";
/// Histogram of how far past its interval a rotation happened, in seconds.
pub const ROTATION_LAG_SECONDS: &str = "erf_ledger_rotation_lag_seconds";

/// Records an activity outcome via the global metrics recorder (when enabled).
pub fn record_outcome(activity: Activity, outcome: Outcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(
		ACTIVITY_TOTAL,
		"activity" => activity.as_str(),
		"outcome" => outcome.as_str()
	)
	.increment(1);

	#[cfg(not(feature = "metrics"))]
	let _ = (activity, outcome);
}

/// Records the creation of a ledger identity.
pub fn record_identity_created() {
	#[cfg(feature = "metrics")]
	metrics::counter!(IDENTITIES_TOTAL).increment(1);
}

/// Records the delay between a rotation becoming due and it actually happening.
///
/// Rotation is lazy, so a client that stays idle for many intervals shows a large lag while its
/// counter still advances by one.
pub fn record_rotation_lag(lag: Duration) {
	#[cfg(feature = "metrics")]
	metrics::histogram!(ROTATION_LAG_SECONDS).record(lag.as_seconds_f64().max(0.));

	#[cfg(not(feature = "metrics"))]
	let _ = lag;
}
