//! Optional observability helpers for rotators, the ledger, and the reporter.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `erf_ledger.activity` with the `activity`
//!   and `stage` (call site) fields, plus events for new lineages, rotations, and identities.
//! - Enable `metrics` to increment the `erf_ledger_activity_total` counter for every
//!   attempt/success/failure, labeled by `activity` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Activities observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Activity {
	/// Loading or creating a lineage from its store.
	Open,
	/// Producing the current token, rotating when due.
	Rotation,
	/// Recording an operation in the ledger.
	Append,
	/// Sending an operation to the collector.
	Report,
}
impl Activity {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Activity::Open => "open",
			Activity::Rotation => "rotation",
			Activity::Append => "append",
			Activity::Report => "report",
		}
	}
}
impl Display for Activity {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
	/// Entry to an instrumented operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl Outcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Outcome::Attempt => "attempt",
			Outcome::Success => "success",
			Outcome::Failure => "failure",
		}
	}

	/// Maps a result onto [`Outcome::Success`] or [`Outcome::Failure`].
	pub fn of<T, E>(result: &Result<T, E>) -> Self {
		if result.is_ok() { Outcome::Success } else { Outcome::Failure }
	}
}
impl Display for Outcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
