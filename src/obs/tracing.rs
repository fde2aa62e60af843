// self
use crate::{_prelude::*, obs::Activity, token::ClientId};

/// Future returned by [`ActivitySpan::instrument`]; a plain passthrough without `tracing`.
#[cfg(feature = "tracing")]
pub type InstrumentedActivity<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`ActivitySpan::instrument`]; a plain passthrough without `tracing`.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedActivity<F> = F;

/// `erf_ledger.activity` span around one rotator, ledger, or reporter call.
///
/// The `client_id` field starts empty and is filled once the identity is known, so failed
/// appends of malformed tokens carry no identity.
#[derive(Clone, Debug)]
pub struct ActivitySpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl ActivitySpan {
	/// Opens a span for `activity` at the named call site.
	pub fn new(activity: Activity, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		return Self {
			span: tracing::info_span!(
				"erf_ledger.activity",
				activity = activity.as_str(),
				stage,
				client_id = tracing::field::Empty
			),
		};

		#[cfg(not(feature = "tracing"))]
		{
			let _ = (activity, stage);

			Self {}
		}
	}

	/// Attaches the resolved identity to the span.
	pub fn record_client(&self, client: &ClientId) {
		#[cfg(feature = "tracing")]
		self.span.record("client_id", &**client);

		#[cfg(not(feature = "tracing"))]
		let _ = client;
	}

	/// Enters the span for a synchronous section; it stays entered until the guard drops.
	pub fn entered(self) -> ActivitySpanGuard {
		#[cfg(feature = "tracing")]
		return ActivitySpanGuard { _entered: self.span.entered() };

		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			ActivitySpanGuard {}
		}
	}

	/// Runs `fut` inside the span without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedActivity<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		return tracing::Instrument::instrument(fut, self.span.clone());

		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Guard returned by [`ActivitySpan::entered`].
pub struct ActivitySpanGuard {
	#[cfg(feature = "tracing")]
	_entered: tracing::span::EnteredSpan,
}
impl Debug for ActivitySpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ActivitySpanGuard").finish_non_exhaustive()
	}
}
