//! HTTP boundary in front of a [`Ledger`].
//!
//! Routes:
//! - `POST /`: appends the request body as the operation, resolving identity from the `ERF`
//!   header and stamping it with the collector clock. A missing header, malformed token, empty
//!   body, or body that is not UTF-8 is answered with `400`.
//! - `GET /results`: HTML table of client, operation, and count.
//! - `GET /results.json`: the same view as a JSON object.
//!
//! No other routes exist. Unknown paths answer `404` and a known path called with another
//! method answers `405`.

// crates.io
use askama::Template;
use axum::{
	Json, Router,
	body::Bytes,
	extract::State,
	http::{HeaderMap, StatusCode},
	response::{Html, IntoResponse, Response},
	routing::{get, post},
};
use tokio::net::TcpListener;
// self
use crate::{
	_prelude::*,
	clock::{Clock, SystemClock},
	ledger::{AggregateView, Ledger},
	token::{ClientId, TOKEN_HEADER},
};

/// One row of the results table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultRow {
	/// Identity the operations are attributed to.
	pub client: ClientId,
	/// Operation label.
	pub operation: String,
	/// Number of times the operation was recorded.
	pub count: u64,
}

/// HTML results table; labels are escaped by the template engine.
#[derive(Clone, Debug, Template)]
#[template(path = "results.html")]
pub struct ResultsView {
	/// Rows ordered by client, then operation.
	pub rows: Vec<ResultRow>,
}
impl From<&AggregateView> for ResultsView {
	fn from(view: &AggregateView) -> Self {
		let rows = view
			.iter()
			.flat_map(|(client, operations)| {
				operations.iter().map(|(operation, count)| ResultRow {
					client: client.clone(),
					operation: operation.clone(),
					count: *count,
				})
			})
			.collect();

		Self { rows }
	}
}

#[derive(Clone)]
struct CollectorState {
	ledger: Ledger,
	clock: Arc<dyn Clock>,
}

/// Builds the collector router over `ledger`, timestamping appends with the system clock.
pub fn router(ledger: Ledger) -> Router {
	router_with_clock(ledger, Arc::new(SystemClock))
}

/// Builds the collector router with an injected clock.
pub fn router_with_clock(ledger: Ledger, clock: Arc<dyn Clock>) -> Router {
	Router::new()
		.route("/", post(append))
		.route("/results", get(results))
		.route("/results.json", get(results_json))
		.with_state(CollectorState { ledger, clock })
}

/// Serves the collector on `listener` until `shutdown` resolves.
pub async fn serve(
	listener: TcpListener,
	ledger: Ledger,
	shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
	axum::serve(listener, router(ledger)).with_graceful_shutdown(shutdown).await
}

/// Renders `template` as HTML, answering `500` if rendering fails.
pub fn render_template<T>(template: T) -> Response
where
	T: Template,
{
	match template.render() {
		Ok(html) => Html(html).into_response(),
		Err(e) => {
			#[cfg(feature = "tracing")]
			tracing::error!(error = %e, "template rendering failed");
			#[cfg(not(feature = "tracing"))]
			let _ = e;

			(StatusCode::INTERNAL_SERVER_ERROR, "Template rendering failed.").into_response()
		},
	}
}

async fn append(
	State(state): State<CollectorState>,
	headers: HeaderMap,
	body: Bytes,
) -> Response {
	let Some(token) = headers.get(TOKEN_HEADER) else {
		return (StatusCode::BAD_REQUEST, "Missing ERF header.").into_response();
	};
	let Ok(token) = token.to_str() else {
		return (StatusCode::BAD_REQUEST, "ERF header must be visible ASCII.").into_response();
	};
	let Ok(operation) = std::str::from_utf8(&body) else {
		return (StatusCode::BAD_REQUEST, "Operation must be valid UTF-8.").into_response();
	};

	match state.ledger.append(token, operation, state.clock.now()) {
		Ok(_) => StatusCode::OK.into_response(),
		Err(e) => {
			#[cfg(feature = "tracing")]
			tracing::warn!(error = %e, "rejected append");

			(StatusCode::BAD_REQUEST, e.to_string()).into_response()
		},
	}
}

async fn results(State(state): State<CollectorState>) -> Response {
	render_template(ResultsView::from(&state.ledger.snapshot()))
}

async fn results_json(State(state): State<CollectorState>) -> Json<AggregateView> {
	Json(state.ledger.snapshot())
}
