//! Reporter transport: sends operations to the collector with the token in the `ERF` header.

// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
	obs::{self, Activity, ActivitySpan, Outcome},
	token::{TOKEN_HEADER, Token},
};

/// Posts operations to a collector endpoint.
#[derive(Clone, Debug)]
pub struct Reporter {
	client: ReqwestClient,
	endpoint: Url,
}
impl Reporter {
	/// Builds a reporter with a default reqwest client.
	pub fn new(endpoint: Url) -> Result<Self> {
		let client = ReqwestClient::builder().build().map_err(ConfigError::http_client_build)?;

		Ok(Self::with_client(client, endpoint))
	}

	/// Builds a reporter around a caller-supplied reqwest client.
	pub fn with_client(client: ReqwestClient, endpoint: Url) -> Self {
		Self { client, endpoint }
	}

	/// Collector endpoint operations are posted to.
	pub fn endpoint(&self) -> &Url {
		&self.endpoint
	}

	/// Sends `operation` as the request body, presenting `token`.
	///
	/// Any non-success status is returned as [`TransportError::Status`]; nothing is retried.
	pub async fn report(&self, token: &Token, operation: &str) -> Result<()> {
		const ACTIVITY: Activity = Activity::Report;

		let span = ActivitySpan::new(ACTIVITY, "reporter_report");

		obs::record_outcome(ACTIVITY, Outcome::Attempt);

		let result: Result<()> = span
			.instrument(async move {
				let response = self
					.client
					.post(self.endpoint.clone())
					.header(TOKEN_HEADER, token.expose())
					.body(operation.to_owned())
					.send()
					.await
					.map_err(TransportError::from)?;
				let status = response.status();

				if status.is_success() {
					return Ok(());
				}

				let message = response.text().await.unwrap_or_default();

				Err(TransportError::Status { status: status.as_u16(), message }.into())
			})
			.await;

		obs::record_outcome(ACTIVITY, Outcome::of(&result));

		result
	}
}
