//! Rotating client identity tokens and a clone-aware operation ledger.
//!
//! Every client persists a lineage seed and presents a token that rotates on a fixed interval.
//! The collector resolves each presented token back to the identity derived from its seed, so
//! copies of a client's token file keep attributing their operations to one client.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod client;
pub mod clock;
#[cfg(feature = "collector")] pub mod collector;
pub mod config;
pub mod error;
#[cfg(feature = "reqwest")] pub mod http;
pub mod ledger;
pub mod obs;
pub mod rotator;
pub mod store;
pub mod token;
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers shared by unit and integration tests.

	pub use crate::_prelude::*;

	// std
	use std::{
		env, fs, io,
		path::{Path, PathBuf},
		time::{SystemTime, UNIX_EPOCH},
	};

	/// Returns a unique token file path under the system temp directory.
	pub fn temp_store_path(label: &str) -> PathBuf {
		let nanos = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_nanos()).unwrap_or(0);

		env::temp_dir()
			.join(format!("erf_ledger_{label}_{}_{nanos}", std::process::id()))
			.join("token.json")
	}

	/// Copies a persisted token file, creating the destination's parent directory.
	///
	/// This is the clone operation: the copy resumes the same lineage as the source.
	pub fn clone_store_file(src: &Path, dst: &Path) -> io::Result<()> {
		if let Some(parent) = dst.parent() {
			fs::create_dir_all(parent)?;
		}

		fs::copy(src, dst).map(|_| ())
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)]
use {color_eyre as _, criterion as _, httpmock as _, tokio as _, tracing_subscriber as _};
