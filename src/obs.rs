//! Optional observability helpers for JSON-RPC calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `jsonrpc_miniapp.request` with the `method`
//!   and `route_id` fields, plus debug events for swallowed storage failures.
//! - Enable `metrics` to increment the `jsonrpc_miniapp_request_total` counter for every
//!   attempt/success/failure, labeled by `outcome` + failure `class`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestOutcome {
	/// Entry to [`Client::request`](crate::client::Client::request).
	Attempt,
	/// Result returned to the caller.
	Success,
	/// Error returned to the caller.
	Failure,
}
impl RequestOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RequestOutcome::Attempt => "attempt",
			RequestOutcome::Success => "success",
			RequestOutcome::Failure => "failure",
		}
	}
}
impl Display for RequestOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
