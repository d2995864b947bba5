// self
use crate::{_prelude::*, store::StoreError};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedRequest<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedRequest<F> = F;

/// A span wrapping one JSON-RPC call.
#[derive(Clone, Debug)]
pub struct RequestSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl RequestSpan {
	/// Creates a new span tagged with the remote method; `route_id` is recorded later.
	pub fn new(method: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"jsonrpc_miniapp.request",
				method,
				route_id = tracing::field::Empty
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = method;

			Self {}
		}
	}

	/// Records the route id observed for this request.
	pub fn record_route_id(&self, route_id: u64) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("route_id", route_id);
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = route_id;
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedRequest<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Notes a storage read that failed and was treated as absent.
pub fn storage_read_failed(key: &str, error: &StoreError) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(key, %error, "storage read failed; treating value as absent");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (key, error);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn request_span_noop_without_tracing() {
		let span = RequestSpan::new("user.getProfile");

		span.record_route_id(2);
		storage_read_failed("JWT", &StoreError::Backend { message: "unavailable".into() });
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = RequestSpan::new("instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
