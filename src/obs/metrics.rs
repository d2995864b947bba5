// self
use crate::{error::ErrorClass, obs::RequestOutcome};

/// Records a request outcome via the global metrics recorder (when enabled).
pub fn record_request_outcome(outcome: RequestOutcome, class: Option<ErrorClass>) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"jsonrpc_miniapp_request_total",
			"outcome" => outcome.as_str(),
			"class" => class.map_or("none", ErrorClass::as_str)
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (outcome, class);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_request_outcome_noop_without_metrics() {
		record_request_outcome(RequestOutcome::Failure, Some(ErrorClass::Transport));
	}
}
