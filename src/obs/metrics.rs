// self
use crate::{endpoint::EndpointKind, obs::FetchOutcome};

/// Records a provider call outcome via the global metrics recorder (when enabled).
pub fn record_fetch_outcome(endpoint: EndpointKind, outcome: FetchOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth2_linkedin_fetch_total",
			"endpoint" => endpoint.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (endpoint, outcome);
	}
}
