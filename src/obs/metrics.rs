// self
use crate::obs::{AdmissionOutcome, SubmitOutcome};

/// Records an admission outcome via the global metrics recorder (when enabled).
pub fn record_admission(outcome: AdmissionOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("ismp_gate_admission_total", "outcome" => outcome.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}

/// Records a submission outcome via the global metrics recorder (when enabled).
pub fn record_submission(outcome: SubmitOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("ismp_gate_submission_total", "outcome" => outcome.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recorders_noop_without_metrics() {
		record_admission(AdmissionOutcome::Immediate);
		record_submission(SubmitOutcome::Failure);
	}
}
