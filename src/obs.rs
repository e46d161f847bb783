//! Optional observability helpers for gated submissions.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `ismp_gate.submit` with the `stage`
//!   (call site) field around each gated submission.
//! - Enable `metrics` to increment the `ismp_gate_admission_total` counter for every
//!   admission (labeled by `outcome`: immediate/waited/cancelled) and the
//!   `ismp_gate_submission_total` counter for every submission attempt/success/failure.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// How an admission attempt concluded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AdmissionOutcome {
	/// The window had a free slot; the caller never suspended.
	Immediate,
	/// The caller suspended at least once before being admitted.
	Waited,
	/// A bounded wait gave up before being admitted.
	Cancelled,
}
impl AdmissionOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			AdmissionOutcome::Immediate => "immediate",
			AdmissionOutcome::Waited => "waited",
			AdmissionOutcome::Cancelled => "cancelled",
		}
	}
}
impl Display for AdmissionOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubmitOutcome {
	/// Entry to the submission facade.
	Attempt,
	/// Registry accepted the document.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl SubmitOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			SubmitOutcome::Attempt => "attempt",
			SubmitOutcome::Success => "success",
			SubmitOutcome::Failure => "failure",
		}
	}
}
impl Display for SubmitOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
