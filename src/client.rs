//! High-level facade that combines the admission gate with a submitter.

// self
use crate::{
	_prelude::*,
	document::{Document, Signature},
	error::ConfigError,
	gate::RateGate,
	obs::{self, SubmitOutcome, SubmitSpan},
	submit::{SubmitReceipt, SubmitRequest, Submitter},
};
#[cfg(feature = "reqwest")] use crate::submit::ReqwestSubmitter;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestIsmpClient = IsmpClient<ReqwestSubmitter>;

/// Coordinates gated document submissions against a single registry.
///
/// The client owns the admission gate and a shared submitter so call sites deal only with
/// documents and signatures. Every submission passes the gate exactly once before the
/// transport is invoked, and a failed submission never refunds its window slot; construct one
/// client per registry budget and share it, since clones drain the same gate.
#[derive(Clone)]
pub struct IsmpClient<S>
where
	S: ?Sized + Submitter,
{
	/// Admission gate bounding this client's submission rate.
	pub gate: Arc<RateGate>,
	/// Transport invoked once per admitted submission.
	pub submitter: Arc<S>,
	/// Optional bound on how long a caller may wait for admission.
	pub patience: Option<Duration>,
}
impl<S> IsmpClient<S>
where
	S: ?Sized + Submitter,
{
	/// Creates a client around a fresh gate and the caller-provided transport.
	pub fn with_submitter(
		limit: u32,
		period: Duration,
		submitter: impl Into<Arc<S>>,
	) -> Result<Self, ConfigError> {
		Ok(Self::with_gate(Arc::new(RateGate::new(limit, period)?), submitter))
	}

	/// Creates a client around an existing gate so several clients can drain one budget.
	pub fn with_gate(gate: Arc<RateGate>, submitter: impl Into<Arc<S>>) -> Self {
		Self { gate, submitter: submitter.into(), patience: None }
	}

	/// Bounds every admission wait; expiry surfaces
	/// [`GateError::Cancelled`](crate::error::GateError::Cancelled).
	pub fn with_patience(mut self, patience: Duration) -> Self {
		self.patience = Some(patience);

		self
	}

	/// Submits one document for circulation after passing the admission gate.
	///
	/// Suspends while the gate is saturated. The submitter is invoked exactly once per call;
	/// rejected or failed submissions surface as-is and still consume the admission they were
	/// granted.
	pub async fn put_into_circulation(
		&self,
		document: Document,
		signature: Signature,
	) -> Result<SubmitReceipt> {
		let span = SubmitSpan::new("put_into_circulation");

		obs::record_submission(SubmitOutcome::Attempt);

		let result = span
			.instrument(async move {
				self.admit().await?;

				self.submitter.submit(SubmitRequest::new(document, signature)).await
			})
			.await;

		match &result {
			Ok(_) => obs::record_submission(SubmitOutcome::Success),
			Err(_) => obs::record_submission(SubmitOutcome::Failure),
		}

		result
	}

	async fn admit(&self) -> Result<()> {
		match self.patience {
			Some(patience) => {
				self.gate.acquire_within(patience).await?;
			},
			None => {
				self.gate.acquire().await;
			},
		}

		Ok(())
	}
}
#[cfg(feature = "reqwest")]
impl IsmpClient<ReqwestSubmitter> {
	/// Creates a gate-limited client posting to the production registry.
	///
	/// The client provisions its own reqwest-backed transport; use
	/// [`IsmpClient::with_submitter`] to supply a custom transport or
	/// [`ReqwestSubmitter::with_endpoint`] to target another contour.
	pub fn new(limit: u32, period: Duration) -> Result<Self, ConfigError> {
		Self::with_submitter(limit, period, ReqwestSubmitter::new()?)
	}
}
impl<S> Debug for IsmpClient<S>
where
	S: ?Sized + Submitter,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("IsmpClient")
			.field("limit", &self.gate.limit())
			.field("period", &self.gate.period())
			.field("patience", &self.patience)
			.finish()
	}
}
