//! Thread-safe in-memory [`Submitter`] implementation for local development and tests.

// std
use std::collections::VecDeque;
// self
use crate::{
	_prelude::*,
	error::SubmissionError,
	submit::{SubmitFuture, SubmitReceipt, SubmitRequest, Submitter},
};

type RequestLog = Arc<RwLock<Vec<SubmitRequest>>>;
type ReplyQueue = Arc<RwLock<VecDeque<Reply>>>;

/// Next reply the fake should produce.
#[derive(Clone, Debug)]
enum Reply {
	Accept(SubmitReceipt),
	Reject { status: u16, body: String },
}

/// Submitter fake that records every request and answers from a scripted reply queue.
///
/// With an empty queue every submission succeeds with an empty-bodied 200 receipt, so the
/// default value is a permissive sink for gate-focused tests. Rejected submissions are still
/// recorded: the gate does not refund slots, and the log mirrors that.
#[derive(Clone, Debug, Default)]
pub struct MemorySubmitter {
	requests: RequestLog,
	replies: ReplyQueue,
}
impl MemorySubmitter {
	/// Queues a 200 receipt carrying the provided body.
	pub fn push_success(&self, body: impl Into<String>) {
		self.replies.write().push_back(Reply::Accept(SubmitReceipt {
			status: 200,
			body: body.into(),
		}));
	}

	/// Queues a rejection with the provided status and body.
	pub fn push_rejection(&self, status: u16, body: impl Into<String>) {
		self.replies.write().push_back(Reply::Reject { status, body: body.into() });
	}

	/// Returns a copy of every request received so far, in arrival order.
	pub fn requests(&self) -> Vec<SubmitRequest> {
		self.requests.read().clone()
	}

	/// Number of requests received so far.
	pub fn request_count(&self) -> usize {
		self.requests.read().len()
	}

	fn submit_now(
		requests: RequestLog,
		replies: ReplyQueue,
		request: SubmitRequest,
	) -> Result<SubmitReceipt> {
		requests.write().push(request);

		match replies.write().pop_front() {
			None => Ok(SubmitReceipt { status: 200, body: String::new() }),
			Some(Reply::Accept(receipt)) => Ok(receipt),
			Some(Reply::Reject { status, body }) =>
				Err(Error::from(SubmissionError::Rejected { status, body, retry_after: None })),
		}
	}
}
impl Submitter for MemorySubmitter {
	fn submit(&self, request: SubmitRequest) -> SubmitFuture<'_> {
		let requests = self.requests.clone();
		let replies = self.replies.clone();

		Box::pin(async move { Self::submit_now(requests, replies, request) })
	}
}
