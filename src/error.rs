//! Crate-level error types shared across the gate, transports, and the client facade.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Admission gate condition.
	#[error(transparent)]
	Gate(#[from] GateError),
	/// Registry reported the submission as failed.
	#[error(transparent)]
	Submission(#[from] SubmissionError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
}

/// Configuration and validation failures rejected at construction time.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Gate limit must admit at least one caller per window.
	#[error("Admission limit must be greater than zero.")]
	ZeroLimit,
	/// Gate window must span a positive duration.
	#[error("Window period must be greater than zero.")]
	ZeroPeriod,

	/// Registry endpoint cannot be parsed.
	#[error("Registry endpoint is invalid.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}

/// Failed admission waits raised by [`RateGate`](crate::gate::RateGate).
#[derive(Debug, ThisError)]
pub enum GateError {
	/// The bounded wait gave up before a window slot opened; no slot was consumed and the window
	/// state is untouched.
	#[error("Admission wait was abandoned after {waited:?}.")]
	Cancelled {
		/// Time the caller spent waiting before giving up.
		waited: Duration,
	},
}

/// Submissions the registry accepted on the wire but reported as failed.
#[derive(Debug, ThisError)]
pub enum SubmissionError {
	/// Registry answered with a status other than 200.
	#[error("Registry rejected the submission with status {status}: {body}")]
	Rejected {
		/// HTTP status code returned by the registry.
		status: u16,
		/// Response body, kept verbatim for diagnostics.
		body: String,
		/// Retry-After hint from the registry, if supplied.
		retry_after: Option<Duration>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the registry.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the registry.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
