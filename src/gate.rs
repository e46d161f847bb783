//! Fixed-window admission gate that bounds how many submissions leave the process per window.
//!
//! [`RateGate`] is a blocking throttle, not a load shedder: every window of `period` admits at
//! most `limit` callers, and excess callers suspend inside [`RateGate::acquire`] until the window
//! turns over. All waiting happens on the calling task; the gate spawns nothing, drops nothing,
//! and never admits past the limit.

// self
use crate::{
	_prelude::*,
	error::{ConfigError, GateError},
	obs::{self, AdmissionOutcome},
};

/// Window state guarded by the gate's mutex.
#[derive(Debug)]
struct Window {
	/// Instant the current window began.
	start: Instant,
	/// Admissions granted since `start`.
	count: u32,
	/// Admissions granted over the gate's lifetime.
	admitted: u64,
	/// Acquires that suspended at least once before being admitted.
	waits: u64,
	/// Bounded acquires that gave up before being admitted.
	cancellations: u64,
}

/// Outcome of one pass over the window under the lock.
enum Pass {
	/// A slot was granted.
	Admitted(Admission),
	/// The window is full; retry after the remaining duration.
	Saturated {
		/// Time left until the current window can turn over.
		remaining: Duration,
	},
}

/// Thread-safe fixed-window admission gate.
///
/// Construct one gate per upstream budget and share it (behind an [`Arc`] or by reference)
/// between every task that submits. The window state lives behind a single async mutex, the
/// mutex is never held across a suspension, and admission requires exactly one lock round-trip
/// per wake.
///
/// When a saturated window forces callers to wait, the next window starts at the instant the
/// first waiter wakes rather than at `start + period`. Under sustained overload the window
/// boundary therefore drifts forward a little on every turnover; the ceiling of `limit`
/// admissions per window is unaffected.
#[derive(Debug)]
pub struct RateGate {
	limit: u32,
	period: Duration,
	window: AsyncMutex<Window>,
}
impl RateGate {
	/// Constructs a gate admitting at most `limit` callers per `period`.
	///
	/// The first window begins immediately.
	pub fn new(limit: u32, period: Duration) -> Result<Self, ConfigError> {
		if limit == 0 {
			return Err(ConfigError::ZeroLimit);
		}
		if period.is_zero() {
			return Err(ConfigError::ZeroPeriod);
		}

		Ok(Self {
			limit,
			period,
			window: AsyncMutex::new(Window {
				start: Instant::now(),
				count: 0,
				admitted: 0,
				waits: 0,
				cancellations: 0,
			}),
		})
	}

	/// Maximum admissions per window.
	pub fn limit(&self) -> u32 {
		self.limit
	}

	/// Window duration.
	pub fn period(&self) -> Duration {
		self.period
	}

	/// Waits until the current window has capacity, then consumes one slot.
	///
	/// At most `limit` callers return from this method per window; the rest sleep out the
	/// remainder of the window and drain in batches of `limit` per turnover, so a burst of
	/// waiters cannot be starved by a steady stream of fresh callers. Dropping the returned
	/// future before it resolves abandons the wait without consuming a slot or disturbing
	/// other waiters.
	pub async fn acquire(&self) -> Admission {
		let started = Instant::now();
		let mut slept = false;

		loop {
			let remaining = {
				let mut window = self.window.lock().await;

				match self.pass(&mut window, started, slept) {
					Pass::Admitted(admission) => return admission,
					Pass::Saturated { remaining } => remaining,
				}
			};

			// The lock is released while sleeping so cancellation and other callers are
			// never blocked on a sleeping holder.
			tokio::time::sleep(remaining).await;

			slept = true;
		}
	}

	/// Bounded [`RateGate::acquire`] that gives up once `patience` elapses.
	///
	/// Expiry surfaces [`GateError::Cancelled`]; the window state is untouched and waiters
	/// that queued behind the caller proceed as if the call never happened.
	pub async fn acquire_within(&self, patience: Duration) -> Result<Admission, GateError> {
		let started = Instant::now();

		match tokio::time::timeout(patience, self.acquire()).await {
			Ok(admission) => Ok(admission),
			Err(_) => {
				let waited = started.elapsed();

				self.window.lock().await.cancellations += 1;

				obs::record_admission(AdmissionOutcome::Cancelled);

				Err(GateError::Cancelled { waited })
			},
		}
	}

	/// Consumes a slot only if one is free right now.
	///
	/// Returns [`None`] when the window is saturated or the window lock is momentarily
	/// contended; this method never suspends.
	pub fn try_acquire(&self) -> Option<Admission> {
		let mut window = self.window.try_lock()?;
		let started = Instant::now();

		match self.pass(&mut window, started, false) {
			Pass::Admitted(admission) => Some(admission),
			Pass::Saturated { .. } => None,
		}
	}

	/// Copies the current gate state for diagnostics.
	///
	/// This is pure observation: an expired window is reported with `window_remaining` zero
	/// rather than eagerly turned over, since only admissions mutate the window.
	pub async fn snapshot(&self) -> GateSnapshot {
		let window = self.window.lock().await;
		let elapsed = Instant::now().saturating_duration_since(window.start);

		GateSnapshot {
			in_window: window.count,
			window_remaining: self.period.saturating_sub(elapsed),
			admitted: window.admitted,
			waits: window.waits,
			cancellations: window.cancellations,
		}
	}

	/// Runs one admission pass under the lock: lazily turns the window over, grants a slot if
	/// capacity remains, and otherwise reports how long the caller must wait.
	fn pass(&self, window: &mut Window, started: Instant, slept: bool) -> Pass {
		let now = Instant::now();
		let elapsed = now.saturating_duration_since(window.start);

		if elapsed > self.period {
			window.start = now;
			window.count = 0;
		}
		if window.count < self.limit {
			return Pass::Admitted(Self::admit(window, started, slept));
		}

		let remaining = self.period.saturating_sub(elapsed);

		if remaining.is_zero() {
			// Woke exactly on the boundary; turn the window over in place rather than
			// sleep for zero.
			window.start = now;
			window.count = 0;

			return Pass::Admitted(Self::admit(window, started, slept));
		}

		Pass::Saturated { remaining }
	}

	fn admit(window: &mut Window, started: Instant, slept: bool) -> Admission {
		window.count += 1;
		window.admitted += 1;

		if slept {
			window.waits += 1;
		}

		obs::record_admission(if slept {
			AdmissionOutcome::Waited
		} else {
			AdmissionOutcome::Immediate
		});

		Admission { waited: started.elapsed(), slot: window.count }
	}
}

/// Proof that the gate granted one slot in the current window.
///
/// The fields are purely informational; an admission carries no obligation and nothing is
/// refunded if the admitted work later fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Admission {
	/// Time spent inside the acquire call before the slot was granted.
	pub waited: Duration,
	/// One-based slot index within the window that granted this admission.
	pub slot: u32,
}

/// Point-in-time copy of gate state for diagnostics and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GateSnapshot {
	/// Admissions granted in the current window.
	pub in_window: u32,
	/// Time left before the current window can turn over.
	pub window_remaining: Duration,
	/// Admissions granted over the gate's lifetime.
	pub admitted: u64,
	/// Acquires that suspended at least once before being admitted.
	pub waits: u64,
	/// Bounded acquires that gave up before being admitted.
	pub cancellations: u64,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn gate(limit: u32, period_ms: u64) -> RateGate {
		RateGate::new(limit, Duration::from_millis(period_ms))
			.expect("Gate fixture parameters should be valid.")
	}

	#[test]
	fn rejects_zero_limit() {
		assert!(matches!(RateGate::new(0, Duration::from_secs(1)), Err(ConfigError::ZeroLimit)));
	}

	#[test]
	fn rejects_zero_period() {
		assert!(matches!(RateGate::new(1, Duration::ZERO), Err(ConfigError::ZeroPeriod)));
	}

	#[test]
	fn gate_error_nests_into_the_canonical_error() {
		let err = Error::from(GateError::Cancelled { waited: Duration::from_secs(1) });

		assert!(matches!(err, Error::Gate(GateError::Cancelled { .. })));
	}

	#[tokio::test(start_paused = true)]
	async fn admits_up_to_limit_without_suspending() {
		let gate = gate(3, 1_000);

		for slot in 1_u32..=3 {
			let admission = gate.try_acquire().expect("A fresh window should have capacity.");

			assert_eq!(admission.slot, slot);
			assert_eq!(admission.waited, Duration::ZERO);
		}

		assert!(gate.try_acquire().is_none());
	}

	#[tokio::test(start_paused = true)]
	async fn saturated_window_recovers_once_the_period_elapses() {
		let gate = gate(2, 100);

		assert!(gate.try_acquire().is_some());
		assert!(gate.try_acquire().is_some());
		assert!(gate.try_acquire().is_none());

		tokio::time::advance(Duration::from_millis(101)).await;

		assert!(gate.try_acquire().is_some());
	}

	#[tokio::test(start_paused = true)]
	async fn window_restarts_when_the_first_waiter_wakes() {
		let gate = gate(1, 100);
		let _ = gate.acquire().await;

		tokio::time::advance(Duration::from_millis(60)).await;

		let started = Instant::now();
		let admission = gate.acquire().await;

		assert_eq!(admission.waited, Duration::from_millis(40));
		assert_eq!(started.elapsed(), Duration::from_millis(40));

		// The restarted window runs a full period from the wake instant, not from the old
		// start.
		tokio::time::advance(Duration::from_millis(99)).await;

		assert!(gate.try_acquire().is_none());

		tokio::time::advance(Duration::from_millis(2)).await;

		assert!(gate.try_acquire().is_some());
	}

	#[tokio::test(start_paused = true)]
	async fn snapshot_tracks_window_and_lifetime_counters() {
		let gate = gate(2, 1_000);
		let _ = gate.acquire().await;
		let _ = gate.acquire().await;
		let snapshot = gate.snapshot().await;

		assert_eq!(snapshot.in_window, 2);
		assert_eq!(snapshot.admitted, 2);
		assert_eq!(snapshot.waits, 0);
		assert_eq!(snapshot.cancellations, 0);
		assert!(snapshot.window_remaining <= Duration::from_secs(1));
	}

	#[tokio::test(start_paused = true)]
	async fn bounded_wait_gives_up_without_consuming_a_slot() {
		let gate = gate(1, 10_000);
		let _ = gate.acquire().await;

		let err = gate
			.acquire_within(Duration::from_secs(1))
			.await
			.expect_err("The window should stay saturated for ten seconds.");

		assert!(matches!(err, GateError::Cancelled { waited } if waited >= Duration::from_secs(1)));

		let snapshot = gate.snapshot().await;

		assert_eq!(snapshot.in_window, 1);
		assert_eq!(snapshot.admitted, 1);
		assert_eq!(snapshot.cancellations, 1);
	}
}
