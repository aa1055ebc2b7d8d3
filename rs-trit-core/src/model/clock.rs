use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time source used for elapsed-time statistics.
///
/// Readings are offsets from an arbitrary, fixed origin; only differences
/// between two readings are meaningful.
pub trait Clock {
	fn now(&self) -> Duration;
}

/// Wall-independent clock backed by `Instant`.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
	origin: Instant,
}

impl MonotonicClock {
	pub fn new() -> Self {
		Self { origin: Instant::now() }
	}
}

impl Default for MonotonicClock {
	fn default() -> Self {
		Self::new()
	}
}

impl Clock for MonotonicClock {
	fn now(&self) -> Duration {
		self.origin.elapsed()
	}
}

/// Hand-driven clock for deterministic timing in tests.
///
/// Clones share the same reading, so a test can keep one handle and give
/// the other to a generator.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
	reading: Rc<Cell<Duration>>,
}

impl ManualClock {
	pub fn new() -> Self {
		Self::default()
	}

	/// Moves the clock forward by `step`.
	pub fn advance(&self, step: Duration) {
		self.reading.set(self.reading.get() + step);
	}
}

impl Clock for ManualClock {
	fn now(&self) -> Duration {
		self.reading.get()
	}
}
