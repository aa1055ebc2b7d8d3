use log::debug;

use super::clock::{Clock, MonotonicClock};
use super::digit::Digit;
use super::remap::{remap, RemapStrategy, MAX_RETRIES};
use super::source::{CandidateSource, RngSource};
use super::stats::{Stats, StatsReport};

/// Generator of digits in {0, 1, 2} that never repeats the previous digit.
///
/// # Responsibilities
/// - Draw a raw candidate from the `CandidateSource`
/// - Turn it into a legal digit according to the `RemapStrategy`
/// - Keep the `Stats` of the session up to date
///
/// A generator owns its state and is meant to be used from a single place;
/// wrap it in a lock if it has to be shared.
#[derive(Debug)]
pub struct SequenceGenerator<S: CandidateSource = RngSource, C: Clock = MonotonicClock> {
	source: S,
	clock: C,
	strategy: RemapStrategy,
	previous: Option<Digit>,
	stats: Stats,
}

impl SequenceGenerator {
	/// Creates a generator drawing from an OS-seeded PRNG.
	pub fn new() -> Self {
		Self::with_source(RngSource::new())
	}

	/// Creates a reproducible generator: equal seeds give equal sequences.
	pub fn with_seed(seed: u64) -> Self {
		Self::with_source(RngSource::with_seed(seed))
	}
}

impl Default for SequenceGenerator {
	fn default() -> Self {
		Self::new()
	}
}

impl<S: CandidateSource> SequenceGenerator<S, MonotonicClock> {
	/// Creates a table-strategy generator around a custom candidate source.
	pub fn with_source(source: S) -> Self {
		Self::with_parts(source, MonotonicClock::new(), RemapStrategy::Table)
	}
}

impl<S: CandidateSource, C: Clock> SequenceGenerator<S, C> {
	/// Creates a generator from all of its collaborators.
	pub fn with_parts(source: S, clock: C, strategy: RemapStrategy) -> Self {
		debug!("Creating sequence generator with {:?} strategy", strategy);
		let stats = Stats::new(clock.now());
		Self {
			source,
			clock,
			strategy,
			previous: None,
			stats,
		}
	}

	/// Produces the next digit.
	///
	/// # Behavior
	/// - First call after creation or `reset`: the raw candidate is emitted as is.
	/// - Afterwards, with `RemapStrategy::Table`: `REMAP_TABLE[previous][candidate]`.
	/// - Afterwards, with `RemapStrategy::Rejection`: candidates equal to the
	///   previous digit are discarded and redrawn, at most `MAX_RETRIES` times;
	///   if the last redraw still repeats, it is remapped through the table.
	///
	/// The emitted digit is recorded in the statistics together with the
	/// transition from the previous digit.
	pub fn generate_number(&mut self) -> Digit {
		let candidate = self.source.next_candidate();

		let digit = match (self.previous, self.strategy) {
			(None, _) => candidate,
			(Some(previous), RemapStrategy::Table) => remap(previous, candidate),
			(Some(previous), RemapStrategy::Rejection) => {
				let mut candidate = candidate;
				let mut retries = 0;
				while candidate == previous && retries < MAX_RETRIES {
					candidate = self.source.next_candidate();
					retries += 1;
				}
				if candidate == previous {
					remap(previous, candidate)
				} else {
					candidate
				}
			}
		};

		self.stats.record(self.previous, digit);
		self.previous = Some(digit);
		digit
	}

	/// Generates `count` digits in order.
	pub fn generate_sequence(&mut self, count: usize) -> Vec<Digit> {
		(0..count).map(|_| self.generate_number()).collect()
	}

	/// Forgets the previous digit and restarts the statistics.
	///
	/// The elapsed-time baseline is taken again from the clock.
	pub fn reset(&mut self) {
		debug!("Resetting generator after {} generations", self.stats.total_count());
		self.previous = None;
		self.stats = Stats::new(self.clock.now());
	}

	/// Snapshot of the statistics at the current clock reading.
	pub fn statistics(&self) -> StatsReport {
		self.stats.report(self.clock.now(), self.previous)
	}

	/// Last emitted digit, `None` before the first generation.
	pub fn current(&self) -> Option<Digit> {
		self.previous
	}

	pub fn strategy(&self) -> RemapStrategy {
		self.strategy
	}

	/// Read-only access to the raw counters.
	pub fn stats(&self) -> &Stats {
		&self.stats
	}

	/// Consumes the generator and returns its counters.
	pub fn into_stats(self) -> Stats {
		self.stats
	}
}
