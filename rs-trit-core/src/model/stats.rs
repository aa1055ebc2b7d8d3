use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::digit::{Digit, Transition};

/// Running counters of a generation session.
///
/// Conceptually this is the observed side of a 3-state Markov chain: how
/// often each digit was emitted and how often each `(previous, current)`
/// edge was taken.
///
/// ## Invariants (for counters fed by a single generator since its last reset)
/// - `total_count == frequency.iter().sum()`
/// - `transitions.values().sum() == max(total_count - 1, 0)`
#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
	total_count: u64,
	/// Emission count per digit, indexed by `Digit::index`.
	frequency: [u64; 3],
	/// Sparse edge counts. Absent transitions were never observed.
	transitions: HashMap<Transition, u64>,
	/// Clock reading taken when the session (re)started.
	started_at: Duration,
}

impl Stats {
	/// Creates empty counters with the given time baseline.
	pub fn new(started_at: Duration) -> Self {
		Self {
			total_count: 0,
			frequency: [0; 3],
			transitions: HashMap::new(),
			started_at,
		}
	}

	/// Builds counters for an arbitrary sequence.
	///
	/// Unlike generator output, `sequence` may contain repeated digits; they
	/// are recorded as `d->d` transitions.
	pub fn from_sequence(sequence: &[Digit]) -> Self {
		let mut stats = Self::new(Duration::ZERO);
		let mut previous = None;
		for digit in sequence {
			stats.record(previous, *digit);
			previous = Some(*digit);
		}
		stats
	}

	/// Records an emitted digit and, if there was one, the edge from the
	/// previous digit.
	pub fn record(&mut self, previous: Option<Digit>, digit: Digit) {
		self.total_count += 1;
		self.frequency[digit.index()] += 1;
		if let Some(previous) = previous {
			*self.transitions.entry(Transition::new(previous, digit)).or_insert(0) += 1;
		}
	}

	pub fn total_count(&self) -> u64 {
		self.total_count
	}

	pub fn frequency(&self, digit: Digit) -> u64 {
		self.frequency[digit.index()]
	}

	/// Count of a single transition, 0 if never observed.
	pub fn transition(&self, from: Digit, to: Digit) -> u64 {
		self.transitions.get(&Transition::new(from, to)).copied().unwrap_or(0)
	}

	pub fn transitions(&self) -> &HashMap<Transition, u64> {
		&self.transitions
	}

	/// Sum of all transition counts.
	pub fn transition_total(&self) -> u64 {
		self.transitions.values().sum()
	}

	pub fn started_at(&self) -> Duration {
		self.started_at
	}

	/// Adds the counters of `other` into this one.
	///
	/// The time baseline of `self` is kept. Merged counters describe several
	/// independent sessions, so the transition invariant becomes
	/// `sum(transitions) == total_count - sessions`.
	pub fn merge(&mut self, other: &Self) {
		self.total_count += other.total_count;
		for digit in Digit::ALL {
			self.frequency[digit.index()] += other.frequency[digit.index()];
		}
		for (transition, count) in &other.transitions {
			*self.transitions.entry(*transition).or_insert(0) += *count;
		}
	}

	/// Derives a report at clock reading `now`.
	///
	/// # Behavior
	/// - elapsed time is `now - started_at` in seconds (saturating at 0)
	/// - rate is `total / elapsed`, or 0 when no time elapsed
	/// - average time is `elapsed / total`, or 0 when nothing was generated
	/// - percentages are 0 when nothing was generated
	pub fn report(&self, now: Duration, current: Option<Digit>) -> StatsReport {
		let elapsed = now.saturating_sub(self.started_at).as_secs_f64();
		let total = self.total_count as f64;

		let generation_rate = if elapsed > 0.0 { total / elapsed } else { 0.0 };
		let average_time_per_generation = if self.total_count > 0 { elapsed / total } else { 0.0 };

		let frequency_analysis = Digit::ALL.map(|digit| {
			let count = self.frequency(digit);
			let percentage = if self.total_count > 0 {
				count as f64 / total * 100.0
			} else {
				0.0
			};
			DigitFrequency { digit, count, percentage }
		});

		StatsReport {
			total_generated: self.total_count,
			elapsed_time_seconds: elapsed,
			generation_rate,
			average_time_per_generation,
			frequency_analysis,
			transition_analysis: self.transitions.iter().map(|(t, c)| (*t, *c)).collect(),
			current_number: current,
		}
	}
}

/// Emission count and share of a single digit.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct DigitFrequency {
	pub digit: Digit,
	pub count: u64,
	/// Share of all emissions, in percent (0..=100).
	pub percentage: f64,
}

/// Snapshot of the statistics of a generator.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StatsReport {
	pub total_generated: u64,
	pub elapsed_time_seconds: f64,
	/// Generations per second.
	pub generation_rate: f64,
	/// Seconds per generation.
	pub average_time_per_generation: f64,
	/// One entry per digit, in ascending digit order.
	pub frequency_analysis: [DigitFrequency; 3],
	/// Observed transition counts, keyed `"from->to"` once serialized.
	pub transition_analysis: BTreeMap<Transition, u64>,
	/// Last emitted digit, `None` before the first generation.
	pub current_number: Option<Digit>,
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;

	fn digits(raw: &[u8]) -> Vec<Digit> {
		raw.iter().map(|v| Digit::try_from(*v).unwrap()).collect()
	}

	#[test]
	fn record_updates_counts_and_edges() {
		let stats = Stats::from_sequence(&digits(&[0, 1, 0, 2]));
		assert_eq!(stats.total_count(), 4);
		assert_eq!(stats.frequency(Digit::Zero), 2);
		assert_eq!(stats.frequency(Digit::One), 1);
		assert_eq!(stats.frequency(Digit::Two), 1);
		assert_eq!(stats.transition(Digit::Zero, Digit::One), 1);
		assert_eq!(stats.transition(Digit::One, Digit::Zero), 1);
		assert_eq!(stats.transition(Digit::Zero, Digit::Two), 1);
		assert_eq!(stats.transition(Digit::Two, Digit::One), 0);
		assert_eq!(stats.transition_total(), 3);
		assert_eq!(stats.transitions().len(), 3);
		assert!(stats.transitions().keys().all(|t| !t.is_repeat()));
	}

	#[test]
	fn empty_report_has_zero_derivations() {
		let stats = Stats::new(Duration::from_secs(1));
		let report = stats.report(Duration::from_secs(1), None);
		assert_eq!(report.total_generated, 0);
		assert_eq!(report.elapsed_time_seconds, 0.0);
		assert_eq!(report.generation_rate, 0.0);
		assert_eq!(report.average_time_per_generation, 0.0);
		assert!(report.frequency_analysis.iter().all(|f| f.count == 0 && f.percentage == 0.0));
		assert!(report.transition_analysis.is_empty());
		assert_eq!(report.current_number, None);
	}

	#[test]
	fn report_derives_rates_from_elapsed_time() {
		let stats = Stats::from_sequence(&digits(&[0, 1, 2, 1]));
		let report = stats.report(Duration::from_secs(2), Some(Digit::One));
		assert_relative_eq!(report.elapsed_time_seconds, 2.0);
		assert_relative_eq!(report.generation_rate, 2.0);
		assert_relative_eq!(report.average_time_per_generation, 0.5);
		assert_relative_eq!(report.frequency_analysis[1].percentage, 50.0);
		assert_relative_eq!(report.frequency_analysis[0].percentage, 25.0);
		assert_eq!(report.current_number, Some(Digit::One));
	}

	#[test]
	fn elapsed_time_saturates_before_baseline() {
		let stats = Stats::new(Duration::from_secs(5));
		assert_eq!(stats.started_at(), Duration::from_secs(5));
		let report = stats.report(Duration::from_secs(3), None);
		assert_eq!(report.elapsed_time_seconds, 0.0);
	}

	#[test]
	fn merge_sums_counters() {
		let mut a = Stats::from_sequence(&digits(&[0, 1, 0]));
		let b = Stats::from_sequence(&digits(&[0, 1]));
		a.merge(&b);
		assert_eq!(a.total_count(), 5);
		assert_eq!(a.frequency(Digit::Zero), 3);
		assert_eq!(a.transition(Digit::Zero, Digit::One), 2);
		assert_eq!(a.transition_total(), 5 - 2);
	}

	#[test]
	fn report_serializes_transitions_with_arrow_keys() {
		let stats = Stats::from_sequence(&digits(&[2, 0]));
		let json = serde_json::to_value(stats.report(Duration::ZERO, Some(Digit::Zero))).unwrap();
		assert_eq!(json["transition_analysis"]["2->0"], 1);
		assert_eq!(json["current_number"], 0);
	}
}
