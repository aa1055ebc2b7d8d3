use serde::{Deserialize, Serialize};

use crate::model::digit::Digit;
use crate::model::stats::Stats;

/// Both legal probabilities within this distance of 0.5 count as uniform.
const UNIFORM_TOLERANCE: f64 = 0.05;

/// Above this max/min ratio a row is considered clearly skewed (2:1 is 2.0).
const SKEW_RATIO: f64 = 1.8;

/// How the two legal successors of a digit are balanced.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BiasKind {
	/// Close to 1:1.
	Uniform,
	/// Ratio above 1.8, e.g. the 2:1 rows of the remap table.
	Skewed,
	/// Anything in between.
	SlightlySkewed,
}

/// Balance of the successors of one digit.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RowBias {
	pub previous: Digit,
	pub kind: BiasKind,
	/// `max / min` of the two successor probabilities.
	pub ratio: f64,
	/// Probabilities of the two successors, in ascending digit order.
	pub probabilities: [f64; 2],
}

/// Derived view over a set of counters.
///
/// # Contents
/// - overall frequencies and their ratios
/// - conditional probabilities `P(next | previous)`
/// - per-row bias of the successors
/// - number of repeated-digit transitions (constraint violations)
/// - chi-square statistic against a uniform 1/3 distribution
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SequenceAnalysis {
	pub total_count: u64,
	pub frequencies: [u64; 3],
	pub frequency_ratios: [f64; 3],
	/// `conditional_probabilities[previous][next]`. Rows never observed are all 0.
	pub conditional_probabilities: [[f64; 3]; 3],
	/// Only rows with two observed, non-zero successors are listed.
	pub bias: Vec<RowBias>,
	pub violations: u64,
	pub chi_square: f64,
}

impl SequenceAnalysis {
	/// Analyzes the given counters.
	pub fn from_stats(stats: &Stats) -> Self {
		let total_count = stats.total_count();
		let frequencies = Digit::ALL.map(|d| stats.frequency(d));
		let frequency_ratios = frequencies.map(|count| ratio(count, total_count));

		let conditional_probabilities = Digit::ALL.map(|previous| {
			let row_total: u64 = Digit::ALL.iter().map(|next| stats.transition(previous, *next)).sum();
			Digit::ALL.map(|next| ratio(stats.transition(previous, next), row_total))
		});

		let bias = Digit::ALL
			.iter()
			.filter_map(|previous| row_bias(*previous, &conditional_probabilities[previous.index()]))
			.collect();

		let violations = Digit::ALL.iter().map(|d| stats.transition(*d, *d)).sum();

		Self {
			total_count,
			frequencies,
			frequency_ratios,
			conditional_probabilities,
			bias,
			violations,
			chi_square: chi_square(&frequencies, total_count),
		}
	}

	/// Analyzes an arbitrary sequence, repeats included.
	pub fn from_sequence(sequence: &[Digit]) -> Self {
		Self::from_stats(&Stats::from_sequence(sequence))
	}

	/// `true` when no digit ever followed itself.
	pub fn is_constraint_satisfied(&self) -> bool {
		self.violations == 0
	}

	/// Bias of the successors of `previous`, if that row was analyzable.
	pub fn bias_of(&self, previous: Digit) -> Option<&RowBias> {
		self.bias.iter().find(|b| b.previous == previous)
	}
}

fn ratio(count: u64, total: u64) -> f64 {
	if total == 0 { 0.0 } else { count as f64 / total as f64 }
}

fn row_bias(previous: Digit, row: &[f64; 3]) -> Option<RowBias> {
	let successors: Vec<f64> = Digit::ALL
		.iter()
		.filter(|next| **next != previous)
		.map(|next| row[next.index()])
		.collect();

	let (p1, p2) = (successors[0], successors[1]);
	if p1 <= 0.0 || p2 <= 0.0 {
		return None;
	}

	let ratio = p1.max(p2) / p1.min(p2);
	let kind = if (p1 - 0.5).abs() < UNIFORM_TOLERANCE && (p2 - 0.5).abs() < UNIFORM_TOLERANCE {
		BiasKind::Uniform
	} else if ratio > SKEW_RATIO {
		BiasKind::Skewed
	} else {
		BiasKind::SlightlySkewed
	};

	Some(RowBias { previous, kind, ratio, probabilities: [p1, p2] })
}

fn chi_square(frequencies: &[u64; 3], total: u64) -> f64 {
	if total == 0 {
		return 0.0;
	}
	let expected = total as f64 / 3.0;
	frequencies
		.iter()
		.map(|count| (*count as f64 - expected).powi(2) / expected)
		.sum()
}

#[cfg(test)]
mod tests {
	use approx::assert_relative_eq;

	use super::*;
	use crate::model::clock::MonotonicClock;
	use crate::model::digit::parse_digits;
	use crate::model::generator::SequenceGenerator;
	use crate::model::remap::RemapStrategy;
	use crate::model::source::RngSource;

	#[test]
	fn empty_counters() {
		let analysis = SequenceAnalysis::from_sequence(&[]);
		assert_eq!(analysis.total_count, 0);
		assert_eq!(analysis.frequency_ratios, [0.0; 3]);
		assert_eq!(analysis.conditional_probabilities, [[0.0; 3]; 3]);
		assert!(analysis.bias.is_empty());
		assert_eq!(analysis.chi_square, 0.0);
		assert!(analysis.is_constraint_satisfied());
	}

	#[test]
	fn repeats_are_reported_as_violations() {
		let analysis = SequenceAnalysis::from_sequence(&parse_digits("0011222").unwrap());
		assert_eq!(analysis.violations, 4);
		assert!(!analysis.is_constraint_satisfied());
	}

	#[test]
	fn conditional_probabilities_and_chi_square() {
		// 0->1 twice, 0->2 once, 1->0 twice, 2->0 once
		let analysis = SequenceAnalysis::from_sequence(&parse_digits("0102010").unwrap());
		assert_relative_eq!(analysis.conditional_probabilities[0][1], 2.0 / 3.0);
		assert_relative_eq!(analysis.conditional_probabilities[0][2], 1.0 / 3.0);
		assert_relative_eq!(analysis.conditional_probabilities[1][0], 1.0);
		assert_eq!(analysis.bias.len(), 1);

		let row = analysis.bias_of(Digit::Zero).unwrap();
		assert_eq!(row.kind, BiasKind::Skewed);
		assert_relative_eq!(row.ratio, 2.0);

		// counts 4, 2, 1 with expected 7/3
		let expected = 7.0 / 3.0;
		let chi = [4.0, 2.0, 1.0].iter().map(|c: &f64| (c - expected).powi(2) / expected).sum::<f64>();
		assert_relative_eq!(analysis.chi_square, chi);
	}

	#[test]
	fn table_strategy_rows_are_skewed_two_to_one() {
		let mut generator = SequenceGenerator::with_seed(12345);
		generator.generate_sequence(30_000);
		let analysis = SequenceAnalysis::from_stats(generator.stats());

		assert!(analysis.is_constraint_satisfied());
		for previous in Digit::ALL {
			let row = analysis.bias_of(previous).unwrap();
			assert_eq!(row.kind, BiasKind::Skewed, "row {}", previous);
			assert!((row.ratio - 2.0).abs() < 0.2, "row {} ratio {}", previous, row.ratio);
		}
		// Stationary distribution of the table chain is (0.40, 0.35, 0.25)
		assert!((analysis.frequency_ratios[0] - 0.40).abs() < 0.02);
		assert!((analysis.frequency_ratios[1] - 0.35).abs() < 0.02);
		assert!((analysis.frequency_ratios[2] - 0.25).abs() < 0.02);
	}

	#[test]
	fn rejection_strategy_rows_are_uniform() {
		let mut generator = SequenceGenerator::with_parts(
			RngSource::with_seed(54321),
			MonotonicClock::new(),
			RemapStrategy::Rejection,
		);
		generator.generate_sequence(30_000);
		let analysis = SequenceAnalysis::from_stats(generator.stats());

		assert!(analysis.is_constraint_satisfied());
		for previous in Digit::ALL {
			assert_eq!(analysis.bias_of(previous).unwrap().kind, BiasKind::Uniform);
		}
	}
}
