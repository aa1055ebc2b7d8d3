use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::TritError;
use super::digit::Digit;

/// Supplier of raw, uniformly distributed candidate digits.
///
/// The generator draws exactly one candidate per call with the table
/// strategy. Implementations must never block.
pub trait CandidateSource {
	/// Returns the next raw candidate.
	fn next_candidate(&mut self) -> Digit;
}

/// Candidate source backed by a `rand` generator.
///
/// Not suitable for anything security related: the default engine is a
/// seedable PRNG.
#[derive(Debug, Clone)]
pub struct RngSource<R: Rng = StdRng> {
	rng: R,
}

impl RngSource<StdRng> {
	/// Creates a source seeded from the operating system.
	pub fn new() -> Self {
		Self { rng: StdRng::from_os_rng() }
	}

	/// Creates a reproducible source: equal seeds give equal candidates.
	pub fn with_seed(seed: u64) -> Self {
		Self { rng: StdRng::seed_from_u64(seed) }
	}
}

impl Default for RngSource<StdRng> {
	fn default() -> Self {
		Self::new()
	}
}

impl<R: Rng> RngSource<R> {
	/// Wraps any `rand` generator.
	pub fn from_rng(rng: R) -> Self {
		Self { rng }
	}
}

impl<R: Rng> CandidateSource for RngSource<R> {
	fn next_candidate(&mut self) -> Digit {
		Digit::ALL[self.rng.random_range(0..Digit::ALL.len())]
	}
}

/// Scripted candidate source replaying a fixed sequence.
///
/// Once the sequence is exhausted it starts over from the beginning.
/// Mostly useful to drive the generator deterministically in tests.
#[derive(Debug, Clone)]
pub struct SequenceSource {
	candidates: Vec<Digit>,
	position: usize,
}

impl SequenceSource {
	/// Creates a source from already validated digits.
	///
	/// # Errors
	/// Returns `EmptySequence` if `candidates` is empty.
	pub fn new(candidates: Vec<Digit>) -> Result<Self, TritError> {
		if candidates.is_empty() {
			return Err(TritError::EmptySequence);
		}
		Ok(Self { candidates, position: 0 })
	}

	/// Creates a source from raw values.
	///
	/// # Errors
	/// - `InvalidDigit` on the first value outside {0, 1, 2}
	/// - `EmptySequence` if `raw` is empty
	pub fn from_raw(raw: &[u8]) -> Result<Self, TritError> {
		let candidates = raw
			.iter()
			.map(|v| Digit::try_from(*v))
			.collect::<Result<Vec<_>, _>>()?;
		Self::new(candidates)
	}

	/// Number of candidates handed out so far, wraps included.
	pub fn consumed(&self) -> usize {
		self.position
	}
}

impl CandidateSource for SequenceSource {
	fn next_candidate(&mut self) -> Digit {
		let candidate = self.candidates[self.position % self.candidates.len()];
		self.position += 1;
		candidate
	}
}
