use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::TritError;
use crate::model::clock::{Clock, MonotonicClock};
use crate::model::generator::SequenceGenerator;
use crate::model::source::CandidateSource;

/// Timing of a batch of generations.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BenchmarkResult {
	pub iterations: u64,
	pub total_time_seconds: f64,
	pub time_per_iteration_seconds: f64,
	/// 0 when the batch was too fast for the clock to notice.
	pub iterations_per_second: f64,
}

/// Times `iterations` generations on a fresh generator.
///
/// # Parameters
/// - `iterations`: number of generations, must be positive.
/// - `seed`: fixed seed for a reproducible sequence, OS entropy otherwise.
///
/// # Errors
/// Returns `InvalidConfig` if `iterations` is 0.
pub fn run_benchmark(iterations: u64, seed: Option<u64>) -> Result<BenchmarkResult, TritError> {
	let mut generator = match seed {
		Some(seed) => SequenceGenerator::with_seed(seed),
		None => SequenceGenerator::new(),
	};
	measure(&mut generator, &MonotonicClock::new(), iterations)
}

/// Times `iterations` generations of an existing generator with `clock`.
///
/// # Errors
/// Returns `InvalidConfig` if `iterations` is 0.
pub fn measure<S, C, K>(generator: &mut SequenceGenerator<S, C>, clock: &K, iterations: u64) -> Result<BenchmarkResult, TritError>
where
	S: CandidateSource,
	C: Clock,
	K: Clock,
{
	if iterations == 0 {
		return Err(TritError::InvalidConfig("Benchmark needs at least one iteration".to_owned()));
	}

	let start = clock.now();
	for _ in 0..iterations {
		generator.generate_number();
	}
	let total = clock.now().saturating_sub(start).as_secs_f64();

	debug!("Benchmarked {} generations in {:.6}s", iterations, total);

	Ok(BenchmarkResult {
		iterations,
		total_time_seconds: total,
		time_per_iteration_seconds: total / iterations as f64,
		iterations_per_second: if total > 0.0 { iterations as f64 / total } else { 0.0 },
	})
}
