use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::analysis::SequenceAnalysis;
use crate::error::TritError;
use crate::io;
use crate::model::clock::{Clock, MonotonicClock};
use crate::model::digit::Digit;
use crate::model::generator::SequenceGenerator;
use crate::model::remap::RemapStrategy;
use crate::model::source::RngSource;
use crate::model::stats::{Stats, StatsReport};
use super::config::SimulationConfig;

/// Outcome of the generator run for a single seed.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SeedResult {
	pub seed: u64,
	pub statistics: StatsReport,
	pub analysis: SequenceAnalysis,
}

/// Spread of one digit's percentage across all seeds.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct DistributionConsistency {
	pub digit: Digit,
	pub mean: f64,
	pub min: f64,
	pub max: f64,
	/// Population variance of the per-seed percentages.
	pub variance: f64,
}

/// Everything produced by a multi-seed simulation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SimulationReport {
	pub iterations: u64,
	pub strategy: RemapStrategy,
	/// One entry per seed, sorted by seed.
	pub results: Vec<SeedResult>,
	/// Analysis of all seeds merged together.
	pub combined: SequenceAnalysis,
	/// One entry per digit, in ascending digit order.
	pub consistency: [DistributionConsistency; 3],
	pub total_time_seconds: f64,
}

impl SimulationReport {
	/// Writes the report, JSON for `.json` (or no extension), postcard for `.bin`.
	///
	/// Returns the path actually written.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf, TritError> {
		io::save_report(path, self)
	}

	/// Reads a report written by `save`.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TritError> {
		io::load_report(path)
	}

	/// Number of generations over all seeds.
	pub fn total_generated(&self) -> u64 {
		self.results.iter().map(|r| r.statistics.total_generated).sum()
	}
}

/// Runs one independent generator per configured seed, in parallel.
///
/// # Behavior
/// - Seeds are split into chunks (based on CPU cores), one thread per chunk.
/// - Each generator is created and owned by its worker thread.
/// - Results are collected over an MPSC channel, then sorted by seed.
/// - Counters of every seed are merged for the combined analysis.
#[derive(Debug, Clone)]
pub struct SimulationRunner {
	config: SimulationConfig,
}

impl SimulationRunner {
	/// Creates a runner for a validated configuration.
	///
	/// # Errors
	/// Returns `InvalidConfig` if the configuration breaks its invariants.
	pub fn new(config: SimulationConfig) -> Result<Self, TritError> {
		config.validate()?;
		Ok(Self { config })
	}

	pub fn config(&self) -> &SimulationConfig {
		&self.config
	}

	/// Runs the simulation and saves the report if an output is configured.
	///
	/// # Errors
	/// - `Simulation` if a worker thread died before reporting
	/// - I/O or encoding errors while saving the report
	pub fn run(&self) -> Result<SimulationReport, TritError> {
		let clock = MonotonicClock::new();
		let seeds = self.config.seeds();
		let iterations = self.config.iterations();
		let strategy = self.config.strategy;

		info!(
			"Running {} seeds x {} iterations ({:?} strategy)",
			seeds.len(), iterations, strategy
		);

		let cpus = num_cpus::get().max(1);
		let chunk_size = seeds.len().div_ceil(cpus);

		let (tx, rx) = mpsc::channel();
		for chunk in seeds.chunks(chunk_size) {
			let tx = tx.clone();
			let chunk: Vec<u64> = chunk.to_vec();

			thread::spawn(move || {
				for seed in chunk {
					let outcome = Self::run_seed(seed, iterations, strategy);
					if tx.send(outcome).is_err() {
						return;
					}
				}
			});
		}
		drop(tx);

		let mut merged = Stats::new(clock.now());
		let mut results = Vec::with_capacity(seeds.len());
		for (result, stats) in rx.iter() {
			debug!("Seed {} done: {} violations", result.seed, result.analysis.violations);
			merged.merge(&stats);
			results.push(result);
		}

		if results.len() != seeds.len() {
			return Err(TritError::Simulation(format!(
				"{} of {} seeds reported back",
				results.len(),
				seeds.len()
			)));
		}
		results.sort_by_key(|r| r.seed);

		let report = SimulationReport {
			iterations,
			strategy,
			consistency: Self::consistency(&results),
			combined: SequenceAnalysis::from_stats(&merged),
			results,
			total_time_seconds: clock.now().as_secs_f64(),
		};

		info!(
			"Simulation finished: {} generations in {:.3}s",
			report.total_generated(),
			report.total_time_seconds
		);

		if let Some(output) = &self.config.output {
			let written = report.save(output)?;
			info!("Report saved to {}", written.display());
		}

		Ok(report)
	}

	fn run_seed(seed: u64, iterations: u64, strategy: RemapStrategy) -> (SeedResult, Stats) {
		let mut generator = SequenceGenerator::with_parts(RngSource::with_seed(seed), MonotonicClock::new(), strategy);
		for _ in 0..iterations {
			generator.generate_number();
		}

		let result = SeedResult {
			seed,
			statistics: generator.statistics(),
			analysis: SequenceAnalysis::from_stats(generator.stats()),
		};
		(result, generator.into_stats())
	}

	fn consistency(results: &[SeedResult]) -> [DistributionConsistency; 3] {
		Digit::ALL.map(|digit| {
			let percentages: Vec<f64> = results
				.iter()
				.map(|r| r.statistics.frequency_analysis[digit.index()].percentage)
				.collect();
			let n = percentages.len().max(1) as f64;
			let mean = percentages.iter().sum::<f64>() / n;
			let variance = percentages.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / n;

			DistributionConsistency {
				digit,
				mean,
				min: percentages.iter().copied().fold(f64::INFINITY, f64::min),
				max: percentages.iter().copied().fold(f64::NEG_INFINITY, f64::max),
				variance,
			}
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn small_config(seeds: Vec<u64>) -> SimulationConfig {
		let mut config = SimulationConfig::default();
		config.set_iterations(2_000).unwrap();
		config.set_seeds(seeds).unwrap();
		config
	}

	#[test]
	fn every_seed_reports_its_iterations() {
		let runner = SimulationRunner::new(small_config(vec![5, 1, 3])).unwrap();
		assert_eq!(runner.config().iterations(), 2_000);
		let report = runner.run().unwrap();

		let seeds: Vec<u64> = report.results.iter().map(|r| r.seed).collect();
		assert_eq!(seeds, vec![1, 3, 5]);
		assert!(report.results.iter().all(|r| r.statistics.total_generated == 2_000));
		assert!(report.results.iter().all(|r| r.analysis.is_constraint_satisfied()));

		assert_eq!(report.total_generated(), 6_000);
		assert_eq!(report.combined.total_count, 6_000);
		assert_eq!(report.combined.violations, 0);
	}

	#[test]
	fn seeded_runs_are_reproducible() {
		let a = SimulationRunner::new(small_config(vec![42])).unwrap().run().unwrap();
		let b = SimulationRunner::new(small_config(vec![42])).unwrap().run().unwrap();
		assert_eq!(a.results[0].analysis, b.results[0].analysis);
	}

	#[test]
	fn consistency_spans_per_seed_percentages() {
		let report = SimulationRunner::new(small_config(vec![10, 20, 30, 40])).unwrap().run().unwrap();
		for entry in &report.consistency {
			assert!(entry.min <= entry.mean && entry.mean <= entry.max);
			assert!(entry.variance >= 0.0);
		}
		let mean_total: f64 = report.consistency.iter().map(|c| c.mean).sum();
		assert!((mean_total - 100.0).abs() < 1e-9);
	}

	#[test]
	fn invalid_config_is_rejected() {
		let config: SimulationConfig = toml::from_str("iterations = 0").unwrap();
		assert!(matches!(SimulationRunner::new(config), Err(TritError::InvalidConfig(_))));
	}

	#[test]
	fn report_round_trips_through_binary_file() {
		let dir = tempfile::tempdir().unwrap();
		let mut config = small_config(vec![8, 9]);
		config.output = Some(dir.path().join("run.bin"));

		let report = SimulationRunner::new(config).unwrap().run().unwrap();
		let loaded = SimulationReport::load(dir.path().join("run.bin")).unwrap();
		assert_eq!(loaded, report);
	}

	#[test]
	fn unsupported_output_extension_fails_the_run() {
		let dir = tempfile::tempdir().unwrap();
		let mut config = small_config(vec![8]);
		config.output = Some(dir.path().join("run.csv"));

		let result = SimulationRunner::new(config).unwrap().run();
		assert!(matches!(result, Err(TritError::UnsupportedFormat(_))));
	}
}
