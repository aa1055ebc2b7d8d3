use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::TritError;
use crate::io;
use crate::model::remap::RemapStrategy;

/// Seeds used when none are configured.
pub const DEFAULT_SEEDS: [u64; 5] = [12345, 54321, 98765, 11111, 99999];

/// Generations per seed when not configured.
pub const DEFAULT_ITERATIONS: u64 = 10_000;

/// Parameters of a multi-seed simulation.
///
/// # Responsibilities
/// - Track the run parameters (`iterations`, `seeds`, `strategy`, `output`)
/// - Reject values that would make the run meaningless
///
/// # Invariants
/// - `iterations > 0`
/// - `seeds` is non-empty and has no duplicates
///
/// Can be read from a TOML file, every key being optional:
/// ```toml
/// iterations = 20000
/// seeds = [1, 2, 3]
/// strategy = "rejection"
/// output = "results/run.json"
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
	/// Generations per seed.
	iterations: u64,

	/// One independent generator is run per seed.
	seeds: Vec<u64>,

	/// Remap strategy shared by every generator of the run.
	pub strategy: RemapStrategy,

	/// Where to save the report (`.json` or `.bin`), if anywhere.
	pub output: Option<PathBuf>,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			iterations: DEFAULT_ITERATIONS,
			seeds: DEFAULT_SEEDS.to_vec(),
			strategy: RemapStrategy::Table,
			output: None,
		}
	}
}

impl SimulationConfig {
	/// Loads and validates a TOML configuration file.
	///
	/// Missing keys take their default value.
	///
	/// # Errors
	/// - I/O or TOML errors while reading the file
	/// - `InvalidConfig` if a value breaks the invariants
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TritError> {
		let config: Self = io::read_config(path)?;
		config.validate()?;
		Ok(config)
	}

	/// Checks the invariants.
	pub fn validate(&self) -> Result<(), TritError> {
		Self::check_iterations(self.iterations)?;
		Self::check_seeds(&self.seeds)
	}

	pub fn iterations(&self) -> u64 {
		self.iterations
	}

	pub fn seeds(&self) -> &[u64] {
		&self.seeds
	}

	/// Sets the number of generations per seed.
	///
	/// # Errors
	/// Returns an error if `iterations` is 0.
	pub fn set_iterations(&mut self, iterations: u64) -> Result<(), TritError> {
		Self::check_iterations(iterations)?;
		self.iterations = iterations;
		Ok(())
	}

	/// Replaces the seeds.
	///
	/// # Errors
	/// Returns an error if `seeds` is empty or contains duplicates.
	pub fn set_seeds(&mut self, seeds: Vec<u64>) -> Result<(), TritError> {
		Self::check_seeds(&seeds)?;
		self.seeds = seeds;
		Ok(())
	}

	fn check_iterations(iterations: u64) -> Result<(), TritError> {
		if iterations == 0 {
			return Err(TritError::InvalidConfig("iterations must be greater than 0".to_owned()));
		}
		Ok(())
	}

	fn check_seeds(seeds: &[u64]) -> Result<(), TritError> {
		if seeds.is_empty() {
			return Err(TritError::InvalidConfig("at least one seed is required".to_owned()));
		}
		let mut seen = HashSet::new();
		if let Some(duplicate) = seeds.iter().find(|seed| !seen.insert(**seed)) {
			return Err(TritError::InvalidConfig(format!("seed {} is listed twice", duplicate)));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use super::*;

	#[test]
	fn defaults_are_valid() {
		let config = SimulationConfig::default();
		assert!(config.validate().is_ok());
		assert_eq!(config.iterations(), 10_000);
		assert_eq!(config.seeds(), &DEFAULT_SEEDS);
		assert_eq!(config.strategy, RemapStrategy::Table);
	}

	#[test]
	fn setters_reject_bad_values() {
		let mut config = SimulationConfig::default();
		assert!(config.set_iterations(0).is_err());
		assert!(config.set_seeds(vec![]).is_err());
		assert!(config.set_seeds(vec![1, 2, 1]).is_err());
		assert_eq!(config, SimulationConfig::default());

		config.set_iterations(5).unwrap();
		config.set_seeds(vec![7]).unwrap();
		assert_eq!(config.iterations(), 5);
		assert_eq!(config.seeds(), &[7u64]);
	}

	#[test]
	fn partial_toml_file_keeps_defaults() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "iterations = 250\nstrategy = \"rejection\"").unwrap();

		let config = SimulationConfig::from_file(file.path()).unwrap();
		assert_eq!(config.iterations(), 250);
		assert_eq!(config.strategy, RemapStrategy::Rejection);
		assert_eq!(config.seeds(), &DEFAULT_SEEDS);
		assert_eq!(config.output, None);
	}

	#[test]
	fn invalid_toml_values_are_rejected() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "seeds = []").unwrap();
		assert!(matches!(SimulationConfig::from_file(file.path()), Err(TritError::InvalidConfig(_))));

		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "strategy = \"shuffle\"").unwrap();
		assert!(matches!(SimulationConfig::from_file(file.path()), Err(TritError::Toml(_))));
	}
}
