//! Multi-seed simulations.
//!
//! Runs several independently seeded generators, compares their
//! distributions and merges their counters into a combined analysis.

/// Validated run parameters, loadable from TOML.
pub mod config;

/// Parallel execution and the resulting report.
pub mod runner;

pub use config::SimulationConfig;
pub use runner::{DistributionConsistency, SeedResult, SimulationReport, SimulationRunner};
