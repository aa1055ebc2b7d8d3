//! Constrained ternary sequence generation library.
//!
//! This crate provides:
//! - A generator of digits in {0, 1, 2} that never emits the same digit twice in a row
//! - Frequency and transition statistics with throughput metrics
//! - Sequence analysis (conditional probabilities, bias, uniformity)
//! - A benchmark helper and a multi-seed parallel simulation runner
//! - Internal utilities for report and configuration files

/// Core generation model: digits, remap table, sources, clocks, statistics
/// and the `SequenceGenerator` itself.
pub mod model;

/// Derived statistics over observed counters.
pub mod analysis;

/// Throughput measurement of the generator.
pub mod bench;

/// Multi-seed simulations, their configuration and reports.
pub mod simulation;

/// Error type shared by the crate.
pub mod error;

/// I/O utilities (config loading, report persistence, path helpers).
///
/// Not exposed
pub(crate) mod io;

pub use error::TritError;
pub use model::digit::{Digit, Transition};
pub use model::generator::SequenceGenerator;
pub use model::remap::RemapStrategy;
