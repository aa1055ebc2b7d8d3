//! Top-level module for the no-repeat digit generation system.
//!
//! This module provides:
//! - The closed `Digit` type and `Transition` pairs (`digit`)
//! - The fixed remap table and remap strategies (`remap`)
//! - Injectable collaborators: candidate sources (`source`) and clocks (`clock`)
//! - The statistics accumulator (`stats`)
//! - The high-level `SequenceGenerator` (`generator`)

/// High-level generator producing digits that never repeat the previous one.
///
/// Owns its candidate source, clock, strategy, previous digit and statistics.
pub mod generator;

/// Statistics accumulator and its serializable report.
///
/// Tracks totals, per-digit frequency and transition counts; derives
/// elapsed time, throughput and percentages on demand.
pub mod stats;

/// Digits in {0, 1, 2} and ordered digit pairs.
pub mod digit;

/// The fixed `[previous][candidate]` remap table and the strategy selector.
pub mod remap;

/// Sources of raw uniform candidates (PRNG-backed or scripted).
pub mod source;

/// Monotonic time sources.
pub mod clock;
