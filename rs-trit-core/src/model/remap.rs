use serde::{Deserialize, Serialize};

use super::digit::Digit;

/// Fixed remapping `[previous][candidate] -> emitted`.
///
/// Each row only contains the two digits different from `previous`, so the
/// emitted digit never repeats the previous one. Rows are skewed 2:1:
/// - previous 0: candidates {0, 1} give 1, candidate 2 gives 2
/// - previous 1: candidates {0, 1} give 0, candidate 2 gives 2
/// - previous 2: candidates {0, 2} give 0, candidate 1 gives 1
pub const REMAP_TABLE: [[Digit; 3]; 3] = [
	[Digit::One, Digit::One, Digit::Two],
	[Digit::Zero, Digit::Zero, Digit::Two],
	[Digit::Zero, Digit::One, Digit::Zero],
];

/// Redraws allowed by `RemapStrategy::Rejection` before falling back to the table.
pub const MAX_RETRIES: usize = 10;

/// Looks up the emitted digit for a raw candidate drawn after `previous`.
pub fn remap(previous: Digit, candidate: Digit) -> Digit {
	REMAP_TABLE[previous.index()][candidate.index()]
}

/// How a raw candidate is turned into an emitted digit once a previous
/// digit exists.
///
/// # Variants
/// - `Table`: one draw, remapped through `REMAP_TABLE`. Reproduces the
///   reference output bit-for-bit, including its 2:1 skew.
/// - `Rejection`: redraw until the candidate differs from the previous
///   digit. Fair over the two legal digits but consumes a variable number
///   of draws, so scripted sequences are not interchangeable with `Table`.
///   After `MAX_RETRIES` rejected redraws the last candidate goes through
///   `REMAP_TABLE`, so a call always terminates with a legal digit.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RemapStrategy {
	#[default]
	Table,
	Rejection,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn table_matches_reference_rows() {
		let expected: [[u8; 3]; 3] = [[1, 1, 2], [0, 0, 2], [0, 1, 0]];
		for previous in Digit::ALL {
			for candidate in Digit::ALL {
				assert_eq!(
					remap(previous, candidate).value(),
					expected[previous.index()][candidate.index()],
					"previous={} candidate={}", previous, candidate
				);
			}
		}
	}

	#[test]
	fn rows_never_emit_previous_and_cover_both_other_digits() {
		for previous in Digit::ALL {
			let row: Vec<Digit> = Digit::ALL.iter().map(|c| remap(previous, *c)).collect();
			assert!(!row.contains(&previous));
			for other in Digit::ALL.iter().filter(|d| **d != previous) {
				assert!(row.contains(other));
			}
		}
	}

	#[test]
	fn strategy_names_in_config() {
		assert_eq!(serde_json::to_string(&RemapStrategy::Rejection).unwrap(), "\"rejection\"");
		assert_eq!(RemapStrategy::default(), RemapStrategy::Table);
	}
}
