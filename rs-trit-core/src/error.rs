use thiserror::Error;

/// Error type shared by every fallible operation of the crate.
///
/// The generation path itself never fails: a `Digit` can only hold 0, 1 or 2,
/// so errors only appear at the edges (raw value conversion, configuration,
/// report persistence).
#[derive(Debug, Error)]
pub enum TritError {
	/// A raw value outside {0, 1, 2} was offered where a digit is expected.
	#[error("Invalid digit: {0} (expected 0, 1 or 2)")]
	InvalidDigit(u8),

	/// A character other than a decimal digit was found in digit text.
	#[error("Invalid character: {0:?} (expected 0, 1 or 2)")]
	InvalidCharacter(char),

	/// A textual transition could not be parsed (expected `"a->b"`).
	#[error("Invalid transition: {0}")]
	InvalidTransition(String),

	/// A scripted candidate source was built without any value.
	#[error("Candidate sequence cannot be empty")]
	EmptySequence,

	/// Configuration values are out of range or inconsistent.
	#[error("Invalid configuration: {0}")]
	InvalidConfig(String),

	/// A simulation worker stopped before delivering its results.
	#[error("Simulation failed: {0}")]
	Simulation(String),

	/// Report files must end with `.json` or `.bin`.
	#[error("Unsupported output format: {0}")]
	UnsupportedFormat(String),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),

	#[error(transparent)]
	Postcard(#[from] postcard::Error),

	#[error(transparent)]
	Toml(#[from] toml::de::Error),
}
