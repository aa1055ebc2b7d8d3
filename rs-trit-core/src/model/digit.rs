use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::TritError;

/// One of the three symbols produced by the generator.
///
/// Serialized as its numeric value (`0`, `1` or `2`).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub enum Digit {
	Zero,
	One,
	Two,
}

impl Digit {
	/// Every digit, in ascending order.
	pub const ALL: [Digit; 3] = [Digit::Zero, Digit::One, Digit::Two];

	/// Numeric value of the digit.
	pub fn value(self) -> u8 {
		self as u8
	}

	/// Position of the digit in per-digit arrays.
	pub fn index(self) -> usize {
		self as usize
	}
}

impl TryFrom<u8> for Digit {
	type Error = TritError;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		match value {
			0 => Ok(Digit::Zero),
			1 => Ok(Digit::One),
			2 => Ok(Digit::Two),
			other => Err(TritError::InvalidDigit(other)),
		}
	}
}

impl From<Digit> for u8 {
	fn from(digit: Digit) -> Self {
		digit.value()
	}
}

impl fmt::Display for Digit {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.value())
	}
}

/// Parses a compact digit string such as `"0121020"`.
///
/// Whitespace and commas are ignored so `"0, 1, 2"` is accepted too.
///
/// # Errors
/// Returns `InvalidDigit` on the first decimal digit above 2, and
/// `InvalidCharacter` on the first character that is not a decimal digit.
pub fn parse_digits(input: &str) -> Result<Vec<Digit>, TritError> {
	input
		.chars()
		.filter(|c| !c.is_whitespace() && *c != ',')
		.map(|c| match c.to_digit(10) {
			Some(v) => Digit::try_from(v as u8),
			None => Err(TritError::InvalidCharacter(c)),
		})
		.collect()
}

/// An ordered pair of consecutive digits (`from` emitted right before `to`).
///
/// The textual form is `"from->to"`, which is also how transitions appear
/// as keys in serialized reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Transition {
	pub from: Digit,
	pub to: Digit,
}

impl Transition {
	pub fn new(from: Digit, to: Digit) -> Self {
		Self { from, to }
	}

	/// A transition that repeats the same digit.
	pub fn is_repeat(&self) -> bool {
		self.from == self.to
	}
}

impl fmt::Display for Transition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}->{}", self.from, self.to)
	}
}

impl FromStr for Transition {
	type Err = TritError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let (from, to) = s
			.split_once("->")
			.ok_or_else(|| TritError::InvalidTransition(s.to_owned()))?;
		let parse = |part: &str| -> Result<Digit, TritError> {
			let value = part
				.trim()
				.parse::<u8>()
				.map_err(|_| TritError::InvalidTransition(s.to_owned()))?;
			Digit::try_from(value)
		};
		Ok(Self::new(parse(from)?, parse(to)?))
	}
}

impl Serialize for Transition {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for Transition {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let s = String::deserialize(deserializer)?;
		s.parse().map_err(de::Error::custom)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn raw_values_outside_range_are_rejected() {
		assert_eq!(Digit::try_from(2).unwrap(), Digit::Two);
		assert!(matches!(Digit::try_from(3), Err(TritError::InvalidDigit(3))));
		assert!(matches!(Digit::try_from(255), Err(TritError::InvalidDigit(255))));
	}

	#[test]
	fn parse_digit_string() {
		let digits = parse_digits("01, 2 0").unwrap();
		assert_eq!(digits, vec![Digit::Zero, Digit::One, Digit::Two, Digit::Zero]);
		assert!(matches!(parse_digits("013"), Err(TritError::InvalidDigit(3))));
		assert!(matches!(parse_digits("0x"), Err(TritError::InvalidCharacter('x'))));
		assert!(matches!(parse_digits("1-2"), Err(TritError::InvalidCharacter('-'))));
	}

	#[test]
	fn transition_text_form() {
		let t = Transition::new(Digit::Two, Digit::Zero);
		assert_eq!(t.to_string(), "2->0");
		assert_eq!("2->0".parse::<Transition>().unwrap(), t);
		assert!("2-0".parse::<Transition>().is_err());
		assert!("2->5".parse::<Transition>().is_err());
	}

	#[test]
	fn serde_uses_numbers_and_arrow_keys() {
		assert_eq!(serde_json::to_string(&Digit::One).unwrap(), "1");
		assert!(serde_json::from_str::<Digit>("7").is_err());

		let t = Transition::new(Digit::Zero, Digit::One);
		assert_eq!(serde_json::to_string(&t).unwrap(), "\"0->1\"");
	}
}
