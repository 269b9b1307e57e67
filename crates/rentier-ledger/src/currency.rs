//! Currency input boundary
//!
//! The ledger stores every amount as an integer number of minor units, so
//! fractional input has to be converted exactly once, here, before it can
//! enter. Parsing goes through a decimal type; floating point never touches
//! an amount.

use crate::LedgerError;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::str::FromStr;

/// Convert a major-unit amount string to integer minor units
///
/// Fractions beyond the minor unit are rounded down (truncated toward
/// zero). Negative and non-numeric input is rejected.
///
/// # Examples
///
/// ```
/// use rentier_ledger::currency::to_minor_units;
///
/// assert_eq!(to_minor_units("1500").unwrap(), 150_000);
/// assert_eq!(to_minor_units("1500.25").unwrap(), 150_025);
/// assert_eq!(to_minor_units("1500.009").unwrap(), 150_000);
/// assert!(to_minor_units("-3").is_err());
/// assert!(to_minor_units("one dollar").is_err());
/// ```
pub fn to_minor_units(input: &str) -> Result<i64, LedgerError> {
	let amount = Decimal::from_str(input.trim())
		.map_err(|_| LedgerError::validation("amount", "not a numeric amount"))?;

	if amount.is_sign_negative() {
		return Err(LedgerError::validation(
			"amount",
			"amount must not be negative",
		));
	}

	let cents = (amount * Decimal::from(100)).trunc();
	cents
		.to_i64()
		.ok_or_else(|| LedgerError::validation("amount", "amount out of range"))
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("0", 0)]
	#[case("0.01", 1)]
	#[case("1500", 150_000)]
	#[case("1500.00", 150_000)]
	#[case("1500.25", 150_025)]
	#[case("1500.259", 150_025)]
	#[case("  42.5  ", 4_250)]
	fn test_to_minor_units(#[case] input: &str, #[case] expected: i64) {
		assert_eq!(to_minor_units(input).unwrap(), expected);
	}

	#[rstest]
	#[case("-0.01")]
	#[case("-1500")]
	#[case("")]
	#[case("12.3.4")]
	#[case("CAD 15")]
	fn test_to_minor_units_rejects_bad_input(#[case] input: &str) {
		let err = to_minor_units(input).unwrap_err();

		assert!(matches!(err, LedgerError::Validation { field: "amount", .. }));
	}
}
