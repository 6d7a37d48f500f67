//! Shared numeric helpers for the calculator, formatting and validation.

use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when typed text is not a usable amount.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    #[error("amount is empty")]
    Empty,

    #[error("invalid amount '{input}': {reason}")]
    Invalid { input: String, reason: String },
}

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Trims whitespace and drops comma thousands separators.
pub(crate) fn normalize_amount_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses typed text such as `"2,500,000.00"` into a [`Decimal`].
///
/// Sign is not checked here; callers decide whether negatives are allowed.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::parse_amount;
///
/// assert_eq!(parse_amount(" 1,234.50 "), Ok(dec!(1234.50)));
/// assert!(parse_amount("abc").is_err());
/// ```
pub fn parse_amount(s: &str) -> Result<Decimal, ParseAmountError> {
    let normalized = normalize_amount_input(s);
    if normalized.is_empty() {
        return Err(ParseAmountError::Empty);
    }
    normalized
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&normalized))
        .map_err(|e| ParseAmountError::Invalid {
            input: s.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(12000.004)), dec!(12000.00));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(12000.005)), dec!(12000.01));
    }

    #[test]
    fn round_half_up_handles_repeating_monthly_figure() {
        // 100 / 12
        assert_eq!(round_half_up(dec!(100) / dec!(12)), dec!(8.33));
    }

    #[test]
    fn round_half_up_handles_negative_values() {
        assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
    }

    // =========================================================================
    // max tests
    // =========================================================================

    #[test]
    fn max_clamps_negative_to_zero() {
        assert_eq!(max(dec!(-200000), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn max_returns_larger_value() {
        assert_eq!(max(dec!(1300000), Decimal::ZERO), dec!(1300000));
    }

    // =========================================================================
    // parse_amount tests
    // =========================================================================

    #[test]
    fn parse_amount_accepts_thousands_separators() {
        assert_eq!(parse_amount("2,500,000"), Ok(dec!(2500000)));
        assert_eq!(parse_amount("1,234,567.89"), Ok(dec!(1234567.89)));
    }

    #[test]
    fn parse_amount_accepts_scientific_notation() {
        assert_eq!(parse_amount("2.5e6"), Ok(dec!(2500000)));
    }

    #[test]
    fn parse_amount_rejects_blank() {
        assert_eq!(parse_amount("   "), Err(ParseAmountError::Empty));
    }

    #[test]
    fn parse_amount_rejects_garbage() {
        assert!(matches!(
            parse_amount("NaN"),
            Err(ParseAmountError::Invalid { .. })
        ));
        assert!(parse_amount("12abc").is_err());
    }

    #[test]
    fn parse_amount_keeps_sign() {
        assert_eq!(parse_amount("-5"), Ok(dec!(-5)));
    }
}
