//! Presentation of amounts in Sri Lankan rupees.
//!
//! This is the only place results are rounded.

use rust_decimal::Decimal;

use crate::calculations::common::{normalize_amount_input, round_half_up};

pub const CURRENCY_CODE: &str = "LKR";

/// Groups the integer digits of a non-negative decimal string in threes.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats an amount with separators and exactly `dp` fractional digits.
fn format_grouped(
    value: Decimal,
    dp: u32,
) -> String {
    let mut rounded = value.abs();
    rounded.rescale(dp);
    let text = rounded.to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text.as_str(), None),
    };

    let mut out = String::new();
    if value.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Formats an amount as currency, e.g. `LKR 1,234,567.89`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::format_currency;
///
/// assert_eq!(format_currency(dec!(144000)), "LKR 144,000.00");
/// assert_eq!(format_currency(dec!(8.335)), "LKR 8.34");
/// ```
pub fn format_currency(amount: Decimal) -> String {
    let text = format_grouped(round_half_up(amount), 2);
    match text.strip_prefix('-') {
        Some(unsigned) => format!("-{CURRENCY_CODE} {unsigned}"),
        None => format!("{CURRENCY_CODE} {text}"),
    }
}

/// Formats a percentage with two fractional digits, e.g. `5.76%`.
pub fn format_percentage(rate: Decimal) -> String {
    format!("{}%", format_grouped(round_half_up(rate), 2))
}

/// Regroups digits while the filer is typing an amount.
///
/// Blank input gives an empty string; text that is not a number is handed
/// back unchanged so the filer can keep editing it.
pub fn format_currency_input(value: &str) -> String {
    let normalized = normalize_amount_input(value);
    if normalized.is_empty() {
        return String::new();
    }
    match normalized.parse::<Decimal>() {
        Ok(amount) => {
            let scale = amount.scale().min(3);
            format_grouped(
                amount.round_dp_with_strategy(
                    scale,
                    rust_decimal::RoundingStrategy::MidpointAwayFromZero,
                ),
                scale,
            )
        }
        Err(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn currency_has_two_decimals_and_separators() {
        assert_eq!(format_currency(dec!(1234567.891)), "LKR 1,234,567.89");
        assert_eq!(format_currency(dec!(1200000)), "LKR 1,200,000.00");
    }

    #[test]
    fn currency_small_amounts() {
        assert_eq!(format_currency(Decimal::ZERO), "LKR 0.00");
        assert_eq!(format_currency(dec!(0.005)), "LKR 0.01");
        assert_eq!(format_currency(dec!(999)), "LKR 999.00");
    }

    #[test]
    fn currency_negative_amounts() {
        assert_eq!(format_currency(dec!(-1500.5)), "-LKR 1,500.50");
        assert_eq!(format_currency(dec!(-0.001)), "LKR 0.00");
    }

    #[test]
    fn percentage_rounds_to_two_places() {
        assert_eq!(format_percentage(dec!(5.76)), "5.76%");
        assert_eq!(format_percentage(dec!(15)), "15.00%");
        assert_eq!(format_percentage(dec!(33.3333)), "33.33%");
    }

    #[test]
    fn currency_input_regroups_digits() {
        assert_eq!(format_currency_input("2500000"), "2,500,000");
        assert_eq!(format_currency_input("2,500,000"), "2,500,000");
        assert_eq!(format_currency_input("1234.5"), "1,234.5");
    }

    #[test]
    fn currency_input_limits_fraction_digits() {
        assert_eq!(format_currency_input("1000.12345"), "1,000.123");
    }

    #[test]
    fn currency_input_passes_through_non_numbers() {
        assert_eq!(format_currency_input(""), "");
        assert_eq!(format_currency_input("   "), "");
        assert_eq!(format_currency_input("abc"), "abc");
    }
}
