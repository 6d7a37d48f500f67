//! Field validators for the personal details step.
//!
//! Validators return `bool`; [`validate_personal_details`] collects the first
//! failure per field as a translatable [`Message`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::parse_amount;
use crate::i18n::{Language, Message, t};
use crate::models::WizardData;

/// Sri Lankan TINs are nine digits.
pub const TIN_LENGTH: usize = 9;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Fields of the personal details step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Tin,
    Email,
    Income,
}

impl Field {
    pub fn label(&self) -> Message {
        match self {
            Self::Name => Message::LabelName,
            Self::Tin => Message::LabelTin,
            Self::Email => Message::LabelEmail,
            Self::Income => Message::LabelIncome,
        }
    }
}

/// First validation failure for each field, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, Message>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(
        &self,
        field: Field,
    ) -> Option<Message> {
        self.0.get(&field).copied()
    }

    /// Records `message` unless the field already has an error.
    fn insert_first(
        &mut self,
        field: Field,
        message: Message,
    ) {
        self.0.entry(field).or_insert(message);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, Message)> + '_ {
        self.0.iter().map(|(f, m)| (*f, *m))
    }

    /// `"<label>: <error>"` lines in the given language.
    pub fn localized(
        &self,
        language: Language,
    ) -> Vec<String> {
        self.iter()
            .map(|(field, message)| format!("{}: {}", t(field.label(), language), t(message, language)))
            .collect()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.localized(Language::English).join("; "))
    }
}

impl std::error::Error for FieldErrors {}

/// Non-blank after trimming.
pub fn is_required(value: &str) -> bool {
    !value.trim().is_empty()
}

/// TIN is optional; when given it must hold exactly nine digits.
pub fn is_valid_tin(tin: &str) -> bool {
    if tin.is_empty() {
        return true;
    }
    tin.chars().filter(char::is_ascii_digit).count() == TIN_LENGTH
}

/// Email is optional; when given it must look like `local@domain.tld`.
pub fn is_valid_email(email: &str) -> bool {
    email.is_empty() || EMAIL_RE.is_match(email)
}

/// Income is required and must be a non-negative amount.
pub fn is_valid_income(income: &str) -> bool {
    matches!(parse_amount(income), Ok(amount) if amount >= Decimal::ZERO)
}

pub fn meets_min_value(
    value: &str,
    min: Decimal,
) -> bool {
    matches!(parse_amount(value), Ok(amount) if amount >= min)
}

/// Keeps only digits, at most nine of them.
pub fn format_tin_input(value: &str) -> String {
    value
        .chars()
        .filter(char::is_ascii_digit)
        .take(TIN_LENGTH)
        .collect()
}

/// Validates the personal details step.
///
/// # Errors
///
/// Returns the [`FieldErrors`] for every field that failed.
pub fn validate_personal_details(data: &WizardData) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();

    if !is_required(&data.name) {
        errors.insert_first(Field::Name, Message::ErrRequired);
    }

    if !is_required(&data.income) {
        errors.insert_first(Field::Income, Message::ErrRequired);
    }
    if !is_valid_income(&data.income) {
        errors.insert_first(Field::Income, Message::ErrInvalidIncome);
    }

    if !is_valid_tin(&data.tin) {
        errors.insert_first(Field::Tin, Message::ErrInvalidTin);
    }
    if !is_valid_email(&data.email) {
        errors.insert_first(Field::Email, Message::ErrInvalidEmail);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        tracing::debug!(failed = errors.len(), "personal details rejected");
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn valid_data() -> WizardData {
        WizardData {
            name: "A.B. Perera".to_string(),
            tin: "123456789".to_string(),
            email: "perera@example.lk".to_string(),
            income: "2500000".to_string(),
            sources: vec![],
        }
    }

    #[test]
    fn required_rejects_whitespace() {
        assert!(is_required("Nimal"));
        assert!(!is_required("   "));
        assert!(!is_required(""));
    }

    #[test]
    fn tin_is_optional_but_nine_digits() {
        assert!(is_valid_tin(""));
        assert!(is_valid_tin("123456789"));
        assert!(is_valid_tin("123-456-789"));
        assert!(!is_valid_tin("12345678"));
        assert!(!is_valid_tin("1234567890"));
    }

    #[test]
    fn email_is_optional_but_well_formed() {
        assert!(is_valid_email(""));
        assert!(is_valid_email("a@b.lk"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.lk"));
        assert!(!is_valid_email("@c.lk"));
    }

    #[test]
    fn income_must_be_non_negative_number() {
        assert!(is_valid_income("0"));
        assert!(is_valid_income("2,500,000.50"));
        assert!(!is_valid_income(""));
        assert!(!is_valid_income("-1"));
        assert!(!is_valid_income("lots"));
    }

    #[test]
    fn min_value_compares_parsed_amount() {
        assert!(meets_min_value("100", dec!(100)));
        assert!(!meets_min_value("99.99", dec!(100)));
        assert!(!meets_min_value("x", dec!(0)));
    }

    #[test]
    fn tin_input_keeps_nine_digits() {
        assert_eq!(format_tin_input("12-34 56a789012"), "123456789");
        assert_eq!(format_tin_input(""), "");
    }

    #[test]
    fn valid_details_pass() {
        assert_eq!(validate_personal_details(&valid_data()), Ok(()));
    }

    #[test]
    fn missing_name_and_income_are_required() {
        let data = WizardData {
            name: " ".to_string(),
            income: String::new(),
            ..valid_data()
        };

        let errors = validate_personal_details(&data).unwrap_err();

        assert_eq!(errors.get(Field::Name), Some(Message::ErrRequired));
        assert_eq!(errors.get(Field::Income), Some(Message::ErrRequired));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn first_failure_per_field_wins() {
        let data = WizardData {
            income: "abc".to_string(),
            ..valid_data()
        };

        let errors = validate_personal_details(&data).unwrap_err();

        assert_eq!(errors.get(Field::Income), Some(Message::ErrInvalidIncome));
    }

    #[test]
    fn bad_tin_and_email_reported() {
        let data = WizardData {
            tin: "123".to_string(),
            email: "nope".to_string(),
            ..valid_data()
        };

        let errors = validate_personal_details(&data).unwrap_err();

        assert_eq!(errors.get(Field::Tin), Some(Message::ErrInvalidTin));
        assert_eq!(errors.get(Field::Email), Some(Message::ErrInvalidEmail));
    }

    #[test]
    fn errors_render_in_selected_language() {
        let data = WizardData {
            name: String::new(),
            ..valid_data()
        };
        let errors = validate_personal_details(&data).unwrap_err();

        assert_eq!(
            errors.localized(Language::English),
            vec!["Full Name: This field is required".to_string()]
        );
        assert_eq!(
            errors.localized(Language::Sinhala),
            vec!["සම්පූර්ණ නම: මෙම ක්ෂේත්‍රය අවශ්‍යයි".to_string()]
        );
    }
}
