use std::sync::LazyLock;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::TaxBracketRule;

/// Year of assessment covered by the built-in schedule.
pub const CURRENT_YEAR_OF_ASSESSMENT: &str = "2024/2025";

static SRI_LANKA_2024_25: LazyLock<TaxSchedule> = LazyLock::new(|| TaxSchedule {
    year_of_assessment: CURRENT_YEAR_OF_ASSESSMENT.to_string(),
    tax_free_threshold: dec!(1200000),
    brackets: vec![
        TaxBracketRule::bounded(dec!(500000), dec!(0.06)),
        TaxBracketRule::bounded(dec!(500000), dec!(0.12)),
        TaxBracketRule::bounded(dec!(500000), dec!(0.18)),
        TaxBracketRule::bounded(dec!(500000), dec!(0.24)),
        TaxBracketRule::bounded(dec!(500000), dec!(0.30)),
        TaxBracketRule::unbounded(dec!(0.36)),
    ],
});

/// Reasons a bracket table is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaxScheduleError {
    #[error("schedule has no brackets")]
    NoBrackets,

    #[error("tax-free threshold {0} is negative")]
    NegativeThreshold(Decimal),

    #[error("bracket {index} has a non-positive width")]
    NonPositiveWidth { index: usize },

    #[error("bracket {index} has rate {rate} outside [0, 1]")]
    RateOutOfRange { index: usize, rate: Decimal },

    #[error("bracket {index} is unbounded but is not the last bracket")]
    UnboundedBeforeLast { index: usize },

    #[error("the last bracket must be unbounded")]
    MissingUnboundedBracket,

    #[error("bracket {index} ends beyond the largest representable amount")]
    BoundedSpanOverflow { index: usize },
}

/// Threshold and progressive brackets for one year of assessment.
///
/// Instances are immutable once built; a new tax year is a new schedule, not
/// a mutation of an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTaxSchedule")]
pub struct TaxSchedule {
    year_of_assessment: String,
    tax_free_threshold: Decimal,
    brackets: Vec<TaxBracketRule>,
}

#[derive(Deserialize)]
struct RawTaxSchedule {
    year_of_assessment: String,
    tax_free_threshold: Decimal,
    brackets: Vec<TaxBracketRule>,
}

impl TryFrom<RawTaxSchedule> for TaxSchedule {
    type Error = TaxScheduleError;

    fn try_from(raw: RawTaxSchedule) -> Result<Self, Self::Error> {
        TaxSchedule::new(raw.year_of_assessment, raw.tax_free_threshold, raw.brackets)
    }
}

impl TaxSchedule {
    /// Builds a schedule after checking the bracket invariants.
    ///
    /// # Errors
    ///
    /// Returns [`TaxScheduleError`] if the threshold is negative, the table is
    /// empty, a width is not positive, a rate is outside `[0, 1]`, or the
    /// unbounded slab is missing or not last, or the bounded widths add up
    /// to more than a [`Decimal`] can hold.
    pub fn new(
        year_of_assessment: impl Into<String>,
        tax_free_threshold: Decimal,
        brackets: Vec<TaxBracketRule>,
    ) -> Result<Self, TaxScheduleError> {
        if tax_free_threshold < Decimal::ZERO {
            return Err(TaxScheduleError::NegativeThreshold(tax_free_threshold));
        }
        if brackets.is_empty() {
            return Err(TaxScheduleError::NoBrackets);
        }

        let last = brackets.len() - 1;
        let mut span = Decimal::ZERO;
        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(TaxScheduleError::RateOutOfRange {
                    index,
                    rate: bracket.rate,
                });
            }
            match bracket.width {
                Some(width) if width <= Decimal::ZERO => {
                    return Err(TaxScheduleError::NonPositiveWidth { index });
                }
                Some(_) if index == last => {
                    return Err(TaxScheduleError::MissingUnboundedBracket);
                }
                None if index != last => {
                    return Err(TaxScheduleError::UnboundedBeforeLast { index });
                }
                Some(width) => {
                    span = span
                        .checked_add(width)
                        .ok_or(TaxScheduleError::BoundedSpanOverflow { index })?;
                }
                None => {}
            }
        }

        Ok(Self {
            year_of_assessment: year_of_assessment.into(),
            tax_free_threshold,
            brackets,
        })
    }

    /// The Sri Lankan personal income tax schedule for 2024/2025.
    pub fn sri_lanka_2024_25() -> &'static TaxSchedule {
        &SRI_LANKA_2024_25
    }

    pub fn year_of_assessment(&self) -> &str {
        &self.year_of_assessment
    }

    pub fn tax_free_threshold(&self) -> Decimal {
        self.tax_free_threshold
    }

    pub fn brackets(&self) -> &[TaxBracketRule] {
        &self.brackets
    }

    pub fn lowest_rate(&self) -> Decimal {
        self.brackets
            .iter()
            .map(|b| b.rate)
            .min()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn highest_rate(&self) -> Decimal {
        self.brackets
            .iter()
            .map(|b| b.rate)
            .max()
            .unwrap_or(Decimal::ZERO)
    }

    /// Sum of all bounded widths; taxable income above this is taxed at the
    /// final rate.
    ///
    /// Construction rejects tables whose widths overflow, so every slab's
    /// upper edge fits in a [`Decimal`].
    pub fn bounded_span(&self) -> Decimal {
        self.brackets.iter().filter_map(|b| b.width).sum()
    }
}
