use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Annual tax breakdown for one gross income figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxResult {
    pub gross_income: Decimal,
    pub taxable_income: Decimal,
    pub total_tax: Decimal,
    pub monthly_tax: Decimal,
    /// Total tax as a percentage of gross income.
    pub effective_rate: Decimal,
}

impl TaxResult {
    pub const ZERO: TaxResult = TaxResult {
        gross_income: Decimal::ZERO,
        taxable_income: Decimal::ZERO,
        total_tax: Decimal::ZERO,
        monthly_tax: Decimal::ZERO,
        effective_rate: Decimal::ZERO,
    };
}

/// Outcome of running the calculator.
///
/// `NotComputable` means "nothing to compute yet" (missing, zero, negative or
/// malformed income), which callers must be able to tell apart from a
/// computed liability of zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "result", rename_all = "camelCase")]
pub enum TaxAssessment {
    Computed(TaxResult),
    NotComputable,
}

impl TaxAssessment {
    pub fn is_computable(&self) -> bool {
        matches!(self, Self::Computed(_))
    }

    /// Structured result, zeroed when nothing could be computed.
    pub fn result(&self) -> TaxResult {
        match self {
            Self::Computed(result) => *result,
            Self::NotComputable => TaxResult::ZERO,
        }
    }

    pub fn computed(&self) -> Option<&TaxResult> {
        match self {
            Self::Computed(result) => Some(result),
            Self::NotComputable => None,
        }
    }
}

impl From<TaxAssessment> for Option<TaxResult> {
    fn from(assessment: TaxAssessment) -> Self {
        assessment.computed().copied()
    }
}

/// Contribution of a single slab to the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketTax {
    /// Start of the slab, measured in taxable income.
    pub lower: Decimal,
    /// End of the slab; `None` for the open-ended top slab.
    pub upper: Option<Decimal>,
    pub rate: Decimal,
    pub taxed_amount: Decimal,
    pub tax: Decimal,
}
