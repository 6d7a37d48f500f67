//! Progressive personal income tax calculator.
//!
//! Gross income is reduced by the schedule's tax-free threshold, and what is
//! left is sliced across the ordered slabs, each slice taxed at its own
//! marginal rate.
//!
//! | Step | Value |
//! |------|-------|
//! | 1    | Taxable income = max(0, gross income − threshold) |
//! | 2    | Tax = Σ min(remaining, slab width) × slab rate |
//! | 3    | Monthly tax = tax / 12 |
//! | 4    | Effective rate = tax / gross income × 100 |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::TaxCalculator;
//! use tax_core::TaxSchedule;
//!
//! let calculator = TaxCalculator::new(TaxSchedule::sri_lanka_2024_25());
//! let result = calculator.compute(Some(dec!(2500000))).result();
//!
//! assert_eq!(result.taxable_income, dec!(1300000));
//! assert_eq!(result.total_tax, dec!(144000));
//! assert_eq!(result.monthly_tax, dec!(12000));
//! ```

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use tracing::{debug, trace};

use crate::calculations::common::{max, parse_amount};
use crate::models::{BracketTax, TaxAssessment, TaxResult, TaxSchedule};

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);
const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Computes tax with the built-in 2024/2025 schedule.
pub fn compute_tax(annual_income: Option<Decimal>) -> TaxAssessment {
    TaxCalculator::default().compute(annual_income)
}

/// Stateless calculator bound to one schedule.
///
/// Holds only a shared reference, so a single calculator can be used from any
/// number of threads at once.
#[derive(Debug, Clone, Copy)]
pub struct TaxCalculator<'a> {
    schedule: &'a TaxSchedule,
}

impl Default for TaxCalculator<'static> {
    fn default() -> Self {
        Self::new(TaxSchedule::sri_lanka_2024_25())
    }
}

impl<'a> TaxCalculator<'a> {
    pub fn new(schedule: &'a TaxSchedule) -> Self {
        Self { schedule }
    }

    pub fn schedule(&self) -> &'a TaxSchedule {
        self.schedule
    }

    /// Computes the tax breakdown for an annual gross income.
    ///
    /// Missing, zero and negative incomes are [`TaxAssessment::NotComputable`].
    pub fn compute(
        &self,
        annual_income: Option<Decimal>,
    ) -> TaxAssessment {
        let gross_income = match annual_income {
            Some(income) if income > Decimal::ZERO => income,
            other => {
                trace!(income = ?other, "income not computable");
                return TaxAssessment::NotComputable;
            }
        };

        let taxable_income = self.taxable_income(gross_income);
        let total_tax: Decimal = self
            .breakdown(taxable_income)
            .iter()
            .map(|slab| slab.tax)
            .sum();
        let monthly_tax = total_tax / MONTHS_PER_YEAR;
        let effective_rate = self.effective_rate(total_tax, gross_income);

        debug!(
            year = self.schedule.year_of_assessment(),
            %gross_income,
            %taxable_income,
            %total_tax,
            "computed income tax"
        );

        TaxAssessment::Computed(TaxResult {
            gross_income,
            taxable_income,
            total_tax,
            monthly_tax,
            effective_rate,
        })
    }

    /// Same as [`compute`](Self::compute) for a floating-point income.
    ///
    /// NaN and infinities are not computable. Neither is a finite income
    /// above [`Decimal::MAX`] (about 7.9e28), which has no exact decimal
    /// form.
    pub fn compute_f64(
        &self,
        annual_income: f64,
    ) -> TaxAssessment {
        if !annual_income.is_finite() {
            return TaxAssessment::NotComputable;
        }
        self.compute(Decimal::from_f64(annual_income))
    }

    /// Computes from text typed by the filer, e.g. `"2,500,000"`.
    ///
    /// Text that does not parse, including amounts above [`Decimal::MAX`],
    /// is not computable.
    pub fn compute_from_input(
        &self,
        input: &str,
    ) -> TaxAssessment {
        self.compute(parse_amount(input).ok())
    }

    /// Taxable income after the tax-free threshold, never negative.
    pub fn taxable_income(
        &self,
        gross_income: Decimal,
    ) -> Decimal {
        max(
            gross_income - self.schedule.tax_free_threshold(),
            Decimal::ZERO,
        )
    }

    /// Splits `taxable_income` across the slabs it reaches.
    ///
    /// Slabs past the point where the income is fully consumed are omitted.
    pub fn breakdown(
        &self,
        taxable_income: Decimal,
    ) -> Vec<BracketTax> {
        let mut slabs = Vec::new();
        let mut remaining = max(taxable_income, Decimal::ZERO);
        let mut lower = Decimal::ZERO;

        for bracket in self.schedule.brackets() {
            if remaining <= Decimal::ZERO {
                break;
            }

            let taxed_amount = bracket.taxed_amount(remaining);
            let tax = taxed_amount * bracket.rate;
            trace!(%lower, rate = %bracket.rate, %taxed_amount, %tax, "slab");

            slabs.push(BracketTax {
                lower,
                upper: bracket.width.map(|width| lower + width),
                rate: bracket.rate,
                taxed_amount,
                tax,
            });

            remaining -= taxed_amount;
            if let Some(width) = bracket.width {
                lower += width;
            }
        }

        slabs
    }

    fn effective_rate(
        &self,
        total_tax: Decimal,
        gross_income: Decimal,
    ) -> Decimal {
        if gross_income.is_zero() {
            return Decimal::ZERO;
        }
        total_tax / gross_income * ONE_HUNDRED
    }
}
