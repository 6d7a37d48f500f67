use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One slab of a progressive schedule.
///
/// `width` is the size of the slice of taxable income the slab covers. Only
/// the final slab of a schedule may be unbounded (`None`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracketRule {
    pub width: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracketRule {
    pub const fn bounded(
        width: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            width: Some(width),
            rate,
        }
    }

    pub const fn unbounded(rate: Decimal) -> Self {
        Self { width: None, rate }
    }

    pub fn is_unbounded(&self) -> bool {
        self.width.is_none()
    }

    /// Portion of `remaining` taxable income that falls into this slab.
    pub fn taxed_amount(
        &self,
        remaining: Decimal,
    ) -> Decimal {
        match self.width {
            Some(width) => remaining.min(width),
            None => remaining,
        }
    }
}
