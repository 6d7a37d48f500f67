//! Tax computation and the presentation helpers around it.
//!
//! [`calculator`] is pure and does no rounding; [`format`] rounds for
//! display only.

pub mod calculator;
pub mod common;
pub mod format;

pub use calculator::{TaxCalculator, compute_tax};
pub use common::{ParseAmountError, parse_amount};
pub use format::{format_currency, format_currency_input, format_percentage};
