mod income_source;
mod tax_bracket;
mod tax_result;
mod tax_schedule;
mod wizard_data;

pub use income_source::{IncomeSource, UnknownIncomeSource};
pub use tax_bracket::TaxBracketRule;
pub use tax_result::{BracketTax, TaxAssessment, TaxResult};
pub use tax_schedule::{CURRENT_YEAR_OF_ASSESSMENT, TaxSchedule, TaxScheduleError};
pub use wizard_data::{WizardData, WizardDataPatch};
