pub mod calculations;
pub mod db;
pub mod guide;
pub mod i18n;
pub mod models;
pub mod validation;
pub mod wizard;

pub use calculations::{TaxCalculator, compute_tax};
pub use db::repository::{RepositoryError, WizardRepository};
pub use i18n::{Language, Message};
pub use models::*;
pub use wizard::{WizardError, WizardState, WizardStep};
