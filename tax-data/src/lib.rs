//! Loading of versioned tax schedules from CSV.

mod loader;

pub use loader::{TaxScheduleLoader, TaxScheduleLoaderError, TaxScheduleRecord};
