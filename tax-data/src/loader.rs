use std::fs::File;
use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{TaxBracketRule, TaxSchedule, TaxScheduleError};
use thiserror::Error;

/// Errors that can occur when loading tax schedules.
#[derive(Debug, Error)]
pub enum TaxScheduleLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Year {year} has conflicting tax-free thresholds {first} and {second}")]
    InconsistentThreshold {
        year: String,
        first: Decimal,
        second: Decimal,
    },

    #[error("Invalid schedule for {year}: {source}")]
    InvalidSchedule {
        year: String,
        #[source]
        source: TaxScheduleError,
    },

    #[error("Year of assessment {0} not found in the loaded schedules")]
    YearNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for TaxScheduleLoaderError {
    fn from(err: csv::Error) -> Self {
        TaxScheduleLoaderError::CsvParse(err.to_string())
    }
}

/// A single row from a schedule CSV file.
///
/// - `year_of_assessment`: the assessment year label (e.g., `2024/2025`)
/// - `tax_free_threshold`: income exempt from tax for that year
/// - `width`: the slab width (empty for the final, unbounded slab)
/// - `rate`: the marginal rate as a decimal (e.g., 0.06 for 6%)
///
/// One row per slab; slabs are listed lowest first.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxScheduleRecord {
    pub year_of_assessment: String,
    pub tax_free_threshold: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub width: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for versioned tax schedules stored as CSV.
///
/// Rows are grouped by year of assessment in the order the years first
/// appear, and every group goes through [`TaxSchedule::new`], so a loaded
/// schedule satisfies the same invariants as the built-in one.
pub struct TaxScheduleLoader;

impl TaxScheduleLoader {
    /// Parse schedule rows from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a byte slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<TaxScheduleRecord>, TaxScheduleLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: TaxScheduleRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Build one schedule per year of assessment from parsed rows.
    pub fn load(records: &[TaxScheduleRecord]) -> Result<Vec<TaxSchedule>, TaxScheduleLoaderError> {
        let mut groups: Vec<(&str, Decimal, Vec<TaxBracketRule>)> = Vec::new();

        for record in records {
            let year = record.year_of_assessment.trim();
            let bracket = TaxBracketRule {
                width: record.width,
                rate: record.rate,
            };

            match groups.iter_mut().find(|(y, _, _)| *y == year) {
                Some((_, threshold, brackets)) => {
                    if *threshold != record.tax_free_threshold {
                        return Err(TaxScheduleLoaderError::InconsistentThreshold {
                            year: year.to_string(),
                            first: *threshold,
                            second: record.tax_free_threshold,
                        });
                    }
                    brackets.push(bracket);
                }
                None => groups.push((year, record.tax_free_threshold, vec![bracket])),
            }
        }

        let mut schedules = Vec::with_capacity(groups.len());
        for (year, threshold, brackets) in groups {
            let count = brackets.len();
            let schedule = TaxSchedule::new(year, threshold, brackets).map_err(|source| {
                TaxScheduleLoaderError::InvalidSchedule {
                    year: year.to_string(),
                    source,
                }
            })?;
            tracing::debug!(year, brackets = count, "loaded tax schedule");
            schedules.push(schedule);
        }

        Ok(schedules)
    }

    /// Parse and build every schedule in the CSV file at `path`.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Vec<TaxSchedule>, TaxScheduleLoaderError> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "loading tax schedules");

        let file = File::open(path)?;
        let records = Self::parse(file)?;
        Self::load(&records)
    }

    /// Pick a schedule by year of assessment, or the last one listed when
    /// `year` is `None`.
    pub fn select(
        schedules: Vec<TaxSchedule>,
        year: Option<&str>,
    ) -> Result<TaxSchedule, TaxScheduleLoaderError> {
        match year {
            Some(year) => schedules
                .into_iter()
                .find(|s| s.year_of_assessment() == year.trim())
                .ok_or_else(|| TaxScheduleLoaderError::YearNotFound(year.to_string())),
            None => schedules
                .into_iter()
                .last()
                .ok_or_else(|| TaxScheduleLoaderError::YearNotFound("(none)".to_string())),
        }
    }
}
