use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::i18n::Message;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown income source '{0}'")]
pub struct UnknownIncomeSource(pub String);

/// Kinds of income the filer received during the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncomeSource {
    Employment,
    Business,
    Investment,
    Rental,
    Other,
}

impl IncomeSource {
    pub fn all() -> &'static [IncomeSource] {
        &[
            IncomeSource::Employment,
            IncomeSource::Business,
            IncomeSource::Investment,
            IncomeSource::Rental,
            IncomeSource::Other,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employment => "employment",
            Self::Business => "business",
            Self::Investment => "investment",
            Self::Rental => "rental",
            Self::Other => "other",
        }
    }

    /// Translatable label shown on the income sources step.
    pub fn label(&self) -> Message {
        match self {
            Self::Employment => Message::SourceEmployment,
            Self::Business => Message::SourceBusiness,
            Self::Investment => Message::SourceInvestment,
            Self::Rental => Message::SourceRental,
            Self::Other => Message::SourceOther,
        }
    }
}

impl fmt::Display for IncomeSource {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IncomeSource {
    type Err = UnknownIncomeSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        IncomeSource::all()
            .iter()
            .copied()
            .find(|source| source.as_str() == wanted)
            .ok_or_else(|| UnknownIncomeSource(s.to_string()))
    }
}
