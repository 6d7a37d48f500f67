use serde::{Deserialize, Serialize};

use super::IncomeSource;

/// Everything the filer has entered so far.
///
/// Amounts are kept as the raw text the filer typed; parsing happens at the
/// point of use so a half-typed value never blocks saving progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardData {
    pub name: String,
    pub tin: String,
    pub email: String,
    pub income: String,
    pub sources: Vec<IncomeSource>,
}

/// Partial update merged into [`WizardData`]; `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardDataPatch {
    pub name: Option<String>,
    pub tin: Option<String>,
    pub email: Option<String>,
    pub income: Option<String>,
    pub sources: Option<Vec<IncomeSource>>,
}

impl WizardDataPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl WizardData {
    pub fn apply(
        &mut self,
        patch: WizardDataPatch,
    ) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(tin) = patch.tin {
            self.tin = tin;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(income) = patch.income {
            self.income = income;
        }
        if let Some(sources) = patch.sources {
            self.sources = sources;
        }
    }

    pub fn has_source(
        &self,
        source: IncomeSource,
    ) -> bool {
        self.sources.contains(&source)
    }

    /// Adds `source` if missing, removes it otherwise. Selection order is kept.
    pub fn toggle_source(
        &mut self,
        source: IncomeSource,
    ) {
        if let Some(pos) = self.sources.iter().position(|s| *s == source) {
            self.sources.remove(pos);
        } else {
            self.sources.push(source);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn apply_only_touches_given_fields() {
        let mut data = WizardData {
            name: "A.B. Perera".to_string(),
            income: "2500000".to_string(),
            ..Default::default()
        };

        data.apply(WizardDataPatch {
            tin: Some("123456789".to_string()),
            ..Default::default()
        });

        assert_eq!(data.name, "A.B. Perera");
        assert_eq!(data.tin, "123456789");
        assert_eq!(data.income, "2500000");
    }

    #[test]
    fn toggle_source_adds_then_removes() {
        let mut data = WizardData::default();

        data.toggle_source(IncomeSource::Rental);
        data.toggle_source(IncomeSource::Employment);
        assert_eq!(
            data.sources,
            vec![IncomeSource::Rental, IncomeSource::Employment]
        );

        data.toggle_source(IncomeSource::Rental);
        assert_eq!(data.sources, vec![IncomeSource::Employment]);
    }

    #[test]
    fn deserializes_with_missing_fields() {
        let data: WizardData = serde_json::from_str(r#"{"name":"Nimal"}"#).unwrap();

        assert_eq!(data.name, "Nimal");
        assert!(data.sources.is_empty());
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(WizardDataPatch::default().is_empty());
    }
}
