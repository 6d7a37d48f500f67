//! State container for the five-step filing wizard.
//!
//! The container is passed explicitly to whatever needs it. The calculator
//! never sees it; [`WizardState::assessment`] hands the typed income to the
//! calculator and returns the result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::calculations::TaxCalculator;
use crate::guide::{FilingDocument, required_documents};
use crate::i18n::{self, Language, Message};
use crate::models::{IncomeSource, TaxAssessment, WizardData, WizardDataPatch};
use crate::validation::{FieldErrors, validate_personal_details};

/// Storage key used when no session name is given.
pub const DEFAULT_SESSION_KEY: &str = "tax-wizard-data";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("step {0} does not exist (expected 1-{max})", max = WizardStep::COUNT)]
    NoSuchStep(u8),

    #[error("please correct the highlighted fields: {0}")]
    Invalid(FieldErrors),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    #[default]
    PersonalDetails,
    IncomeSources,
    Documents,
    TaxSummary,
    Filing,
}

impl WizardStep {
    pub const COUNT: u8 = 5;

    pub fn all() -> &'static [WizardStep] {
        &[
            WizardStep::PersonalDetails,
            WizardStep::IncomeSources,
            WizardStep::Documents,
            WizardStep::TaxSummary,
            WizardStep::Filing,
        ]
    }

    /// 1-based position.
    pub fn number(&self) -> u8 {
        match self {
            Self::PersonalDetails => 1,
            Self::IncomeSources => 2,
            Self::Documents => 3,
            Self::TaxSummary => 4,
            Self::Filing => 5,
        }
    }

    pub fn from_number(n: u8) -> Option<WizardStep> {
        n.checked_sub(1)
            .and_then(|i| WizardStep::all().get(usize::from(i)))
            .copied()
    }

    pub fn title(&self) -> Message {
        match self {
            Self::PersonalDetails => Message::Step1Title,
            Self::IncomeSources => Message::Step2Title,
            Self::Documents => Message::Step3Title,
            Self::TaxSummary => Message::TaxSummary,
            Self::Filing => Message::Step5Title,
        }
    }

    pub fn is_last(&self) -> bool {
        *self == Self::Filing
    }

    fn next(&self) -> WizardStep {
        WizardStep::from_number(self.number() + 1).unwrap_or(*self)
    }

    fn prev(&self) -> WizardStep {
        WizardStep::from_number(self.number() - 1).unwrap_or(*self)
    }
}

/// Serialized shape of the wizard, as written to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedProgress {
    #[serde(default)]
    pub wizard_data: WizardData,
    #[serde(default = "first_step")]
    pub current_step: u8,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub last_saved: Option<DateTime<Utc>>,
}

fn first_step() -> u8 {
    1
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardState {
    current_step: WizardStep,
    data: WizardData,
    language: Language,
    last_saved: Option<DateTime<Utc>>,
}

impl WizardState {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Default::default()
        }
    }

    pub fn current_step(&self) -> WizardStep {
        self.current_step
    }

    pub fn data(&self) -> &WizardData {
        &self.data
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.last_saved
    }

    pub fn mark_saved(
        &mut self,
        at: DateTime<Utc>,
    ) {
        self.last_saved = Some(at);
    }

    /// Shallow merge of the given fields into the entered data.
    pub fn update_data(
        &mut self,
        patch: WizardDataPatch,
    ) {
        debug!(?patch, "updating wizard data");
        self.data.apply(patch);
    }

    pub fn toggle_source(
        &mut self,
        source: IncomeSource,
    ) {
        self.data.toggle_source(source);
    }

    /// Moves forward without validation; stays put on the last step.
    pub fn next_step(&mut self) -> WizardStep {
        self.current_step = self.current_step.next();
        self.current_step
    }

    /// Moves back; stays put on the first step.
    pub fn prev_step(&mut self) -> WizardStep {
        self.current_step = self.current_step.prev();
        self.current_step
    }

    /// Jumps to a 1-based step number.
    ///
    /// # Errors
    ///
    /// [`WizardError::NoSuchStep`] when `step` is outside `1..=5`.
    pub fn go_to_step(
        &mut self,
        step: u8,
    ) -> Result<WizardStep, WizardError> {
        let target = WizardStep::from_number(step).ok_or(WizardError::NoSuchStep(step))?;
        self.current_step = target;
        Ok(target)
    }

    /// Validates the current step and moves forward if it passes.
    ///
    /// # Errors
    ///
    /// [`WizardError::Invalid`] with the failing fields; the step is unchanged.
    pub fn try_advance(&mut self) -> Result<WizardStep, WizardError> {
        if self.current_step == WizardStep::PersonalDetails {
            validate_personal_details(&self.data).map_err(WizardError::Invalid)?;
        }
        Ok(self.next_step())
    }

    pub fn change_language(
        &mut self,
        language: Language,
    ) {
        info!(from = %self.language, to = %language, "language changed");
        self.language = language;
    }

    /// Advances the language toggle (EN → SI → TA → EN).
    pub fn cycle_language(&mut self) -> Language {
        self.change_language(self.language.next());
        self.language
    }

    /// Progress through the wizard, 0 on the first step and 100 on the last.
    pub fn progress_percent(&self) -> u8 {
        let done = u32::from(self.current_step.number() - 1);
        let span = u32::from(WizardStep::COUNT - 1);
        // Rounded to nearest.
        ((done * 100 + span / 2) / span) as u8
    }

    pub fn step_indicator(&self) -> String {
        i18n::step_indicator(self.current_step.number(), WizardStep::COUNT, self.language)
    }

    /// Runs the calculator on the income entered so far.
    pub fn assessment(
        &self,
        calculator: &TaxCalculator<'_>,
    ) -> TaxAssessment {
        calculator.compute_from_input(&self.data.income)
    }

    pub fn documents(
        &self,
        year_of_assessment: &str,
    ) -> Vec<FilingDocument> {
        required_documents(&self.data.sources, year_of_assessment)
    }

    /// Clears everything except the chosen language.
    pub fn reset(&mut self) {
        *self = Self::new(self.language);
    }

    pub fn to_saved(&self) -> SavedProgress {
        SavedProgress {
            wizard_data: self.data.clone(),
            current_step: self.current_step.number(),
            language: self.language,
            last_saved: self.last_saved,
        }
    }
}

impl From<SavedProgress> for WizardState {
    /// Restores saved progress; an out-of-range step restarts at step 1.
    fn from(saved: SavedProgress) -> Self {
        let current_step = WizardStep::from_number(saved.current_step).unwrap_or_default();
        Self {
            current_step,
            data: saved.wizard_data,
            language: saved.language,
            last_saved: saved.last_saved,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::guide::DocumentId;

    fn filled_state() -> WizardState {
        let mut state = WizardState::default();
        state.update_data(WizardDataPatch {
            name: Some("A.B. Perera".to_string()),
            income: Some("2,500,000".to_string()),
            ..Default::default()
        });
        state
    }

    #[test]
    fn starts_on_first_step_in_english() {
        let state = WizardState::default();

        assert_eq!(state.current_step(), WizardStep::PersonalDetails);
        assert_eq!(state.language(), Language::English);
        assert_eq!(state.progress_percent(), 0);
        assert_eq!(state.step_indicator(), "Step 1 of 5");
    }

    #[test]
    fn next_and_prev_are_clamped() {
        let mut state = WizardState::default();

        assert_eq!(state.prev_step(), WizardStep::PersonalDetails);
        for _ in 0..10 {
            state.next_step();
        }
        assert_eq!(state.current_step(), WizardStep::Filing);
        assert_eq!(state.progress_percent(), 100);
        assert_eq!(state.prev_step(), WizardStep::TaxSummary);
    }

    #[test]
    fn progress_is_linear() {
        let mut state = WizardState::default();
        let mut seen = vec![state.progress_percent()];
        while !state.current_step().is_last() {
            state.next_step();
            seen.push(state.progress_percent());
        }

        assert_eq!(seen, vec![0, 25, 50, 75, 100]);
    }

    #[test]
    fn go_to_step_rejects_out_of_range() {
        let mut state = WizardState::default();

        assert_eq!(state.go_to_step(4), Ok(WizardStep::TaxSummary));
        assert_eq!(state.go_to_step(0), Err(WizardError::NoSuchStep(0)));
        assert_eq!(state.go_to_step(6), Err(WizardError::NoSuchStep(6)));
        assert_eq!(state.current_step(), WizardStep::TaxSummary);
    }

    #[test]
    fn try_advance_blocks_on_invalid_details() {
        let mut state = WizardState::default();

        let err = state.try_advance().unwrap_err();

        assert!(matches!(err, WizardError::Invalid(ref e) if e.len() == 2));
        assert_eq!(state.current_step(), WizardStep::PersonalDetails);
    }

    #[test]
    fn try_advance_moves_on_when_valid() {
        let mut state = filled_state();

        assert_eq!(state.try_advance(), Ok(WizardStep::IncomeSources));
        // Later steps have no required fields.
        assert_eq!(state.try_advance(), Ok(WizardStep::Documents));
    }

    #[test]
    fn language_persists_across_steps_and_reset() {
        let mut state = filled_state();

        assert_eq!(state.cycle_language(), Language::Sinhala);
        state.next_step();
        assert_eq!(state.language(), Language::Sinhala);
        assert_eq!(state.step_indicator(), "පියවර 2 / 5");

        state.reset();
        assert_eq!(state.language(), Language::Sinhala);
        assert_eq!(state.data(), &WizardData::default());
        assert_eq!(state.current_step(), WizardStep::PersonalDetails);
    }

    #[test]
    fn assessment_uses_entered_income() {
        let state = filled_state();

        let result = state.assessment(&TaxCalculator::default()).result();

        assert_eq!(result.total_tax, dec!(144000));
    }

    #[test]
    fn assessment_not_computable_before_income_entered() {
        let state = WizardState::default();

        assert_eq!(
            state.assessment(&TaxCalculator::default()),
            TaxAssessment::NotComputable
        );
    }

    #[test]
    fn documents_follow_selected_sources() {
        let mut state = filled_state();
        state.toggle_source(IncomeSource::Employment);

        let ids: Vec<_> = state.documents("2024/2025").iter().map(|d| d.id).collect();

        assert_eq!(ids, vec![DocumentId::Tin, DocumentId::T10]);
    }

    #[test]
    fn saved_progress_round_trips() {
        let mut state = filled_state();
        state.go_to_step(3).unwrap();
        state.change_language(Language::Tamil);

        let restored = WizardState::from(state.to_saved());

        assert_eq!(restored, state);
    }

    #[test]
    fn saved_progress_uses_camel_case_keys() {
        let json = serde_json::to_value(filled_state().to_saved()).unwrap();

        assert_eq!(json["currentStep"], 1);
        assert_eq!(json["language"], "en");
        assert_eq!(json["wizardData"]["name"], "A.B. Perera");
    }

    #[test]
    fn restoring_unknown_step_starts_over() {
        let saved: SavedProgress =
            serde_json::from_str(r#"{"currentStep": 42, "language": "si"}"#).unwrap();

        let state = WizardState::from(saved);

        assert_eq!(state.current_step(), WizardStep::PersonalDetails);
        assert_eq!(state.language(), Language::Sinhala);
    }
}
