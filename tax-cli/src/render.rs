//! Plain-text and JSON views of results, schedules and wizard steps.

use std::fmt::Write;

use rust_decimal::Decimal;
use serde::Serialize;
use tax_core::calculations::{format_currency, format_percentage};
use tax_core::db::SessionSummary;
use tax_core::guide::{self, FilingDocument};
use tax_core::i18n::t;
use tax_core::validation::FieldErrors;
use tax_core::{
    BracketTax, IncomeSource, Language, Message, TaxAssessment, TaxCalculator, TaxSchedule,
    WizardState, WizardStep,
};

const RULE: &str = "----------------------------------------";

/// Body of `calculate --json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationReport<'a> {
    pub year_of_assessment: &'a str,
    pub assessment: TaxAssessment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<Vec<BracketTax>>,
}

fn as_percent(rate: Decimal) -> String {
    format_percentage(rate * Decimal::ONE_HUNDRED)
}

/// The figures shown on the tax summary step.
///
/// Missing or invalid income shows the zeroed result.
pub fn assessment(
    assessment: &TaxAssessment,
    schedule: &TaxSchedule,
    language: Language,
) -> String {
    let result = assessment.result();
    let rows = [
        (Message::TaxLiability, format_currency(result.total_tax)),
        (Message::TotalIncome, format_currency(result.gross_income)),
        (Message::TaxFreeAllowance, format_currency(schedule.tax_free_threshold())),
        (Message::TaxableIncome, format_currency(result.taxable_income)),
        (Message::MonthlyTax, format_currency(result.monthly_tax)),
        (Message::EffectiveRate, format_percentage(result.effective_rate)),
    ];

    let width = rows
        .iter()
        .map(|(label, _)| t(*label, language).chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (label, value) in rows {
        let label = t(label, language);
        let pad = width - label.chars().count();
        let _ = writeln!(out, "{label}{:pad$}  {value:>20}", "");
    }
    out
}

/// One line per slab the income reaches.
pub fn breakdown(slabs: &[BracketTax]) -> String {
    let mut out = String::new();
    for slab in slabs {
        let range = match slab.upper {
            Some(upper) => format!("{} - {}", format_currency(slab.lower), format_currency(upper)),
            None => format!("above {}", format_currency(slab.lower)),
        };
        let _ = writeln!(
            out,
            "{range:<40} {:>7}  on {:>20}  = {:>20}",
            as_percent(slab.rate),
            format_currency(slab.taxed_amount),
            format_currency(slab.tax),
        );
    }
    out
}

pub fn schedule(schedule: &TaxSchedule) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Year of assessment {}", schedule.year_of_assessment());
    let _ = writeln!(
        out,
        "Tax-free threshold {}",
        format_currency(schedule.tax_free_threshold())
    );
    let _ = writeln!(out, "{RULE}");

    let mut lower = Decimal::ZERO;
    for bracket in schedule.brackets() {
        match bracket.width {
            Some(width) => {
                let _ = writeln!(
                    out,
                    "{:>7}  on taxable income {} - {}",
                    as_percent(bracket.rate),
                    format_currency(lower),
                    format_currency(lower + width)
                );
                lower += width;
            }
            None => {
                let _ = writeln!(
                    out,
                    "{:>7}  on taxable income above {}",
                    as_percent(bracket.rate),
                    format_currency(schedule.bounded_span())
                );
            }
        }
    }
    out
}

pub fn field_errors(
    errors: &FieldErrors,
    language: Language,
) -> String {
    errors
        .localized(language)
        .into_iter()
        .map(|line| format!("  ! {line}\n"))
        .collect()
}

pub fn documents(documents: &[FilingDocument]) -> String {
    let mut out = String::new();
    for (i, doc) in documents.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, doc.title);
        let _ = writeln!(out, "   {}", doc.description);
        if let Some(action) = &doc.action {
            let _ = writeln!(out, "   Request template:");
            for line in action.template().lines() {
                let _ = writeln!(out, "     | {line}");
            }
        }
    }
    out
}

pub fn sessions(sessions: &[SessionSummary]) -> String {
    if sessions.is_empty() {
        return "No saved sessions.\n".to_string();
    }

    let mut out = String::new();
    for session in sessions {
        let _ = writeln!(
            out,
            "{:<24} step {}/{}  saved {}",
            session.session_key,
            session.current_step,
            WizardStep::COUNT,
            session.last_saved.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
    out
}

fn step_body(
    state: &WizardState,
    calculator: &TaxCalculator<'_>,
) -> String {
    let language = state.language();
    let data = state.data();
    let year = calculator.schedule().year_of_assessment();
    let mut out = String::new();

    match state.current_step() {
        WizardStep::PersonalDetails => {
            let _ = writeln!(out, "{}\n", t(Message::Step1Desc, language));
            for (label, value) in [
                (Message::LabelName, &data.name),
                (Message::LabelTin, &data.tin),
                (Message::LabelEmail, &data.email),
                (Message::LabelIncome, &data.income),
            ] {
                let _ = writeln!(out, "  {}: {}", t(label, language), value);
            }
        }
        WizardStep::IncomeSources => {
            let _ = writeln!(out, "{}\n", t(Message::Step2Desc, language));
            for source in IncomeSource::all() {
                let mark = if data.has_source(*source) { 'x' } else { ' ' };
                let _ = writeln!(out, "  [{mark}] {} ({source})", t(source.label(), language));
            }
        }
        WizardStep::Documents => {
            let _ = writeln!(out, "{}\n", t(Message::Step3Desc, language));
            out.push_str(&documents(&state.documents(year)));
        }
        WizardStep::TaxSummary => {
            out.push_str(&assessment(&state.assessment(calculator), calculator.schedule(), language));
            let _ = writeln!(out, "\n{}", guide::DISCLAIMER);
        }
        WizardStep::Filing => {
            let _ = writeln!(out, "{}\n", t(Message::Step5Desc, language));
            for step in guide::filing_steps(year) {
                let _ = writeln!(out, "  {}. {}", step.number, step.title);
                let _ = writeln!(out, "     {}", step.detail);
                if let Some(link) = step.link {
                    let _ = writeln!(out, "     {link}");
                }
            }
            let _ = writeln!(
                out,
                "\n  IRD call centre {}  |  {}",
                guide::IRD_CALL_CENTRE,
                guide::IRD_EMAIL
            );
        }
    }
    out
}

/// Full view of the current wizard step: header, body and navigation.
pub fn wizard(
    state: &WizardState,
    calculator: &TaxCalculator<'_>,
) -> String {
    let language = state.language();
    let step = state.current_step();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{}  [{}]  {}%  {}",
        t(step.title(), language),
        state.step_indicator(),
        state.progress_percent(),
        language.label()
    );
    let _ = writeln!(out, "{RULE}");
    out.push_str(&step_body(state, calculator));
    let _ = writeln!(out, "{RULE}");

    let back = if step == WizardStep::PersonalDetails {
        String::new()
    } else {
        format!("< {}", t(Message::ButtonBack, language))
    };
    let forward = if step.is_last() {
        t(Message::ButtonSubmit, language).to_string()
    } else {
        format!("{} >", t(Message::ButtonNext, language))
    };
    let _ = writeln!(out, "{back:<20}{forward:>20}");

    if let Some(saved) = state.last_saved() {
        let _ = writeln!(out, "saved {}", saved.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    out
}
