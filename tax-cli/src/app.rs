use std::path::Path;

use anyhow::{Context, Result};
use tax_core::calculations::format_currency_input;
use tax_core::db::RepositoryRegistry;
use tax_core::validation::format_tin_input;
use tax_core::{
    Language, RepositoryError, TaxCalculator, TaxSchedule, WizardDataPatch, WizardError,
    WizardRepository, WizardState,
};
use tax_data::TaxScheduleLoader;
use tax_db_sqlite::SqliteRepositoryFactory;
use tracing::{debug, info, warn};

use crate::cli::{CalculateArgs, WizardCommand};
use crate::config::AppConfig;
use crate::render::{self, CalculationReport};

pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));
    registry
}

pub async fn open_repository(config: &AppConfig) -> Result<Box<dyn WizardRepository>> {
    let db_config = config.db_config();
    debug!("connecting to {} backend", db_config.backend);
    build_registry()
        .create(&db_config)
        .await
        .with_context(|| format!("cannot open database '{}'", db_config.connection_string))
}

/// The schedule from `path` (picking `year`, or the last year listed), or the
/// built-in 2024/2025 schedule when no file is given.
pub fn load_schedule(
    path: Option<&Path>,
    year: Option<&str>,
) -> Result<TaxSchedule> {
    let Some(path) = path else {
        return Ok(TaxSchedule::sri_lanka_2024_25().clone());
    };

    let schedules = TaxScheduleLoader::load_from_path(path)
        .with_context(|| format!("cannot load schedules from '{}'", path.display()))?;
    let schedule = TaxScheduleLoader::select(schedules, year)?;
    info!(year = schedule.year_of_assessment(), "using schedule from file");
    Ok(schedule)
}

pub fn calculate(
    args: &CalculateArgs,
    schedule: &TaxSchedule,
    language: Language,
) -> Result<String> {
    let calculator = TaxCalculator::new(schedule);
    let assessment = calculator.compute_from_input(&args.income);
    if !assessment.is_computable() {
        warn!(input = %args.income, "income is missing or not a positive amount");
    }

    let slabs = calculator.breakdown(assessment.result().taxable_income);

    if args.json {
        let report = CalculationReport {
            year_of_assessment: schedule.year_of_assessment(),
            assessment,
            breakdown: args.breakdown.then_some(slabs),
        };
        let mut json = serde_json::to_string_pretty(&report)?;
        json.push('\n');
        return Ok(json);
    }

    let mut out = render::assessment(&assessment, schedule, language);
    if args.breakdown && !slabs.is_empty() {
        out.push('\n');
        out.push_str(&render::breakdown(&slabs));
    }
    Ok(out)
}

/// Saved progress for `session_key`, or a fresh wizard in `language`.
///
/// Progress that cannot be decoded is discarded with a warning.
pub async fn load_state(
    repo: &dyn WizardRepository,
    session_key: &str,
    language: Language,
) -> Result<WizardState> {
    match repo.load_progress(session_key).await {
        Ok(state) => Ok(state),
        Err(RepositoryError::NotFound) => {
            debug!(session_key, "no saved progress, starting fresh");
            Ok(WizardState::new(language))
        }
        Err(RepositoryError::Corrupt(reason)) => {
            warn!(session_key, %reason, "saved progress is unreadable, starting fresh");
            Ok(WizardState::new(language))
        }
        Err(e) => Err(e).context("cannot load wizard progress"),
    }
}

/// Applies one wizard command, saves the result and renders the new view.
///
/// `language` switches the session's language before the command runs.
pub async fn run_wizard(
    repo: &dyn WizardRepository,
    config: &AppConfig,
    language: Option<Language>,
    command: &WizardCommand,
    schedule: &TaxSchedule,
) -> Result<String> {
    let session_key = config.session.as_str();
    let mut state = load_state(repo, session_key, config.language).await?;
    if let Some(language) = language.filter(|l| *l != state.language()) {
        state.change_language(language);
    }

    let calculator = TaxCalculator::new(schedule);
    let year = schedule.year_of_assessment();
    let mut notice = String::new();

    match command {
        WizardCommand::Show => {}
        WizardCommand::Details {
            name,
            tin,
            email,
            income,
        } => {
            state.update_data(WizardDataPatch {
                name: name.clone(),
                tin: tin.as_deref().map(format_tin_input),
                email: email.clone(),
                income: income.as_deref().map(format_currency_input),
                sources: None,
            });
        }
        WizardCommand::Sources { sources } => {
            for source in sources {
                state.toggle_source(*source);
            }
        }
        WizardCommand::Next => {
            if let Err(WizardError::Invalid(errors)) = state.try_advance() {
                notice = render::field_errors(&errors, state.language());
            }
        }
        WizardCommand::Back => {
            state.prev_step();
        }
        WizardCommand::Goto { step } => {
            state.go_to_step(*step)?;
        }
        WizardCommand::Language { code } => {
            match code {
                Some(code) => state.change_language(*code),
                None => {
                    state.cycle_language();
                }
            }
        }
        WizardCommand::Documents => {
            return Ok(render::documents(&state.documents(year)));
        }
        WizardCommand::Summary => {
            return Ok(render::assessment(&state.assessment(&calculator), schedule, state.language()));
        }
        WizardCommand::Reset => {
            match repo.delete_progress(session_key).await {
                Ok(()) | Err(RepositoryError::NotFound) => {}
                Err(e) => return Err(e).context("cannot clear wizard progress"),
            }
            state.reset();
            info!(session_key, "wizard progress cleared");
            return Ok(render::wizard(&state, &calculator));
        }
    }

    let saved_at = repo
        .save_progress(session_key, &state)
        .await
        .context("cannot save wizard progress")?;
    state.mark_saved(saved_at);

    let mut out = render::wizard(&state, &calculator);
    if !notice.is_empty() {
        out.push('\n');
        out.push_str(&notice);
    }
    Ok(out)
}

pub async fn list_sessions(repo: &dyn WizardRepository) -> Result<String> {
    let sessions = repo
        .list_sessions()
        .await
        .context("cannot list wizard sessions")?;
    Ok(render::sessions(&sessions))
}
