use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tax_core::{IncomeSource, Language};

use crate::config::ConfigOverrides;

/// Sri Lanka personal income tax calculator and filing guide.
///
/// Computes tax under the progressive schedule for the year of assessment
/// and walks a filer through the five-step filing wizard, saving progress
/// between runs.
#[derive(Debug, Parser)]
#[command(name = "lk-tax", version)]
pub struct Cli {
    /// TOML file with default settings.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database connection string (a file path or `:memory:` for SQLite).
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Storage backend.
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// Key the wizard progress is saved under.
    #[arg(long, global = true)]
    pub session: Option<String>,

    /// Log level or filter directive; `RUST_LOG` takes precedence.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Also append log records to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Display language: en, si or ta.
    #[arg(long, global = true)]
    pub lang: Option<Language>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        let (schedule, year) = match &self.command {
            Command::Calculate(args) => (args.schedule.schedule.clone(), args.schedule.year.clone()),
            Command::Schedule(args) => (args.schedule.clone(), args.year.clone()),
            Command::Wizard(_) | Command::Sessions => (None, None),
        };

        ConfigOverrides {
            database: self.db.clone(),
            backend: self.backend.clone(),
            session: self.session.clone(),
            language: self.lang,
            log_level: self.log_level.clone(),
            log_file: self.log_file.clone(),
            schedule,
            year,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Compute the tax on an annual income.
    Calculate(CalculateArgs),

    /// Step through the filing wizard; progress is saved after every command.
    #[command(subcommand)]
    Wizard(WizardCommand),

    /// Print the active schedule.
    Schedule(ScheduleArgs),

    /// List saved wizard sessions.
    Sessions,
}

#[derive(Debug, PartialEq, Eq, Args)]
pub struct CalculateArgs {
    /// Annual gross income in LKR, e.g. 2500000 or "2,500,000".
    pub income: String,

    /// Show the tax due in each slab.
    #[arg(long)]
    pub breakdown: bool,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub schedule: ScheduleArgs,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct ScheduleArgs {
    /// CSV file of schedules to use instead of the built-in one.
    #[arg(long)]
    pub schedule: Option<PathBuf>,

    /// Year of assessment to pick from the schedule file, e.g. 2024/2025.
    #[arg(long, requires = "schedule")]
    pub year: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum WizardCommand {
    /// Show the current step.
    Show,

    /// Enter personal details (step 1).
    Details {
        #[arg(long)]
        name: Option<String>,
        /// Nine digits; other characters are dropped.
        #[arg(long)]
        tin: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Annual income in LKR.
        #[arg(long)]
        income: Option<String>,
    },

    /// Toggle income sources (step 2).
    Sources {
        #[arg(required = true, value_delimiter = ',')]
        sources: Vec<IncomeSource>,
    },

    /// Validate the current step and move forward.
    Next,

    /// Move back one step.
    Back,

    /// Jump to a step (1-5).
    Goto { step: u8 },

    /// Set the language, or cycle EN -> SI -> TA when no code is given.
    Language { code: Option<Language> },

    /// List the documents to collect for the selected sources.
    Documents,

    /// Show the tax summary for the entered income.
    Summary,

    /// Clear saved progress, keeping the language.
    Reset,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("lk-tax").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn calculate_with_flags() {
        let cli = parse(&["calculate", "2,500,000", "--breakdown", "--json"]);

        let Command::Calculate(args) = cli.command else {
            panic!("expected calculate");
        };
        assert_eq!(args.income, "2,500,000");
        assert!(args.breakdown);
        assert!(args.json);
        assert_eq!(args.schedule.schedule, None);
    }

    #[test]
    fn year_requires_schedule_file() {
        let result = Cli::try_parse_from(["lk-tax", "calculate", "100", "--year", "2024/2025"]);

        assert!(result.is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["wizard", "show", "--lang", "si", "--db", ":memory:"]);

        assert_eq!(cli.lang, Some(Language::Sinhala));
        assert_eq!(cli.db.as_deref(), Some(":memory:"));
        assert!(matches!(cli.command, Command::Wizard(WizardCommand::Show)));
    }

    #[test]
    fn sources_accept_comma_list() {
        let cli = parse(&["wizard", "sources", "employment,Investment", "rental"]);

        let Command::Wizard(WizardCommand::Sources { sources }) = cli.command else {
            panic!("expected wizard sources");
        };
        assert_eq!(
            sources,
            vec![IncomeSource::Employment, IncomeSource::Investment, IncomeSource::Rental]
        );
    }

    #[test]
    fn unknown_source_is_rejected() {
        assert!(Cli::try_parse_from(["lk-tax", "wizard", "sources", "lottery"]).is_err());
    }

    #[test]
    fn language_code_is_optional() {
        let cli = parse(&["wizard", "language"]);
        assert_eq!(cli.command, Command::Wizard(WizardCommand::Language { code: None }));

        let cli = parse(&["wizard", "language", "ta"]);
        assert_eq!(
            cli.command,
            Command::Wizard(WizardCommand::Language {
                code: Some(Language::Tamil)
            })
        );
    }

    #[test]
    fn overrides_carry_schedule_flags() {
        let cli = parse(&[
            "--session",
            "demo",
            "schedule",
            "--schedule",
            "rates.csv",
            "--year",
            "2025/2026",
        ]);

        let overrides = cli.overrides();

        assert_eq!(overrides.session.as_deref(), Some("demo"));
        assert_eq!(overrides.schedule, Some(PathBuf::from("rates.csv")));
        assert_eq!(overrides.year.as_deref(), Some("2025/2026"));
    }
}
