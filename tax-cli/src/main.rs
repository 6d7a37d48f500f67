use anyhow::Context;
use clap::Parser;
use tracing::debug;

use tax_cli::cli::{Cli, Command};
use tax_cli::config::AppConfig;
use tax_cli::{app, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::resolve(cli.config.as_deref(), cli.overrides())
        .context("cannot load configuration")?;
    logging::init_logging(&config.log_level, config.log_file.as_deref())?;
    debug!(?config, "configuration resolved");

    let output = match &cli.command {
        Command::Calculate(args) => {
            let schedule = app::load_schedule(config.schedule.as_deref(), config.year.as_deref())?;
            app::calculate(args, &schedule, config.language)?
        }
        Command::Schedule(_) => {
            let schedule = app::load_schedule(config.schedule.as_deref(), config.year.as_deref())?;
            tax_cli::render::schedule(&schedule)
        }
        Command::Wizard(command) => {
            let schedule = app::load_schedule(config.schedule.as_deref(), config.year.as_deref())?;
            let repo = app::open_repository(&config).await?;
            app::run_wizard(&*repo, &config, cli.lang, command, &schedule).await?
        }
        Command::Sessions => {
            let repo = app::open_repository(&config).await?;
            app::list_sessions(&*repo).await?
        }
    };

    print!("{output}");
    Ok(())
}
