use anyhow::Context;
use clap::Parser;
use owo_colors::{OwoColorize, Style};
use tareas_core::db;
use tareas_core::error::CoreError;
use tareas_core::recurrence::{RecurrenceConfig, RecurrenceManager};
use tareas_core::repository::SqliteRepository;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod parser;
mod views;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(matches!(cli.command, Commands::Serve(_)));

    if let Err(e) = run(cli).await {
        handle_error(e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so command output stays clean. `RUST_LOG` overrides the
/// default level.
fn init_tracing(serving: bool) {
    let default_level = if serving { LevelFilter::INFO } else { LevelFilter::WARN };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = config::Config::new().context("Failed to load configuration")?;

    let pool = db::establish_connection(&config.database_path).await?;
    let manager = RecurrenceManager::new(RecurrenceConfig::from(&config.recurrence));
    let repository = SqliteRepository::new(pool, manager);

    let owner = cli.user.unwrap_or(config.default_user);

    match cli.command {
        Commands::Serve(command) => commands::serve::serve(repository, &config, command).await,
        Commands::Add(command) => commands::add::add_task(&repository, owner, command).await,
        Commands::List => commands::list::list_tasks(&repository, owner).await,
        Commands::Delete(command) => commands::delete::delete_task(&repository, owner, command).await,
        Commands::Day(command) => commands::show::show_day(&repository, owner, command).await,
        Commands::Range(command) => commands::show::show_range(&repository, owner, command).await,
        Commands::Today => commands::show::show_today(&repository, owner).await,
        Commands::Calendar(command) => commands::show::show_calendar(&repository, owner, command).await,
        Commands::Set(command) => commands::set::set_occurrence(&repository, owner, command).await,
        Commands::Stats => commands::stats::show_statistics(&repository, owner).await,
    }
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    match err.downcast_ref::<CoreError>() {
        Some(CoreError::NotFound(id)) => {
            eprintln!("{} Task with ID '{}' not found.", "Error:".style(error_style), id.yellow());
        }
        Some(CoreError::InvalidInput(s)) => {
            eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
        }
        _ => eprintln!("{} {:#}", "Error:".style(error_style), err),
    }
}
