//! Spendsight CLI - Personal finance analytics
//!
//! Usage:
//!   spendsight analyze --input snapshot.json    Full report
//!   spendsight insights --input snapshot.csv    Insights only
//!   spendsight categorize "Uber to airport"     Suggest a category
//!   spendsight config show                      Effective configuration

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Analyze(args) => {
            let report = commands::run_analysis(config_path, &args)?;
            commands::cmd_analyze(&report, args.json)
        }
        Commands::Summary(args) => {
            let report = commands::run_analysis(config_path, &args)?;
            commands::cmd_summary(&report, args.json)
        }
        Commands::Categories(args) => {
            let report = commands::run_analysis(config_path, &args)?;
            commands::cmd_categories(&report, args.json)
        }
        Commands::Forecast(args) => {
            let report = commands::run_analysis(config_path, &args)?;
            commands::cmd_forecast(&report, args.json)
        }
        Commands::Anomalies(args) => {
            let report = commands::run_analysis(config_path, &args)?;
            commands::cmd_anomalies(&report, args.json)
        }
        Commands::Health(args) => {
            let report = commands::run_analysis(config_path, &args)?;
            commands::cmd_health(&report, args.json)
        }
        Commands::Insights(args) => {
            let report = commands::run_analysis(config_path, &args)?;
            commands::cmd_insights(&report, args.json)
        }
        Commands::Categorize { text } => commands::cmd_categorize(config_path, &text),
        Commands::Config { action } => match action {
            None | Some(ConfigAction::Show) => commands::cmd_config_show(config_path),
            Some(ConfigAction::Path) => commands::cmd_config_path(),
        },
    }
}
