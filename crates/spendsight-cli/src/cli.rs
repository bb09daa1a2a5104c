//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Spendsight - Understand where your money goes
#[derive(Parser)]
#[command(name = "spendsight")]
#[command(about = "Personal finance analytics and insights", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Analysis config file (defaults to the user override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command that analyzes a snapshot
#[derive(Args, Debug, Clone)]
pub struct AnalysisArgs {
    /// Snapshot file (.json or .csv)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Reference date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub now: Option<String>,

    /// Months before the current one to include (overrides config)
    #[arg(short, long)]
    pub window: Option<u32>,

    /// Print JSON instead of tables
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full analysis and print every section
    Analyze(AnalysisArgs),

    /// Income, expenses and net per month
    Summary(AnalysisArgs),

    /// Spending by category with the display breakdown
    Categories(AnalysisArgs),

    /// Spending trend and next-month projection
    Forecast(AnalysisArgs),

    /// Expenses far above the average transaction
    Anomalies(AnalysisArgs),

    /// Financial health score
    Health(AnalysisArgs),

    /// Plain-language insights, most important first
    Insights(AnalysisArgs),

    /// Suggest a category for a description using the keyword table
    Categorize {
        /// Free text (description, note, merchant)
        text: String,
    },

    /// Inspect analysis configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration as TOML
    Show,

    /// Show the path where a config override should be placed
    Path,
}
