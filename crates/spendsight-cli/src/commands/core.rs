//! Shared command utilities
//!
//! This module contains:
//! - `load_config` - Resolve configuration with CLI overrides applied
//! - `resolve_now` - Parse the reference date
//! - `run_analysis` - Load a snapshot and analyze it

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use spendsight_core::{load_snapshot, AnalysisConfig, AnalysisReport, Analyzer};

use crate::cli::AnalysisArgs;

/// Load configuration, apply a window override and validate the result
pub fn load_config(config_path: Option<&Path>, window: Option<u32>) -> Result<AnalysisConfig> {
    let mut config =
        AnalysisConfig::load(config_path).context("Failed to load analysis config")?;

    if let Some(window) = window {
        config.window_months = window;
    }

    config.validate().context("Invalid analysis config")?;
    Ok(config)
}

/// Parse `--now`, defaulting to today's local date
pub fn resolve_now(now: Option<&str>) -> Result<NaiveDate> {
    match now {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .with_context(|| format!("Invalid --now date '{}' (use YYYY-MM-DD)", s)),
        None => Ok(Local::now().date_naive()),
    }
}

/// Load the snapshot named by `args` and run the full analysis
pub fn run_analysis(config_path: Option<&Path>, args: &AnalysisArgs) -> Result<AnalysisReport> {
    let config = load_config(config_path, args.window)?;
    let now = resolve_now(args.now.as_deref())?;

    let snapshot = load_snapshot(&args.input)
        .with_context(|| format!("Failed to load snapshot {}", args.input.display()))?;

    tracing::debug!(
        input = %args.input.display(),
        documents = snapshot.len(),
        %now,
        window_months = config.window_months,
        "Running analysis"
    );

    let analyzer = Analyzer::new(config).context("Failed to build analyzer")?;
    Ok(analyzer.analyze_snapshot(&snapshot, now))
}
