//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::io::Write;
use std::path::PathBuf;

use chrono::NaiveDate;
use spendsight_core::test_utils::scenario_snapshot;
use spendsight_core::{AnalysisConfig, InsightSignal};
use tempfile::NamedTempFile;

use crate::cli::AnalysisArgs;
use crate::commands::{self, truncate};

fn write_temp(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn scenario_file() -> NamedTempFile {
    write_temp(
        ".json",
        &serde_json::to_string(&scenario_snapshot()).unwrap(),
    )
}

fn args(input: PathBuf) -> AnalysisArgs {
    AnalysisArgs {
        input,
        now: Some("2026-03-20".to_string()),
        window: None,
        json: false,
    }
}

// ========== Shared Utility Tests ==========

#[test]
fn test_resolve_now_explicit() {
    let now = commands::resolve_now(Some("2026-03-20")).unwrap();
    assert_eq!(now, NaiveDate::from_ymd_opt(2026, 3, 20).unwrap());
}

#[test]
fn test_resolve_now_invalid() {
    assert!(commands::resolve_now(Some("20/03/2026")).is_err());
    assert!(commands::resolve_now(Some("tomorrow")).is_err());
}

#[test]
fn test_resolve_now_defaults_to_today() {
    assert!(commands::resolve_now(None).is_ok());
}

#[test]
fn test_load_config_window_override() {
    let file = write_temp(".toml", "[analysis]\nwindow_months = 2\n");
    let config = commands::load_config(Some(file.path()), None).unwrap();
    assert_eq!(config.window_months, 2);

    let config = commands::load_config(Some(file.path()), Some(8)).unwrap();
    assert_eq!(config.window_months, 8);
}

#[test]
fn test_load_config_rejects_bad_window() {
    let file = write_temp(".toml", "[analysis]\nwindow_months = 2\n");
    assert!(commands::load_config(Some(file.path()), Some(500)).is_err());
}

#[test]
fn test_load_config_missing_file() {
    let missing = PathBuf::from("/nonexistent/spendsight/analysis.toml");
    assert!(commands::load_config(Some(&missing), None).is_err());
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("Food", 10), "Food");
    assert_eq!(truncate("Entertainment and Leisure", 10), "Enterta...");
    assert_eq!(truncate("Café Crème Brûlée", 8), "Café ...");
}

// ========== Analysis Command Tests ==========

#[test]
fn test_run_analysis_scenario() {
    let file = scenario_file();
    let report = commands::run_analysis(None, &args(file.path().to_path_buf())).unwrap();

    assert_eq!(report.months.len(), 6);
    assert_eq!(report.total_income, 1000.0);
    assert_eq!(report.total_expenses, 600.0);
    assert_eq!(report.categories["Food"].total, 500.0);
    assert!(report
        .insights
        .iter()
        .any(|i| i.signal == InsightSignal::SavingsRate));
}

#[test]
fn test_run_analysis_window_flag() {
    let file = scenario_file();
    let mut args = args(file.path().to_path_buf());
    args.window = Some(11);

    let report = commands::run_analysis(None, &args).unwrap();
    assert_eq!(report.months.len(), 12);
    assert_eq!(report.window_months, 11);
}

#[test]
fn test_run_analysis_csv_input() {
    let file = write_temp(
        ".csv",
        "kind,amount,category,date\nexpense,25.50,Food,2026-03-02\nincome,100,,2026-03-01\n",
    );
    let report = commands::run_analysis(None, &args(file.path().to_path_buf())).unwrap();
    assert_eq!(report.total_expenses, 25.5);
    assert_eq!(report.total_income, 100.0);
}

#[test]
fn test_run_analysis_missing_input() {
    let result = commands::run_analysis(None, &args(PathBuf::from("/nonexistent/snapshot.json")));
    assert!(result.is_err());
}

#[test]
fn test_run_analysis_unsupported_input() {
    let file = write_temp(".xlsx", "binary");
    assert!(commands::run_analysis(None, &args(file.path().to_path_buf())).is_err());
}

#[test]
fn test_report_commands_text_and_json() {
    let file = scenario_file();
    let report = commands::run_analysis(None, &args(file.path().to_path_buf())).unwrap();

    for json in [false, true] {
        assert!(commands::cmd_analyze(&report, json).is_ok());
        assert!(commands::cmd_summary(&report, json).is_ok());
        assert!(commands::cmd_categories(&report, json).is_ok());
        assert!(commands::cmd_forecast(&report, json).is_ok());
        assert!(commands::cmd_anomalies(&report, json).is_ok());
        assert!(commands::cmd_health(&report, json).is_ok());
        assert!(commands::cmd_insights(&report, json).is_ok());
    }
}

#[test]
fn test_report_commands_empty_snapshot() {
    let file = write_temp(".json", "{}");
    let report = commands::run_analysis(None, &args(file.path().to_path_buf())).unwrap();
    assert!(report.categories.is_empty());
    assert!(commands::cmd_analyze(&report, false).is_ok());
}

// ========== Categorize Command Tests ==========

#[test]
fn test_suggest_category_from_embedded_table() {
    let config = AnalysisConfig::embedded();
    assert_eq!(
        commands::suggest_category(&config, "Pizza night with friends").unwrap(),
        Some("Food".to_string())
    );
    assert_eq!(
        commands::suggest_category(&config, "qwzx plmk").unwrap(),
        None
    );
}

#[test]
fn test_suggest_category_custom_table() {
    let file = write_temp(
        ".toml",
        "[[categories]]\nname = \"Pets\"\nkeywords = [\"vet\", \"kibble\"]\n",
    );
    let config = commands::load_config(Some(file.path()), None).unwrap();
    assert_eq!(
        commands::suggest_category(&config, "Annual VET visit").unwrap(),
        Some("Pets".to_string())
    );
}

#[test]
fn test_cmd_categorize() {
    assert!(commands::cmd_categorize(None, "Uber to the airport").is_ok());
}

// ========== Config Command Tests ==========

#[test]
fn test_cmd_config_show() {
    assert!(commands::cmd_config_show(None).is_ok());

    let file = write_temp(".toml", "[forecast]\nperiods = 6\n");
    assert!(commands::cmd_config_show(Some(file.path())).is_ok());
}

#[test]
fn test_cmd_config_path() {
    assert!(commands::cmd_config_path().is_ok());
}
