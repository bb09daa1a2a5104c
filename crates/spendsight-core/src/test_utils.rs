//! Test utilities for spendsight-core
//!
//! Record builders shared by unit tests here and by the CLI's tests
//! (through the `test-utils` feature).

use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::aggregate::aggregate;
use crate::anomaly::detect_anomalies;
use crate::config::AnalysisConfig;
use crate::forecast::forecast;
use crate::health::compute_health_score;
use crate::insights::SignalContext;
use crate::models::{Record, RecordKind};
use crate::snapshot::Snapshot;

/// Build a date, panicking on invalid input (tests only)
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

fn record(id: &str, kind: RecordKind, category: &str, amount: f64, on: Option<NaiveDate>) -> Record {
    Record {
        id: id.to_string(),
        kind,
        amount,
        valid_amount: true,
        category: category.to_string(),
        occurred_at: on.and_then(|d| d.and_hms_opt(12, 0, 0)),
        currency: Some("USD".to_string()),
        description: None,
        color: None,
    }
}

/// A dated expense
pub fn expense(id: &str, category: &str, amount: f64, on: NaiveDate) -> Record {
    record(id, RecordKind::Expense, category, amount, Some(on))
}

/// An expense whose stored date could not be parsed
pub fn undated_expense(id: &str, category: &str, amount: f64) -> Record {
    record(id, RecordKind::Expense, category, amount, None)
}

/// A dated income record
pub fn income(id: &str, amount: f64, on: NaiveDate) -> Record {
    record(id, RecordKind::Income, "Salary", amount, Some(on))
}

/// Stored expense document as the storage layer would return it
pub fn expense_doc(id: &str, category: &str, amount: f64, on: &str) -> Value {
    json!({
        "id": id,
        "amount": amount,
        "category": category,
        "date": on,
        "currency": "USD",
    })
}

/// Stored income document as the storage layer would return it
pub fn income_doc(id: &str, amount: f64, on: &str) -> Value {
    json!({
        "id": id,
        "amount": amount,
        "source": "Salary",
        "date": on,
        "currency": "USD",
    })
}

/// Income 1000 and three expenses (food 200, food 300, transport 100),
/// all in March 2026
pub fn scenario_snapshot() -> Snapshot {
    Snapshot::new(
        vec![
            expense_doc("t1", "Food", 200.0, "2026-03-03"),
            expense_doc("t2", "Food", 300.0, "2026-03-10"),
            expense_doc("t3", "Transport", 100.0, "2026-03-12"),
        ],
        vec![income_doc("i1", 1000.0, "2026-03-01")],
    )
}

/// Run the analysis steps over `records` with the default configuration and
/// hand the resulting signal context to `f`
pub fn rule_context<T>(
    records: &[Record],
    now: NaiveDate,
    f: impl FnOnce(&SignalContext<'_>) -> T,
) -> T {
    rule_context_with(records, now, &AnalysisConfig::default(), f)
}

/// Like [`rule_context`] with an explicit configuration
pub fn rule_context_with<T>(
    records: &[Record],
    now: NaiveDate,
    config: &AnalysisConfig,
    f: impl FnOnce(&SignalContext<'_>) -> T,
) -> T {
    let aggregates = aggregate(records, config.window_months, now);
    let forecast = forecast(&aggregates, &config.forecast);
    let anomalies = detect_anomalies(records, &aggregates.window, config.anomaly_multiplier);
    let health = compute_health_score(aggregates.total_income(), aggregates.total_expenses());
    let ctx = SignalContext::new(&aggregates, &forecast, &anomalies, &health, config);
    f(&ctx)
}
