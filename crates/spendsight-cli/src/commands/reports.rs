//! Report command implementations
//!
//! Each command prints one section of an [`AnalysisReport`], as a table or as
//! pretty-printed JSON.

use anyhow::Result;
use serde::Serialize;
use serde_json::json;
use spendsight_core::{AnalysisReport, Confidence, InsightKind, Trend};

use super::truncate;

const RULE: &str = "   ─────────────────────────────────────────────────────────────";

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn window_label(report: &AnalysisReport) -> String {
    match (report.months.first(), report.months.last()) {
        (Some(first), Some(last)) => format!(
            "{} {} to {} {}",
            first.label, first.year, last.label, last.year
        ),
        _ => "empty window".to_string(),
    }
}

/// Print every section
pub fn cmd_analyze(report: &AnalysisReport, json: bool) -> Result<()> {
    if json {
        return print_json(report);
    }

    print_summary(report);
    print_categories(report);
    print_forecast(report);
    print_anomalies(report);
    print_health(report);
    print_insights(report);
    Ok(())
}

pub fn cmd_summary(report: &AnalysisReport, json: bool) -> Result<()> {
    if json {
        return print_json(&json!({
            "generated_for": report.generated_for,
            "window_months": report.window_months,
            "total_income": report.total_income,
            "total_expenses": report.total_expenses,
            "months": report.months,
        }));
    }
    print_summary(report);
    Ok(())
}

pub fn cmd_categories(report: &AnalysisReport, json: bool) -> Result<()> {
    if json {
        return print_json(&json!({
            "categories": report.categories,
            "breakdown": report.breakdown,
        }));
    }
    print_categories(report);
    Ok(())
}

pub fn cmd_forecast(report: &AnalysisReport, json: bool) -> Result<()> {
    if json {
        return print_json(&report.forecast);
    }
    print_forecast(report);
    Ok(())
}

pub fn cmd_anomalies(report: &AnalysisReport, json: bool) -> Result<()> {
    if json {
        return print_json(&report.anomalies);
    }
    print_anomalies(report);
    Ok(())
}

pub fn cmd_health(report: &AnalysisReport, json: bool) -> Result<()> {
    if json {
        return print_json(&report.health);
    }
    print_health(report);
    Ok(())
}

pub fn cmd_insights(report: &AnalysisReport, json: bool) -> Result<()> {
    if json {
        return print_json(&report.insights);
    }
    print_insights(report);
    Ok(())
}

fn print_summary(report: &AnalysisReport) {
    println!();
    println!("📊 Spending Summary");
    println!(
        "   Window: {} (as of {})",
        window_label(report),
        report.generated_for
    );
    println!("{}", RULE);
    println!("   Income:   {:>13}", report.money(report.total_income));
    println!("   Expenses: {:>13}", report.money(report.total_expenses));
    println!(
        "   Net:      {:>13}",
        report.money(report.total_income - report.total_expenses)
    );
    println!();
    println!(
        "   {:10} │ {:>12} │ {:>12} │ {:>12}",
        "Month", "Income", "Expenses", "Net"
    );
    println!("   ───────────┼──────────────┼──────────────┼──────────────");
    for month in &report.months {
        println!(
            "   {:10} │ {:>12.2} │ {:>12.2} │ {:>12.2}",
            format!("{} {}", month.label, month.year),
            month.income,
            month.expenses,
            month.net()
        );
    }
}

fn print_categories(report: &AnalysisReport) {
    println!();
    println!("🏷️  Spending by Category");
    println!("{}", RULE);

    if report.categories.is_empty() {
        println!("   No spending found.");
        return;
    }

    let mut categories: Vec<_> = report.categories.values().collect();
    categories.sort_by(|a, b| b.total.total_cmp(&a.total).then_with(|| a.name.cmp(&b.name)));

    println!(
        "   {:25} │ {:>10} │ {:>5}",
        "Category", "Amount", "Count"
    );
    println!("   ──────────────────────────┼────────────┼───────");
    for category in categories {
        println!(
            "   {:25} │ {:>10.2} │ {:>5}",
            truncate(&category.name, 25),
            category.total,
            category.count
        );
    }

    println!();
    println!("   Breakdown");
    for slice in &report.breakdown {
        println!(
            "   {:25} │ {:>5.1}%",
            truncate(&slice.name, 25),
            slice.percentage
        );
    }
}

fn trend_marker(trend: Trend) -> &'static str {
    match trend {
        Trend::Increasing => "📈",
        Trend::Decreasing => "📉",
        Trend::Stable => "➡️ ",
    }
}

fn confidence_note(confidence: Confidence) -> &'static str {
    match confidence {
        Confidence::High => "",
        Confidence::Medium => " (limited history)",
        Confidence::Low => " (not enough history to rely on)",
    }
}

fn print_forecast(report: &AnalysisReport) {
    let forecast = &report.forecast;

    println!();
    println!("🔮 Spending Forecast");
    println!("{}", RULE);
    println!(
        "   {} Trend: {} ({:+.1}% per month)",
        trend_marker(forecast.trend),
        forecast.trend,
        forecast.avg_growth_rate_percent
    );
    println!(
        "   Next month: {}, {} confidence{}",
        report.money(forecast.predicted_amount),
        forecast.confidence,
        confidence_note(forecast.confidence)
    );

    if !forecast.projections.is_empty() {
        println!();
        println!("   {:10} │ {:>12} │ {:>10}", "Month", "Projected", "Confidence");
        println!("   ───────────┼──────────────┼────────────");
        for period in &forecast.projections {
            println!(
                "   {:10} │ {:>12.2} │ {:>10}",
                format!("{} {}", period.label, period.year),
                period.amount,
                period.confidence.as_str()
            );
        }
    }

    if !forecast.category_predictions.is_empty() {
        println!();
        println!("   {:25} │ {:>10} │ {:>8}", "Category", "Trend", "Change");
        println!("   ──────────────────────────┼────────────┼──────────");
        for (name, prediction) in &forecast.category_predictions {
            println!(
                "   {:25} │ {:>10} │ {:>+7.1}%",
                truncate(name, 25),
                prediction.trend.as_str(),
                prediction.predicted_change_percent
            );
        }
    }
}

fn print_anomalies(report: &AnalysisReport) {
    println!();
    println!("🚨 Unusual Transactions");
    println!("{}", RULE);

    if report.anomalies.is_empty() {
        println!("   No unusual transactions found.");
        return;
    }

    for anomaly in &report.anomalies {
        println!("   • {}", anomaly.title);
        println!("     {}", anomaly.description);
    }
}

fn print_health(report: &AnalysisReport) {
    let health = &report.health;

    println!();
    println!("❤️  Financial Health");
    println!("{}", RULE);
    println!("   Score: {}/100 ({})", health.score, health.status);
    println!("   Savings rate:     {:>7.1}%", health.savings_rate_percent);
    println!(
        "   Expense ratio:    {:>7.1}%",
        health.expense_to_income_ratio_percent
    );
}

fn kind_marker(kind: InsightKind) -> &'static str {
    match kind {
        InsightKind::Positive => "✅",
        InsightKind::Neutral => "ℹ️ ",
        InsightKind::Negative => "⚠️ ",
    }
}

fn print_insights(report: &AnalysisReport) {
    println!();
    println!("💡 Insights");
    println!("{}", RULE);

    for insight in &report.insights {
        println!(
            "   {} {} [{}]",
            kind_marker(insight.kind),
            insight.title,
            insight.impact
        );
        println!("      {}", insight.message);
    }
}
