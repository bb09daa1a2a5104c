//! Unusual transaction detection
//!
//! A fixed multiplier rule: an expense is unusual when its amount is at least
//! `multiplier` times the mean expense in the analysis window. There is no
//! standard-deviation banding. Anomalies are reported only, never acted on.

use tracing::debug;

use crate::aggregate::MonthWindow;
use crate::models::{format_money, Anomaly, Record};

/// Flag expenses in `window` whose amount is >= `multiplier` x the window mean.
///
/// Only expenses with a valid amount and a date inside the window take part.
/// With fewer than two such expenses (or a zero mean) nothing is flagged.
pub fn detect_anomalies(records: &[Record], window: &MonthWindow, multiplier: f64) -> Vec<Anomaly> {
    let candidates: Vec<&Record> = records
        .iter()
        .filter(|r| r.is_expense() && r.valid_amount)
        .filter(|r| r.date().is_some_and(|d| window.contains(d)))
        .collect();

    if candidates.len() < 2 {
        return Vec::new();
    }

    let mean = candidates.iter().map(|r| r.amount).sum::<f64>() / candidates.len() as f64;
    if mean <= 0.0 {
        return Vec::new();
    }

    let threshold = mean * multiplier;
    let mut anomalies: Vec<Anomaly> = candidates
        .iter()
        .filter(|r| r.amount >= threshold)
        .map(|r| {
            let ratio = r.amount / mean;
            Anomaly {
                record_id: r.id.clone(),
                category: r.category.clone(),
                amount: r.amount,
                occurred_at: r.occurred_at,
                mean,
                ratio,
                title: format!("Unusual {} expense", r.category),
                description: format!(
                    "{} spent on {}{} is {:.1}x your average transaction of {}",
                    format_money(r.amount, r.currency.as_deref()),
                    r.category,
                    r.date()
                        .map(|d| format!(" on {}", d.format("%b %-d")))
                        .unwrap_or_default(),
                    ratio,
                    format_money(mean, r.currency.as_deref())
                ),
            }
        })
        .collect();

    anomalies.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.occurred_at.cmp(&b.occurred_at))
            .then_with(|| a.record_id.cmp(&b.record_id))
    });

    debug!(
        candidates = candidates.len(),
        mean,
        threshold,
        flagged = anomalies.len(),
        "Anomaly detection complete"
    );

    anomalies
}
