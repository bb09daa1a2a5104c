//! Month-over-Month Rule
//!
//! Compares the current month's spending with the previous month's. Changes
//! within the noise threshold are not reported.

use super::engine::{InsightRule, SignalContext};
use super::types::{Impact, Insight, InsightKind, InsightSignal};

/// Absolute change (percent) from which a swing is high impact
const LARGE_CHANGE: f64 = 50.0;

/// Rule that reports a notable change from last month
pub struct MonthOverMonthRule;

impl MonthOverMonthRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MonthOverMonthRule {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightRule for MonthOverMonthRule {
    fn signal(&self) -> InsightSignal {
        InsightSignal::MonthOverMonth
    }

    fn name(&self) -> &'static str {
        "Month over Month"
    }

    fn evaluate(&self, ctx: &SignalContext<'_>) -> Option<Insight> {
        let change = ctx.aggregates.month_over_month()?;
        let magnitude = change.percent.abs();
        if magnitude <= ctx.config.noise_threshold_percent {
            return None;
        }

        let impact = if magnitude >= LARGE_CHANGE {
            Impact::High
        } else {
            Impact::Medium
        };

        let insight = if change.percent > 0.0 {
            Insight::new(
                self.signal(),
                InsightKind::Negative,
                impact,
                format!("Spending Up {:.0}%", magnitude),
                format!(
                    "You've spent {} this month, {:.1}% more than last month ({}).",
                    ctx.aggregates.money(change.current),
                    magnitude,
                    ctx.aggregates.money(change.previous)
                ),
            )
            .with_icon("trending-up")
        } else {
            Insight::new(
                self.signal(),
                InsightKind::Positive,
                impact,
                format!("Spending Down {:.0}%", magnitude),
                format!(
                    "You've spent {} this month, {:.1}% less than last month ({}).",
                    ctx.aggregates.money(change.current),
                    magnitude,
                    ctx.aggregates.money(change.previous)
                ),
            )
            .with_icon("trending-down")
        };

        Some(insight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Record;
    use crate::test_utils::{date, expense, rule_context};

    fn evaluate(previous: f64, current: f64) -> Option<Insight> {
        let mut records: Vec<Record> = Vec::new();
        if previous > 0.0 {
            records.push(expense("p", "Food", previous, date(2026, 2, 10)));
        }
        if current > 0.0 {
            records.push(expense("c", "Food", current, date(2026, 3, 10)));
        }
        rule_context(&records, date(2026, 3, 20), |ctx| {
            MonthOverMonthRule::new().evaluate(ctx)
        })
    }

    #[test]
    fn test_no_previous_spending() {
        assert!(evaluate(0.0, 500.0).is_none());
    }

    #[test]
    fn test_within_noise_threshold() {
        assert!(evaluate(100.0, 105.0).is_none());
        // Exactly at the threshold is still noise
        assert!(evaluate(100.0, 110.0).is_none());
        assert!(evaluate(100.0, 90.0).is_none());
    }

    #[test]
    fn test_increase_is_negative() {
        let insight = evaluate(100.0, 130.0).unwrap();
        assert_eq!(insight.kind, InsightKind::Negative);
        assert_eq!(insight.impact, Impact::Medium);
        assert_eq!(insight.title, "Spending Up 30%");
        assert_eq!(insight.icon, "trending-up");

        let insight = evaluate(100.0, 150.0).unwrap();
        assert_eq!(insight.impact, Impact::High);
    }

    #[test]
    fn test_decrease_is_positive() {
        let insight = evaluate(200.0, 100.0).unwrap();
        assert_eq!(insight.kind, InsightKind::Positive);
        assert_eq!(insight.impact, Impact::High);
        assert_eq!(insight.title, "Spending Down 50%");

        // No spending at all this month
        let insight = evaluate(200.0, 0.0).unwrap();
        assert_eq!(insight.title, "Spending Down 100%");
    }
}
