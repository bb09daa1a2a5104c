//! Savings Rate Rule
//!
//! Compares income and expenses across the whole window.

use super::engine::{InsightRule, SignalContext};
use super::types::{Impact, Insight, InsightKind, InsightSignal};

/// Savings rate above this (percent) is reported as healthy
const STRONG_SAVINGS_RATE: f64 = 20.0;

/// Savings rate below this (percent) is reported as low
const WEAK_SAVINGS_RATE: f64 = 10.0;

/// Rule that reports how much of the window's income was kept
pub struct SavingsRateRule;

impl SavingsRateRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SavingsRateRule {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightRule for SavingsRateRule {
    fn signal(&self) -> InsightSignal {
        InsightSignal::SavingsRate
    }

    fn name(&self) -> &'static str {
        "Savings Rate"
    }

    fn evaluate(&self, ctx: &SignalContext<'_>) -> Option<Insight> {
        let income = ctx.aggregates.total_income();
        let expenses = ctx.aggregates.total_expenses();

        if income <= 0.0 && expenses <= 0.0 {
            return None;
        }

        if expenses > income {
            return Some(Insight::new(
                self.signal(),
                InsightKind::Negative,
                Impact::High,
                "Spending Exceeds Income",
                format!(
                    "You spent {} against {} of income, a shortfall of {}.",
                    ctx.aggregates.money(expenses),
                    ctx.aggregates.money(income),
                    ctx.aggregates.money(expenses - income)
                ),
            ));
        }

        let rate = (income - expenses) / income * 100.0;

        let insight = if rate > STRONG_SAVINGS_RATE {
            Insight::new(
                self.signal(),
                InsightKind::Positive,
                Impact::Medium,
                "Great Savings Rate",
                format!(
                    "You're saving {:.1}% of your income. Keep it up!",
                    rate
                ),
            )
        } else if rate >= WEAK_SAVINGS_RATE {
            Insight::new(
                self.signal(),
                InsightKind::Neutral,
                Impact::Low,
                "Moderate Savings Rate",
                format!(
                    "You're saving {:.1}% of your income. Aiming for 20% builds a stronger cushion.",
                    rate
                ),
            )
        } else {
            Insight::new(
                self.signal(),
                InsightKind::Negative,
                Impact::Medium,
                "Low Savings Rate",
                format!(
                    "You're saving only {:.1}% of your income. Look for categories to trim.",
                    rate
                ),
            )
        };

        Some(insight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, expense, income, rule_context};

    fn evaluate(income_amount: f64, expense_amount: f64) -> Option<Insight> {
        let mut records = Vec::new();
        if income_amount > 0.0 {
            records.push(income("i1", income_amount, date(2026, 3, 1)));
        }
        if expense_amount > 0.0 {
            records.push(expense("e1", "Food", expense_amount, date(2026, 3, 2)));
        }
        rule_context(&records, date(2026, 3, 20), |ctx| {
            SavingsRateRule::new().evaluate(ctx)
        })
    }

    #[test]
    fn test_no_activity() {
        assert!(evaluate(0.0, 0.0).is_none());
    }

    #[test]
    fn test_expenses_exceed_income() {
        let insight = evaluate(1000.0, 1200.0).unwrap();
        assert_eq!(insight.kind, InsightKind::Negative);
        assert_eq!(insight.impact, Impact::High);
        assert_eq!(insight.title, "Spending Exceeds Income");
        assert!(insight.message.contains("$200.00"));

        // Expenses without any income
        let insight = evaluate(0.0, 50.0).unwrap();
        assert_eq!(insight.title, "Spending Exceeds Income");
    }

    #[test]
    fn test_rate_bands() {
        let strong = evaluate(1000.0, 600.0).unwrap();
        assert_eq!(strong.kind, InsightKind::Positive);
        assert_eq!(strong.impact, Impact::Medium);
        assert!(strong.message.contains("40.0%"));

        // Exactly 20% is not above the strong band
        let moderate = evaluate(1000.0, 800.0).unwrap();
        assert_eq!(moderate.kind, InsightKind::Neutral);
        assert_eq!(moderate.impact, Impact::Low);

        let moderate = evaluate(1000.0, 900.0).unwrap();
        assert_eq!(moderate.kind, InsightKind::Neutral);

        let weak = evaluate(1000.0, 950.0).unwrap();
        assert_eq!(weak.kind, InsightKind::Negative);
        assert_eq!(weak.impact, Impact::Medium);
    }

    #[test]
    fn test_income_only_is_positive() {
        let insight = evaluate(500.0, 0.0).unwrap();
        assert_eq!(insight.kind, InsightKind::Positive);
        assert!(insight.message.contains("100.0%"));
    }
}
