//! Unusual Transactions Rule

use super::engine::{InsightRule, SignalContext};
use super::types::{Impact, Insight, InsightKind, InsightSignal};

/// Number of anomalies from which the insight is high impact
const MANY_ANOMALIES: usize = 3;

/// Rule that surfaces anomalous expenses
pub struct UnusualTransactionsRule;

impl UnusualTransactionsRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UnusualTransactionsRule {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightRule for UnusualTransactionsRule {
    fn signal(&self) -> InsightSignal {
        InsightSignal::UnusualTransactions
    }

    fn name(&self) -> &'static str {
        "Unusual Transactions"
    }

    fn evaluate(&self, ctx: &SignalContext<'_>) -> Option<Insight> {
        // Anomalies are sorted largest first
        let largest = ctx.anomalies.first()?;
        let count = ctx.anomalies.len();

        let impact = if count >= MANY_ANOMALIES {
            Impact::High
        } else {
            Impact::Medium
        };
        let title = if count == 1 {
            "1 Unusual Transaction".to_string()
        } else {
            format!("{} Unusual Transactions", count)
        };

        Some(Insight::new(
            self.signal(),
            InsightKind::Negative,
            impact,
            title,
            format!(
                "The largest was {} on {}, {:.1}x your average transaction.",
                ctx.aggregates.money(largest.amount),
                largest.category,
                largest.ratio
            ),
        ))
    }
}
