//! Top Spending Category Rule

use super::engine::{InsightRule, SignalContext};
use super::types::{Impact, Insight, InsightKind, InsightSignal};

/// Share of spending (percent) at which one category dominates
const DOMINANT_SHARE: f64 = 50.0;

/// Rule that names the category with the most spending
pub struct TopCategoryRule;

impl TopCategoryRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TopCategoryRule {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightRule for TopCategoryRule {
    fn signal(&self) -> InsightSignal {
        InsightSignal::TopCategory
    }

    fn name(&self) -> &'static str {
        "Top Spending Category"
    }

    fn evaluate(&self, ctx: &SignalContext<'_>) -> Option<Insight> {
        let top = ctx.aggregates.top_category()?;
        let spend = ctx.aggregates.category_spend();
        if spend <= 0.0 {
            return None;
        }

        let share = top.total / spend * 100.0;
        let impact = if share >= DOMINANT_SHARE {
            Impact::Medium
        } else {
            Impact::Low
        };
        let noun = if top.count == 1 {
            "transaction"
        } else {
            "transactions"
        };

        Some(Insight::new(
            self.signal(),
            InsightKind::Neutral,
            impact,
            format!("Top Spending: {}", top.name),
            format!(
                "{} makes up {:.0}% of your spending ({} across {} {}).",
                top.name,
                share,
                ctx.aggregates.money(top.total),
                top.count,
                noun
            ),
        ))
    }
}
