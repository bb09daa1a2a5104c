//! Spending Outlook Rule
//!
//! Turns a trustworthy forecast into a heads-up about next month.

use crate::models::{Confidence, Trend};

use super::engine::{InsightRule, SignalContext};
use super::types::{Impact, Insight, InsightKind, InsightSignal};

/// Rule that reports where spending is heading
pub struct SpendingOutlookRule;

impl SpendingOutlookRule {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SpendingOutlookRule {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightRule for SpendingOutlookRule {
    fn signal(&self) -> InsightSignal {
        InsightSignal::SpendingOutlook
    }

    fn name(&self) -> &'static str {
        "Spending Outlook"
    }

    fn evaluate(&self, ctx: &SignalContext<'_>) -> Option<Insight> {
        let forecast = ctx.forecast;
        if forecast.confidence < Confidence::Medium {
            return None;
        }

        let message = format!(
            "Based on your recent trend ({:+.1}% per month), next month's spending is projected at {}.",
            forecast.avg_growth_rate_percent,
            ctx.aggregates.money(forecast.predicted_amount)
        );

        match forecast.trend {
            Trend::Stable => None,
            Trend::Increasing => Some(
                Insight::new(
                    self.signal(),
                    InsightKind::Negative,
                    Impact::Low,
                    "Spending Trending Up",
                    message,
                )
                .with_icon("trending-up"),
            ),
            Trend::Decreasing => Some(
                Insight::new(
                    self.signal(),
                    InsightKind::Positive,
                    Impact::Low,
                    "Spending Trending Down",
                    message,
                )
                .with_icon("trending-down"),
            ),
        }
    }
}
