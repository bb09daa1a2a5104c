//! Insight Engine - runs the registered rules over one analysis run's signals

use crate::aggregate::Aggregates;
use crate::config::AnalysisConfig;
use crate::models::{Anomaly, ForecastResult, HealthScore};

use super::types::{Insight, InsightSignal};
use super::{
    MonthOverMonthRule, SavingsRateRule, SpendingOutlookRule, TopCategoryRule,
    UnusualTransactionsRule,
};

/// Everything the rules may look at
pub struct SignalContext<'a> {
    pub aggregates: &'a Aggregates,
    pub forecast: &'a ForecastResult,
    pub anomalies: &'a [Anomaly],
    pub health: &'a HealthScore,
    pub config: &'a AnalysisConfig,
}

impl<'a> SignalContext<'a> {
    pub fn new(
        aggregates: &'a Aggregates,
        forecast: &'a ForecastResult,
        anomalies: &'a [Anomaly],
        health: &'a HealthScore,
        config: &'a AnalysisConfig,
    ) -> Self {
        Self {
            aggregates,
            forecast,
            anomalies,
            health,
            config,
        }
    }
}

/// A deterministic rule turning one signal into at most one insight
pub trait InsightRule: Send + Sync {
    /// The signal this rule reports on
    fn signal(&self) -> InsightSignal;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Evaluate the rule; None when the signal has nothing worth saying
    fn evaluate(&self, ctx: &SignalContext<'_>) -> Option<Insight>;
}

/// The main insight engine
pub struct InsightEngine {
    rules: Vec<Box<dyn InsightRule>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Create a new insight engine with the built-in rules
    pub fn new() -> Self {
        let mut engine = Self { rules: vec![] };

        // Registration order is the tie-break order of the output
        engine.register(Box::new(SavingsRateRule::new()));
        engine.register(Box::new(TopCategoryRule::new()));
        engine.register(Box::new(MonthOverMonthRule::new()));
        engine.register(Box::new(UnusualTransactionsRule::new()));
        engine.register(Box::new(SpendingOutlookRule::new()));

        engine
    }

    /// Create an engine with no rules (only the fallback insight is produced)
    pub fn empty() -> Self {
        Self { rules: vec![] }
    }

    /// Register a rule
    pub fn register(&mut self, rule: Box<dyn InsightRule>) {
        self.rules.push(rule);
    }

    /// Run every rule and return the insights, most impactful first.
    ///
    /// The list is never empty: without expense data, or when no rule fires,
    /// a neutral "Insufficient Data" insight is included.
    pub fn generate(&self, ctx: &SignalContext<'_>) -> Vec<Insight> {
        let mut insights = Vec::new();

        for rule in &self.rules {
            match rule.evaluate(ctx) {
                Some(insight) => {
                    tracing::debug!(
                        rule = rule.name(),
                        kind = insight.kind.as_str(),
                        "Rule produced insight"
                    );
                    insights.push(insight);
                }
                None => {
                    tracing::debug!(rule = rule.name(), "Rule produced nothing");
                }
            }
        }

        // Stable: equal impact keeps registration order
        insights.sort_by(|a, b| b.impact.priority().cmp(&a.impact.priority()));

        if insights.is_empty() || !ctx.aggregates.has_expense_activity() {
            insights.push(Insight::insufficient_data());
        }

        insights
    }

    /// Signals covered by the registered rules
    pub fn signals(&self) -> Vec<InsightSignal> {
        self.rules.iter().map(|r| r.signal()).collect()
    }
}

/// Generate insights with the built-in rules
pub fn generate_insights(ctx: &SignalContext<'_>) -> Vec<Insight> {
    InsightEngine::new().generate(ctx)
}
