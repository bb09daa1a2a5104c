//! Analysis pipeline
//!
//! Runs normalize, aggregate, forecast, anomaly detection, health scoring and
//! insight generation over one snapshot. Every stage is a pure function of its
//! inputs and the reference date, so the same snapshot always yields the same
//! report.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::aggregate::{aggregate, breakdown};
use crate::anomaly::detect_anomalies;
use crate::categorize::CategoryRules;
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::forecast::forecast;
use crate::health::compute_health_score;
use crate::insights::{Insight, InsightEngine, SignalContext};
use crate::models::{
    format_money, Anomaly, BreakdownSlice, CategoryTotal, ForecastResult, HealthScore,
    MonthBucket, Record,
};
use crate::normalize::Normalizer;
use crate::snapshot::Snapshot;

/// Everything one analysis run produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Reference date the window was anchored on
    pub generated_for: NaiveDate,
    pub window_months: u32,
    pub total_income: f64,
    pub total_expenses: f64,
    /// Oldest first, one per month in the window
    pub months: Vec<MonthBucket>,
    pub categories: BTreeMap<String, CategoryTotal>,
    pub breakdown: Vec<BreakdownSlice>,
    pub forecast: ForecastResult,
    pub anomalies: Vec<Anomaly>,
    pub health: HealthScore,
    pub insights: Vec<Insight>,
    /// Most common currency code among the records
    #[serde(default)]
    pub currency: Option<String>,
}

impl AnalysisReport {
    /// Format an amount in the report's currency
    pub fn money(&self, amount: f64) -> String {
        format_money(amount, self.currency.as_deref())
    }
}

/// Runs the full pipeline with one configuration
pub struct Analyzer {
    config: AnalysisConfig,
    normalizer: Normalizer,
    engine: InsightEngine,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self {
            config: AnalysisConfig::default(),
            normalizer: Normalizer::new(),
            engine: InsightEngine::new(),
        }
    }
}

impl Analyzer {
    /// Create an analyzer. Fails when a tunable is out of range or the
    /// category keyword table does not compile.
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;

        let normalizer = if config.auto_categorize {
            Normalizer::with_rules(CategoryRules::new(&config.categories)?)
        } else {
            Normalizer::new()
        };

        Ok(Self {
            config,
            normalizer,
            engine: InsightEngine::new(),
        })
    }

    /// Replace the insight engine (e.g., to register extra rules)
    pub fn with_engine(mut self, engine: InsightEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Normalize a snapshot with this analyzer's categorization settings
    pub fn normalize(&self, snapshot: &Snapshot) -> Vec<Record> {
        self.normalizer.normalize_snapshot(snapshot)
    }

    /// Analyze already-normalized records
    pub fn analyze(&self, records: &[Record], now: NaiveDate) -> AnalysisReport {
        let config = &self.config;

        let aggregates = aggregate(records, config.window_months, now);
        let breakdown = breakdown(&aggregates.categories, config.significance_threshold);
        let forecast = forecast(&aggregates, &config.forecast);
        let anomalies = detect_anomalies(records, &aggregates.window, config.anomaly_multiplier);
        let total_income = aggregates.total_income();
        let total_expenses = aggregates.total_expenses();
        let health = compute_health_score(total_income, total_expenses);

        let ctx = SignalContext::new(&aggregates, &forecast, &anomalies, &health, config);
        let insights = self.engine.generate(&ctx);

        info!(
            records = records.len(),
            months = aggregates.months.len(),
            categories = aggregates.categories.len(),
            anomalies = anomalies.len(),
            score = health.score,
            insights = insights.len(),
            "Analysis complete"
        );

        AnalysisReport {
            generated_for: now,
            window_months: config.window_months,
            total_income,
            total_expenses,
            months: aggregates.months,
            categories: aggregates.categories,
            breakdown,
            forecast,
            anomalies,
            health,
            insights,
            currency: aggregates.currency,
        }
    }

    /// Normalize then analyze a snapshot
    pub fn analyze_snapshot(&self, snapshot: &Snapshot, now: NaiveDate) -> AnalysisReport {
        let records = self.normalize(snapshot);
        self.analyze(&records, now)
    }
}

/// Handle for one requested run. Only the most recently issued ticket may
/// produce a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTicket {
    generation: u64,
}

impl RunTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Serializes analysis runs and drops results that a newer request has
/// superseded.
///
/// Callers issue a ticket with [`AnalysisSession::begin`] whenever the
/// underlying data changes, then [`AnalysisSession::run`] it. A run whose
/// ticket is no longer the latest returns `None` instead of a stale report.
pub struct AnalysisSession {
    analyzer: Analyzer,
    generation: AtomicU64,
    run_lock: Mutex<()>,
}

impl AnalysisSession {
    pub fn new(analyzer: Analyzer) -> Self {
        Self {
            analyzer,
            generation: AtomicU64::new(0),
            run_lock: Mutex::new(()),
        }
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// Request a new run, superseding any outstanding ticket
    pub fn begin(&self) -> RunTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        RunTicket { generation }
    }

    /// Whether `ticket` is still the latest request
    pub fn is_current(&self, ticket: RunTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.generation
    }

    /// Run the analysis for `ticket`. Returns None when the ticket was
    /// superseded before the run started or while it was computing.
    pub fn run(
        &self,
        ticket: RunTicket,
        snapshot: &Snapshot,
        now: NaiveDate,
    ) -> Option<AnalysisReport> {
        // Runs never overlap; the guard protects no data
        let _guard = self
            .run_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if !self.is_current(ticket) {
            debug!(generation = ticket.generation, "Skipping superseded run");
            return None;
        }

        let report = self.analyzer.analyze_snapshot(snapshot, now);

        if !self.is_current(ticket) {
            debug!(generation = ticket.generation, "Discarding superseded result");
            return None;
        }

        Some(report)
    }

    /// Begin and run in one step
    pub fn refresh(&self, snapshot: &Snapshot, now: NaiveDate) -> Option<AnalysisReport> {
        let ticket = self.begin();
        self.run(ticket, snapshot, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CategoryRuleConfig;
    use crate::error::Error;
    use crate::insights::{InsightKind, InsightSignal};
    use crate::models::{HealthStatus, NO_DATA_CATEGORY, UNCATEGORIZED};
    use crate::test_utils::{date, scenario_snapshot};
    use serde_json::json;

    fn now() -> NaiveDate {
        date(2026, 3, 20)
    }

    #[test]
    fn test_scenario_report() {
        let report = Analyzer::default().analyze_snapshot(&scenario_snapshot(), now());

        assert_eq!(report.months.len(), 6);
        assert_eq!(report.total_income, 1000.0);
        assert_eq!(report.total_expenses, 600.0);
        assert_eq!(report.categories["Food"].total, 500.0);
        assert_eq!(report.categories["Transport"].total, 100.0);
        assert!((report.health.savings_rate_percent - 40.0).abs() < 1e-9);
        assert!(report.anomalies.is_empty());
        assert_eq!(report.currency.as_deref(), Some("USD"));
        assert_eq!(report.money(600.0), "$600.00");

        let savings = report
            .insights
            .iter()
            .find(|i| i.signal == InsightSignal::SavingsRate)
            .unwrap();
        assert_eq!(savings.kind, InsightKind::Positive);
    }

    #[test]
    fn test_empty_snapshot_report() {
        let report = Analyzer::default().analyze_snapshot(&Snapshot::default(), now());

        assert_eq!(report.months.len(), 6);
        assert!(report.months.iter().all(|m| m.income == 0.0 && m.expenses == 0.0));
        assert_eq!(report.breakdown.len(), 1);
        assert_eq!(report.breakdown[0].name, NO_DATA_CATEGORY);
        assert!(report.anomalies.is_empty());
        assert_eq!(report.health.score, 0);
        assert_eq!(report.health.status, HealthStatus::NeedsAttention);
        assert!(report
            .insights
            .iter()
            .any(|i| i.signal == InsightSignal::InsufficientData));
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let analyzer = Analyzer::default();
        let first = analyzer.analyze_snapshot(&scenario_snapshot(), now());
        let second = analyzer.analyze_snapshot(&scenario_snapshot(), now());
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_auto_categorize_fills_blank_categories() {
        let config = AnalysisConfig {
            auto_categorize: true,
            categories: vec![CategoryRuleConfig {
                name: "Transport".to_string(),
                keywords: vec!["uber".to_string()],
            }],
            ..AnalysisConfig::default()
        };
        let analyzer = Analyzer::new(config).unwrap();
        let snapshot = Snapshot::new(
            vec![json!({"amount": 12, "description": "Uber ride", "date": "2026-03-02"})],
            vec![],
        );

        let report = analyzer.analyze_snapshot(&snapshot, now());
        assert!(report.categories.contains_key("Transport"));
    }

    #[test]
    fn test_new_rejects_out_of_range_config() {
        let wide = AnalysisConfig {
            window_months: 500_000,
            ..AnalysisConfig::default()
        };
        assert!(matches!(Analyzer::new(wide), Err(Error::Config(_))));

        let nan = AnalysisConfig {
            significance_threshold: f64::NAN,
            ..AnalysisConfig::default()
        };
        assert!(matches!(Analyzer::new(nan), Err(Error::Config(_))));

        assert!(Analyzer::new(AnalysisConfig::embedded()).is_ok());
    }

    #[test]
    fn test_categorization_off_by_default() {
        let config = AnalysisConfig {
            categories: vec![CategoryRuleConfig {
                name: "Transport".to_string(),
                keywords: vec!["uber".to_string()],
            }],
            ..AnalysisConfig::default()
        };
        let analyzer = Analyzer::new(config).unwrap();
        let snapshot = Snapshot::new(
            vec![json!({"amount": 12, "description": "Uber ride", "date": "2026-03-02"})],
            vec![],
        );

        let report = analyzer.analyze_snapshot(&snapshot, now());
        assert!(report.categories.contains_key(UNCATEGORIZED));
        assert!(!report.categories.contains_key("Transport"));
    }

    #[test]
    fn test_session_discards_superseded_runs() {
        let session = AnalysisSession::new(Analyzer::default());
        let stale = session.begin();
        let latest = session.begin();

        assert!(!session.is_current(stale));
        assert!(session.run(stale, &scenario_snapshot(), now()).is_none());
        assert!(session.run(latest, &scenario_snapshot(), now()).is_some());
        assert!(latest.generation() > stale.generation());
    }

    #[test]
    fn test_session_concurrent_refreshes_agree() {
        let session = AnalysisSession::new(Analyzer::default());
        let expected = session.analyzer().analyze_snapshot(&scenario_snapshot(), now());

        let reports: Vec<Option<AnalysisReport>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| session.refresh(&scenario_snapshot(), now())))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for report in reports.into_iter().flatten() {
            assert_eq!(report, expected);
        }
    }
}
