//! Spendsight Core Library
//!
//! Personal finance analytics over a snapshot of stored records:
//! - Record normalization from loosely-typed documents
//! - Monthly and per-category aggregation
//! - Growth-rate trend and spending forecast
//! - Unusual transaction detection
//! - Financial health score
//! - Rule-based insight generation
//! - Keyword category suggestions
//!
//! Everything here is synchronous and free of side effects apart from
//! loading snapshots and configuration files.

pub mod aggregate;
pub mod analysis;
pub mod anomaly;
pub mod categorize;
pub mod config;
pub mod error;
pub mod forecast;
pub mod health;
pub mod insights;
pub mod models;
pub mod normalize;
pub mod snapshot;

/// Record builders and fixtures for tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use aggregate::{aggregate, breakdown, Aggregates, MonthChange, MonthWindow};
pub use analysis::{AnalysisReport, AnalysisSession, Analyzer, RunTicket};
pub use anomaly::detect_anomalies;
pub use categorize::CategoryRules;
pub use config::{AnalysisConfig, CategoryRuleConfig, ForecastConfig};
pub use error::{Error, Result};
pub use forecast::forecast;
pub use health::compute_health_score;
pub use insights::{
    generate_insights, Impact, Insight, InsightEngine, InsightKind, InsightRule, InsightSignal,
    SignalContext,
};
pub use models::{
    format_money, Anomaly, BreakdownSlice, CategoryPrediction, CategoryTotal, Confidence, ForecastResult,
    HealthScore, HealthStatus, MonthBucket, ProjectedPeriod, Record, RecordKind, Trend,
};
pub use normalize::{normalize_record, normalize_snapshot, Normalizer};
pub use snapshot::{load_snapshot, Snapshot};
