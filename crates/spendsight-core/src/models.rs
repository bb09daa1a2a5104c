//! Domain models for Spendsight

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Category used when a record has none
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Synthetic category for the long tail of a breakdown
pub const OTHER_CATEGORY: &str = "Other";

/// Placeholder category for a breakdown with no spending
pub const NO_DATA_CATEGORY: &str = "No Data";

/// Format an amount for messages. Codes with a common symbol get the symbol,
/// other codes are appended, and no code means dollars.
pub fn format_money(amount: f64, currency: Option<&str>) -> String {
    let symbol = match currency {
        None | Some("USD") => Some("$"),
        Some("EUR") => Some("€"),
        Some("GBP") => Some("£"),
        Some("JPY") => Some("¥"),
        Some("INR") => Some("₹"),
        Some(_) => None,
    };
    match (symbol, currency) {
        (Some(symbol), _) => format!("{}{:.2}", symbol, amount),
        (None, Some(code)) => format!("{:.2} {}", amount, code),
        (None, None) => format!("{:.2}", amount),
    }
}

/// Whether a record is money in or money out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Income,
    Expense,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "credit" | "deposit" => Ok(Self::Income),
            "expense" | "debit" | "spending" => Ok(Self::Expense),
            _ => Err(format!("Unknown record kind: {}", s)),
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single financial event in canonical form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub kind: RecordKind,
    /// Always >= 0. Missing, negative or non-numeric amounts are stored as 0.
    pub amount: f64,
    /// False when `amount` was coerced; such records are left out of averages.
    pub valid_amount: bool,
    pub category: String,
    /// None when the stored date could not be parsed
    pub occurred_at: Option<NaiveDateTime>,
    /// Informational only, no conversion is performed
    pub currency: Option<String>,
    pub description: Option<String>,
    /// Display hint for the record's category
    pub color: Option<String>,
}

impl Record {
    /// Calendar date of the record, if known
    pub fn date(&self) -> Option<NaiveDate> {
        self.occurred_at.map(|dt| dt.date())
    }

    pub fn is_expense(&self) -> bool {
        self.kind == RecordKind::Expense
    }

    pub fn is_income(&self) -> bool {
        self.kind == RecordKind::Income
    }
}

/// Income and expense totals for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthBucket {
    pub year: i32,
    pub month: u32,
    /// Short month name ("Jan", "Feb", ...)
    pub label: String,
    pub income: f64,
    pub expenses: f64,
}

impl MonthBucket {
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            label: month_label(month).to_string(),
            income: 0.0,
            expenses: 0.0,
        }
    }

    pub fn net(&self) -> f64 {
        self.income - self.expenses
    }
}

/// Spending total for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub name: String,
    pub total: f64,
    /// Number of records that contributed to `total`
    pub count: usize,
    pub color: Option<String>,
    /// Spending per month bucket of the analysis window, oldest first
    pub monthly: Vec<f64>,
}

impl CategoryTotal {
    pub fn new(name: impl Into<String>, window_len: usize) -> Self {
        Self {
            name: name.into(),
            total: 0.0,
            count: 0,
            color: None,
            monthly: vec![0.0; window_len],
        }
    }
}

/// One slice of a display breakdown (pie/donut chart)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownSlice {
    pub name: String,
    pub value: f64,
    /// Share of total spending, 0-100
    pub percentage: f64,
    pub color: Option<String>,
}

/// Direction of a spending series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl Trend {
    /// Classify a growth rate by its sign
    pub fn from_rate(rate: f64) -> Self {
        if rate > 0.0 {
            Self::Increasing
        } else if rate < 0.0 {
            Self::Decreasing
        } else {
            Self::Stable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::Stable => "stable",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How much history backs a forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// One tier lower, stopping at `Low`
    pub fn decayed(&self) -> Self {
        match self {
            Self::High => Self::Medium,
            Self::Medium | Self::Low => Self::Low,
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Predicted direction for a single category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPrediction {
    pub trend: Trend,
    pub predicted_change_percent: f64,
}

/// A projected future month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPeriod {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub amount: f64,
    pub confidence: Confidence,
}

/// Spending forecast for the next period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub predicted_amount: f64,
    pub trend: Trend,
    pub avg_growth_rate_percent: f64,
    pub confidence: Confidence,
    pub category_predictions: BTreeMap<String, CategoryPrediction>,
    pub projections: Vec<ProjectedPeriod>,
}

/// An expense that is large relative to the user's average
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub record_id: String,
    pub category: String,
    pub amount: f64,
    pub occurred_at: Option<NaiveDateTime>,
    /// Average expense the amount was compared against
    pub mean: f64,
    /// amount / mean
    pub ratio: f64,
    pub title: String,
    pub description: String,
}

/// Qualitative band of a health score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    NeedsAttention,
    Fair,
    Good,
    Excellent,
}

impl HealthStatus {
    /// Band for a score in 0..=100 (larger values count as 100)
    pub fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => Self::Excellent,
            60..=79 => Self::Good,
            40..=59 => Self::Fair,
            0..=39 => Self::NeedsAttention,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NeedsAttention => "needs_attention",
            Self::Fair => "fair",
            Self::Good => "good",
            Self::Excellent => "excellent",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::NeedsAttention => "Needs Attention",
            Self::Fair => "Fair",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Composite financial health metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthScore {
    pub score: u8,
    pub status: HealthStatus,
    pub savings_rate_percent: f64,
    pub expense_to_income_ratio_percent: f64,
}

/// Short English month name for 1..=12
pub fn month_label(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "???",
    }
}
