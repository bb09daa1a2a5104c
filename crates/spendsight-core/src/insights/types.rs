//! Core types for the Insight Engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tone of an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Positive,
    Neutral,
    Negative,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::Positive => "positive",
            InsightKind::Neutral => "neutral",
            InsightKind::Negative => "negative",
        }
    }

    /// Display color for cards of this tone
    pub fn color(&self) -> &'static str {
        match self {
            InsightKind::Positive => "#4CAF50",
            InsightKind::Neutral => "#2196F3",
            InsightKind::Negative => "#F44336",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(InsightKind::Positive),
            "neutral" => Ok(InsightKind::Neutral),
            "negative" => Ok(InsightKind::Negative),
            _ => Err(format!("Unknown insight kind: {}", s)),
        }
    }
}

/// How much an insight matters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    Low,
    Medium,
    High,
}

impl Impact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::Low => "low",
            Impact::Medium => "medium",
            Impact::High => "high",
        }
    }

    /// Numeric priority for sorting (higher = more important)
    pub fn priority(&self) -> u8 {
        match self {
            Impact::Low => 1,
            Impact::Medium => 2,
            Impact::High => 3,
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Impact {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Impact::Low),
            "medium" => Ok(Impact::Medium),
            "high" => Ok(Impact::High),
            _ => Err(format!("Unknown impact: {}", s)),
        }
    }
}

/// The signal an insight was derived from. Each signal yields at most one
/// insight per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightSignal {
    SavingsRate,
    TopCategory,
    MonthOverMonth,
    UnusualTransactions,
    SpendingOutlook,
    InsufficientData,
}

impl InsightSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightSignal::SavingsRate => "savings_rate",
            InsightSignal::TopCategory => "top_category",
            InsightSignal::MonthOverMonth => "month_over_month",
            InsightSignal::UnusualTransactions => "unusual_transactions",
            InsightSignal::SpendingOutlook => "spending_outlook",
            InsightSignal::InsufficientData => "insufficient_data",
        }
    }

    /// Default icon name for this signal
    pub fn icon(&self) -> &'static str {
        match self {
            InsightSignal::SavingsRate => "piggy-bank",
            InsightSignal::TopCategory => "pie-chart",
            InsightSignal::MonthOverMonth => "bar-chart",
            InsightSignal::UnusualTransactions => "alert-triangle",
            InsightSignal::SpendingOutlook => "calendar",
            InsightSignal::InsufficientData => "info",
        }
    }
}

impl fmt::Display for InsightSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightSignal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "savings_rate" => Ok(InsightSignal::SavingsRate),
            "top_category" => Ok(InsightSignal::TopCategory),
            "month_over_month" => Ok(InsightSignal::MonthOverMonth),
            "unusual_transactions" => Ok(InsightSignal::UnusualTransactions),
            "spending_outlook" => Ok(InsightSignal::SpendingOutlook),
            "insufficient_data" => Ok(InsightSignal::InsufficientData),
            _ => Err(format!("Unknown insight signal: {}", s)),
        }
    }
}

/// A short, human-readable observation about the user's finances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    /// Positive, neutral or negative
    #[serde(rename = "type")]
    pub kind: InsightKind,
    /// Which signal produced this insight
    pub signal: InsightSignal,
    /// Short title (e.g., "Great Savings Rate")
    pub title: String,
    /// One or two sentences with the numbers behind the title
    pub message: String,
    pub impact: Impact,
    /// Display hint: icon name
    pub icon: String,
    /// Display hint: hex color
    pub color: String,
}

impl Insight {
    /// Create an insight with the signal's default icon and the kind's color
    pub fn new(
        signal: InsightSignal,
        kind: InsightKind,
        impact: Impact,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            signal,
            title: title.into(),
            message: message.into(),
            impact,
            icon: signal.icon().to_string(),
            color: kind.color().to_string(),
        }
    }

    /// Override the icon
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// The neutral placeholder shown when there is not enough data
    pub fn insufficient_data() -> Self {
        Self::new(
            InsightSignal::InsufficientData,
            InsightKind::Neutral,
            Impact::Low,
            "Insufficient Data",
            "Add more transactions and income to unlock personalized insights.",
        )
    }
}
