//! Insight Engine - plain-language observations about spending
//!
//! Each rule looks at one signal from an analysis run and produces at most
//! one insight. The engine collects them, orders them by impact and falls
//! back to an "Insufficient Data" card when there is nothing to say.
//!
//! ## Built-in Rules
//!
//! - **Savings Rate** - How much of the window's income was kept
//! - **Top Category** - Where most of the money went
//! - **Month over Month** - Notable change from last month
//! - **Unusual Transactions** - Expenses far above the average
//! - **Spending Outlook** - Where the forecast says spending is heading
//!
//! ## Usage
//!
//! ```rust,ignore
//! use spendsight_core::insights::{InsightEngine, SignalContext};
//!
//! let ctx = SignalContext::new(&aggregates, &forecast, &anomalies, &health, &config);
//! let insights = InsightEngine::new().generate(&ctx);
//! ```

pub mod engine;
pub mod month_over_month;
pub mod savings_rate;
pub mod spending_outlook;
pub mod top_category;
pub mod types;
pub mod unusual_transactions;

pub use engine::{generate_insights, InsightEngine, InsightRule, SignalContext};
pub use month_over_month::MonthOverMonthRule;
pub use savings_rate::SavingsRateRule;
pub use spending_outlook::SpendingOutlookRule;
pub use top_category::TopCategoryRule;
pub use types::{Impact, Insight, InsightKind, InsightSignal};
pub use unusual_transactions::UnusualTransactionsRule;
