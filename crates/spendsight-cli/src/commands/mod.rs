//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (config loading, reference date, running the analysis)
//! - `reports` - Report sections (summary, categories, forecast, anomalies, health, insights)
//! - `categorize` - Keyword category suggestions
//! - `config` - Configuration inspection

pub mod categorize;
pub mod config;
pub mod core;
pub mod reports;

// Re-export command functions for main.rs
pub use categorize::*;
pub use config::*;
pub use self::core::*;
pub use reports::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
