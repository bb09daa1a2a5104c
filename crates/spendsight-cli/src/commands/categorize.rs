//! Keyword category suggestion command

use std::path::Path;

use anyhow::{Context, Result};
use spendsight_core::{AnalysisConfig, CategoryRules};

use super::core::load_config;

/// Suggest a category for `text` from the configured keyword table
pub fn suggest_category(config: &AnalysisConfig, text: &str) -> Result<Option<String>> {
    let rules =
        CategoryRules::new(&config.categories).context("Failed to compile category keywords")?;
    Ok(rules.suggest(text).map(|c| c.to_string()))
}

pub fn cmd_categorize(config_path: Option<&Path>, text: &str) -> Result<()> {
    let config = load_config(config_path, None)?;

    match suggest_category(&config, text)? {
        Some(category) => println!("{}", category),
        None => {
            println!("No matching category");
            tracing::debug!(rules = config.categories.len(), "No keyword matched");
        }
    }

    Ok(())
}
