//! Analysis configuration
//!
//! The engine recognizes a small set of tunables (window length, significance
//! threshold, anomaly multiplier, month-over-month noise threshold) plus the
//! forecast confidence policy and the category keyword table.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override (explicit path, or
//!    ~/.local/share/spendsight/config/analysis.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Keys missing from an override keep their built-in defaults. An override
//! without `[[categories]]` keeps the embedded keyword table.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/analysis.toml");

/// Upper bound on the analysis window (ten years of months)
const MAX_WINDOW_MONTHS: u32 = 120;

/// Forecast confidence and projection policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Number of future months to project
    pub periods: u32,
    /// Months with spending required for medium confidence
    pub medium_confidence_periods: usize,
    /// Months with spending required for high confidence
    pub high_confidence_periods: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            periods: 3,
            medium_confidence_periods: 3,
            high_confidence_periods: 6,
        }
    }
}

/// A category and the keywords that identify it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRuleConfig {
    pub name: String,
    pub keywords: Vec<String>,
}

/// All recognized tunables for an analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Months before the current one covered by the time series
    pub window_months: u32,
    /// Minimum share of total spend (0-1) for a category to stand alone
    pub significance_threshold: f64,
    /// Multiple of the mean expense at which a record is unusual
    pub anomaly_multiplier: f64,
    /// Minimum month-over-month change (percent) worth an insight
    pub noise_threshold_percent: f64,
    /// Fill blank categories from descriptions using `categories`
    pub auto_categorize: bool,
    pub forecast: ForecastConfig,
    /// Keyword table, in priority order
    pub categories: Vec<CategoryRuleConfig>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_months: 5,
            significance_threshold: 0.05,
            anomaly_multiplier: 2.0,
            noise_threshold_percent: 10.0,
            auto_categorize: false,
            forecast: ForecastConfig::default(),
            categories: Vec::new(),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration, preferring an explicit path, then the user
    /// override location, then the embedded defaults
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let content = match override_path {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                read_config(path)?
            }
            None => match default_config_path() {
                Some(path) if path.exists() => read_config(&path)?,
                _ => DEFAULT_CONFIG.to_string(),
            },
        };

        parse_config(&content)
    }

    /// The configuration compiled into the binary
    pub fn embedded() -> Self {
        parse_config(DEFAULT_CONFIG).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Embedded config is invalid, using built-in defaults");
            Self::default()
        })
    }

    /// Parse a TOML document on top of the built-in defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }

    /// Render in the config file layout, loadable with [`AnalysisConfig::from_toml`]
    pub fn to_toml(&self) -> Result<String> {
        let file = ConfigFile {
            analysis: AnalysisSection {
                window_months: self.window_months,
                significance_threshold: self.significance_threshold,
                anomaly_multiplier: self.anomaly_multiplier,
                noise_threshold_percent: self.noise_threshold_percent,
                auto_categorize: self.auto_categorize,
            },
            forecast: &self.forecast,
            categories: &self.categories,
        };
        toml::to_string_pretty(&file)
            .map_err(|e| Error::Config(format!("Failed to render config: {}", e)))
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.window_months > MAX_WINDOW_MONTHS {
            return Err(Error::Config(format!(
                "window_months must be at most {} (got {})",
                MAX_WINDOW_MONTHS, self.window_months
            )));
        }
        if !(0.0..=1.0).contains(&self.significance_threshold) {
            return Err(Error::Config(format!(
                "significance_threshold must be between 0 and 1 (got {})",
                self.significance_threshold
            )));
        }
        if !self.anomaly_multiplier.is_finite() || self.anomaly_multiplier <= 0.0 {
            return Err(Error::Config(format!(
                "anomaly_multiplier must be positive (got {})",
                self.anomaly_multiplier
            )));
        }
        if !self.noise_threshold_percent.is_finite() || self.noise_threshold_percent < 0.0 {
            return Err(Error::Config(format!(
                "noise_threshold_percent must be non-negative (got {})",
                self.noise_threshold_percent
            )));
        }
        if self.forecast.medium_confidence_periods > self.forecast.high_confidence_periods {
            return Err(Error::Config(
                "medium_confidence_periods cannot exceed high_confidence_periods".to_string(),
            ));
        }
        Ok(())
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("spendsight").join("config").join("analysis.toml"))
}

fn read_config(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))
}

/// File layout used when rendering a config
#[derive(Serialize)]
struct ConfigFile<'a> {
    analysis: AnalysisSection,
    forecast: &'a ForecastConfig,
    categories: &'a [CategoryRuleConfig],
}

#[derive(Serialize)]
struct AnalysisSection {
    window_months: u32,
    significance_threshold: f64,
    anomaly_multiplier: f64,
    noise_threshold_percent: f64,
    auto_categorize: bool,
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    analysis: Option<RawAnalysis>,
    forecast: Option<RawForecast>,
    categories: Option<Vec<CategoryRuleConfig>>,
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    window_months: Option<u32>,
    significance_threshold: Option<f64>,
    anomaly_multiplier: Option<f64>,
    noise_threshold_percent: Option<f64>,
    auto_categorize: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawForecast {
    periods: Option<u32>,
    medium_confidence_periods: Option<usize>,
    high_confidence_periods: Option<usize>,
}

/// Keyword table of the embedded config
fn embedded_categories() -> Vec<CategoryRuleConfig> {
    toml::from_str::<RawConfig>(DEFAULT_CONFIG)
        .ok()
        .and_then(|raw| raw.categories)
        .unwrap_or_default()
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<AnalysisConfig> {
    let raw: RawConfig =
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = AnalysisConfig::default();

    if let Some(analysis) = raw.analysis {
        if let Some(window) = analysis.window_months {
            config.window_months = window;
        }
        if let Some(threshold) = analysis.significance_threshold {
            config.significance_threshold = threshold;
        }
        if let Some(multiplier) = analysis.anomaly_multiplier {
            config.anomaly_multiplier = multiplier;
        }
        if let Some(noise) = analysis.noise_threshold_percent {
            config.noise_threshold_percent = noise;
        }
        if let Some(auto) = analysis.auto_categorize {
            config.auto_categorize = auto;
        }
    }

    if let Some(forecast) = raw.forecast {
        if let Some(periods) = forecast.periods {
            config.forecast.periods = periods;
        }
        if let Some(medium) = forecast.medium_confidence_periods {
            config.forecast.medium_confidence_periods = medium;
        }
        if let Some(high) = forecast.high_confidence_periods {
            config.forecast.high_confidence_periods = high;
        }
    }

    // An override without its own table keeps the embedded one
    let categories = match raw.categories {
        Some(categories) => categories,
        None => embedded_categories(),
    };
    config.categories = categories
        .into_iter()
        .filter(|c| !c.name.trim().is_empty())
        .collect();

    config.validate()?;
    Ok(config)
}
