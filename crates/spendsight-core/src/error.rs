//! Error types for Spendsight
//!
//! The analysis itself never fails; these errors come from the boundary
//! (loading snapshots and configuration).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Unsupported snapshot format: {0}")]
    UnsupportedFormat(String),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
