//! Configuration inspection commands

use std::path::Path;

use anyhow::{Context, Result};
use spendsight_core::config::default_config_path;

use super::core::load_config;

/// Print the effective configuration as TOML
pub fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path, None)?;
    let rendered = config.to_toml().context("Failed to render config")?;

    match config_path {
        Some(path) => println!("# Loaded from {}", path.display()),
        None => match default_config_path() {
            Some(path) if path.exists() => println!("# Loaded from {}", path.display()),
            _ => println!("# Built-in defaults"),
        },
    }
    println!("{}", rendered);
    Ok(())
}

/// Print where a config override should be placed
pub fn cmd_config_path() -> Result<()> {
    match default_config_path() {
        Some(path) => {
            println!("{}", path.display());
            if !path.exists() {
                println!("(not present; built-in defaults are used)");
            }
        }
        None => println!("No data directory available on this platform"),
    }
    Ok(())
}
