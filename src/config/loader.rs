// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use crate::config::model::BrewConfig;
use crate::config::validate::validate_config;
use crate::errors::Result;

/// Environment variable that overrides `brew_path`.
pub const BREW_PATH_ENV_VAR: &str = "BREWKIT_BREW_PATH";

/// Load a configuration file from a given path.
///
/// This only performs TOML deserialization; use [`load_and_validate`] for
/// the checked version.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<BrewConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading config file at {:?}", path))?;

    let config: BrewConfig = toml::from_str(&contents)?;
    Ok(config)
}

/// Load a configuration file, apply environment overrides and validate.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<BrewConfig> {
    let mut config = load_from_path(&path)?;
    apply_env_overrides(&mut config);
    validate_config(&config)?;
    Ok(config)
}

/// Apply `BREWKIT_BREW_PATH` if it is set and non-empty.
pub fn apply_env_overrides(config: &mut BrewConfig) {
    if let Some(path) = std::env::var_os(BREW_PATH_ENV_VAR).filter(|v| !v.is_empty()) {
        debug!(path = ?path, "brew_path overridden from environment");
        config.brew_path = PathBuf::from(path);
    }
}

/// `Brewkit.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Brewkit.toml")
}
