// src/config/validate.rs

use crate::config::model::BrewConfig;
use crate::errors::{BrewError, Result};

/// Check the invariants serde cannot express.
pub fn validate_config(cfg: &BrewConfig) -> Result<()> {
    if cfg.brew_path.as_os_str().is_empty() {
        return Err(BrewError::ConfigError(
            "brew_path must not be empty".to_string(),
        ));
    }

    if cfg.watch.prefix.as_os_str().is_empty() {
        return Err(BrewError::ConfigError(
            "[watch].prefix must not be empty".to_string(),
        ));
    }

    Ok(())
}
