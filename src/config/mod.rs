// src/config/mod.rs

//! Configuration loading and validation for brewkit.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk and apply environment overrides
//!   (`loader.rs`).
//! - Validate basic invariants (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{apply_env_overrides, default_config_path, load_and_validate, load_from_path};
pub use model::{BrewConfig, WatchSection, DEFAULT_BREW_PATH, DEFAULT_PREFIX};
pub use validate::validate_config;
