// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::watch::WatchLocation;

/// Where `brew` lives unless configured otherwise.
pub const DEFAULT_BREW_PATH: &str = "/usr/local/bin/brew";

/// Default Homebrew prefix used to resolve watch locations.
pub const DEFAULT_PREFIX: &str = "/usr/local";

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// brew_path = "/opt/homebrew/bin/brew"
/// allow_duplicate_operations = false
///
/// [watch]
/// prefix = "/opt/homebrew"
/// locations = ["formula", "taps"]
/// ```
///
/// Every key is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct BrewConfig {
    /// Absolute path to the `brew` executable.
    #[serde(default = "default_brew_path")]
    pub brew_path: PathBuf,

    /// When `false`, submitting a descriptor equal to one already in flight
    /// fails with `DuplicateOperation`.
    #[serde(default = "default_allow_duplicates")]
    pub allow_duplicate_operations: bool,

    /// `[watch]` section.
    #[serde(default)]
    pub watch: WatchSection,
}

fn default_brew_path() -> PathBuf {
    PathBuf::from(DEFAULT_BREW_PATH)
}

fn default_allow_duplicates() -> bool {
    true
}

impl Default for BrewConfig {
    fn default() -> Self {
        Self {
            brew_path: default_brew_path(),
            allow_duplicate_operations: default_allow_duplicates(),
            watch: WatchSection::default(),
        }
    }
}

impl BrewConfig {
    /// Default config pointing at a specific executable.
    pub fn with_brew_path(path: impl Into<PathBuf>) -> Self {
        Self {
            brew_path: path.into(),
            ..Self::default()
        }
    }
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Homebrew prefix; locations are resolved below it.
    #[serde(default = "default_prefix")]
    pub prefix: PathBuf,

    /// Locations to watch. Defaults to the whole `Library` directory.
    #[serde(default = "default_locations")]
    pub locations: Vec<WatchLocation>,
}

fn default_prefix() -> PathBuf {
    PathBuf::from(DEFAULT_PREFIX)
}

fn default_locations() -> Vec<WatchLocation> {
    vec![WatchLocation::Library]
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            locations: default_locations(),
        }
    }
}
