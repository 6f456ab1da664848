// src/watch/location.rs

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// A well-known directory below the Homebrew prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchLocation {
    Library,
    Formula,
    Taps,
    Aliases,
    LinkedKegs,
    PinnedKegs,
}

impl WatchLocation {
    pub const ALL: [WatchLocation; 6] = [
        WatchLocation::Library,
        WatchLocation::Formula,
        WatchLocation::Taps,
        WatchLocation::Aliases,
        WatchLocation::LinkedKegs,
        WatchLocation::PinnedKegs,
    ];

    /// Path of this location relative to the prefix.
    pub fn relative_path(self) -> &'static str {
        match self {
            WatchLocation::Library => "Library",
            WatchLocation::Formula => "Library/Formula",
            WatchLocation::Taps => "Library/Taps",
            WatchLocation::Aliases => "Library/Aliases",
            WatchLocation::LinkedKegs => "Library/LinkedKegs",
            WatchLocation::PinnedKegs => "Library/PinnedKegs",
        }
    }

    pub fn resolve(self, prefix: &Path) -> PathBuf {
        prefix.join(self.relative_path())
    }
}

/// Resolve and de-duplicate a set of locations.
///
/// A location nested below another requested one is dropped, since the
/// outer one is watched recursively.
pub fn resolve_locations(prefix: &Path, locations: &[WatchLocation]) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = locations.iter().map(|loc| loc.resolve(prefix)).collect();
    paths.sort();
    paths.dedup();

    let mut roots: Vec<PathBuf> = Vec::with_capacity(paths.len());
    for path in paths {
        if !roots.iter().any(|root| path.starts_with(root)) {
            roots.push(path);
        }
    }
    roots
}
