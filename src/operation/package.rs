// src/operation/package.rs

/// A Homebrew formula as referenced by an operation.
///
/// The engine never mutates these; the status flags are whatever the caller
/// parsed out of earlier output.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageRef {
    pub name: String,
    pub is_new: bool,
    pub is_updated: bool,
    pub is_installed: bool,
}

impl PackageRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_status(name, false, false, false)
    }

    pub fn with_status(
        name: impl Into<String>,
        is_new: bool,
        is_updated: bool,
        is_installed: bool,
    ) -> Self {
        Self {
            name: name.into(),
            is_new,
            is_updated,
            is_installed,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
