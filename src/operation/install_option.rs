// src/operation/install_option.rs

/// A single install flag offered by a formula (see `brew options`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstallOption {
    /// Flag exactly as passed to `brew install`, e.g. `--with-openssl`.
    pub option: String,
    pub description: String,
    /// Whether the flag should be used for the next install.
    pub selected: bool,
}

impl InstallOption {
    pub fn new(option: impl Into<String>, description: impl Into<String>, selected: bool) -> Self {
        Self {
            option: option.into(),
            description: description.into(),
            selected,
        }
    }
}
