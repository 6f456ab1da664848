// src/errors.rs

//! Crate-wide error types.
//!
//! Two layers live here:
//! - [`BrewError`] for things that go wrong on the caller's side of the
//!   engine (config, duplicate submissions, watcher setup).
//! - [`OperationError`] for the failure of a submitted operation, which is
//!   only ever reported to that operation's observer.

use std::fmt;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrewError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Operation already in progress: {0}")]
    DuplicateOperation(String),

    #[error("File watch error: {0}")]
    WatchError(#[from] notify::Error),

    #[error("Operation failed: {0}")]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, BrewError>;

/// Why an operation did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Non-zero exit, signal death or launch failure not caused by a cancel.
    Unknown,
    /// The operation was interrupted by a cancellation request.
    Cancelled,
}

impl ErrorKind {
    /// Stable numeric code for the kind (`130` mirrors a SIGINT exit).
    pub fn code(self) -> i32 {
        match self {
            ErrorKind::Unknown => 1,
            ErrorKind::Cancelled => 130,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Unknown => f.write_str("unknown"),
            ErrorKind::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Failure delivered to `OperationObserver::on_failed`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct OperationError {
    kind: ErrorKind,
    message: String,
}

impl OperationError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unknown, message)
    }

    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled, "operation was cancelled")
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn code(&self) -> i32 {
        self.kind.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind == ErrorKind::Cancelled
    }
}
