use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Well-known `brew` commands.
///
/// A kind is only a convenience for building descriptors; it is resolved to
/// its canonical command name immediately and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    Update,
    List,
    Search,
    Install,
    Info,
    Remove,
    Options,
    Outdated,
}

impl CommandKind {
    pub const ALL: [CommandKind; 8] = [
        CommandKind::Update,
        CommandKind::List,
        CommandKind::Search,
        CommandKind::Install,
        CommandKind::Info,
        CommandKind::Remove,
        CommandKind::Options,
        CommandKind::Outdated,
    ];

    /// The command name as understood by `brew`.
    pub fn as_str(self) -> &'static str {
        match self {
            CommandKind::Update => "update",
            CommandKind::List => "list",
            CommandKind::Search => "search",
            CommandKind::Install => "install",
            CommandKind::Info => "info",
            CommandKind::Remove => "remove",
            CommandKind::Options => "options",
            CommandKind::Outdated => "outdated",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandKind {
    type Err = String;

    /// Exact, case-sensitive match on the canonical name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommandKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown brew command: {s}"))
    }
}

/// How output of an operation reaches its observer.
///
/// - `Streaming`: one `on_output` per line, as the line arrives.
/// - `Batched`: lines are buffered and delivered as a single block right
///   before `on_finished`, and only on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Streaming,
    Batched,
}

impl OutputMode {
    /// Output mode for a command name; only `install` streams.
    pub fn for_command(name: Option<&str>) -> Self {
        match name {
            Some(name) if name == CommandKind::Install.as_str() => OutputMode::Streaming,
            _ => OutputMode::Batched,
        }
    }
}
