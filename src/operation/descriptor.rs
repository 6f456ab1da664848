// src/operation/descriptor.rs

use std::fmt;

use crate::operation::{InstallOption, PackageRef};
use crate::types::CommandKind;

/// Immutable description of one `brew` invocation.
///
/// A descriptor is built either from a [`CommandKind`] or from a raw command
/// name; both paths store the same canonical string, so
/// `OperationDescriptor::from_kind(CommandKind::Search)` and
/// `OperationDescriptor::from_name("search")` compare equal.
///
/// For invocations without a subcommand (e.g. `brew --cache`) use
/// [`OperationDescriptor::bare`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationDescriptor {
    name: Option<String>,
    target: Option<PackageRef>,
    arguments: Vec<String>,
}

impl OperationDescriptor {
    pub fn from_kind(kind: CommandKind) -> Self {
        Self::from_name(kind.as_str())
    }

    pub fn from_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            target: None,
            arguments: Vec::new(),
        }
    }

    /// No subcommand; only the arguments are passed to `brew`.
    pub fn bare() -> Self {
        Self {
            name: None,
            target: None,
            arguments: Vec::new(),
        }
    }

    pub fn with_target(self, target: PackageRef) -> Self {
        Self {
            target: Some(target),
            ..self
        }
    }

    pub fn with_arguments<I, S>(self, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            arguments: arguments.into_iter().map(Into::into).collect(),
            ..self
        }
    }

    pub fn update() -> Self {
        Self::from_kind(CommandKind::Update)
    }

    pub fn list() -> Self {
        Self::from_kind(CommandKind::List)
    }

    /// `brew search` with no term lists every formula.
    pub fn search(target: Option<PackageRef>) -> Self {
        let op = Self::from_kind(CommandKind::Search);
        match target {
            Some(target) => op.with_target(target),
            None => op,
        }
    }

    pub fn install(target: PackageRef) -> Self {
        Self::from_kind(CommandKind::Install).with_target(target)
    }

    /// `brew install` with the flag of every *selected* option appended.
    pub fn install_with_options(target: PackageRef, options: &[InstallOption]) -> Self {
        Self::install(target).with_arguments(
            options
                .iter()
                .filter(|opt| opt.selected)
                .map(|opt| opt.option.clone()),
        )
    }

    pub fn info(target: PackageRef) -> Self {
        Self::from_kind(CommandKind::Info).with_target(target)
    }

    pub fn remove(target: PackageRef) -> Self {
        Self::from_kind(CommandKind::Remove).with_target(target)
    }

    pub fn options(target: PackageRef) -> Self {
        Self::from_kind(CommandKind::Options).with_target(target)
    }

    pub fn outdated() -> Self {
        Self::from_kind(CommandKind::Outdated)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn target(&self) -> Option<&PackageRef> {
        self.target.as_ref()
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// The well-known kind matching the stored name, if any.
    pub fn kind(&self) -> Option<CommandKind> {
        self.name.as_deref().and_then(|name| name.parse().ok())
    }

    pub fn is_kind(&self, kind: CommandKind) -> bool {
        self.name.as_deref() == Some(kind.as_str())
    }

    /// Argument vector passed to the executable:
    /// `[name?] [target name?] arguments...`
    pub fn command_line(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(2 + self.arguments.len());
        if let Some(name) = &self.name {
            argv.push(name.clone());
        }
        if let Some(target) = &self.target {
            argv.push(target.name.clone());
        }
        argv.extend(self.arguments.iter().cloned());
        argv
    }
}

impl fmt::Display for OperationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line().join(" "))
    }
}
