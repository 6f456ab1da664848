// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod operation;
pub mod types;
pub mod watch;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{BrewConfig, apply_env_overrides, default_config_path, load_and_validate, validate_config};
use crate::engine::{Brew, ChannelObserver, OperationEvent};
use crate::operation::{OperationDescriptor, PackageRef};

pub use crate::engine::{Operation, OperationHandle, OperationObserver};
pub use crate::errors::{BrewError, ErrorKind, OperationError};
pub use crate::types::CommandKind;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (file, environment, CLI override)
/// - one operation built from the CLI arguments
/// - printing its output to stdout
/// - Ctrl-C → cancellation of the operation
pub async fn run(args: CliArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    let descriptor = descriptor_from_args(&args);
    let brew = Brew::new(&config);

    debug!(brew_path = ?brew.brew_path(), command = %descriptor, "running brew");

    let (observer, mut events) = ChannelObserver::new();
    let handle = brew
        .perform_operation(descriptor.clone(), observer)
        .with_context(|| format!("submitting `{descriptor}`"))?;

    // Ctrl-C → cancel; the operation then fails with `Cancelled`.
    {
        let brew = brew.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            info!(%handle, "Ctrl-C received; cancelling");
            brew.cancel_operation(handle);
        });
    }

    while let Some(event) = events.recv().await {
        match event {
            OperationEvent::Output { output, .. } => println!("{output}"),
            OperationEvent::Finished { .. } => return Ok(()),
            OperationEvent::Failed { error, .. } => {
                bail!("`brew {descriptor}` failed ({}): {}", error.code(), error);
            }
        }
    }

    bail!("`brew {descriptor}` ended without reporting a result")
}

/// Config file (explicit or `Brewkit.toml` if present), then environment,
/// then `--brew-path`.
pub fn resolve_config(args: &CliArgs) -> Result<BrewConfig> {
    let mut config = match &args.config {
        Some(path) => load_and_validate(PathBuf::from(path))?,
        None => {
            let path = default_config_path();
            if path.is_file() {
                load_and_validate(&path)?
            } else {
                let mut config = BrewConfig::default();
                apply_env_overrides(&mut config);
                config
            }
        }
    };

    if let Some(brew_path) = &args.brew_path {
        config.brew_path = PathBuf::from(brew_path);
    }

    validate_config(&config)?;
    Ok(config)
}

/// Build the descriptor the CLI arguments describe.
///
/// Well-known command names go through [`CommandKind`]; anything else is
/// passed to brew as typed.
pub fn descriptor_from_args(args: &CliArgs) -> OperationDescriptor {
    let base = match (&args.command, args.bare) {
        (Some(command), false) => match command.parse::<CommandKind>() {
            Ok(kind) => OperationDescriptor::from_kind(kind),
            Err(_) => OperationDescriptor::from_name(command.as_str()),
        },
        _ => OperationDescriptor::bare(),
    };

    let base = match &args.package {
        Some(package) => base.with_target(PackageRef::new(package.as_str())),
        None => base,
    };

    base.with_arguments(args.args.iter().cloned())
}
