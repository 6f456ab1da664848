// src/engine/brew.rs

use std::path::Path;
use std::sync::Arc;

use anyhow::anyhow;
use tracing::{debug, info, warn};

use crate::config::BrewConfig;
use crate::engine::cancel::CancellationController;
use crate::engine::dispatcher::CompletionDispatcher;
use crate::engine::observer::{ChannelObserver, OperationObserver};
use crate::engine::registry::OperationRegistry;
use crate::engine::{Operation, OperationEvent, OperationHandle};
use crate::errors::{BrewError, OperationError, Result};
use crate::exec::{ProcessExit, ProcessRunner, run_process};
use crate::operation::OperationDescriptor;
use crate::types::CommandKind;

/// Entry point for running `brew` operations.
///
/// Owns the registry of in-flight operations; every submitted operation runs
/// on its own tokio task. Cloning is cheap and clones share the registry.
#[derive(Debug, Clone)]
pub struct Brew {
    registry: Arc<OperationRegistry>,
    runner: ProcessRunner,
    canceller: CancellationController,
}

/// Everything a successful operation delivered to its observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOutput {
    pub handle: OperationHandle,
    /// One entry per `on_output` call.
    pub chunks: Vec<String>,
}

impl OperationOutput {
    /// All output joined with newlines.
    pub fn text(&self) -> String {
        self.chunks.join("\n")
    }
}

impl Brew {
    pub fn new(config: &BrewConfig) -> Self {
        let registry = Arc::new(OperationRegistry::new(config.allow_duplicate_operations));
        Self {
            canceller: CancellationController::new(Arc::clone(&registry)),
            runner: ProcessRunner::new(&config.brew_path),
            registry,
        }
    }

    pub fn with_brew_path(path: impl AsRef<Path>) -> Self {
        Self::new(&BrewConfig::with_brew_path(path.as_ref()))
    }

    pub fn brew_path(&self) -> &Path {
        self.runner.brew_path()
    }

    pub fn registry(&self) -> &Arc<OperationRegistry> {
        &self.registry
    }

    /// Start an operation and return immediately.
    ///
    /// The observer gets zero or more outputs followed by exactly one
    /// terminal notification. Launch failures are reported through
    /// `on_failed` like any other failure; the only synchronous errors are
    /// a rejected duplicate and a missing tokio runtime.
    pub fn perform_operation(
        &self,
        descriptor: OperationDescriptor,
        observer: Arc<dyn OperationObserver>,
    ) -> Result<OperationHandle> {
        let rt = tokio::runtime::Handle::try_current()
            .map_err(|e| BrewError::Other(anyhow!("no tokio runtime to run `{descriptor}` on: {e}")))?;

        let (operation, cancel_rx) = self
            .registry
            .register(descriptor, Arc::clone(&observer))?;
        let handle = operation.handle();

        info!(%handle, command = %operation.descriptor(), "submitting operation");

        let registry = Arc::clone(&self.registry);
        let runner = self.runner.clone();
        rt.spawn(async move {
            drive_operation(registry, runner, operation, observer, cancel_rx).await;
        });

        Ok(handle)
    }

    /// Run an operation and wait for it, collecting its output.
    pub async fn execute(&self, descriptor: OperationDescriptor) -> Result<OperationOutput> {
        let (observer, mut events) = ChannelObserver::new();
        let handle = self.perform_operation(descriptor, observer)?;

        let mut chunks = Vec::new();
        while let Some(event) = events.recv().await {
            match event {
                OperationEvent::Output { output, .. } => chunks.push(output),
                OperationEvent::Finished { .. } => {
                    return Ok(OperationOutput { handle, chunks });
                }
                OperationEvent::Failed { error, .. } => return Err(error.into()),
            }
        }

        Err(BrewError::Other(anyhow!(
            "operation {handle} ended without a terminal notification"
        )))
    }

    pub fn cancel_operation(&self, handle: OperationHandle) -> bool {
        self.canceller.cancel(handle)
    }

    pub fn cancel_operations_of_kind(&self, kind: CommandKind) -> usize {
        self.canceller.cancel_kind(kind)
    }

    pub fn cancel_all_operations(&self) -> usize {
        self.canceller.cancel_all()
    }

    pub fn is_active(&self, handle: OperationHandle) -> bool {
        self.registry.contains(handle)
    }

    pub fn active_operations(&self) -> Vec<Operation> {
        self.registry.operations()
    }
}

/// Body of an operation's task.
async fn drive_operation(
    registry: Arc<OperationRegistry>,
    runner: ProcessRunner,
    operation: Operation,
    observer: Arc<dyn OperationObserver>,
    cancel_rx: tokio::sync::oneshot::Receiver<()>,
) {
    let handle = operation.handle();
    let mut dispatcher = CompletionDispatcher::new(operation.clone(), observer);

    let exit = run_process(&runner, operation.descriptor(), cancel_rx, |line| {
        dispatcher.output(line)
    })
    .await;

    // Removing the entry is the terminal transition; whether a cancel got in
    // first is read from the removed entry itself.
    let cancel_requested = match registry.unregister(handle) {
        Some(entry) => entry.cancel_requested(),
        None => {
            warn!(%handle, "operation missing from registry at completion");
            false
        }
    };

    let result = classify_exit(cancel_requested, &exit);
    debug!(%handle, ?exit, ?result, "operation finished");
    dispatcher.finish(result);
}

/// Map a process exit to the observer-facing result.
///
/// A recorded cancel wins over whatever the exit status says.
pub fn classify_exit(cancel_requested: bool, exit: &ProcessExit) -> std::result::Result<(), OperationError> {
    if cancel_requested {
        return Err(OperationError::cancelled());
    }

    match exit {
        ProcessExit::Exited(status) if status.success() => Ok(()),
        ProcessExit::Exited(status) => Err(OperationError::unknown(match status.code() {
            Some(code) => format!("brew exited with status {code}"),
            None => "brew was terminated by a signal".to_string(),
        })),
        ProcessExit::LaunchFailed(reason) => Err(OperationError::unknown(reason.clone())),
        ProcessExit::NotStarted => Err(OperationError::unknown("process was not started")),
    }
}
