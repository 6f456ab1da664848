// src/engine/dispatcher.rs

use std::sync::Arc;

use tracing::{debug, warn};

use crate::engine::Operation;
use crate::engine::observer::OperationObserver;
use crate::errors::OperationError;
use crate::types::OutputMode;

/// Lifecycle of one operation as seen by its observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Running,
    Succeeded,
    Failed,
}

/// Sequences observer notifications for a single operation.
///
/// `Running` accepts any number of outputs; the first call to
/// [`finish`](Self::finish) moves to a terminal state and notifies the
/// observer. Anything after that is dropped.
pub struct CompletionDispatcher {
    operation: Operation,
    observer: Arc<dyn OperationObserver>,
    mode: OutputMode,
    buffered: Vec<String>,
    state: DispatchState,
}

impl std::fmt::Debug for CompletionDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionDispatcher")
            .field("operation", &self.operation)
            .field("mode", &self.mode)
            .field("buffered", &self.buffered.len())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl CompletionDispatcher {
    pub fn new(operation: Operation, observer: Arc<dyn OperationObserver>) -> Self {
        let mode = OutputMode::for_command(operation.descriptor().name());
        Self {
            operation,
            observer,
            mode,
            buffered: Vec::new(),
            state: DispatchState::Running,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        self.state != DispatchState::Running
    }

    /// One line of process output.
    pub fn output(&mut self, line: String) {
        if self.is_terminal() {
            debug!(handle = %self.operation.handle(), "dropping output after terminal notification");
            return;
        }

        match self.mode {
            OutputMode::Streaming => self.observer.on_output(&self.operation, &line),
            OutputMode::Batched => self.buffered.push(line),
        }
    }

    /// Deliver the terminal notification.
    ///
    /// On success in batched mode the buffered output goes out as one block
    /// first, if there is any. Failure discards buffered output.
    pub fn finish(&mut self, result: Result<(), OperationError>) {
        if self.is_terminal() {
            warn!(
                handle = %self.operation.handle(),
                state = ?self.state,
                "second terminal notification suppressed"
            );
            return;
        }

        let buffered = std::mem::take(&mut self.buffered);
        match result {
            Ok(()) => {
                self.state = DispatchState::Succeeded;
                if !buffered.is_empty() {
                    self.observer
                        .on_output(&self.operation, &buffered.join("\n"));
                }
                self.observer.on_finished(&self.operation);
            }
            Err(error) => {
                self.state = DispatchState::Failed;
                self.observer.on_failed(&self.operation, &error);
            }
        }
    }
}
