// src/engine/observer.rs

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::engine::{Operation, OperationEvent};
use crate::errors::OperationError;

/// Receives notifications about one submitted operation.
///
/// Every method has a no-op default; implement only what you need. For a
/// single operation the calls arrive in order: any number of `on_output`,
/// then exactly one of `on_finished` / `on_failed`. Calls for different
/// operations may interleave.
///
/// Callbacks run on the operation's tokio task and should not block.
pub trait OperationObserver: Send + Sync {
    /// A line (`install`) or the whole captured output (other commands).
    fn on_output(&self, _operation: &Operation, _output: &str) {}

    fn on_finished(&self, _operation: &Operation) {}

    fn on_failed(&self, _operation: &Operation, _error: &OperationError) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl OperationObserver for NoopObserver {}

/// Forwards every callback as an [`OperationEvent`] on an unbounded channel.
///
/// The channel closes once the engine drops its last reference to the
/// observer, i.e. after the terminal event.
#[derive(Debug)]
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<OperationEvent>,
}

impl ChannelObserver {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<OperationEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), rx)
    }

    fn send(&self, event: OperationEvent) {
        // Receiver gone means nobody is listening any more.
        let _ = self.tx.send(event);
    }
}

impl OperationObserver for ChannelObserver {
    fn on_output(&self, operation: &Operation, output: &str) {
        self.send(OperationEvent::Output {
            handle: operation.handle(),
            output: output.to_string(),
        });
    }

    fn on_finished(&self, operation: &Operation) {
        self.send(OperationEvent::Finished {
            handle: operation.handle(),
        });
    }

    fn on_failed(&self, operation: &Operation, error: &OperationError) {
        self.send(OperationEvent::Failed {
            handle: operation.handle(),
            error: error.clone(),
        });
    }
}
