// src/engine/registry.rs

//! Table of in-flight operations.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::debug;

use crate::engine::observer::OperationObserver;
use crate::engine::{Operation, OperationHandle};
use crate::errors::{BrewError, Result};
use crate::operation::OperationDescriptor;
use crate::types::CommandKind;

/// One in-flight operation.
///
/// - `cancel_tx` reaches the operation's runner; it is taken (and fired) by
///   the first cancel request.
/// - `cancel_requested` is set under the registry lock before the runner is
///   signalled, and read by the runner when it removes the entry.
pub struct RegistryEntry {
    operation: Operation,
    observer: Arc<dyn OperationObserver>,
    cancel_tx: Option<oneshot::Sender<()>>,
    cancel_requested: bool,
}

impl RegistryEntry {
    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    pub fn observer(&self) -> &Arc<dyn OperationObserver> {
        &self.observer
    }

    pub fn cancel_requested(&self) -> bool {
        self.cancel_requested
    }
}

impl fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("operation", &self.operation)
            .field("cancel_requested", &self.cancel_requested)
            .finish_non_exhaustive()
    }
}

/// Concurrency-safe collection of every operation currently executing.
///
/// All reads and writes go through one mutex, so registration, removal and
/// the snapshots used for bulk cancellation never interleave.
pub struct OperationRegistry {
    entries: Mutex<HashMap<OperationHandle, RegistryEntry>>,
    next_handle: AtomicU64,
    allow_duplicates: bool,
}

impl fmt::Debug for OperationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationRegistry")
            .field("active", &self.len())
            .field("allow_duplicates", &self.allow_duplicates)
            .finish()
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::new(true)
    }
}

impl OperationRegistry {
    /// `allow_duplicates = false` rejects a descriptor equal to one already
    /// in flight.
    pub fn new(allow_duplicates: bool) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            next_handle: AtomicU64::new(1),
            allow_duplicates,
        }
    }

    pub fn allows_duplicates(&self) -> bool {
        self.allow_duplicates
    }

    /// Add a new in-flight entry.
    ///
    /// Returns the operation (with its fresh handle) and the receiving end of
    /// its cancellation channel, which belongs to the operation's runner.
    pub fn register(
        &self,
        descriptor: OperationDescriptor,
        observer: Arc<dyn OperationObserver>,
    ) -> Result<(Operation, oneshot::Receiver<()>)> {
        let mut entries = self.entries.lock();

        if !self.allow_duplicates
            && entries
                .values()
                .any(|entry| entry.operation.descriptor() == &descriptor)
        {
            return Err(BrewError::DuplicateOperation(descriptor.to_string()));
        }

        let handle = OperationHandle::new(self.next_handle.fetch_add(1, Ordering::Relaxed));
        let operation = Operation::new(handle, descriptor);
        let (cancel_tx, cancel_rx) = oneshot::channel();

        entries.insert(
            handle,
            RegistryEntry {
                operation: operation.clone(),
                observer,
                cancel_tx: Some(cancel_tx),
                cancel_requested: false,
            },
        );

        debug!(%handle, command = %operation.descriptor(), active = entries.len(), "operation registered");
        Ok((operation, cancel_rx))
    }

    /// Remove an entry. Removing an unknown handle is a no-op.
    pub fn unregister(&self, handle: OperationHandle) -> Option<RegistryEntry> {
        let mut entries = self.entries.lock();
        let entry = entries.remove(&handle);
        if entry.is_some() {
            debug!(%handle, active = entries.len(), "operation unregistered");
        }
        entry
    }

    /// Mark the entry as cancelled and signal its runner.
    ///
    /// Returns `false` if the handle is not registered or a cancel was
    /// already requested.
    pub fn request_cancel(&self, handle: OperationHandle) -> bool {
        let mut entries = self.entries.lock();
        let Some(entry) = entries.get_mut(&handle) else {
            return false;
        };
        if entry.cancel_requested {
            return false;
        }

        entry.cancel_requested = true;
        if let Some(cancel_tx) = entry.cancel_tx.take() {
            if cancel_tx.send(()).is_err() {
                debug!(%handle, "runner already stopped listening for cancellation");
            }
        }
        true
    }

    pub fn contains(&self, handle: OperationHandle) -> bool {
        self.entries.lock().contains_key(&handle)
    }

    /// Handles of all operations whose command name is `kind`'s.
    pub fn for_kind(&self, kind: CommandKind) -> Vec<OperationHandle> {
        let entries = self.entries.lock();
        let mut handles: Vec<_> = entries
            .values()
            .filter(|entry| entry.operation.descriptor().is_kind(kind))
            .map(|entry| entry.operation.handle())
            .collect();
        handles.sort();
        handles
    }

    pub fn all(&self) -> Vec<OperationHandle> {
        let entries = self.entries.lock();
        let mut handles: Vec<_> = entries.keys().copied().collect();
        handles.sort();
        handles
    }

    /// Snapshot of the in-flight operations, ordered by handle.
    pub fn operations(&self) -> Vec<Operation> {
        let entries = self.entries.lock();
        let mut ops: Vec<_> = entries.values().map(|e| e.operation.clone()).collect();
        ops.sort_by_key(|op| op.handle());
        ops
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
