// src/engine/cancel.rs

use std::sync::Arc;

use tracing::{debug, info};

use crate::engine::OperationHandle;
use crate::engine::registry::OperationRegistry;
use crate::types::CommandKind;

/// Delivers cancellation requests to registered operations.
///
/// Every method is best-effort and returns as soon as the requests are
/// issued; the cancelled operations report `Cancelled` through their own
/// observers later.
#[derive(Debug, Clone)]
pub struct CancellationController {
    registry: Arc<OperationRegistry>,
}

impl CancellationController {
    pub fn new(registry: Arc<OperationRegistry>) -> Self {
        Self { registry }
    }

    /// Cancel one operation. No effect (returns `false`) if it already
    /// finished or was already cancelled.
    pub fn cancel(&self, handle: OperationHandle) -> bool {
        let issued = self.registry.request_cancel(handle);
        if issued {
            info!(%handle, "cancellation requested");
        } else {
            debug!(%handle, "cancel ignored; operation not active or already cancelled");
        }
        issued
    }

    /// Cancel every operation of `kind` registered at the time of the call.
    pub fn cancel_kind(&self, kind: CommandKind) -> usize {
        let handles = self.registry.for_kind(kind);
        debug!(%kind, count = handles.len(), "cancelling operations of kind");
        self.cancel_each(handles)
    }

    /// Cancel every operation registered at the time of the call.
    pub fn cancel_all(&self) -> usize {
        let handles = self.registry.all();
        debug!(count = handles.len(), "cancelling all operations");
        self.cancel_each(handles)
    }

    fn cancel_each(&self, handles: Vec<OperationHandle>) -> usize {
        handles
            .into_iter()
            .filter(|handle| self.cancel(*handle))
            .count()
    }
}
