// src/engine/mod.rs

//! Operation execution engine.
//!
//! This module ties together:
//! - the registry of in-flight operations (`registry`)
//! - cancellation of one, a kind of, or all operations (`cancel`)
//! - the per-operation notification state machine (`dispatcher`)
//! - the observer interface toward callers (`observer`)
//! - the `Brew` façade that submits operations and owns all of the above
//!   (`brew`)

use std::fmt;

use crate::errors::OperationError;
use crate::operation::OperationDescriptor;

/// Opaque identifier of a submitted operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OperationHandle(u64);

impl OperationHandle {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for OperationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A submitted operation as seen by observers: its handle and descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    handle: OperationHandle,
    descriptor: OperationDescriptor,
}

impl Operation {
    pub fn new(handle: OperationHandle, descriptor: OperationDescriptor) -> Self {
        Self { handle, descriptor }
    }

    pub fn handle(&self) -> OperationHandle {
        self.handle
    }

    pub fn descriptor(&self) -> &OperationDescriptor {
        &self.descriptor
    }
}

/// Observer callbacks turned into values, see [`ChannelObserver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationEvent {
    Output {
        handle: OperationHandle,
        output: String,
    },
    Finished {
        handle: OperationHandle,
    },
    Failed {
        handle: OperationHandle,
        error: OperationError,
    },
}

impl OperationEvent {
    pub fn handle(&self) -> OperationHandle {
        match self {
            OperationEvent::Output { handle, .. }
            | OperationEvent::Finished { handle }
            | OperationEvent::Failed { handle, .. } => *handle,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, OperationEvent::Output { .. })
    }
}

pub mod brew;
pub mod cancel;
pub mod dispatcher;
pub mod observer;
pub mod registry;

pub use brew::{Brew, OperationOutput};
pub use cancel::CancellationController;
pub use dispatcher::{CompletionDispatcher, DispatchState};
pub use observer::{ChannelObserver, NoopObserver, OperationObserver};
pub use registry::{OperationRegistry, RegistryEntry};
