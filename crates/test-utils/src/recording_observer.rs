// crates/test-utils/src/recording_observer.rs

use std::sync::{Arc, Mutex};
use std::time::Duration;

use brewkit::engine::{Operation, OperationEvent, OperationObserver};
use brewkit::errors::OperationError;

/// Observer that records every callback, in order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<OperationEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<OperationEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Payloads of all `on_output` calls.
    pub fn outputs(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                OperationEvent::Output { output, .. } => Some(output),
                _ => None,
            })
            .collect()
    }

    pub fn finished_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, OperationEvent::Finished { .. }))
            .count()
    }

    pub fn failures(&self) -> Vec<OperationError> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                OperationEvent::Failed { error, .. } => Some(error),
                _ => None,
            })
            .collect()
    }

    pub fn terminal_count(&self) -> usize {
        self.events().iter().filter(|e| e.is_terminal()).count()
    }

    /// Poll until a terminal event was recorded.
    pub async fn wait_for_terminal(&self) {
        while self.terminal_count() == 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    /// Poll until at least `n` outputs were recorded.
    pub async fn wait_for_outputs(&self, n: usize) {
        while self.outputs().len() < n {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    /// Panics unless the last recorded event is the only terminal one.
    pub fn assert_terminal_last(&self) {
        let events = self.events();
        assert_eq!(self.terminal_count(), 1, "expected exactly one terminal event: {events:?}");
        assert!(
            events.last().is_some_and(|e| e.is_terminal()),
            "terminal event must be last: {events:?}"
        );
    }
}

impl OperationObserver for RecordingObserver {
    fn on_output(&self, operation: &Operation, output: &str) {
        self.events.lock().unwrap().push(OperationEvent::Output {
            handle: operation.handle(),
            output: output.to_string(),
        });
    }

    fn on_finished(&self, operation: &Operation) {
        self.events.lock().unwrap().push(OperationEvent::Finished {
            handle: operation.handle(),
        });
    }

    fn on_failed(&self, operation: &Operation, error: &OperationError) {
        self.events.lock().unwrap().push(OperationEvent::Failed {
            handle: operation.handle(),
            error: error.clone(),
        });
    }
}
