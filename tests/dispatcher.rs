// tests/dispatcher.rs

use brewkit::engine::{CompletionDispatcher, DispatchState, Operation, OperationEvent};
use brewkit::errors::{ErrorKind, OperationError};
use brewkit::operation::{OperationDescriptor, PackageRef};
use brewkit::types::OutputMode;
use brewkit::OperationHandle;
use brewkit_test_utils::RecordingObserver;

fn operation(descriptor: OperationDescriptor) -> (Operation, OperationHandle) {
    let registry = brewkit::engine::OperationRegistry::default();
    let (op, _rx) = registry
        .register(descriptor, std::sync::Arc::new(brewkit::engine::NoopObserver))
        .expect("register");
    let handle = op.handle();
    (op, handle)
}

#[test]
fn install_streams_each_line_before_finishing() {
    let observer = RecordingObserver::new();
    let (op, handle) = operation(OperationDescriptor::install(PackageRef::new("wget")));
    let mut dispatcher = CompletionDispatcher::new(op, observer.clone());
    assert_eq!(dispatcher.mode(), OutputMode::Streaming);

    dispatcher.output("==> Downloading".into());
    assert_eq!(observer.outputs(), vec!["==> Downloading"]);

    dispatcher.output("==> Pouring".into());
    dispatcher.finish(Ok(()));

    assert_eq!(
        observer.events(),
        vec![
            OperationEvent::Output { handle, output: "==> Downloading".into() },
            OperationEvent::Output { handle, output: "==> Pouring".into() },
            OperationEvent::Finished { handle },
        ]
    );
    assert_eq!(dispatcher.state(), DispatchState::Succeeded);
}

#[test]
fn other_commands_deliver_one_block_right_before_finishing() {
    let observer = RecordingObserver::new();
    let (op, handle) = operation(OperationDescriptor::search(Some(PackageRef::new("wget"))));
    let mut dispatcher = CompletionDispatcher::new(op, observer.clone());
    assert_eq!(dispatcher.mode(), OutputMode::Batched);

    dispatcher.output("wget".into());
    dispatcher.output("wget-static".into());
    assert!(observer.events().is_empty(), "nothing may be delivered while running");

    dispatcher.finish(Ok(()));
    assert_eq!(
        observer.events(),
        vec![
            OperationEvent::Output { handle, output: "wget\nwget-static".into() },
            OperationEvent::Finished { handle },
        ]
    );
}

#[test]
fn batched_without_output_only_finishes() {
    let observer = RecordingObserver::new();
    let (op, handle) = operation(OperationDescriptor::outdated());
    let mut dispatcher = CompletionDispatcher::new(op, observer.clone());

    dispatcher.finish(Ok(()));
    assert_eq!(observer.events(), vec![OperationEvent::Finished { handle }]);
}

#[test]
fn batched_failure_discards_buffered_output() {
    let observer = RecordingObserver::new();
    let (op, handle) = operation(OperationDescriptor::info(PackageRef::new("nope")));
    let mut dispatcher = CompletionDispatcher::new(op, observer.clone());

    dispatcher.output("Error: No available formula".into());
    dispatcher.finish(Err(OperationError::unknown("brew exited with status 1")));

    let events = observer.events();
    assert_eq!(events.len(), 1);
    match &events[0] {
        OperationEvent::Failed { handle: h, error } => {
            assert_eq!(*h, handle);
            assert_eq!(error.kind(), ErrorKind::Unknown);
            assert_eq!(error.code(), 1);
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(dispatcher.state(), DispatchState::Failed);
}

#[test]
fn nothing_is_delivered_after_the_terminal_notification() {
    let observer = RecordingObserver::new();
    let (op, _) = operation(OperationDescriptor::install(PackageRef::new("wget")));
    let mut dispatcher = CompletionDispatcher::new(op, observer.clone());

    dispatcher.output("one".into());
    dispatcher.finish(Err(OperationError::cancelled()));
    dispatcher.output("late".into());
    dispatcher.finish(Ok(()));
    dispatcher.finish(Err(OperationError::unknown("again")));

    assert_eq!(observer.outputs(), vec!["one"]);
    assert_eq!(observer.finished_count(), 0);
    assert_eq!(observer.failures(), vec![OperationError::cancelled()]);
    observer.assert_terminal_last();
    assert!(dispatcher.is_terminal());
}

#[test]
fn cancelled_error_carries_its_code() {
    let err = OperationError::cancelled();
    assert!(err.is_cancelled());
    assert_eq!(err.kind(), ErrorKind::Cancelled);
    assert_eq!(err.code(), 130);
}
