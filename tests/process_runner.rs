// tests/process_runner.rs

use std::error::Error;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;
use std::time::{Duration, Instant};

use tokio::sync::oneshot;

use brewkit::engine::brew::classify_exit;
use brewkit::errors::ErrorKind;
use brewkit::exec::process::decode_line;
use brewkit::exec::{ProcessExit, ProcessRunner, run_process};
use brewkit::operation::{OperationDescriptor, PackageRef};
use brewkit_test_utils::{FakeBrew, init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn argv_is_command_target_then_arguments() -> TestResult {
    init_tracing();
    let fake = FakeBrew::standard()?;
    let runner = ProcessRunner::new(fake.path());

    let op = OperationDescriptor::info(PackageRef::new("wget")).with_arguments(["--json=v2", "--installed"]);
    let mut process = runner.spawn(&op)?;
    while process.next_line().await.is_some() {}
    assert!(process.wait().await?.success());

    let bare = OperationDescriptor::bare().with_arguments(["--cache"]);
    let mut process = runner.spawn(&bare)?;
    assert_eq!(process.next_line().await.as_deref(), Some("/tmp/brew-cache"));
    assert_eq!(process.next_line().await, None);
    assert!(process.wait().await?.success());

    assert_eq!(fake.invocations(), vec!["info wget --json=v2 --installed", "--cache"]);
    Ok(())
}

#[tokio::test]
async fn lines_are_yielded_in_emission_order() -> TestResult {
    init_tracing();
    let fake = FakeBrew::new(
        r#"
i=1
while [ $i -le 200 ]; do
  echo "line $i"
  i=$((i+1))
done
"#,
    )?;
    let runner = ProcessRunner::new(fake.path());
    let op = OperationDescriptor::install(PackageRef::new("wget"));

    let mut lines = Vec::new();
    let (_cancel_tx, cancel_rx) = oneshot::channel();
    let exit = with_timeout(run_process(&runner, &op, cancel_rx, |line| lines.push(line))).await;

    let expected: Vec<String> = (1..=200).map(|i| format!("line {i}")).collect();
    assert_eq!(lines, expected);
    assert!(exit.success());
    Ok(())
}

#[tokio::test]
async fn invalid_utf8_does_not_end_the_stream() -> TestResult {
    init_tracing();
    let fake = FakeBrew::new("printf 'wget\\n\\377caf\\351\\nwget-static\\r\\n'\nexit 0\n")?;
    let runner = ProcessRunner::new(fake.path());

    let mut lines = Vec::new();
    let (_cancel_tx, cancel_rx) = oneshot::channel();
    let exit = with_timeout(run_process(
        &runner,
        &OperationDescriptor::install(PackageRef::new("wget")),
        cancel_rx,
        |line| lines.push(line),
    ))
    .await;

    assert_eq!(lines, vec!["wget", "\u{FFFD}caf\u{FFFD}", "wget-static"]);
    assert!(exit.success());
    Ok(())
}

#[test]
fn decode_line_strips_carriage_return_and_replaces_bad_bytes() {
    assert_eq!(decode_line(b"plain".to_vec()), "plain");
    assert_eq!(decode_line(b"dos\r".to_vec()), "dos");
    assert_eq!(decode_line(b"caf\xe9".to_vec()), "caf\u{FFFD}");
    assert_eq!(decode_line(Vec::new()), "");
}

#[tokio::test]
async fn background_process_holding_stdout_does_not_delay_exit() -> TestResult {
    init_tracing();
    let fake = FakeBrew::new("echo one\nsleep 5 &\nexit 0\n")?;
    let runner = ProcessRunner::new(fake.path());

    let started = Instant::now();
    let mut lines = Vec::new();
    let (_cancel_tx, cancel_rx) = oneshot::channel();
    let exit = with_timeout(run_process(
        &runner,
        &OperationDescriptor::install(PackageRef::new("wget")),
        cancel_rx,
        |line| lines.push(line),
    ))
    .await;

    assert!(exit.success());
    assert_eq!(lines, vec!["one"]);
    assert!(
        started.elapsed() < Duration::from_secs(3),
        "waited {:?} for a background process",
        started.elapsed()
    );
    Ok(())
}

#[tokio::test]
async fn lines_arrive_before_the_process_exits() -> TestResult {
    init_tracing();
    let fake = FakeBrew::new("echo first\nexec sleep 30\n")?;
    let runner = ProcessRunner::new(fake.path());

    let mut process = runner.spawn(&OperationDescriptor::update())?;
    let first = with_timeout(process.next_line()).await;
    assert_eq!(first.as_deref(), Some("first"));

    process.interrupt()?;
    let status = with_timeout(process.wait()).await?;
    assert!(!status.success());
    assert_eq!(status.signal(), Some(2));
    Ok(())
}

#[tokio::test]
async fn non_zero_exit_is_reported() -> TestResult {
    init_tracing();
    let fake = FakeBrew::standard()?;
    let runner = ProcessRunner::new(fake.path());

    let (_cancel_tx, cancel_rx) = oneshot::channel();
    let exit = with_timeout(run_process(
        &runner,
        &OperationDescriptor::from_name("fail"),
        cancel_rx,
        |_| {},
    ))
    .await;

    assert!(!exit.success());
    assert_eq!(exit.code(), Some(3));
    Ok(())
}

#[tokio::test]
async fn missing_executable_is_a_launch_failure() {
    init_tracing();
    let runner = ProcessRunner::new("/nonexistent/path/to/brew");

    let (_cancel_tx, cancel_rx) = oneshot::channel();
    let exit = run_process(&runner, &OperationDescriptor::update(), cancel_rx, |_| {}).await;

    match exit {
        ProcessExit::LaunchFailed(reason) => assert!(reason.contains("/nonexistent/path/to/brew")),
        other => panic!("expected launch failure, got {other:?}"),
    }
}

#[tokio::test]
async fn cancel_before_launch_does_not_start_the_process() -> TestResult {
    init_tracing();
    let fake = FakeBrew::standard()?;
    let runner = ProcessRunner::new(fake.path());

    let (cancel_tx, cancel_rx) = oneshot::channel();
    cancel_tx.send(()).map_err(|_| "receiver dropped")?;

    let exit = run_process(&runner, &OperationDescriptor::update(), cancel_rx, |_| {}).await;
    assert!(matches!(exit, ProcessExit::NotStarted));
    assert!(fake.invocations().is_empty());
    Ok(())
}

#[tokio::test]
async fn cancel_while_running_interrupts_the_process() -> TestResult {
    init_tracing();
    let fake = FakeBrew::standard()?;
    let runner = ProcessRunner::new(fake.path());
    let op = OperationDescriptor::from_name("sleep");

    let (cancel_tx, cancel_rx) = oneshot::channel();
    let task = tokio::spawn(async move { run_process(&runner, &op, cancel_rx, |_| {}).await });

    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    cancel_tx.send(()).map_err(|_| "runner gone")?;

    let exit = with_timeout(task).await?;
    assert!(!exit.success());
    assert_eq!(exit.code(), None);
    Ok(())
}

#[test]
fn exit_classification() {
    let ok = ProcessExit::Exited(ExitStatus::from_raw(0));
    let failed = ProcessExit::Exited(ExitStatus::from_raw(3 << 8));
    let signalled = ProcessExit::Exited(ExitStatus::from_raw(2));
    let launch = ProcessExit::LaunchFailed("No such file or directory".into());

    assert_eq!(classify_exit(false, &ok), Ok(()));

    let err = classify_exit(false, &failed).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unknown);
    assert!(err.message().contains('3'));

    assert_eq!(classify_exit(false, &signalled).unwrap_err().kind(), ErrorKind::Unknown);
    assert_eq!(classify_exit(false, &launch).unwrap_err().kind(), ErrorKind::Unknown);

    // A recorded cancel wins whatever the exit looked like.
    for exit in [&ok, &failed, &signalled, &launch, &ProcessExit::NotStarted] {
        assert_eq!(classify_exit(true, exit).unwrap_err().kind(), ErrorKind::Cancelled);
    }
}
