// src/exec/task_runner.rs

//! Drives a single operation's process from launch to exit.

use std::process::ExitStatus;
use std::time::Duration;

use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::exec::process::{ProcessRunner, interrupt, next_stdout_line};
use crate::operation::OperationDescriptor;

/// How long stdout may stay silent after the process exited before the
/// remaining readers (background processes brew left behind) are abandoned.
pub const STDOUT_DRAIN_IDLE: Duration = Duration::from_millis(200);

/// How the process side of an operation ended.
#[derive(Debug)]
pub enum ProcessExit {
    /// The process ran and exited (normally or by signal).
    Exited(ExitStatus),
    /// The executable could not be launched or waited on.
    LaunchFailed(String),
    /// A cancel arrived before the process was launched.
    NotStarted,
}

impl ProcessExit {
    pub fn success(&self) -> bool {
        matches!(self, ProcessExit::Exited(status) if status.success())
    }

    /// Exit code, when the process exited on its own.
    pub fn code(&self) -> Option<i32> {
        match self {
            ProcessExit::Exited(status) => status.code(),
            _ => None,
        }
    }
}

/// Run `descriptor` to completion, handing every stdout line to `on_line`
/// in emission order.
///
/// If `cancel_rx` fires while the process runs, an interrupt is sent and the
/// runner keeps reading until the process is gone. Whether the result counts
/// as a cancellation is decided by the caller, not here.
pub async fn run_process<F>(
    runner: &ProcessRunner,
    descriptor: &OperationDescriptor,
    mut cancel_rx: oneshot::Receiver<()>,
    mut on_line: F,
) -> ProcessExit
where
    F: FnMut(String),
{
    if cancel_rx.try_recv().is_ok() {
        info!(command = %descriptor, "cancelled before launch; not starting process");
        return ProcessExit::NotStarted;
    }

    let process = match runner.spawn(descriptor) {
        Ok(process) => process,
        Err(err) => {
            warn!(command = %descriptor, error = %format!("{err:#}"), "failed to launch brew");
            return ProcessExit::LaunchFailed(format!("{err:#}"));
        }
    };

    let mut child = process.child;
    let mut stdout = process.stdout;
    let pid = child.id();
    info!(command = %descriptor, pid = ?pid, "brew process started");

    let mut cancel_armed = true;
    let mut exit: Option<std::io::Result<ExitStatus>> = None;

    // Lines before the exit status; a cancel may arrive at any point. The
    // exit is watched while stdout is still open, since a background process
    // can inherit the pipe and keep it open long after brew is gone.
    loop {
        if stdout.is_none() {
            if let Some(status) = exit.take() {
                return finished(descriptor, pid, status);
            }
        }

        tokio::select! {
            biased;

            cancel = &mut cancel_rx, if cancel_armed => {
                cancel_armed = false;
                match cancel {
                    Ok(()) => {
                        info!(command = %descriptor, pid = ?pid, "cancellation requested; interrupting process");
                        if let Err(e) = interrupt(&mut child) {
                            warn!(command = %descriptor, pid = ?pid, error = %e, "failed to interrupt process");
                        }
                    }
                    Err(_) => {
                        debug!(command = %descriptor, pid = ?pid, "cancel channel closed without a request");
                    }
                }
            }

            line = next_stdout_line(&mut stdout), if stdout.is_some() => {
                if let Some(line) = line {
                    on_line(line);
                }
            }

            status = child.wait(), if exit.is_none() => {
                exit = Some(status);
            }

            _ = tokio::time::sleep(STDOUT_DRAIN_IDLE), if exit.is_some() && stdout.is_some() => {
                debug!(
                    command = %descriptor,
                    pid = ?pid,
                    "stdout still open after exit; not waiting for the processes holding it"
                );
                stdout = None;
            }
        }
    }
}

fn finished(
    descriptor: &OperationDescriptor,
    pid: Option<u32>,
    status: std::io::Result<ExitStatus>,
) -> ProcessExit {
    match status {
        Ok(status) => {
            info!(
                command = %descriptor,
                pid = ?pid,
                exit_code = status.code().unwrap_or(-1),
                success = status.success(),
                "brew process exited"
            );
            ProcessExit::Exited(status)
        }
        Err(e) => {
            warn!(command = %descriptor, pid = ?pid, error = %e, "waiting for brew process failed");
            ProcessExit::LaunchFailed(format!("waiting for process: {e}"))
        }
    }
}
