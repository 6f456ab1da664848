// src/exec/process.rs

//! Spawning `brew` and talking to the child process.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader, Split};
use tokio::process::{Child, ChildStdout, Command};
use tracing::debug;

use crate::operation::OperationDescriptor;

/// Newline-delimited raw stdout of a child.
pub type StdoutLines = Split<BufReader<ChildStdout>>;

/// Builds and launches `brew` invocations for descriptors.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    brew_path: PathBuf,
}

impl ProcessRunner {
    pub fn new(brew_path: impl Into<PathBuf>) -> Self {
        Self {
            brew_path: brew_path.into(),
        }
    }

    pub fn brew_path(&self) -> &Path {
        &self.brew_path
    }

    /// The command that would be run for `descriptor`.
    pub fn command(&self, descriptor: &OperationDescriptor) -> Command {
        let mut cmd = Command::new(&self.brew_path);
        cmd.args(descriptor.command_line())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Own process group, so an interrupt reaches brew's children too.
        #[cfg(unix)]
        cmd.process_group(0);

        cmd
    }

    /// Launch the executable for `descriptor`.
    pub fn spawn(&self, descriptor: &OperationDescriptor) -> Result<RunningProcess> {
        let mut child = self
            .command(descriptor)
            .spawn()
            .with_context(|| format!("spawning {:?} for `{}`", self.brew_path, descriptor))?;

        let stdout = child.stdout.take().map(|out| BufReader::new(out).split(b'\n'));

        if let Some(stderr) = child.stderr.take() {
            let pid = child.id();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).split(b'\n');
                while let Ok(Some(line)) = lines.next_segment().await {
                    debug!(pid = ?pid, "stderr: {}", decode_line(line));
                }
            });
        }

        Ok(RunningProcess { child, stdout })
    }
}

/// A launched child whose stdout is exposed as a line stream.
///
/// The fields are public so a driver can await the line stream and the exit
/// status in the same `select!`.
#[derive(Debug)]
pub struct RunningProcess {
    pub child: Child,
    /// `None` once stdout reached EOF (or was never piped).
    pub stdout: Option<StdoutLines>,
}

impl RunningProcess {
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Next line of stdout, in emission order; `None` at EOF.
    pub async fn next_line(&mut self) -> Option<String> {
        next_stdout_line(&mut self.stdout).await
    }

    pub async fn wait(&mut self) -> std::io::Result<ExitStatus> {
        self.child.wait().await
    }

    pub fn interrupt(&mut self) -> std::io::Result<()> {
        interrupt(&mut self.child)
    }
}

/// Read one line, closing the stream on EOF or read error.
///
/// Bytes that are not valid UTF-8 are replaced rather than ending the
/// stream.
pub async fn next_stdout_line(stdout: &mut Option<StdoutLines>) -> Option<String> {
    let lines = stdout.as_mut()?;
    match lines.next_segment().await {
        Ok(Some(line)) => Some(decode_line(line)),
        Ok(None) => {
            *stdout = None;
            None
        }
        Err(err) => {
            debug!(error = %err, "stdout read failed; treating as EOF");
            *stdout = None;
            None
        }
    }
}

/// Lossy UTF-8 conversion of one line without its `\r\n` / `\n` ending.
pub fn decode_line(mut line: Vec<u8>) -> String {
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    match String::from_utf8(line) {
        Ok(line) => line,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    }
}

/// Ask the child to stop the way Ctrl-C would: SIGINT to its process group.
///
/// Background jobs started by a non-interactive shell ignore SIGINT and
/// outlive the interrupt; the runner stops waiting on their stdout shortly
/// after brew itself exits.
#[cfg(unix)]
pub fn interrupt(child: &mut Child) -> std::io::Result<()> {
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    let Some(pid) = child.id() else {
        // Already reaped.
        return Ok(());
    };

    match killpg(Pid::from_raw(pid as i32), Signal::SIGINT) {
        Ok(()) | Err(nix::errno::Errno::ESRCH) => Ok(()),
        Err(errno) => Err(std::io::Error::from(errno)),
    }
}

#[cfg(not(unix))]
pub fn interrupt(child: &mut Child) -> std::io::Result<()> {
    child.start_kill()
}
