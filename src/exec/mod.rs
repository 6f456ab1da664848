// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running `brew`, using
//! `tokio::process::Command`, and reading its output line by line.
//!
//! - [`process`] builds the argument vector, launches the executable and
//!   delivers interrupts.
//! - [`task_runner`] drives one launched process to exit while listening for
//!   a cancellation request.

pub mod process;
pub mod task_runner;

pub use process::{ProcessRunner, RunningProcess};
pub use task_runner::{ProcessExit, run_process};
