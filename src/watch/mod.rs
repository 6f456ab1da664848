// src/watch/mod.rs

//! Watching Homebrew's own directories for changes.
//!
//! The execution engine does not depend on this module. Callers that run
//! operations which touch the watched directories can suspend the watcher
//! around them to avoid reacting to their own changes.

pub mod location;
pub mod watcher;

pub use location::WatchLocation;
pub use watcher::{spawn_configured_watcher, spawn_watcher, WatchEvent, WatcherHandle};
