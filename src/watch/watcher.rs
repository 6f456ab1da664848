// src/watch/watcher.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::WatchSection;
use crate::errors::Result;
use crate::watch::location::{WatchLocation, resolve_locations};

/// Notification raised by the watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// One or more watched paths changed.
    Changed(Vec<PathBuf>),
}

/// Handle for the filesystem watcher.
///
/// Keeps the underlying `RecommendedWatcher` alive; dropping the handle
/// stops watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
    suspended: Arc<AtomicBool>,
    watched: Vec<PathBuf>,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle")
            .field("suspended", &self.is_suspended())
            .field("watched", &self.watched)
            .finish_non_exhaustive()
    }
}

impl WatcherHandle {
    /// Drop change notifications until [`resume`](Self::resume) is called.
    pub fn suspend(&self) {
        debug!("file watcher suspended");
        self.suspended.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        debug!("file watcher resumed");
        self.suspended.store(false, Ordering::SeqCst);
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended.load(Ordering::SeqCst)
    }

    /// Directories actually being watched.
    pub fn watched_paths(&self) -> &[PathBuf] {
        &self.watched
    }
}

/// Start watching the given locations below `prefix` and send a
/// [`WatchEvent`] whenever something in them changes.
///
/// Locations that don't exist are skipped with a warning. Read-only access
/// events are ignored.
pub fn spawn_watcher(
    prefix: impl AsRef<Path>,
    locations: &[WatchLocation],
    event_tx: mpsc::UnboundedSender<WatchEvent>,
) -> Result<WatcherHandle> {
    let suspended = Arc::new(AtomicBool::new(false));

    let mut watcher = RecommendedWatcher::new(
        {
            let suspended = Arc::clone(&suspended);
            move |res: notify::Result<Event>| match res {
                Ok(event) => forward_event(event, &suspended, &event_tx),
                Err(err) => warn!(error = %err, "file watch error"),
            }
        },
        Config::default(),
    )?;

    let mut watched = Vec::new();
    for path in resolve_locations(prefix.as_ref(), locations) {
        if !path.exists() {
            warn!(path = ?path, "watch location does not exist; skipping");
            continue;
        }
        watcher.watch(&path, RecursiveMode::Recursive)?;
        watched.push(path);
    }

    info!(paths = ?watched, "file watcher started");

    Ok(WatcherHandle {
        _inner: watcher,
        suspended,
        watched,
    })
}

/// Start watching what the `[watch]` section of the config names.
pub fn spawn_configured_watcher(
    section: &WatchSection,
    event_tx: mpsc::UnboundedSender<WatchEvent>,
) -> Result<WatcherHandle> {
    spawn_watcher(&section.prefix, &section.locations, event_tx)
}

fn forward_event(
    event: Event,
    suspended: &AtomicBool,
    event_tx: &mpsc::UnboundedSender<WatchEvent>,
) {
    if matches!(event.kind, EventKind::Access(_)) || event.paths.is_empty() {
        return;
    }

    if suspended.load(Ordering::SeqCst) {
        debug!(paths = ?event.paths, "watcher suspended; dropping change");
        return;
    }

    debug!(kind = ?event.kind, paths = ?event.paths, "watched paths changed");
    if event_tx.send(WatchEvent::Changed(event.paths)).is_err() {
        debug!("watch event receiver dropped");
    }
}
