// tests/watcher.rs

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::sync::mpsc;

use brewkit::config::BrewConfig;
use brewkit::watch::location::resolve_locations;
use brewkit::watch::{WatchEvent, WatchLocation, spawn_configured_watcher, spawn_watcher};
use brewkit_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn locations_resolve_below_the_prefix() {
    let prefix = Path::new("/opt/homebrew");
    assert_eq!(WatchLocation::Formula.resolve(prefix), PathBuf::from("/opt/homebrew/Library/Formula"));
    assert_eq!(
        WatchLocation::LinkedKegs.resolve(prefix),
        PathBuf::from("/opt/homebrew/Library/LinkedKegs")
    );
}

#[test]
fn nested_and_repeated_locations_collapse() {
    let prefix = Path::new("/usr/local");

    let all = resolve_locations(prefix, &WatchLocation::ALL);
    assert_eq!(all, vec![PathBuf::from("/usr/local/Library")]);

    let some = resolve_locations(
        prefix,
        &[WatchLocation::Taps, WatchLocation::Formula, WatchLocation::Taps],
    );
    assert_eq!(
        some,
        vec![
            PathBuf::from("/usr/local/Library/Formula"),
            PathBuf::from("/usr/local/Library/Taps"),
        ]
    );

    assert!(resolve_locations(prefix, &[]).is_empty());
}

fn fake_prefix() -> Result<tempfile::TempDir, Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    fs::create_dir_all(dir.path().join("Library/Formula"))?;
    fs::create_dir_all(dir.path().join("Library/Taps"))?;
    Ok(dir)
}

async fn next_change(rx: &mut mpsc::UnboundedReceiver<WatchEvent>) -> Option<Vec<PathBuf>> {
    rx.recv().await.map(|WatchEvent::Changed(paths)| paths)
}

#[tokio::test]
async fn changes_in_a_watched_location_are_reported() -> TestResult {
    init_tracing();
    let prefix = fake_prefix()?;
    let (tx, mut rx) = mpsc::unbounded_channel();

    let handle = spawn_watcher(prefix.path(), &[WatchLocation::Formula], tx)?;
    assert_eq!(handle.watched_paths(), &[prefix.path().join("Library/Formula")]);

    fs::write(prefix.path().join("Library/Formula/wget.rb"), "class Wget < Formula\nend\n")?;

    let paths = with_timeout(next_change(&mut rx)).await.ok_or("watcher channel closed")?;
    assert!(paths.iter().any(|p| p.ends_with("wget.rb")), "unexpected paths: {paths:?}");
    Ok(())
}

#[tokio::test]
async fn missing_locations_are_skipped() -> TestResult {
    init_tracing();
    let prefix = fake_prefix()?;
    let (tx, _rx) = mpsc::unbounded_channel();

    let handle = spawn_watcher(
        prefix.path(),
        &[WatchLocation::Taps, WatchLocation::PinnedKegs],
        tx,
    )?;
    assert_eq!(handle.watched_paths(), &[prefix.path().join("Library/Taps")]);
    Ok(())
}

#[tokio::test]
async fn suspended_watcher_drops_changes() -> TestResult {
    init_tracing();
    let prefix = fake_prefix()?;
    let (tx, mut rx) = mpsc::unbounded_channel();

    let handle = spawn_watcher(prefix.path(), &[WatchLocation::Library], tx)?;
    handle.suspend();
    assert!(handle.is_suspended());

    fs::write(prefix.path().join("Library/Taps/ignored.rb"), "x")?;
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(rx.try_recv().is_err(), "no change may be reported while suspended");

    handle.resume();
    fs::write(prefix.path().join("Library/Taps/seen.rb"), "y")?;

    let paths = with_timeout(next_change(&mut rx)).await.ok_or("watcher channel closed")?;
    assert!(paths.iter().any(|p| p.ends_with("seen.rb")), "unexpected paths: {paths:?}");
    Ok(())
}

#[tokio::test]
async fn watcher_follows_the_watch_section_of_the_config() -> TestResult {
    init_tracing();
    let prefix = fake_prefix()?;
    let mut config: BrewConfig = toml::from_str("[watch]\nlocations = [\"taps\", \"aliases\"]\n")?;
    config.watch.prefix = prefix.path().to_path_buf();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = spawn_configured_watcher(&config.watch, tx)?;
    assert_eq!(handle.watched_paths(), &[prefix.path().join("Library/Taps")]);

    fs::write(prefix.path().join("Library/Taps/tap.rb"), "z")?;
    let paths = with_timeout(next_change(&mut rx)).await.ok_or("watcher channel closed")?;
    assert!(paths.iter().any(|p| p.ends_with("tap.rb")), "unexpected paths: {paths:?}");
    Ok(())
}
